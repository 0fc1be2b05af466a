//! # Table adapters
//!
//! This module implements the data mapping between the hosted service's
//! table rows and the domain models, for both deployment modes:
//! authenticated rows carry `user_id` plus an embedded `profiles` join,
//! anonymous rows carry an inline `author_name` column.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use domains::{
    AuthorRef, Category, Comment, DeploymentMode, ForumError, ForumStore, NewComment, NewPost,
    Post, Profile, ProfileStore, Result, ANONYMOUS_AUTHOR,
};

use crate::client::{check_status, remote_err, RemoteClient};

/// Accept header requesting a single JSON object instead of an array.
const OBJECT_ACCEPT: &str = "application/vnd.pgrst.object+json";

pub struct RestForumStore {
    client: Arc<RemoteClient>,
    mode: DeploymentMode,
}

pub struct RestProfileStore {
    client: Arc<RemoteClient>,
}

// ── Wire rows ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProfileJoin {
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    comment_count: Option<i64>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    user_id: Option<Uuid>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    profiles: Option<ProfileJoin>,
}

#[derive(Debug, Deserialize)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    user_id: Option<Uuid>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    profiles: Option<ProfileJoin>,
}

fn default_category() -> String {
    "general".to_string()
}

/// Builds the author out of whichever representation the row carries.
fn row_author(
    mode: DeploymentMode,
    user_id: Option<Uuid>,
    author_name: Option<String>,
    profiles: Option<ProfileJoin>,
) -> Result<AuthorRef> {
    match mode {
        DeploymentMode::Authenticated => {
            let user_id = user_id
                .ok_or_else(|| ForumError::Remote("row missing user_id".to_string()))?;
            Ok(AuthorRef::Profile {
                user_id,
                username: profiles.and_then(|p| p.username),
            })
        }
        DeploymentMode::Anonymous => Ok(AuthorRef::Name(
            author_name.unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
        )),
    }
}

impl PostRow {
    fn into_post(self, mode: DeploymentMode) -> Result<Post> {
        let author = row_author(mode, self.user_id, self.author_name, self.profiles)?;
        Ok(Post {
            id: self.id,
            title: self.title,
            content: self.content,
            category: Category::from(self.category),
            author,
            comment_count: self.comment_count.unwrap_or(0),
            created_at: self.created_at,
        })
    }
}

impl CommentRow {
    fn into_comment(self, mode: DeploymentMode) -> Result<Comment> {
        let author = row_author(mode, self.user_id, self.author_name, self.profiles)?;
        Ok(Comment {
            id: self.id,
            post_id: self.post_id,
            content: self.content,
            author,
            created_at: self.created_at,
        })
    }
}

// ── Query construction ──────────────────────────────────────────────────────

/// The `select=` clause: authenticated mode embeds the profile join so
/// author usernames come back in one request.
fn select_clause(mode: DeploymentMode) -> &'static str {
    match mode {
        DeploymentMode::Authenticated => "*,profiles(username)",
        DeploymentMode::Anonymous => "*",
    }
}

fn post_list_query(mode: DeploymentMode, category: Option<&Category>) -> Vec<(String, String)> {
    let mut query = vec![
        ("select".to_string(), select_clause(mode).to_string()),
        ("order".to_string(), "created_at.desc".to_string()),
    ];
    if let Some(category) = category {
        query.push(("category".to_string(), format!("eq.{}", category.code())));
    }
    query
}

fn comment_list_query(mode: DeploymentMode, post_id: Uuid) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), select_clause(mode).to_string()),
        ("post_id".to_string(), format!("eq.{post_id}")),
        ("order".to_string(), "created_at.asc".to_string()),
    ]
}

/// Extracts the total from a `Content-Range` header (`0-24/25`, `*/0`).
fn parse_content_range(value: &str) -> Option<i64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

// ── ForumStore ──────────────────────────────────────────────────────────────

impl RestForumStore {
    pub fn new(client: Arc<RemoteClient>, mode: DeploymentMode) -> Self {
        Self { client, mode }
    }

    fn insert_body(author: &AuthorRef, mut body: serde_json::Value) -> serde_json::Value {
        match author {
            AuthorRef::Profile { user_id, .. } => {
                body["user_id"] = json!(user_id);
            }
            AuthorRef::Name(name) => {
                body["author_name"] = json!(name);
            }
        }
        body
    }
}

#[async_trait]
impl ForumStore for RestForumStore {
    async fn list_posts(&self, category: Option<Category>) -> Result<Vec<Post>> {
        let request = self
            .client
            .http()
            .get(self.client.table_url("posts"))
            .query(&post_list_query(self.mode, category.as_ref()));
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("list-posts", e))?;
        let response = check_status("list-posts", response).await?;

        let rows: Vec<PostRow> = response
            .json()
            .await
            .map_err(|e| remote_err("list-posts", e))?;
        rows.into_iter().map(|row| row.into_post(self.mode)).collect()
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        let id_filter = format!("eq.{id}");
        let request = self
            .client
            .http()
            .get(self.client.table_url("posts"))
            .query(&[
                ("select", select_clause(self.mode)),
                ("id", id_filter.as_str()),
            ])
            .header("Accept", OBJECT_ACCEPT);
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("get-post", e))?;

        // The object Accept header makes a zero-row result a 406.
        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }
        let response = check_status("get-post", response).await?;

        let row: PostRow = response.json().await.map_err(|e| remote_err("get-post", e))?;
        row.into_post(self.mode).map(Some)
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let request = self
            .client
            .http()
            .get(self.client.table_url("comments"))
            .query(&comment_list_query(self.mode, post_id));
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("list-comments", e))?;
        let response = check_status("list-comments", response).await?;

        let rows: Vec<CommentRow> = response
            .json()
            .await
            .map_err(|e| remote_err("list-comments", e))?;
        rows.into_iter()
            .map(|row| row.into_comment(self.mode))
            .collect()
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let mut body = json!({
            "title": post.title,
            "content": post.content,
            "category": post.category.code(),
            "created_at": Utc::now().to_rfc3339(),
        });
        // Anonymous deployments have no column default for the count.
        if matches!(post.author, AuthorRef::Name(_)) {
            body["comment_count"] = json!(0);
        }
        let body = Self::insert_body(&post.author, body);

        let request = self
            .client
            .http()
            .post(self.client.table_url("posts"))
            .query(&[("select", select_clause(self.mode))])
            .header("Prefer", "return=representation")
            .json(&body);
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("insert-post", e))?;
        let response = check_status("insert-post", response).await?;

        let mut rows: Vec<PostRow> = response
            .json()
            .await
            .map_err(|e| remote_err("insert-post", e))?;
        let row = rows
            .pop()
            .ok_or_else(|| ForumError::Remote("insert-post: empty representation".to_string()))?;
        row.into_post(self.mode)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let body = Self::insert_body(
            &comment.author,
            json!({
                "post_id": comment.post_id,
                "content": comment.content,
                "created_at": Utc::now().to_rfc3339(),
            }),
        );

        let request = self
            .client
            .http()
            .post(self.client.table_url("comments"))
            .query(&[("select", select_clause(self.mode))])
            .header("Prefer", "return=representation")
            .json(&body);
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("insert-comment", e))?;
        let response = check_status("insert-comment", response).await?;

        let mut rows: Vec<CommentRow> = response
            .json()
            .await
            .map_err(|e| remote_err("insert-comment", e))?;
        let row = rows.pop().ok_or_else(|| {
            ForumError::Remote("insert-comment: empty representation".to_string())
        })?;
        row.into_comment(self.mode)
    }

    /// Exact count via a HEAD request; the total rides back in the
    /// `Content-Range` header, so no rows cross the wire.
    async fn count_comments(&self, post_id: Uuid) -> Result<i64> {
        let post_filter = format!("eq.{post_id}");
        let request = self
            .client
            .http()
            .head(self.client.table_url("comments"))
            .query(&[("select", "id"), ("post_id", post_filter.as_str())])
            .header("Prefer", "count=exact");
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("count-comments", e))?;
        let response = check_status("count-comments", response).await?;

        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| {
                ForumError::Remote("count-comments: missing content-range".to_string())
            })
    }

    async fn set_comment_count(&self, post_id: Uuid, count: i64) -> Result<()> {
        let request = self
            .client
            .http()
            .patch(self.client.table_url("posts"))
            .query(&[("id", format!("eq.{post_id}"))])
            .json(&json!({ "comment_count": count }));
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("set-comment-count", e))?;
        check_status("set-comment-count", response).await?;
        Ok(())
    }
}

// ── ProfileStore ────────────────────────────────────────────────────────────

impl RestProfileStore {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn insert_profile(&self, profile: Profile) -> Result<()> {
        let request = self
            .client
            .http()
            .post(self.client.table_url("profiles"))
            .json(&json!({
                "id": profile.id,
                "username": profile.username,
                "email": profile.email,
                "created_at": profile.created_at.to_rfc3339(),
            }));
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("insert-profile", e))?;
        check_status("insert-profile", response).await?;
        Ok(())
    }
}
