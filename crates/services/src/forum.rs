//! # ForumService
//!
//! This module coordinates the post/comment data flow over the ports:
//! listing, single-post reads with comments, creation with the
//! mode-dependent identity precondition, and the best-effort
//! denormalized comment count.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use domains::{
    AuthorRef, Category, Comment, DeploymentMode, ForumError, ForumStore, IdentityProvider,
    NewComment, NewPost, Post, PostWithComments, Result, ANONYMOUS_AUTHOR,
};

pub struct ForumService {
    store: Arc<dyn ForumStore>,
    identity: Arc<dyn IdentityProvider>,
    mode: DeploymentMode,
}

impl ForumService {
    pub fn new(
        store: Arc<dyn ForumStore>,
        identity: Arc<dyn IdentityProvider>,
        mode: DeploymentMode,
    ) -> Self {
        Self {
            store,
            identity,
            mode,
        }
    }

    /// All posts, newest first, optionally narrowed to one category.
    /// Returns structured records; rendering is the caller's concern.
    pub async fn list_posts(&self, category: Option<Category>) -> Result<Vec<Post>> {
        match self.store.list_posts(category).await {
            Ok(posts) => Ok(posts),
            Err(err) => {
                warn!(error = %err, "listing posts failed");
                Err(err)
            }
        }
    }

    /// One post plus its comments, oldest comment first.
    pub async fn get_post(&self, post_id: Uuid) -> Result<PostWithComments> {
        let post = self
            .store
            .get_post(post_id)
            .await
            .inspect_err(|err| warn!(%post_id, error = %err, "loading post failed"))?
            .ok_or_else(|| ForumError::NotFound("post".into(), post_id.to_string()))?;

        let comments = self
            .store
            .list_comments(post_id)
            .await
            .inspect_err(|err| warn!(%post_id, error = %err, "loading comments failed"))?;
        Ok(PostWithComments { post, comments })
    }

    /// Creates a post. In authenticated mode the current identity is
    /// resolved first and its absence short-circuits before any store
    /// call; in anonymous mode `author_name` (or a fallback) is stored
    /// inline.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        category: Category,
        author_name: Option<&str>,
    ) -> Result<Post> {
        let author = self.resolve_author(author_name).await?;
        self.store
            .insert_post(NewPost {
                title: title.to_string(),
                content: content.to_string(),
                category,
                author,
            })
            .await
            .inspect_err(|err| warn!(error = %err, "creating post failed"))
    }

    /// Adds a comment, then recomputes the post's denormalized comment
    /// count. The recompute is best-effort: a failure there leaves the
    /// count stale but does not fail the visible comment add.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        content: &str,
        author_name: Option<&str>,
    ) -> Result<Comment> {
        let author = self.resolve_author(author_name).await?;
        let comment = self
            .store
            .insert_comment(NewComment {
                post_id,
                content: content.to_string(),
                author,
            })
            .await
            .inspect_err(|err| warn!(%post_id, error = %err, "adding comment failed"))?;

        if let Err(err) = self.recompute_comment_count(post_id).await {
            warn!(%post_id, error = %err, "comment count update failed");
        }

        Ok(comment)
    }

    /// Counts the comments referencing a post and writes the count onto
    /// the post row. Recomputed, never incremented.
    pub async fn recompute_comment_count(&self, post_id: Uuid) -> Result<i64> {
        let count = self.store.count_comments(post_id).await?;
        self.store.set_comment_count(post_id, count).await?;
        Ok(count)
    }

    async fn resolve_author(&self, author_name: Option<&str>) -> Result<AuthorRef> {
        match self.mode {
            DeploymentMode::Authenticated => {
                let identity = self
                    .identity
                    .current_identity()
                    .await?
                    .ok_or(ForumError::NotLoggedIn)?;
                Ok(AuthorRef::Profile {
                    user_id: identity.id,
                    username: identity.username,
                })
            }
            DeploymentMode::Anonymous => {
                let name = author_name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or(ANONYMOUS_AUTHOR);
                Ok(AuthorRef::Name(name.to_string()))
            }
        }
    }
}
