//! Shared fixtures for the scenario tests: an in-memory `ForumStore`
//! that behaves like the hosted tables, including the denormalized
//! comment count and an injectable count failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domains::{
    Category, Comment, ForumError, ForumStore, NewComment, NewPost, Post, Result,
};

#[derive(Default)]
pub struct InMemoryForumStore {
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    /// When set, `count_comments` fails, leaving counts stale.
    pub fail_counts: AtomicBool,
}

impl InMemoryForumStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ForumStore for InMemoryForumStore {
    async fn list_posts(&self, category: Option<Category>) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| category.as_ref().map_or(true, |c| &post.category == c))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let created = Post {
            id: Uuid::new_v4(),
            title: post.title,
            content: post.content,
            category: post.category,
            author: post.author,
            comment_count: 0,
            created_at: Utc::now(),
        };
        self.posts.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let post_exists = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .any(|post| post.id == comment.post_id);
        if !post_exists {
            return Err(ForumError::Remote(
                "foreign key violation on comments.post_id".to_string(),
            ));
        }

        let created = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            content: comment.content,
            author: comment.author,
            created_at: Utc::now(),
        };
        self.comments.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn count_comments(&self, post_id: Uuid) -> Result<i64> {
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(ForumError::Remote("count unavailable".to_string()));
        }
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .count() as i64)
    }

    async fn set_comment_count(&self, post_id: Uuid, count: i64) -> Result<()> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|post| post.id == post_id) {
            Some(post) => {
                post.comment_count = count;
                Ok(())
            }
            None => Err(ForumError::NotFound("post".into(), post_id.to_string())),
        }
    }
}
