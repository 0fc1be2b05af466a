//! # Core Ports
//!
//! Any remote adapter must implement these traits to be used by the
//! services. Mock implementations are generated by mockall; external
//! test crates get them via the `testing` feature.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, Comment, Identity, NewComment, NewPost, Post, Profile};

/// Identity contract against the hosted auth endpoints.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers a new account; the username travels as signup metadata.
    async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<Identity>;

    /// Password sign-in. On success the adapter retains the session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Ends the current session. A no-op when none is held.
    async fn sign_out(&self) -> Result<()>;

    /// Resolves the currently signed-in identity, if any. Read-only.
    async fn current_identity(&self) -> Result<Option<Identity>>;
}

/// Data contract for the `posts` and `comments` tables.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ForumStore: Send + Sync {
    /// All posts, newest first, optionally filtered by category.
    async fn list_posts(&self, category: Option<Category>) -> Result<Vec<Post>>;

    /// One post by id; `None` when the row does not exist.
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>>;

    /// Comments for a post, oldest first.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    async fn insert_post(&self, post: NewPost) -> Result<Post>;

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;

    /// Exact count of comments referencing the post.
    async fn count_comments(&self, post_id: Uuid) -> Result<i64>;

    /// Writes a recomputed denormalized count onto the post row.
    async fn set_comment_count(&self, post_id: Uuid, count: i64) -> Result<()>;
}

/// Write contract for the `profiles` table (authenticated mode only).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Inserts the profile row mirroring a freshly registered identity.
    async fn insert_profile(&self, profile: Profile) -> Result<()>;
}
