//! # ui
//!
//! View models and templates for the two page regions this layer owns:
//! the post list and the session-status display. Builders are pure
//! functions from domain records (or an adapter outcome) to a view
//! model; rendering needs no remote calls and no clock of its own.

pub mod format;

use askama::Template;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use domains::{ForumError, Identity, Post};

pub use format::{author_display, category_label, excerpt, relative_time, SUMMARY_LIMIT};

/// One post rendered as a summary card.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub id: Uuid,
    pub category_label: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub posted: String,
    pub comment_count: i64,
}

impl PostSummary {
    pub fn build(post: &Post, now: DateTime<Utc>) -> Self {
        Self {
            id: post.id,
            category_label: category_label(&post.category).to_string(),
            title: post.title.clone(),
            excerpt: excerpt(&post.content, SUMMARY_LIMIT),
            author: author_display(&post.author).to_string(),
            posted: relative_time(now, post.created_at),
            comment_count: post.comment_count,
        }
    }
}

/// The three states the post-list region can show. The empty and
/// failed placeholders are deliberately distinct texts.
#[derive(Debug)]
pub enum PostListState {
    Loaded(Vec<PostSummary>),
    Empty,
    Failed,
}

#[derive(Template)]
#[template(path = "post_list.html")]
pub struct PostListTemplate {
    pub state: PostListState,
}

impl PostListTemplate {
    /// Folds a list-posts outcome into the region's display state.
    /// An adapter failure becomes the error placeholder here; it never
    /// escapes the render path.
    pub fn from_outcome(outcome: &Result<Vec<Post>, ForumError>, now: DateTime<Utc>) -> Self {
        let state = match outcome {
            Ok(posts) if posts.is_empty() => PostListState::Empty,
            Ok(posts) => PostListState::Loaded(
                posts.iter().map(|post| PostSummary::build(post, now)).collect(),
            ),
            Err(_) => PostListState::Failed,
        };
        Self { state }
    }
}

/// The signed-in half of the session-status region.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// Uppercased first letter of the display name, shown as the avatar.
    pub initial: String,
    pub name: String,
}

#[derive(Template)]
#[template(path = "session_status.html")]
pub struct SessionStatusTemplate {
    pub user: Option<SessionUser>,
}

impl SessionStatusTemplate {
    pub fn from_identity(identity: Option<&Identity>) -> Self {
        let user = identity.map(|identity| {
            let name = identity.display_name().to_string();
            let initial = name
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default();
            SessionUser { initial, name }
        });
        Self { user }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{AuthorRef, Category};

    fn post(content: &str, comment_count: i64) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "Hello".into(),
            content: content.into(),
            category: Category::Tech,
            author: AuthorRef::Name("ada".into()),
            comment_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_list_renders_no_posts_placeholder() {
        let html = PostListTemplate::from_outcome(&Ok(vec![]), Utc::now())
            .render()
            .unwrap();
        assert!(html.contains("No posts yet"));
        assert!(!html.contains("Failed to load"));
    }

    #[test]
    fn failed_list_renders_error_placeholder() {
        let outcome = Err(ForumError::Remote("boom".into()));
        let html = PostListTemplate::from_outcome(&outcome, Utc::now())
            .render()
            .unwrap();
        assert!(html.contains("Failed to load"));
        assert!(!html.contains("No posts yet"));
    }

    #[test]
    fn loaded_list_renders_summary_cards() {
        let outcome = Ok(vec![post("short body", 4)]);
        let html = PostListTemplate::from_outcome(&outcome, Utc::now())
            .render()
            .unwrap();
        assert!(html.contains("Tech Talk"));
        assert!(html.contains("short body"));
        assert!(html.contains("ada"));
        assert!(html.contains("Comments: 4"));
    }

    #[test]
    fn session_status_shows_avatar_initial_when_signed_in() {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            username: Some("ada".into()),
        };
        let html = SessionStatusTemplate::from_identity(Some(&identity))
            .render()
            .unwrap();
        assert!(html.contains(">A</div>"));
        assert!(html.contains("ada"));
        assert!(html.contains("Log out"));
    }

    #[test]
    fn session_status_shows_login_link_when_anonymous() {
        let html = SessionStatusTemplate::from_identity(None).render().unwrap();
        assert!(html.contains("Log in / Register"));
    }
}
