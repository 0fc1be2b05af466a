//! # Domain Models
//!
//! These structs represent the core entities of Emberboard.
//! Identifiers come from the hosted service, which issues UUIDs for
//! auth users and table rows alike.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name substituted when an author cannot be resolved: a
/// missing profile join in authenticated mode, or a blank name field
/// in anonymous mode.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// The fixed set of discussion categories.
///
/// Codes outside the known four are carried through as `Other` so an
/// unrecognized row never fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    General,
    Tech,
    Help,
    Feedback,
    Other(String),
}

impl Category {
    /// The wire code stored in the `category` column.
    pub fn code(&self) -> &str {
        match self {
            Category::General => "general",
            Category::Tech => "tech",
            Category::Help => "help",
            Category::Feedback => "feedback",
            Category::Other(code) => code,
        }
    }
}

impl From<String> for Category {
    fn from(code: String) -> Self {
        match code.as_str() {
            "general" => Category::General,
            "tech" => Category::Tech,
            "help" => Category::Help,
            "feedback" => Category::Feedback,
            _ => Category::Other(code),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.code().to_string()
    }
}

/// How a Post or Comment refers to its author.
///
/// Exactly one variant is in play per deployment: authenticated
/// deployments store a foreign key into `profiles` (with the username
/// resolved by an embedded join when available), anonymous deployments
/// store the display name inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorRef {
    Profile {
        user_id: Uuid,
        /// Joined `profiles.username`; absent when the join found no row.
        username: Option<String>,
    },
    Name(String),
}

/// A forum post. `comment_count` is denormalized and recomputed after
/// every comment insert rather than incremented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub author: AuthorRef,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// The fields a caller supplies when creating a post. The service fills
/// in the author from the deployment mode and session state.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub author: AuthorRef,
}

/// A comment on a post. Cannot exist without a valid post reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub content: String,
    pub author: AuthorRef,
}

/// A post together with its comments, ordered oldest first.
#[derive(Debug, Clone)]
pub struct PostWithComments {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// The `profiles` row mirroring an auth identity. Created exactly once,
/// immediately after registration; never updated by this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Equal to the auth identity's id.
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The hosted provider's view of the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    /// Username from the signup metadata, when one was recorded.
    pub username: Option<String>,
}

impl Identity {
    /// Display name fallback chain: username metadata, then the
    /// local-part of the email address.
    pub fn display_name(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// Which author representation a deployment uses. Selected once in
/// configuration, never branched on at runtime per-request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Posts/comments require a signed-in identity; author is a
    /// foreign key into `profiles`.
    Authenticated,
    /// Author is a plain display-name string; no session required.
    Anonymous,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrips_known_codes() {
        for code in ["general", "tech", "help", "feedback"] {
            let cat = Category::from(code.to_string());
            assert_eq!(cat.code(), code);
            assert!(!matches!(cat, Category::Other(_)));
        }
    }

    #[test]
    fn category_preserves_unknown_codes() {
        let cat = Category::from("offtopic".to_string());
        assert_eq!(cat, Category::Other("offtopic".to_string()));
        assert_eq!(cat.code(), "offtopic");
    }

    #[test]
    fn display_name_prefers_username_metadata() {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            username: Some("ada".into()),
        };
        assert_eq!(identity.display_name(), "ada");
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            username: None,
        };
        assert_eq!(identity.display_name(), "ada");
    }
}
