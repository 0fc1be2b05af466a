//! emberboard/crates/services/src/lib.rs
//!
//! Orchestration layer: translates UI intents into port calls and
//! normalizes the outcomes. No transport or rendering knowledge here.

pub mod auth;
pub mod forum;

pub use auth::AuthService;
pub use forum::ForumService;
