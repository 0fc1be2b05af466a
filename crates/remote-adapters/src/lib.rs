//! # remote-adapters
//!
//! `reqwest`-based implementations of the domain ports against the
//! hosted backend-as-a-service: GoTrue-style auth endpoints and
//! PostgREST-style table endpoints. Only the two configuration values
//! (endpoint, service key) address the deployment.

mod client;
mod identity;
mod tables;

pub use client::RemoteClient;
pub use identity::RestIdentityProvider;
pub use tables::{RestForumStore, RestProfileStore};
