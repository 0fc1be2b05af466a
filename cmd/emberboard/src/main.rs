//! # Emberboard Binary
//!
//! Assembles the remote adapters and services from configuration, then
//! runs the front page flow once: resolve the session, fetch the post
//! list, and print the rendered regions.

use std::sync::Arc;

use anyhow::Context;
use askama::Template;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use configs::Settings;
use remote_adapters::{RemoteClient, RestForumStore, RestIdentityProvider, RestProfileStore};
use services::{AuthService, ForumService};
use ui::{PostListTemplate, SessionStatusTemplate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::load().context("loading settings")?;
    info!(endpoint = %settings.remote.endpoint, mode = ?settings.mode, "emberboard starting");

    // One shared client; the identity adapter keeps the session on it.
    let client = Arc::new(RemoteClient::new(
        &settings.remote.endpoint,
        settings.remote.service_key.clone(),
    ));
    let identity = Arc::new(RestIdentityProvider::new(client.clone()));
    let profiles = Arc::new(RestProfileStore::new(client.clone()));
    let store = Arc::new(RestForumStore::new(client.clone(), settings.mode));

    let auth = AuthService::new(identity.clone(), profiles);
    let forum = ForumService::new(store, identity, settings.mode);

    let session = auth.check_session().await.unwrap_or(None);
    let status_html = SessionStatusTemplate::from_identity(session.as_ref())
        .render()
        .context("rendering session status")?;
    println!("{status_html}");

    let outcome = forum.list_posts(None).await;
    let list_html = PostListTemplate::from_outcome(&outcome, Utc::now())
        .render()
        .context("rendering post list")?;
    println!("{list_html}");

    Ok(())
}
