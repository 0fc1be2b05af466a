//! # AuthService
//!
//! Wraps the hosted identity provider: login, registration with profile
//! bootstrap, logout, and session lookup. Remote failures are already
//! typed by the adapter; this layer adds the profile side effect and
//! the logging policy.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use domains::{Identity, IdentityProvider, Profile, ProfileStore, Result};

pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    /// Query-only probe of the session state. Callers feed the result
    /// into the session-status renderer.
    pub async fn check_session(&self) -> Result<Option<Identity>> {
        self.identity.current_identity().await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        match self.identity.sign_in(email, password).await {
            Ok(identity) => Ok(identity),
            Err(err) => {
                warn!(error = %err, "sign-in failed");
                Err(err)
            }
        }
    }

    /// Registers an account, then inserts the matching `profiles` row
    /// keyed by the new identity's id.
    ///
    /// A failed profile insert is logged and swallowed: the account
    /// exists on the provider either way, so failing the registration
    /// here would strand the user. The identity-without-profile window
    /// is an accepted inconsistency.
    pub async fn register(&self, email: &str, password: &str, username: &str) -> Result<Identity> {
        let identity = match self.identity.sign_up(email, password, username).await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "sign-up failed");
                return Err(err);
            }
        };

        let profile = Profile {
            id: identity.id,
            username: username.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        if let Err(err) = self.profiles.insert_profile(profile).await {
            warn!(user_id = %identity.id, error = %err, "profile creation failed");
        }

        Ok(identity)
    }

    pub async fn logout(&self) -> Result<()> {
        match self.identity.sign_out().await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(error = %err, "sign-out failed");
                Err(err)
            }
        }
    }

    /// The resolved identity or `None`, no side effects.
    pub async fn current_identity(&self) -> Result<Option<Identity>> {
        self.identity.current_identity().await
    }
}
