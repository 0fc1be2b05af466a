//! # RestIdentityProvider
//!
//! `IdentityProvider` implementation over the hosted auth endpoints
//! (`/auth/v1/signup`, `/auth/v1/token`, `/auth/v1/logout`,
//! `/auth/v1/user`). Session state lives in the shared client so table
//! calls pick up the bearer token automatically.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use domains::{ForumError, Identity, IdentityProvider, Result};

use crate::client::{check_status, remote_err, RemoteClient, Session};

pub struct RestIdentityProvider {
    client: Arc<RemoteClient>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: Uuid,
    email: String,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    access_token: String,
    user: UserPayload,
}

impl From<UserPayload> for Identity {
    fn from(user: UserPayload) -> Self {
        Identity {
            id: user.id,
            email: user.email,
            username: user.user_metadata.username,
        }
    }
}

impl RestIdentityProvider {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    /// Registers a new account. Depending on the deployment's email
    /// confirmation setting the endpoint answers with either a full
    /// session or a bare user record; both shapes are accepted, and a
    /// returned session is retained.
    async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<Identity> {
        let request = self
            .client
            .http()
            .post(self.client.auth_url("signup"))
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "username": username },
            }));
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("sign-up", e))?;
        let response = check_status("sign-up", response).await?;

        let body: serde_json::Value =
            response.json().await.map_err(|e| remote_err("sign-up", e))?;

        if body.get("access_token").is_some() {
            let session: SessionPayload = serde_json::from_value(body)
                .map_err(|e| ForumError::Remote(format!("sign-up: malformed session: {e}")))?;
            let identity = Identity::from(session.user);
            self.client
                .store_session(Some(Session {
                    access_token: session.access_token,
                    identity: identity.clone(),
                }))
                .await;
            Ok(identity)
        } else {
            let user: UserPayload = serde_json::from_value(body)
                .map_err(|e| ForumError::Remote(format!("sign-up: malformed user: {e}")))?;
            Ok(Identity::from(user))
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let request = self
            .client
            .http()
            .post(self.client.auth_url("token?grant_type=password"))
            .json(&json!({ "email": email, "password": password }));
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("sign-in", e))?;
        let response = check_status("sign-in", response).await?;

        let session: SessionPayload =
            response.json().await.map_err(|e| remote_err("sign-in", e))?;
        let identity = Identity::from(session.user);
        self.client
            .store_session(Some(Session {
                access_token: session.access_token,
                identity: identity.clone(),
            }))
            .await;
        Ok(identity)
    }

    /// Revokes the held session. The local session is dropped even when
    /// the revocation call fails; the token is no longer usable here.
    async fn sign_out(&self) -> Result<()> {
        let Some(_session) = self.client.session().await else {
            return Ok(());
        };

        let request = self.client.http().post(self.client.auth_url("logout"));
        let result = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("sign-out", e));
        self.client.store_session(None).await;

        let response = result?;
        check_status("sign-out", response).await?;
        Ok(())
    }

    /// Validates the held token against `/auth/v1/user`. An expired or
    /// revoked token resolves to `None` rather than an error, matching
    /// the anonymous session state.
    async fn current_identity(&self) -> Result<Option<Identity>> {
        if self.client.session().await.is_none() {
            return Ok(None);
        }

        let request = self.client.http().get(self.client.auth_url("user"));
        let response = self
            .client
            .with_auth(request)
            .await
            .send()
            .await
            .map_err(|e| remote_err("get-user", e))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.client.store_session(None).await;
            return Ok(None);
        }
        let response = check_status("get-user", response).await?;

        let user: UserPayload = response.json().await.map_err(|e| remote_err("get-user", e))?;
        Ok(Some(Identity::from(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_payload_maps_username_metadata() {
        let user: UserPayload = serde_json::from_value(json!({
            "id": "7a0f9f2e-9d2b-4a3c-8d1e-5b6c7d8e9f00",
            "email": "ada@example.com",
            "user_metadata": { "username": "ada" },
        }))
        .unwrap();
        let identity = Identity::from(user);
        assert_eq!(identity.username.as_deref(), Some("ada"));
    }

    #[test]
    fn user_payload_tolerates_missing_metadata() {
        let user: UserPayload = serde_json::from_value(json!({
            "id": "7a0f9f2e-9d2b-4a3c-8d1e-5b6c7d8e9f00",
            "email": "ada@example.com",
        }))
        .unwrap();
        let identity = Identity::from(user);
        assert_eq!(identity.username, None);
        assert_eq!(identity.display_name(), "ada");
    }

    #[test]
    fn session_payload_decodes_token_and_user() {
        let session: SessionPayload = serde_json::from_value(json!({
            "access_token": "jwt-token",
            "token_type": "bearer",
            "user": {
                "id": "7a0f9f2e-9d2b-4a3c-8d1e-5b6c7d8e9f00",
                "email": "ada@example.com",
                "user_metadata": { "username": "ada" },
            },
        }))
        .unwrap();
        assert_eq!(session.access_token, "jwt-token");
        assert_eq!(session.user.email, "ada@example.com");
    }
}
