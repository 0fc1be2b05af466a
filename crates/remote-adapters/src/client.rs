//! Shared REST client state: base URL, API key, and the bearer session
//! the identity adapter maintains after sign-in.

use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use domains::{ForumError, Identity, Result};

/// A held auth session. The access token authorizes table calls made
/// on behalf of the signed-in user.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub access_token: String,
    pub identity: Identity,
}

/// Connection state shared by all adapters talking to one deployment
/// of the hosted service.
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    session: RwLock<Option<Session>>,
}

impl RemoteClient {
    pub fn new(endpoint: &str, api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: endpoint.trim_end_matches('/').to_string(),
            api_key,
            session: RwLock::new(None),
        }
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub(crate) fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub(crate) async fn store_session(&self, session: Option<Session>) {
        *self.session.write().await = session;
    }

    /// Attaches the `apikey` header plus a bearer token: the session's
    /// access token when signed in, the API key itself otherwise.
    pub(crate) async fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.api_key.expose_secret().to_string();
        let bearer = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => key.clone(),
        };
        request.header("apikey", key).bearer_auth(bearer)
    }
}

/// Maps a transport-level failure into the uniform error shape. The
/// operation name rides in the message; logging happens once, in the
/// service layer.
pub(crate) fn remote_err(operation: &str, err: reqwest::Error) -> ForumError {
    ForumError::Remote(format!("{operation}: {err}"))
}

/// Converts a non-success HTTP status into `ForumError::Remote`,
/// carrying whatever message body the service returned.
pub(crate) async fn check_status(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ForumError::Remote(format!("{operation}: {status} {body}")))
}
