//! Auth gateway collaborator seam.

use hydrasense_common::{AppError, AppResult, AuthConfig};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Credentials for the email/password flows.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account email address.
    pub email: String,
    /// Account password. Only ever transits to the gateway.
    pub password: String,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identifier of the signed-in user.
    pub user_id: String,
    /// Opaque session token issued by the gateway.
    pub token: String,
}

/// Auth gateway trait.
///
/// A missing session is a normal state, not an error: callers that need
/// a reporter identity fall back to `"anonymous"`.
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    /// Identifier of the currently signed-in user, if any.
    async fn current_user_id(&self) -> Option<String>;

    /// Sign in with email and password.
    async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session>;

    /// Create an account with email and password and sign in.
    async fn sign_up(&self, credentials: &Credentials) -> AppResult<Session>;

    /// Discard the current session.
    async fn sign_out(&self);
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(rename = "userId")]
    user_id: String,
    token: String,
}

/// Remote auth gateway over the platform's token endpoints.
pub struct RestAuthGateway {
    client: reqwest::Client,
    base_url: url::Url,
    session: RwLock<Option<Session>>,
}

impl RestAuthGateway {
    /// Create a new remote auth gateway.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            session: RwLock::new(None),
        }
    }

    async fn token_request(
        &self,
        action: &str,
        credentials: &Credentials,
    ) -> AppResult<Session> {
        let endpoint = self
            .base_url
            .join(&format!("v1/accounts:{action}"))
            .map_err(|e| AppError::Config(format!("Invalid auth URL: {e}")))?;

        let response = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Auth request failed: {status}: {body}"
            )));
        }

        let payload: SessionResponse = response.json().await?;
        let session = Session {
            user_id: payload.user_id,
            token: payload.token,
        };

        *self.session.write().await = Some(session.clone());
        Ok(session)
    }
}

#[async_trait::async_trait]
impl AuthGateway for RestAuthGateway {
    async fn current_user_id(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.user_id.clone())
    }

    async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session> {
        self.token_request("signIn", credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> AppResult<Session> {
        self.token_request("signUp", credentials).await
    }

    async fn sign_out(&self) {
        *self.session.write().await = None;
    }
}
