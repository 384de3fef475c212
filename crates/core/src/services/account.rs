//! Account sign-in and sign-up flows.

use std::sync::Arc;

use hydrasense_store::{AuthGateway, Credentials, Session};
use thiserror::Error;

/// Authentication failure.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials rejected before reaching the gateway.
    #[error("{0}")]
    InvalidCredentials(String),
    /// The gateway rejected the request.
    #[error("Authentication failed: {0}")]
    Gateway(String),
}

/// Email/password account flows over the auth gateway.
pub struct AccountService {
    auth: Arc<dyn AuthGateway>,
}

impl AccountService {
    /// Create a new account service.
    pub const fn new(auth: Arc<dyn AuthGateway>) -> Self {
        Self { auth }
    }

    fn check(credentials: &Credentials) -> Result<(), AuthError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "Please enter email and password".to_string(),
            ));
        }
        Ok(())
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        Self::check(credentials)?;
        self.auth
            .sign_in(credentials)
            .await
            .map_err(|e| AuthError::Gateway(e.to_string()))
    }

    /// Create an account and sign in.
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        Self::check(credentials)?;
        self.auth
            .sign_up(credentials)
            .await
            .map_err(|e| AuthError::Gateway(e.to_string()))
    }

    /// Identifier of the signed-in user, if any.
    ///
    /// A missing session is a normal state; report submission falls
    /// back to the anonymous reporter rather than treating it as an
    /// error.
    pub async fn current_user_id(&self) -> Option<String> {
        self.auth.current_user_id().await
    }

    /// Discard the current session.
    pub async fn sign_out(&self) {
        self.auth.sign_out().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials_rejected() {
        let credentials = Credentials {
            email: "  ".to_string(),
            password: String::new(),
        };
        assert!(matches!(
            AccountService::check(&credentials),
            Err(AuthError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_filled_credentials_pass_precheck() {
        let credentials = Credentials {
            email: "pat@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(AccountService::check(&credentials).is_ok());
    }
}
