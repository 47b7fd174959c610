//! Admin session flag
//!
//! Credentials are checked by a [`CredentialVerifier`]; only the outcome is
//! remembered, in device preferences.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use voyage_storage::PreferenceStore;

pub const LOGGED_IN_KEY: &str = "adminLoggedIn";
pub const EMAIL_KEY: &str = "adminEmail";

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `Ok(false)` for wrong credentials, `Err` when verification itself failed
    async fn verify(&self, email: &str, password: &str) -> anyhow::Result<bool>;
}

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Login failed. Please try again.")]
    Unavailable(#[source] anyhow::Error),
}

pub struct AdminSession {
    prefs: Arc<dyn PreferenceStore>,
}

impl AdminSession {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        Self { prefs }
    }

    pub fn is_authenticated(&self) -> bool {
        self.prefs
            .get(LOGGED_IN_KEY)
            .is_some_and(|flag| !flag.is_empty())
    }

    pub fn email(&self) -> Option<String> {
        self.prefs.get(EMAIL_KEY)
    }

    pub async fn login(
        &self,
        verifier: &dyn CredentialVerifier,
        email: &str,
        password: &str,
    ) -> Result<(), LoginError> {
        match verifier.verify(email, password).await {
            Ok(true) => {}
            Ok(false) => return Err(LoginError::InvalidCredentials),
            Err(e) => {
                warn!("Credential check failed: {e:#}");
                return Err(LoginError::Unavailable(e));
            }
        }

        self.prefs
            .set(LOGGED_IN_KEY, "true")
            .and_then(|()| self.prefs.set(EMAIL_KEY, email))
            .map_err(|e| LoginError::Unavailable(e.into()))?;
        info!("Admin {email} logged in");
        Ok(())
    }

    pub fn logout(&self) -> voyage_storage::Result<()> {
        self.prefs.remove(LOGGED_IN_KEY)?;
        self.prefs.remove(EMAIL_KEY)?;
        info!("Admin logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyage_storage::MemoryPreferences;

    struct Fixed {
        email: &'static str,
        password: &'static str,
    }

    #[async_trait]
    impl CredentialVerifier for Fixed {
        async fn verify(&self, email: &str, password: &str) -> anyhow::Result<bool> {
            Ok(email == self.email && password == self.password)
        }
    }

    struct Offline;

    #[async_trait]
    impl CredentialVerifier for Offline {
        async fn verify(&self, _email: &str, _password: &str) -> anyhow::Result<bool> {
            anyhow::bail!("auth service unreachable")
        }
    }

    #[tokio::test]
    async fn test_login_logout() {
        let session = AdminSession::new(Arc::new(MemoryPreferences::new()));
        let verifier = Fixed {
            email: "ops@example.com",
            password: "hunter2",
        };
        assert!(!session.is_authenticated());

        let err = session
            .login(&verifier, "ops@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));
        assert!(!session.is_authenticated());

        session
            .login(&verifier, "ops@example.com", "hunter2")
            .await
            .unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.email().as_deref(), Some("ops@example.com"));

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.email().is_none());
    }

    #[tokio::test]
    async fn test_verifier_error() {
        let session = AdminSession::new(Arc::new(MemoryPreferences::new()));
        let err = session.login(&Offline, "a@b.c", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Login failed. Please try again.");
        assert!(!session.is_authenticated());
    }
}
