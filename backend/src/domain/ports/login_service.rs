//! Driving port for credential login.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials};

/// Exchanges credentials for a signed token.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return a token for an enabled user whose password matches.
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error>;
}
