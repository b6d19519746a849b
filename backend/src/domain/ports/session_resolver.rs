//! Driving port used by the session middleware.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Resolves a bearer token to a live, enabled identity.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Fails with `Unauthorized` for any token that does not map to an
    /// existing enabled user, and `InternalError` when the store fails.
    async fn resolve(&self, token: &str) -> Result<UserId, Error>;
}
