//! Resolves bearer tokens to enabled user accounts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{SessionResolver, UserRepository};
use super::user_account_service::map_user_persistence_error;
use super::{Error, TokenService, UserId};

/// [`SessionResolver`] backed by the token service and the user store.
#[derive(Clone)]
pub struct SessionService<R> {
    tokens: TokenService,
    users: Arc<R>,
}

impl<R> SessionService<R> {
    pub fn new(tokens: TokenService, users: Arc<R>) -> Self {
        Self { tokens, users }
    }
}

#[async_trait]
impl<R: UserRepository> SessionResolver for SessionService<R> {
    async fn resolve(&self, token: &str) -> Result<UserId, Error> {
        let subject = self.tokens.validate(token).map_err(|err| {
            debug!(error = %err, "token rejected");
            Error::unauthorized("invalid or expired token")
        })?;
        let id: UserId = subject.parse().map_err(|_| {
            debug!(%subject, "token subject is not a user id");
            Error::unauthorized("invalid or expired token")
        })?;

        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?;
        match user {
            Some(user) if user.enabled() => Ok(id),
            Some(_) => {
                debug!(user_id = %id, "session for disabled user");
                Err(Error::unauthorized("account is disabled"))
            }
            None => {
                debug!(user_id = %id, "session for unknown user");
                Err(Error::unauthorized("invalid or expired token"))
            }
        }
    }
}
