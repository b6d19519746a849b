//! Credential check that mints a bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use super::ports::{LoginService, UserRepository};
use super::user_account_service::map_user_persistence_error;
use super::{Error, LoginCredentials, TokenService, UserName};

fn rejected() -> Error {
    Error::unauthorized("invalid credentials")
}

/// [`LoginService`] verifying Argon2 hashes held in the user store.
#[derive(Clone)]
pub struct CredentialLoginService<R> {
    tokens: TokenService,
    users: Arc<R>,
}

impl<R> CredentialLoginService<R> {
    pub fn new(tokens: TokenService, users: Arc<R>) -> Self {
        Self { tokens, users }
    }
}

#[async_trait]
impl<R: UserRepository> LoginService for CredentialLoginService<R> {
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error> {
        let Ok(name) = UserName::new(credentials.name()) else {
            return Err(rejected());
        };
        let user = self
            .users
            .find_by_name(&name)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| {
                debug!(user = %name, "login for unknown user");
                rejected()
            })?;

        if !user.enabled() {
            debug!(user_id = %user.id(), "login for disabled user");
            return Err(rejected());
        }
        if !user.check_password(credentials.password()) {
            debug!(user_id = %user.id(), "login with wrong password");
            return Err(rejected());
        }

        self.tokens.issue(user.id(), user.name()).map_err(|err| {
            error!(error = %err, "token signing failed");
            Error::internal(err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use crate::test_support::{InMemoryUserRepository, MutableClock, test_signing_keys};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    struct Harness {
        repo: Arc<InMemoryUserRepository>,
        tokens: TokenService,
        service: CredentialLoginService<InMemoryUserRepository>,
    }

    #[fixture]
    fn harness() -> Harness {
        let repo = Arc::new(InMemoryUserRepository::default());
        let tokens = TokenService::new(test_signing_keys(), Arc::new(MutableClock::new(Utc::now())));
        Harness {
            service: CredentialLoginService::new(tokens.clone(), repo.clone()),
            repo,
            tokens,
        }
    }

    fn credentials(name: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(name, password).expect("non-empty credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn issues_token_for_matching_password(harness: Harness) {
        let user = harness.repo.insert("admin", true, "letmein").await;

        let token = harness
            .service
            .login(&credentials("admin", "letmein"))
            .await
            .expect("login succeeds");

        assert_eq!(harness.tokens.validate(&token), Ok(user.id().to_string()));
    }

    #[rstest]
    #[case("admin", "wrong-password")]
    #[case("nobody", "letmein")]
    #[case("ghost", "letmein")]
    #[tokio::test]
    async fn rejects_bad_credentials(
        harness: Harness,
        #[case] name: &str,
        #[case] password: &str,
    ) {
        harness.repo.insert("admin", true, "letmein").await;
        harness.repo.insert("ghost", false, "letmein").await;

        let err = harness
            .service
            .login(&credentials(name, password))
            .await
            .expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid credentials");
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_user_without_password(harness: Harness) {
        harness.repo.insert_without_password("legacy").await;

        let err = harness
            .service
            .login(&credentials("legacy", "anything"))
            .await
            .expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn store_failure_is_internal(harness: Harness) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_name()
            .returning(|_| Err(UserPersistenceError::query("boom")));
        let service = CredentialLoginService::new(harness.tokens, Arc::new(repo));

        let err = service
            .login(&credentials("admin", "letmein"))
            .await
            .expect_err("store failure");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
