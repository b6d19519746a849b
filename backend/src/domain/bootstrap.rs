//! First-run provisioning of an administrator account.

use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use zeroize::Zeroizing;

use super::ports::{UserPersistenceError, UserRepository};
use super::{NewUser, PasswordError, UserName, UserValidationError};

/// Name given to the account created on an empty store.
pub const INITIAL_USER_NAME: &str = "admin";
/// Length of the generated initial password.
pub const INITIAL_PASSWORD_LENGTH: usize = 16;

/// Errors raised while provisioning the initial account.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Store(#[from] UserPersistenceError),
    #[error("initial password rejected: {0}")]
    Password(#[from] PasswordError),
    #[error("initial user name rejected: {0}")]
    Name(#[from] UserValidationError),
}

/// Credentials of a freshly provisioned account. Shown to the operator once.
#[derive(Debug)]
pub struct InitialCredentials {
    pub name: UserName,
    pub password: Zeroizing<String>,
}

fn generate_password() -> Zeroizing<String> {
    Zeroizing::new(
        thread_rng()
            .sample_iter(&Alphanumeric)
            .take(INITIAL_PASSWORD_LENGTH)
            .map(char::from)
            .collect(),
    )
}

/// Create the initial administrator when the store holds no users.
///
/// Returns `None` when at least one user already exists.
pub async fn ensure_initial_user<R>(users: &R) -> Result<Option<InitialCredentials>, BootstrapError>
where
    R: UserRepository + ?Sized,
{
    if users.count().await? > 0 {
        return Ok(None);
    }

    let name = UserName::new(INITIAL_USER_NAME)?;
    let password = generate_password();
    let new_user = NewUser::new(name.clone(), true, &password)?;
    users.create(&new_user).await?;
    Ok(Some(InitialCredentials { name, password }))
}
