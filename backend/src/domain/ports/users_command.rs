//! Driving port for user writes, both self-service and administrative.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Error, User, UserId, UserName};

/// Self-service profile update. `id` must name the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfUpdate {
    pub id: UserId,
    pub name: UserName,
    pub enabled: bool,
}

/// Self-service password change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: Zeroizing<String>,
    pub new_password: Zeroizing<String>,
}

/// Administrative account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub name: UserName,
    pub enabled: bool,
    pub password: Zeroizing<String>,
}

/// Administrative profile update of another user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: UserName,
    pub enabled: bool,
}

#[async_trait]
pub trait UsersCommand: Send + Sync {
    async fn update_self(&self, actor: UserId, update: SelfUpdate) -> Result<User, Error>;

    async fn change_password(&self, actor: UserId, change: PasswordChange) -> Result<(), Error>;

    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;

    /// Rejected when `id` is the caller; self-service goes through
    /// [`UsersCommand::update_self`].
    async fn update_user(&self, actor: UserId, id: UserId, update: UserUpdate)
    -> Result<User, Error>;

    /// Rejected when `id` is the caller.
    async fn delete_user(&self, actor: UserId, id: UserId) -> Result<(), Error>;
}
