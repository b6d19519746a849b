//! Driving port for user reads.

use async_trait::async_trait;

use crate::domain::{Error, Page, PageRequest, User, UserId};

#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Profile of the authenticated user.
    async fn current_user(&self, actor: UserId) -> Result<User, Error>;

    /// Page of all users.
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, Error>;

    /// One user by id.
    async fn get_user(&self, id: UserId) -> Result<User, Error>;
}
