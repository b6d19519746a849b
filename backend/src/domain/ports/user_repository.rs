//! Driven port for user persistence.
//!
//! "Not found" is `Ok(None)` / `Ok(false)`; `Err` always means the store
//! itself failed or rejected the write.

use async_trait::async_trait;

use crate::domain::{NewUser, PageRequest, User, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the name.
        DuplicateName { name: String } => "user name already in use: {name}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id inside a read-only transaction.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by unique name.
    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError>;

    /// Number of stored users.
    async fn count(&self) -> Result<i64, UserPersistenceError>;

    /// Users ordered by id.
    async fn list_page(&self, page: PageRequest) -> Result<Vec<User>, UserPersistenceError>;

    /// Insert a user and return it with its assigned id.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Overwrite name, enabled flag and password hash. `false` when missing.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Remove a user. `false` when missing.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}
