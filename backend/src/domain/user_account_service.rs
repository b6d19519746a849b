//! User account use-cases backed by a [`UserRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use super::ports::{
    CreateUserRequest, PasswordChange, SelfUpdate, UserPersistenceError, UserRepository,
    UserUpdate, UsersCommand, UsersQuery,
};
use super::{Error, NewUser, Page, PageRequest, PasswordError, User, UserId};

/// Translate store failures into domain errors.
///
/// Duplicate names are the caller's fault; everything else is internal.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateName { .. } => Error::invalid_request("name already in use")
            .with_details(json!({ "field": "name", "code": "duplicate_name" })),
        UserPersistenceError::Connection { message } | UserPersistenceError::Query { message } => {
            error!(%message, "user store failure");
            Error::internal(message)
        }
    }
}

fn map_password_error(error: PasswordError) -> Error {
    match error {
        PasswordError::TooShort { .. } => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "password", "code": "password_too_short" })),
        PasswordError::Hashing { message } => {
            error!(%message, "password hashing failed");
            Error::internal(message)
        }
    }
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// Self-service and administrative user operations.
#[derive(Clone)]
pub struct UserAccountService<R> {
    users: Arc<R>,
}

impl<R> UserAccountService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

impl<R: UserRepository> UserAccountService<R> {
    async fn load(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn store(&self, user: &User) -> Result<(), Error> {
        let updated = self
            .users
            .update(user)
            .await
            .map_err(map_user_persistence_error)?;
        if updated {
            Ok(())
        } else {
            Err(user_not_found(user.id()))
        }
    }
}

#[async_trait]
impl<R: UserRepository> UsersQuery for UserAccountService<R> {
    async fn current_user(&self, actor: UserId) -> Result<User, Error> {
        self.load(actor).await
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, Error> {
        let list = self
            .users
            .list_page(page)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(Page::new(list, page))
    }

    async fn get_user(&self, id: UserId) -> Result<User, Error> {
        self.load(id).await
    }
}

#[async_trait]
impl<R: UserRepository> UsersCommand for UserAccountService<R> {
    async fn update_self(&self, actor: UserId, update: SelfUpdate) -> Result<User, Error> {
        if update.id != actor {
            return Err(Error::invalid_request(
                "id does not match the authenticated user",
            )
            .with_details(json!({ "field": "id", "code": "not_self" })));
        }
        if !update.enabled {
            return Err(Error::invalid_request("cannot disable your own account")
                .with_details(json!({ "field": "enabled", "code": "self_disable" })));
        }

        let mut user = self.load(actor).await?;
        user.rename(update.name);
        self.store(&user).await?;
        Ok(user)
    }

    async fn change_password(&self, actor: UserId, change: PasswordChange) -> Result<(), Error> {
        let mut user = self.load(actor).await?;
        if !user.check_password(&change.old_password) {
            return Err(Error::invalid_request("old password is incorrect")
                .with_details(json!({ "field": "oldPassword", "code": "wrong_password" })));
        }
        user.set_password(&change.new_password)
            .map_err(map_password_error)?;
        self.store(&user).await
    }

    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        let new_user = NewUser::new(request.name, request.enabled, &request.password)
            .map_err(map_password_error)?;
        self.users
            .create(&new_user)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn update_user(
        &self,
        actor: UserId,
        id: UserId,
        update: UserUpdate,
    ) -> Result<User, Error> {
        if id == actor {
            return Err(Error::invalid_request("use /self to update your own account")
                .with_details(json!({ "field": "id", "code": "self_target" })));
        }

        let mut user = self.load(id).await?;
        user.rename(update.name);
        user.set_enabled(update.enabled);
        self.store(&user).await?;
        Ok(user)
    }

    async fn delete_user(&self, actor: UserId, id: UserId) -> Result<(), Error> {
        if id == actor {
            return Err(Error::invalid_request("cannot delete your own account")
                .with_details(json!({ "field": "id", "code": "self_target" })));
        }

        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(map_user_persistence_error)?;
        if deleted {
            Ok(())
        } else {
            Err(user_not_found(id))
        }
    }
}
