//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, PageRequest, PasswordHash, User, UserId, UserName};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, failure_message};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

/// Map Diesel errors; `name` is reported when a unique violation occurs.
fn map_diesel_error(error: diesel::result::Error, name: Option<&UserName>) -> UserPersistenceError {
    match (classify_diesel_error(&error), name) {
        (DieselFailure::UniqueViolation, Some(name)) => {
            UserPersistenceError::duplicate_name(name.as_ref())
        }
        (DieselFailure::Connection, _) => {
            UserPersistenceError::connection(failure_message(DieselFailure::Connection))
        }
        (failure, _) => UserPersistenceError::query(failure_message(failure)),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let id = UserId::new(row.id).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    let name = UserName::new(&row.name).map_err(|err| {
        warn!(user_id = row.id, "stored user name fails validation");
        UserPersistenceError::query(err.to_string())
    })?;
    Ok(User::new(id, name, row.enabled).with_password_hash(row.password.map(PasswordHash::from_phc)))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = conn
            .build_transaction()
            .read_only()
            .run(|conn| {
                async move {
                    users::table
                        .find(id.get())
                        .select(UserRow::as_select())
                        .first(conn)
                        .await
                        .optional()
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::name.eq(name.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(row_to_user).transpose()
    }

    async fn count(&self) -> Result<i64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))
    }

    async fn list_page(&self, page: PageRequest) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::id)
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            name: user.name().as_ref(),
            enabled: user.enabled(),
            password: user.password_hash().as_phc(),
        };
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(user.name())))?;

        row_to_user(row)
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = UserChangeset {
            name: user.name().as_ref(),
            enabled: user.enabled(),
            password: user.password_hash().map(PasswordHash::as_phc),
        };
        let updated = diesel::update(users::table.find(user.id().get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(user.name())))?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage; queries are exercised by the PostgreSQL
    //! integration suite.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn unique_violation() -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        )
    }

    #[rstest]
    fn unique_violation_with_name_is_duplicate() {
        let name = UserName::new("admin").expect("name");
        assert_eq!(
            map_diesel_error(unique_violation(), Some(&name)),
            UserPersistenceError::duplicate_name("admin")
        );
    }

    #[rstest]
    fn unique_violation_without_name_is_query_error() {
        assert!(matches!(
            map_diesel_error(unique_violation(), None),
            UserPersistenceError::Query { .. }
        ));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        assert_eq!(
            map_pool_error(PoolError::checkout("timed out")),
            UserPersistenceError::connection("timed out")
        );
    }

    #[rstest]
    fn rows_become_users_with_hash() {
        let hash = PasswordHash::generate("secret").expect("hash");
        let user = row_to_user(UserRow {
            id: 3,
            name: "cook".to_owned(),
            enabled: false,
            password: Some(hash.as_phc().to_owned()),
        })
        .expect("valid row");

        assert_eq!(user.id().get(), 3);
        assert!(!user.enabled());
        assert!(user.check_password("secret"));
    }

    #[rstest]
    fn rows_with_invalid_ids_are_rejected() {
        let result = row_to_user(UserRow {
            id: 0,
            name: "cook".to_owned(),
            enabled: true,
            password: None,
        });
        assert!(matches!(result, Err(UserPersistenceError::Query { .. })));
    }
}
