//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL
//! via `diesel-async` with `bb8` connection pooling.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types; reconciliation rules live in the domain.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Database errors are classified by kind and mapped to the port error
//!   enums.
//!
//! # Example
//!
//! ```no_run
//! use food_api::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/food")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_recipe_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig, PoolError};
