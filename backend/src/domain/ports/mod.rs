//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Query`, `*Command`, [`LoginService`],
//! [`SessionResolver`]) are called by inbound adapters. Driven ports
//! ([`UserRepository`], [`RecipeRepository`]) are implemented by outbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod recipe_repository;
mod recipes_command;
mod recipes_query;
mod session_resolver;
mod user_repository;
mod users_command;
mod users_query;

pub use login_service::LoginService;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipePersistenceError, RecipeRepository};
pub use recipes_command::RecipesCommand;
pub use recipes_query::RecipesQuery;
pub use session_resolver::SessionResolver;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_command::{CreateUserRequest, PasswordChange, SelfUpdate, UserUpdate, UsersCommand};
pub use users_query::UsersQuery;
