//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities and the use-cases that operate on
//! them, independent of HTTP and storage. Inbound adapters call the driving
//! ports in [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - User, NewUser, UserId, UserName: account identity and validation.
//! - Recipe, Ingredient, RecipeDraft, IngredientDraft: the recipe aggregate.
//! - IngredientPlan: ingredient reconciliation used by storage adapters.
//! - TokenService, SigningKeys: bearer token issue and validation.
//! - Services implementing the driving ports.

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod ingredient_reconciliation;
pub mod login_service;
pub mod pagination;
pub mod password;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
pub mod session_service;
pub mod token;
pub mod trace_id;
pub mod user;
pub mod user_account_service;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::bootstrap::{BootstrapError, InitialCredentials, ensure_initial_user};
pub use self::error::{Error, ErrorCode};
pub use self::ingredient_reconciliation::{IngredientPlan, InsertedIdMismatch, NewIngredient};
pub use self::login_service::CredentialLoginService;
pub use self::pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page, PageRequest};
pub use self::password::{MIN_PASSWORD_LENGTH, PasswordError, PasswordHash};
pub use self::recipe::{
    Ingredient, IngredientDraft, IngredientId, Recipe, RecipeDraft, RecipeId,
    RecipeValidationError,
};
pub use self::recipe_service::RecipeService;
pub use self::session_service::SessionService;
pub use self::token::{DEFAULT_TOKEN_VALIDITY_HOURS, SigningKeys, TokenError, TokenService};
pub use self::trace_id::TraceId;
pub use self::user::{NewUser, User, UserId, UserName, UserValidationError};
pub use self::user_account_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use food_api::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
