//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "recipe title must not be empty")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Offending `field` and validation `code` for invalid requests.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
///
/// Account profile; the password hash is never serialised.
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Store-assigned identifier.
    #[schema(example = 1)]
    id: i64,
    /// Unique login name.
    #[schema(example = "admin")]
    name: String,
    /// Disabled accounts cannot log in or use existing tokens.
    enabled: bool,
}

/// OpenAPI schema for [`crate::domain::Ingredient`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Ingredient)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct IngredientSchema {
    #[schema(example = 7)]
    id: i64,
    #[schema(example = "flour")]
    name: String,
    #[schema(example = "200 g")]
    quantity: String,
}

/// OpenAPI schema for [`crate::domain::Recipe`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Recipe)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecipeSchema {
    #[schema(example = 3)]
    id: i64,
    #[schema(example = "Pancakes")]
    title: String,
    description: String,
    ingredients: Vec<IngredientSchema>,
}

/// Page of users.
#[derive(ToSchema)]
#[schema(as = UserPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPageSchema {
    list: Vec<UserSchema>,
    #[schema(example = 25)]
    limit: i64,
    #[schema(example = 1)]
    page: i64,
}

/// Page of recipes.
#[derive(ToSchema)]
#[schema(as = RecipePage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecipePageSchema {
    list: Vec<RecipeSchema>,
    #[schema(example = 25)]
    limit: i64,
    #[schema(example = 1)]
    page: i64,
}
