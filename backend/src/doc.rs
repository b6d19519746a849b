//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (users, recipes,
//!   health)
//! - **Schemas**: domain type wrappers from
//!   [`crate::inbound::http::schemas`] so domain types stay free of utoipa
//! - **Security**: bearer token authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::recipes::{IngredientPayload, RecipePayload};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, IngredientSchema, RecipePageSchema, RecipeSchema,
    UserPageSchema, UserSchema,
};
use crate::inbound::http::users::{
    CreateUserBody, LoginRequest, PasswordChangeRequest, SelfUpdateRequest, UserUpdateRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme in the document.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned in the Authorization header of POST /api/v1/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Food API",
        description = "Recipes with ingredients and the user accounts that manage them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_self,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        UserPageSchema,
        RecipeSchema,
        RecipePageSchema,
        IngredientSchema,
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        SelfUpdateRequest,
        PasswordChangeRequest,
        CreateUserBody,
        UserUpdateRequest,
        RecipePayload,
        IngredientPayload,
    )),
    tags(
        (name = "users", description = "Login and account management"),
        (name = "recipes", description = "Recipes and their ingredients"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
