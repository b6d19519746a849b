//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation failures become `400` responses whose `details` name
//! the offending field and a stable code.

use serde::Deserialize;
use serde_json::json;

use crate::domain::{
    Error, LoginValidationError, PageRequest, RecipeId, RecipeValidationError, UserId,
    UserValidationError,
};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    EmptyName,
    NameTooLong,
    EmptyPassword,
    InvalidId,
    EmptyTitle,
    TitleTooLong,
    EmptyIngredientName,
    IngredientNameTooLong,
    QuantityTooLong,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong => "name_too_long",
            Self::EmptyPassword => "empty_password",
            Self::InvalidId => "invalid_id",
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong => "title_too_long",
            Self::EmptyIngredientName => "empty_ingredient_name",
            Self::IngredientNameTooLong => "ingredient_name_too_long",
            Self::QuantityTooLong => "quantity_too_long",
        }
    }
}

pub(crate) fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyName => {
            field_error("name", ValidationCode::EmptyName, err.to_string())
        }
        LoginValidationError::EmptyPassword => {
            field_error("password", ValidationCode::EmptyPassword, err.to_string())
        }
    }
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    match err {
        UserValidationError::InvalidId => {
            field_error("id", ValidationCode::InvalidId, err.to_string())
        }
        UserValidationError::EmptyName => {
            field_error("name", ValidationCode::EmptyName, err.to_string())
        }
        UserValidationError::NameTooLong { .. } => {
            field_error("name", ValidationCode::NameTooLong, err.to_string())
        }
    }
}

pub(crate) fn recipe_validation_error(err: RecipeValidationError) -> Error {
    let code = match err {
        RecipeValidationError::InvalidId => ValidationCode::InvalidId,
        RecipeValidationError::EmptyTitle => ValidationCode::EmptyTitle,
        RecipeValidationError::TitleTooLong { .. } => ValidationCode::TitleTooLong,
        RecipeValidationError::EmptyIngredientName { .. } => ValidationCode::EmptyIngredientName,
        RecipeValidationError::IngredientNameTooLong { .. } => {
            ValidationCode::IngredientNameTooLong
        }
        RecipeValidationError::QuantityTooLong { .. } => ValidationCode::QuantityTooLong,
    };
    field_error(&err.field(), code, err.to_string())
}

/// Non-positive path ids name no resource.
pub(crate) fn user_id_from_path(raw: i64) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| Error::not_found(format!("user {raw} not found")))
}

/// Non-positive path ids name no resource.
pub(crate) fn recipe_id_from_path(raw: i64) -> Result<RecipeId, Error> {
    RecipeId::new(raw).map_err(|_| Error::not_found(format!("recipe {raw} not found")))
}

/// `?page=&limit=` query string.
///
/// Values are kept as text so that unparseable input falls back to the
/// defaults instead of failing the request.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number; defaults to 1.
    #[param(value_type = Option<i64>, example = 1)]
    pub page: Option<String>,
    /// Page size; defaults to 25, honoured when between 1 and 999.
    #[param(value_type = Option<i64>, example = 25)]
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn to_request(&self) -> PageRequest {
        fn parse(raw: Option<&String>) -> Option<i64> {
            raw.and_then(|value| value.trim().parse().ok())
        }
        PageRequest::new(parse(self.page.as_ref()), parse(self.limit.as_ref()))
    }
}
