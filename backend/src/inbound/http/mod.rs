//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod recipes;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every API route and the shared extractor configuration.
///
/// Mount under `/api/v1`:
///
/// ```
/// use actix_web::{App, web};
/// use food_api::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::login)
        .service(users::current_user)
        .service(users::update_self)
        .service(users::change_password)
        .service(users::create_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(recipes::list_recipes)
        .service(recipes::get_recipe)
        .service(recipes::create_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe);
}
