//! Builders wiring Diesel repositories into the HTTP port bundle.

use std::sync::Arc;

use actix_web::web;

use food_api::domain::{
    CredentialLoginService, RecipeService, SessionService, TokenService, UserAccountService,
};
use food_api::inbound::http::state::{HttpState, HttpStatePorts};
use food_api::outbound::persistence::{DbPool, DieselRecipeRepository, DieselUserRepository};

/// Build the handler state from a connection pool and token service.
pub(crate) fn build_http_state(pool: &DbPool, tokens: &TokenService) -> web::Data<HttpState> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let accounts = Arc::new(UserAccountService::new(users.clone()));
    let recipes = Arc::new(RecipeService::new(Arc::new(DieselRecipeRepository::new(
        pool.clone(),
    ))));

    web::Data::new(HttpState::new(HttpStatePorts {
        login: Arc::new(CredentialLoginService::new(tokens.clone(), users.clone())),
        sessions: Arc::new(SessionService::new(tokens.clone(), users)),
        users: accounts.clone(),
        users_command: accounts,
        recipes: recipes.clone(),
        recipes_command: recipes,
    }))
}
