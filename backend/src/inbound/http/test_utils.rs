//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::Utc;
use rstest::fixture;

use crate::domain::{
    CredentialLoginService, RecipeService, SessionService, TokenService, User, UserAccountService,
};
use crate::test_support::{
    InMemoryRecipeRepository, InMemoryUserRepository, MutableClock, test_signing_keys,
};

use super::configure_api;
use super::state::{HttpState, HttpStatePorts};

/// In-memory wiring of every port with three seeded accounts.
pub struct TestContext {
    pub users: Arc<InMemoryUserRepository>,
    pub recipes: Arc<InMemoryRecipeRepository>,
    pub tokens: TokenService,
    /// Enabled, password `admin-pass`.
    pub admin: User,
    /// Enabled, password `cook-pass`.
    pub cook: User,
    /// Disabled, password `ghost-pass`.
    pub disabled: User,
}

impl TestContext {
    pub fn state(&self) -> web::Data<HttpState> {
        let accounts = Arc::new(UserAccountService::new(self.users.clone()));
        let recipes = Arc::new(RecipeService::new(self.recipes.clone()));
        web::Data::new(HttpState::new(HttpStatePorts {
            login: Arc::new(CredentialLoginService::new(
                self.tokens.clone(),
                self.users.clone(),
            )),
            sessions: Arc::new(SessionService::new(self.tokens.clone(), self.users.clone())),
            users: accounts.clone(),
            users_command: accounts,
            recipes: recipes.clone(),
            recipes_command: recipes,
        }))
    }

    pub fn token_for(&self, user: &User) -> String {
        self.tokens.issue(user.id(), user.name()).expect("issue token")
    }

    pub fn bearer_for(&self, user: &User) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token_for(user)))
    }

    /// App exposing the API under `/api/v1`, as the server mounts it.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state())
            .service(web::scope("/api/v1").configure(configure_api))
    }
}

#[fixture]
pub async fn test_context() -> TestContext {
    let users = Arc::new(InMemoryUserRepository::default());
    let admin = users.insert("admin", true, "admin-pass").await;
    let cook = users.insert("cook", true, "cook-pass").await;
    let disabled = users.insert("ghost", false, "ghost-pass").await;
    TestContext {
        users,
        recipes: Arc::new(InMemoryRecipeRepository::default()),
        tokens: TokenService::new(test_signing_keys(), Arc::new(MutableClock::new(Utc::now()))),
        admin,
        cook,
        disabled,
    }
}
