//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, RecipesCommand, RecipesQuery, SessionResolver, UsersCommand, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionResolver>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub recipes: Arc<dyn RecipesQuery>,
    pub recipes_command: Arc<dyn RecipesCommand>,
}

/// Dependency bundle for HTTP handlers and the session middleware.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionResolver>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub recipes: Arc<dyn RecipesQuery>,
    pub recipes_command: Arc<dyn RecipesCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::Utc;
    /// use food_api::domain::{
    ///     CredentialLoginService, RecipeService, SessionService, TokenService,
    ///     UserAccountService,
    /// };
    /// use food_api::inbound::http::state::{HttpState, HttpStatePorts};
    /// use food_api::test_support::{
    ///     InMemoryRecipeRepository, InMemoryUserRepository, MutableClock, test_signing_keys,
    /// };
    ///
    /// let users = Arc::new(InMemoryUserRepository::default());
    /// let recipes = Arc::new(RecipeService::new(Arc::new(InMemoryRecipeRepository::default())));
    /// let accounts = Arc::new(UserAccountService::new(users.clone()));
    /// let tokens = TokenService::new(test_signing_keys(), Arc::new(MutableClock::new(Utc::now())));
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(CredentialLoginService::new(tokens.clone(), users.clone())),
    ///     sessions: Arc::new(SessionService::new(tokens, users)),
    ///     users: accounts.clone(),
    ///     users_command: accounts,
    ///     recipes: recipes.clone(),
    ///     recipes_command: recipes,
    /// });
    /// let _ = state.users.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            sessions,
            users,
            users_command,
            recipes,
            recipes_command,
        } = ports;
        Self {
            login,
            sessions,
            users,
            users_command,
            recipes,
            recipes_command,
        }
    }
}
