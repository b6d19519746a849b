//! Driven port for recipe aggregate persistence.
//!
//! Adapters own the transaction boundary: every method is atomic, and
//! [`RecipeRepository::update`] reconciles ingredient rows with
//! [`IngredientPlan`](crate::domain::IngredientPlan) inside the same
//! transaction as the recipe row update.

use async_trait::async_trait;

use crate::domain::{PageRequest, Recipe, RecipeDraft, RecipeId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by recipe repository adapters.
    pub enum RecipePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed; the transaction was rolled back.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Recipes ordered by id, each with its ingredients.
    async fn list_page(&self, page: PageRequest) -> Result<Vec<Recipe>, RecipePersistenceError>;

    /// Fetch one recipe with its ingredients.
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipePersistenceError>;

    /// Insert the recipe and every submitted ingredient as new rows.
    async fn create(&self, draft: &RecipeDraft) -> Result<Recipe, RecipePersistenceError>;

    /// Update fields and reconcile ingredients. `None` when the recipe is
    /// missing.
    async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipePersistenceError>;

    /// Delete the recipe and all of its ingredients. `false` when missing.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipePersistenceError>;
}
