//! Driving port for recipe writes.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeDraft, RecipeId};

#[async_trait]
pub trait RecipesCommand: Send + Sync {
    /// Store a new recipe; submitted ingredient ids are ignored.
    async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe, Error>;

    /// Replace fields and reconcile ingredients atomically.
    async fn update_recipe(&self, id: RecipeId, draft: RecipeDraft) -> Result<Recipe, Error>;

    /// Delete the recipe together with its ingredients.
    async fn delete_recipe(&self, id: RecipeId) -> Result<(), Error>;
}
