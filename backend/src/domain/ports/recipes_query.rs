//! Driving port for recipe reads.

use async_trait::async_trait;

use crate::domain::{Error, Page, PageRequest, Recipe, RecipeId};

#[async_trait]
pub trait RecipesQuery: Send + Sync {
    async fn list_recipes(&self, page: PageRequest) -> Result<Page<Recipe>, Error>;

    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, Error>;
}
