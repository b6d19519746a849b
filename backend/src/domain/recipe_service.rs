//! Recipe use-cases backed by a [`RecipeRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use super::ports::{RecipePersistenceError, RecipeRepository, RecipesCommand, RecipesQuery};
use super::{Error, Page, PageRequest, Recipe, RecipeDraft, RecipeId};

fn map_recipe_persistence_error(error: RecipePersistenceError) -> Error {
    let message = match error {
        RecipePersistenceError::Connection { message }
        | RecipePersistenceError::Query { message } => message,
    };
    error!(%message, "recipe store failure");
    Error::internal(message)
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

#[derive(Clone)]
pub struct RecipeService<R> {
    recipes: Arc<R>,
}

impl<R> RecipeService<R> {
    pub fn new(recipes: Arc<R>) -> Self {
        Self { recipes }
    }
}

#[async_trait]
impl<R: RecipeRepository> RecipesQuery for RecipeService<R> {
    async fn list_recipes(&self, page: PageRequest) -> Result<Page<Recipe>, Error> {
        let list = self
            .recipes
            .list_page(page)
            .await
            .map_err(map_recipe_persistence_error)?;
        Ok(Page::new(list, page))
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(map_recipe_persistence_error)?
            .ok_or_else(|| recipe_not_found(id))
    }
}

#[async_trait]
impl<R: RecipeRepository> RecipesCommand for RecipeService<R> {
    async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe, Error> {
        self.recipes
            .create(&draft)
            .await
            .map_err(map_recipe_persistence_error)
    }

    async fn update_recipe(&self, id: RecipeId, draft: RecipeDraft) -> Result<Recipe, Error> {
        self.recipes
            .update(id, &draft)
            .await
            .map_err(map_recipe_persistence_error)?
            .ok_or_else(|| recipe_not_found(id))
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<(), Error> {
        let deleted = self
            .recipes
            .delete(id)
            .await
            .map_err(map_recipe_persistence_error)?;
        if deleted {
            Ok(())
        } else {
            Err(recipe_not_found(id))
        }
    }
}
