//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Every write runs in one transaction. Updates reconcile the ingredient
//! rows with [`IngredientPlan`]: deletions first, then in-place updates,
//! then inserts scoped to the recipe.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RecipePersistenceError, RecipeRepository};
use crate::domain::{
    Ingredient, IngredientId, IngredientPlan, InsertedIdMismatch, PageRequest, Recipe,
    RecipeDraft, RecipeId,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, failure_message};
use super::models::{
    IngredientChangeset, IngredientRow, NewIngredientRow, RecipeFields, RecipeRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipes};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a recipe transaction. Any variant rolls the transaction
/// back.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Reconcile(InsertedIdMismatch),
    InvalidRow(String),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<InsertedIdMismatch> for TxError {
    fn from(error: InsertedIdMismatch) -> Self {
        Self::Reconcile(error)
    }
}

fn map_pool_error(error: PoolError) -> RecipePersistenceError {
    RecipePersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> RecipePersistenceError {
    match classify_diesel_error(&error) {
        DieselFailure::Connection => {
            RecipePersistenceError::connection(failure_message(DieselFailure::Connection))
        }
        failure => RecipePersistenceError::query(failure_message(failure)),
    }
}

fn map_tx_error(error: TxError) -> RecipePersistenceError {
    match error {
        TxError::Diesel(error) => map_diesel_error(error),
        TxError::Reconcile(mismatch) => RecipePersistenceError::query(mismatch.to_string()),
        TxError::InvalidRow(message) => RecipePersistenceError::query(message),
    }
}

fn row_to_ingredient(row: IngredientRow) -> Result<Ingredient, TxError> {
    let id = IngredientId::new(row.id).map_err(|err| TxError::InvalidRow(err.to_string()))?;
    Ok(Ingredient {
        id,
        name: row.name,
        quantity: row.quantity,
    })
}

fn rows_to_recipe(row: RecipeRow, ingredient_rows: Vec<IngredientRow>) -> Result<Recipe, TxError> {
    let id = RecipeId::new(row.id).map_err(|err| TxError::InvalidRow(err.to_string()))?;
    let ingredients = ingredient_rows
        .into_iter()
        .map(row_to_ingredient)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Recipe {
        id,
        title: row.title,
        description: row.description,
        ingredients,
    })
}

fn fields(draft: &RecipeDraft) -> RecipeFields<'_> {
    RecipeFields {
        title: draft.title(),
        description: draft.description(),
    }
}

async fn insert_ingredient(
    conn: &mut AsyncPgConnection,
    recipe_id: RecipeId,
    name: &str,
    quantity: &str,
) -> Result<IngredientId, TxError> {
    let id: i64 = diesel::insert_into(ingredients::table)
        .values(&NewIngredientRow {
            name,
            quantity,
            recipe_id: recipe_id.get(),
        })
        .returning(ingredients::id)
        .get_result(conn)
        .await?;
    IngredientId::new(id).map_err(|err| TxError::InvalidRow(err.to_string()))
}

async fn load_ingredients(
    conn: &mut AsyncPgConnection,
    recipe_id: RecipeId,
) -> Result<Vec<IngredientRow>, diesel::result::Error> {
    ingredients::table
        .filter(ingredients::recipe_id.eq(recipe_id.get()))
        .select(IngredientRow::as_select())
        .order_by(ingredients::id)
        .load(conn)
        .await
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list_page(&self, page: PageRequest) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // One read-only transaction so recipes and ingredients come from the
        // same snapshot.
        conn.build_transaction()
            .read_only()
            .run(|conn| {
                async move {
                    let recipe_rows: Vec<RecipeRow> = recipes::table
                        .select(RecipeRow::as_select())
                        .order_by(recipes::id)
                        .limit(page.limit())
                        .offset(page.offset())
                        .load(conn)
                        .await?;
                    let ingredient_rows: Vec<IngredientRow> =
                        IngredientRow::belonging_to(&recipe_rows)
                            .select(IngredientRow::as_select())
                            .order_by(ingredients::id)
                            .load(conn)
                            .await?;

                    let grouped = ingredient_rows.grouped_by(&recipe_rows);
                    recipe_rows
                        .into_iter()
                        .zip(grouped)
                        .map(|(row, ingredients)| rows_to_recipe(row, ingredients))
                        .collect::<Result<Vec<_>, TxError>>()
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx_error)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.build_transaction()
            .read_only()
            .run(|conn| {
                async move {
                    let row: Option<RecipeRow> = recipes::table
                        .find(id.get())
                        .select(RecipeRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    let ingredient_rows = load_ingredients(conn, id).await?;
                    rows_to_recipe(row, ingredient_rows).map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx_error)
    }

    async fn create(&self, draft: &RecipeDraft) -> Result<Recipe, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let raw_id: i64 = diesel::insert_into(recipes::table)
                    .values(&fields(draft))
                    .returning(recipes::id)
                    .get_result(conn)
                    .await?;
                let id = RecipeId::new(raw_id).map_err(|err| TxError::InvalidRow(err.to_string()))?;

                let mut ingredients = Vec::with_capacity(draft.ingredients().len());
                for submitted in draft.ingredients() {
                    let ingredient_id =
                        insert_ingredient(conn, id, &submitted.name, &submitted.quantity).await?;
                    ingredients.push(Ingredient {
                        id: ingredient_id,
                        name: submitted.name.clone(),
                        quantity: submitted.quantity.clone(),
                    });
                }

                Ok(Recipe {
                    id,
                    title: draft.title().to_owned(),
                    description: draft.description().to_owned(),
                    ingredients,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                // Updating the recipe row first locks it for the rest of the
                // transaction.
                let touched = diesel::update(recipes::table.find(id.get()))
                    .set(&fields(draft))
                    .execute(conn)
                    .await?;
                if touched == 0 {
                    return Ok(None);
                }

                let persisted = load_ingredients(conn, id)
                    .await?
                    .into_iter()
                    .map(row_to_ingredient)
                    .collect::<Result<Vec<_>, _>>()?;
                let plan = IngredientPlan::new(&persisted, draft.ingredients());

                if !plan.deletions().is_empty() {
                    let doomed: Vec<i64> = plan.deletions().iter().map(|id| id.get()).collect();
                    diesel::delete(
                        ingredients::table
                            .filter(ingredients::recipe_id.eq(id.get()))
                            .filter(ingredients::id.eq_any(doomed)),
                    )
                    .execute(conn)
                    .await?;
                }

                for ingredient in plan.updates() {
                    diesel::update(ingredients::table.find(ingredient.id.get()))
                        .set(&IngredientChangeset {
                            name: &ingredient.name,
                            quantity: &ingredient.quantity,
                        })
                        .execute(conn)
                        .await?;
                }

                let mut inserted = Vec::with_capacity(plan.inserts().len());
                for row in plan.inserts() {
                    inserted.push(insert_ingredient(conn, id, &row.name, &row.quantity).await?);
                }

                Ok(Some(Recipe {
                    id,
                    title: draft.title().to_owned(),
                    description: draft.description().to_owned(),
                    ingredients: plan.into_ingredients(&inserted)?,
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                diesel::delete(ingredients::table.filter(ingredients::recipe_id.eq(id.get())))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(recipes::table.find(id.get()))
                    .execute(conn)
                    .await?;
                Ok(deleted > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }
}
