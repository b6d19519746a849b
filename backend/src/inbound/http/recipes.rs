//! Recipe API handlers.
//!
//! Reads are public; writes require a session. Updates send the complete
//! ingredient list: rows carrying a known `id` are updated, rows without one
//! are inserted, and persisted rows missing from the list are deleted.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{IngredientDraft, Page, Recipe, RecipeDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RecipePageSchema, RecipeSchema};
use crate::inbound::http::session::{AuthenticatedUser, RequireSession};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PageQuery, recipe_id_from_path, recipe_validation_error};

/// Ingredient row in a recipe submission.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct IngredientPayload {
    /// Persisted id; omit for new rows.
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub quantity: String,
}

/// Body of `POST /api/v1/recipes` and `PUT /api/v1/recipes/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipePayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientPayload>,
}

impl TryFrom<RecipePayload> for RecipeDraft {
    type Error = crate::domain::Error;

    fn try_from(payload: RecipePayload) -> Result<Self, Self::Error> {
        let ingredients = payload
            .ingredients
            .into_iter()
            .map(|row| IngredientDraft::new(row.id, row.name, row.quantity))
            .collect();
        RecipeDraft::new(payload.title, payload.description, ingredients)
            .map_err(recipe_validation_error)
    }
}

/// List recipes with their ingredients.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of recipes", body = RecipePageSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<Recipe>>> {
    let page = state.recipes.list_recipes(query.to_request()).await?;
    Ok(web::Json(page))
}

/// Fetch one recipe.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe", body = RecipeSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Recipe>> {
    let id = recipe_id_from_path(path.into_inner())?;
    let recipe = state.recipes.get_recipe(id).await?;
    Ok(web::Json(recipe))
}

/// Store a new recipe. Submitted ingredient ids are ignored.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipePayload,
    responses(
        (status = 201, description = "Created recipe", body = RecipeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes", wrap = "RequireSession")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    payload: web::Json<RecipePayload>,
) -> ApiResult<HttpResponse> {
    let draft = RecipeDraft::try_from(payload.into_inner())?;
    let recipe = state.recipes_command.create_recipe(draft).await?;
    Ok(HttpResponse::Created().json(recipe))
}

/// Replace a recipe and reconcile its ingredients.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    request_body = RecipePayload,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[put("/recipes/{id}", wrap = "RequireSession")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipePayload>,
) -> ApiResult<web::Json<Recipe>> {
    let id = recipe_id_from_path(path.into_inner())?;
    let draft = RecipeDraft::try_from(payload.into_inner())?;
    let recipe = state.recipes_command.update_recipe(id, draft).await?;
    Ok(web::Json(recipe))
}

/// Delete a recipe with its ingredients.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}", wrap = "RequireSession")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = recipe_id_from_path(path.into_inner())?;
    state.recipes_command.delete_recipe(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestContext, test_context};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn send(context: &TestContext, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(context.app()).await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json body")
        };
        (status, value)
    }

    async fn create(context: &TestContext, payload: Value) -> Value {
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .insert_header(context.bearer_for(&context.cook))
            .set_json(payload);
        let (status, body) = send(context, request).await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    fn ingredient_names(recipe: &Value) -> Vec<String> {
        let mut names: Vec<String> = recipe["ingredients"]
            .as_array()
            .expect("ingredients")
            .iter()
            .filter_map(|row| row["name"].as_str().map(str::to_owned))
            .collect();
        names.sort();
        names
    }

    #[rstest]
    #[actix_web::test]
    async fn create_assigns_ids(#[future] test_context: TestContext) {
        let context = test_context.await;

        let body = create(
            &context,
            json!({
                "title": "Pancakes",
                "description": "Mix and fry.",
                "ingredients": [
                    {"id": 42, "name": "flour", "quantity": "200 g"},
                    {"name": "milk", "quantity": "300 ml"}
                ]
            }),
        )
        .await;

        assert!(body["id"].as_i64().is_some_and(|id| id > 0));
        let ids: Vec<i64> = body["ingredients"]
            .as_array()
            .expect("ingredients")
            .iter()
            .filter_map(|row| row["id"].as_i64())
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(!ids.contains(&42));
    }

    #[rstest]
    #[actix_web::test]
    async fn reads_are_public(#[future] test_context: TestContext) {
        let context = test_context.await;
        let created = create(&context, json!({"title": "Tea"})).await;
        let uri = format!("/api/v1/recipes/{}", created["id"]);

        let (status, body) = send(&context, actix_test::TestRequest::get().uri(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Tea");
        assert_eq!(body["description"], "");

        let (status, body) =
            send(&context, actix_test::TestRequest::get().uri("/api/v1/recipes")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 25);
        assert_eq!(body["list"].as_array().map(Vec::len), Some(1));
    }

    #[rstest]
    #[case(actix_test::TestRequest::post().uri("/api/v1/recipes"))]
    #[case(actix_test::TestRequest::put().uri("/api/v1/recipes/1"))]
    #[case(actix_test::TestRequest::delete().uri("/api/v1/recipes/1"))]
    #[actix_web::test]
    async fn writes_require_a_session(
        #[future] test_context: TestContext,
        #[case] request: actix_test::TestRequest,
    ) {
        let context = test_context.await;
        let (status, _) = send(&context, request.set_json(json!({"title": "Tea"}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn update_reconciles_ingredients(#[future] test_context: TestContext) {
        let context = test_context.await;
        let created = create(
            &context,
            json!({
                "title": "Seasoning",
                "ingredients": [
                    {"name": "salt", "quantity": "1 tsp"},
                    {"name": "pepper", "quantity": "1 tsp"}
                ]
            }),
        )
        .await;
        let pepper_id = created["ingredients"]
            .as_array()
            .expect("ingredients")
            .iter()
            .find(|row| row["name"] == "pepper")
            .and_then(|row| row["id"].as_i64())
            .expect("pepper id");
        let uri = format!("/api/v1/recipes/{}", created["id"]);

        let request = actix_test::TestRequest::put()
            .uri(&uri)
            .insert_header(context.bearer_for(&context.cook))
            .set_json(json!({
                "title": "Seasoning",
                "ingredients": [
                    {"id": pepper_id, "name": "pepper, ground", "quantity": "1 tsp"},
                    {"name": "sugar", "quantity": "1 tsp"}
                ]
            }));
        let (status, updated) = send(&context, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ingredient_names(&updated), vec!["pepper, ground", "sugar"]);
        let kept = updated["ingredients"]
            .as_array()
            .expect("ingredients")
            .iter()
            .find(|row| row["name"] == "pepper, ground")
            .and_then(|row| row["id"].as_i64());
        assert_eq!(kept, Some(pepper_id));

        let (_, fetched) = send(&context, actix_test::TestRequest::get().uri(&uri)).await;
        assert_eq!(ingredient_names(&fetched), vec!["pepper, ground", "sugar"]);
    }

    #[rstest]
    #[actix_web::test]
    async fn foreign_ingredient_ids_are_inserted_as_new(#[future] test_context: TestContext) {
        let context = test_context.await;
        let first = create(
            &context,
            json!({"title": "A", "ingredients": [{"name": "egg", "quantity": "1"}]}),
        )
        .await;
        let second = create(&context, json!({"title": "B"})).await;
        let foreign_id = first["ingredients"][0]["id"].as_i64().expect("egg id");

        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/recipes/{}", second["id"]))
            .insert_header(context.bearer_for(&context.cook))
            .set_json(json!({
                "title": "B",
                "ingredients": [{"id": foreign_id, "name": "stolen egg", "quantity": "1"}]
            }));
        let (status, updated) = send(&context, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_ne!(updated["ingredients"][0]["id"].as_i64(), Some(foreign_id));
        let (_, original) = send(
            &context,
            actix_test::TestRequest::get().uri(&format!("/api/v1/recipes/{}", first["id"])),
        )
        .await;
        assert_eq!(original["ingredients"][0]["name"], "egg");
    }

    #[rstest]
    #[case(json!({"title": "   "}), "title")]
    #[case(json!({"title": "Soup", "ingredients": [{"name": ""}]}), "ingredients[0].name")]
    #[actix_web::test]
    async fn invalid_submissions_are_rejected(
        #[future] test_context: TestContext,
        #[case] payload: Value,
        #[case] field: &str,
    ) {
        let context = test_context.await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .insert_header(context.bearer_for(&context.cook))
            .set_json(payload);

        let (status, body) = send(&context, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_then_missing(#[future] test_context: TestContext) {
        let context = test_context.await;
        let created = create(&context, json!({"title": "Toast"})).await;
        let uri = format!("/api/v1/recipes/{}", created["id"]);

        let delete = || {
            actix_test::TestRequest::delete()
                .uri(&uri)
                .insert_header(context.bearer_for(&context.cook))
        };
        let (status, _) = send(&context, delete()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&context, delete()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&context, actix_test::TestRequest::get().uri(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case("/api/v1/recipes/999")]
    #[case("/api/v1/recipes/-1")]
    #[case("/api/v1/recipes/soup")]
    #[actix_web::test]
    async fn unknown_recipes_are_not_found(#[future] test_context: TestContext, #[case] uri: &str) {
        let context = test_context.await;
        let (status, _) = send(&context, actix_test::TestRequest::get().uri(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
