//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;

use super::schema::{ingredients, recipes, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub enabled: bool,
    pub password: Option<String>,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub enabled: bool,
    pub password: &'a str,
}

/// Full overwrite of the mutable user columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserChangeset<'a> {
    pub name: &'a str,
    pub enabled: bool,
    pub password: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Recipe models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Insertable and changeset form of the recipe columns.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = ingredients)]
#[diesel(belongs_to(RecipeRow, foreign_key = recipe_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub quantity: String,
    pub recipe_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub name: &'a str,
    pub quantity: &'a str,
    pub recipe_id: i64,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = ingredients)]
pub(crate) struct IngredientChangeset<'a> {
    pub name: &'a str,
    pub quantity: &'a str,
}
