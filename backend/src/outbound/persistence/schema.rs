//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! `diesel print-schema` against a migrated database regenerates them.

diesel::table! {
    /// User accounts. `name` carries a unique constraint.
    users (id) {
        id -> Int8,
        name -> Varchar,
        enabled -> Bool,
        /// Argon2 PHC string; `NULL` means the account cannot log in.
        password -> Nullable<Varchar>,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        title -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    /// Ingredient rows owned by exactly one recipe.
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        quantity -> Varchar,
        recipe_id -> Int8,
    }
}

diesel::joinable!(ingredients -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(ingredients, recipes, users);
