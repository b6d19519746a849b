//! Recipe aggregate: a recipe owns its ingredient rows exclusively.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a recipe title.
pub const RECIPE_TITLE_MAX: usize = 255;
/// Maximum length of an ingredient name.
pub const INGREDIENT_NAME_MAX: usize = 255;
/// Maximum length of an ingredient quantity.
pub const INGREDIENT_QUANTITY_MAX: usize = 255;

/// Validation errors for recipe submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyIngredientName { index: usize },
    IngredientNameTooLong { index: usize, max: usize },
    QuantityTooLong { index: usize, max: usize },
}

impl RecipeValidationError {
    /// Name of the offending field, for error details.
    pub fn field(&self) -> String {
        match self {
            Self::InvalidId => "id".to_owned(),
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title".to_owned(),
            Self::EmptyIngredientName { index } | Self::IngredientNameTooLong { index, .. } => {
                format!("ingredients[{index}].name")
            }
            Self::QuantityTooLong { index, .. } => format!("ingredients[{index}].quantity"),
        }
    }
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "recipe id must be a positive integer"),
            Self::EmptyTitle => write!(f, "recipe title must not be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "recipe title must be at most {max} characters")
            }
            Self::EmptyIngredientName { index } => {
                write!(f, "ingredient {index} must have a name")
            }
            Self::IngredientNameTooLong { index, max } => {
                write!(f, "ingredient {index} name must be at most {max} characters")
            }
            Self::QuantityTooLong { index, max } => {
                write!(f, "ingredient {index} quantity must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for RecipeValidationError {}

macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(raw: i64) -> Result<Self, RecipeValidationError> {
                if raw <= 0 {
                    return Err(RecipeValidationError::InvalidId);
                }
                Ok(Self(raw))
            }

            /// Raw numeric value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = RecipeValidationError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id! {
    /// Store-assigned recipe identifier.
    RecipeId
}

positive_id! {
    /// Store-assigned ingredient identifier.
    IngredientId
}

/// Persisted ingredient row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub quantity: String,
}

/// Persisted recipe with its ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
}

/// Client-submitted ingredient.
///
/// `id` is `None` for rows the client considers new. Ids that do not belong
/// to the recipe being written are treated as new as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientDraft {
    pub id: Option<IngredientId>,
    pub name: String,
    pub quantity: String,
}

impl IngredientDraft {
    /// Build a draft from raw input; zero, negative or absent ids mean "new".
    pub fn new(id: Option<i64>, name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            id: id.and_then(|raw| IngredientId::new(raw).ok()),
            name: name.into(),
            quantity: quantity.into(),
        }
    }

    /// Whether the draft matches a persisted row field for field.
    pub fn matches(&self, ingredient: &Ingredient) -> bool {
        self.name == ingredient.name && self.quantity == ingredient.quantity
    }
}

/// Validated recipe submission used for both create and update.
///
/// # Examples
/// ```
/// use food_api::domain::{IngredientDraft, RecipeDraft};
///
/// let draft = RecipeDraft::new(
///     "Pancakes",
///     "Mix and fry.",
///     vec![IngredientDraft::new(None, "flour", "200 g")],
/// )
/// .expect("valid recipe");
/// assert_eq!(draft.title(), "Pancakes");
/// assert_eq!(draft.ingredients().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    title: String,
    description: String,
    ingredients: Vec<IngredientDraft>,
}

impl RecipeDraft {
    /// Validate the submission. Titles and ingredient names are trimmed.
    pub fn new(
        title: impl AsRef<str>,
        description: impl Into<String>,
        ingredients: Vec<IngredientDraft>,
    ) -> Result<Self, RecipeValidationError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(RecipeValidationError::EmptyTitle);
        }
        if title.chars().count() > RECIPE_TITLE_MAX {
            return Err(RecipeValidationError::TitleTooLong {
                max: RECIPE_TITLE_MAX,
            });
        }

        let ingredients = ingredients
            .into_iter()
            .enumerate()
            .map(|(index, draft)| validate_ingredient(index, draft))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: title.to_owned(),
            description: description.into(),
            ingredients,
        })
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn ingredients(&self) -> &[IngredientDraft] {
        &self.ingredients
    }
}

fn validate_ingredient(
    index: usize,
    draft: IngredientDraft,
) -> Result<IngredientDraft, RecipeValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(RecipeValidationError::EmptyIngredientName { index });
    }
    if name.chars().count() > INGREDIENT_NAME_MAX {
        return Err(RecipeValidationError::IngredientNameTooLong {
            index,
            max: INGREDIENT_NAME_MAX,
        });
    }
    if draft.quantity.chars().count() > INGREDIENT_QUANTITY_MAX {
        return Err(RecipeValidationError::QuantityTooLong {
            index,
            max: INGREDIENT_QUANTITY_MAX,
        });
    }
    Ok(IngredientDraft {
        id: draft.id,
        name: name.to_owned(),
        quantity: draft.quantity,
    })
}
