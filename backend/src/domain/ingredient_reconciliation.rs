//! Synchronisation plan for a recipe's ingredient rows.
//!
//! Storage adapters load the persisted rows for a recipe, ask
//! [`IngredientPlan::new`] what to change, apply the deletions, updates and
//! inserts inside one transaction, and finally hand the generated ids back to
//! [`IngredientPlan::into_ingredients`] to obtain the resulting collection in
//! submission order.
//!
//! ## Invariants
//! - Deletions are computed against the persisted set before any insert.
//! - A submitted id is only updated in place when it belongs to the recipe;
//!   otherwise the row is inserted as new under the recipe.
//! - The first submission of a given id claims the persisted row; repeated
//!   ids are inserted as new rows.
//! - Resubmitting the persisted collection yields an empty plan.

use std::collections::{HashMap, HashSet};

use super::recipe::{Ingredient, IngredientDraft, IngredientId};

/// Ingredient row to insert for the recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Kept(Ingredient),
    Inserted,
}

/// Raised when the store returns a different number of ids than inserts
/// were requested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} generated ingredient ids, got {actual}")]
pub struct InsertedIdMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Changes needed to make the persisted rows match a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientPlan {
    deletions: Vec<IngredientId>,
    updates: Vec<Ingredient>,
    inserts: Vec<NewIngredient>,
    slots: Vec<Slot>,
}

impl IngredientPlan {
    /// Compare the rows persisted for a recipe with the submitted list.
    ///
    /// # Examples
    /// ```
    /// use food_api::domain::{Ingredient, IngredientDraft, IngredientId, IngredientPlan};
    ///
    /// let id = |raw| IngredientId::new(raw).expect("positive");
    /// let persisted = vec![
    ///     Ingredient { id: id(1), name: "salt".into(), quantity: "".into() },
    ///     Ingredient { id: id(2), name: "pepper".into(), quantity: "".into() },
    /// ];
    /// let submitted = vec![
    ///     IngredientDraft::new(Some(2), "pepper, ground", ""),
    ///     IngredientDraft::new(None, "sugar", ""),
    /// ];
    ///
    /// let plan = IngredientPlan::new(&persisted, &submitted);
    /// assert_eq!(plan.deletions(), &[id(1)]);
    /// assert_eq!(plan.updates().len(), 1);
    /// assert_eq!(plan.inserts().len(), 1);
    /// ```
    pub fn new(persisted: &[Ingredient], submitted: &[IngredientDraft]) -> Self {
        let owned: HashMap<IngredientId, &Ingredient> = persisted
            .iter()
            .map(|ingredient| (ingredient.id, ingredient))
            .collect();
        let mut claimed = HashSet::with_capacity(submitted.len());
        let mut updates = Vec::new();
        let mut inserts = Vec::new();
        let mut slots = Vec::with_capacity(submitted.len());

        for draft in submitted {
            let existing = draft
                .id
                .and_then(|id| owned.get(&id).copied())
                .filter(|row| claimed.insert(row.id));

            match existing {
                Some(row) => {
                    let kept = Ingredient {
                        id: row.id,
                        name: draft.name.clone(),
                        quantity: draft.quantity.clone(),
                    };
                    if !draft.matches(row) {
                        updates.push(kept.clone());
                    }
                    slots.push(Slot::Kept(kept));
                }
                None => {
                    slots.push(Slot::Inserted);
                    inserts.push(NewIngredient {
                        name: draft.name.clone(),
                        quantity: draft.quantity.clone(),
                    });
                }
            }
        }

        let deletions = persisted
            .iter()
            .map(|ingredient| ingredient.id)
            .filter(|id| !claimed.contains(id))
            .collect();

        Self {
            deletions,
            updates,
            inserts,
            slots,
        }
    }

    /// Persisted rows absent from the submission.
    pub fn deletions(&self) -> &[IngredientId] {
        &self.deletions
    }

    /// Owned rows whose fields changed.
    pub fn updates(&self) -> &[Ingredient] {
        &self.updates
    }

    /// Rows to insert, in submission order.
    pub fn inserts(&self) -> &[NewIngredient] {
        &self.inserts
    }

    /// True when the store needs no writes.
    pub fn is_noop(&self) -> bool {
        self.deletions.is_empty() && self.updates.is_empty() && self.inserts.is_empty()
    }

    /// Resolve the final collection once inserts have produced ids.
    ///
    /// `inserted_ids` must line up with [`IngredientPlan::inserts`].
    pub fn into_ingredients(
        self,
        inserted_ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, InsertedIdMismatch> {
        let mismatch = InsertedIdMismatch {
            expected: self.inserts.len(),
            actual: inserted_ids.len(),
        };
        if mismatch.expected != mismatch.actual {
            return Err(mismatch);
        }

        let mut inserts = self.inserts.into_iter().zip(inserted_ids.iter().copied());
        let mut resolved = Vec::with_capacity(self.slots.len());
        for slot in self.slots {
            match slot {
                Slot::Kept(ingredient) => resolved.push(ingredient),
                Slot::Inserted => {
                    let Some((row, id)) = inserts.next() else {
                        return Err(mismatch);
                    };
                    resolved.push(Ingredient {
                        id,
                        name: row.name,
                        quantity: row.quantity,
                    });
                }
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(raw: i64) -> IngredientId {
        IngredientId::new(raw).expect("positive id")
    }

    fn row(raw: i64, name: &str) -> Ingredient {
        Ingredient {
            id: id(raw),
            name: name.to_owned(),
            quantity: String::new(),
        }
    }

    fn draft(raw: Option<i64>, name: &str) -> IngredientDraft {
        IngredientDraft::new(raw, name, "")
    }

    #[rstest]
    fn resubmitting_persisted_rows_is_a_noop() {
        let persisted = vec![row(1, "salt"), row(2, "pepper")];
        let submitted = vec![draft(Some(2), "pepper"), draft(Some(1), "salt")];

        let plan = IngredientPlan::new(&persisted, &submitted);

        assert!(plan.is_noop());
        let resolved = plan.into_ingredients(&[]).expect("no inserts");
        assert_eq!(resolved, vec![row(2, "pepper"), row(1, "salt")]);
    }

    #[rstest]
    fn reconciles_update_insert_and_delete() {
        let persisted = vec![row(1, "salt"), row(2, "pepper")];
        let submitted = vec![draft(Some(2), "pepper, ground"), draft(None, "sugar")];

        let plan = IngredientPlan::new(&persisted, &submitted);

        assert_eq!(plan.deletions(), &[id(1)]);
        assert_eq!(plan.updates(), &[row(2, "pepper, ground")]);
        assert_eq!(
            plan.inserts(),
            &[NewIngredient {
                name: "sugar".to_owned(),
                quantity: String::new()
            }]
        );
        let resolved = plan.into_ingredients(&[id(3)]).expect("aligned ids");
        assert_eq!(resolved, vec![row(2, "pepper, ground"), row(3, "sugar")]);
    }

    #[rstest]
    fn foreign_ids_are_inserted_as_new() {
        let persisted = vec![row(1, "salt")];
        let submitted = vec![draft(Some(1), "salt"), draft(Some(77), "stolen")];

        let plan = IngredientPlan::new(&persisted, &submitted);

        assert!(plan.deletions().is_empty());
        assert!(plan.updates().is_empty());
        assert_eq!(plan.inserts().len(), 1);
        let resolved = plan.into_ingredients(&[id(8)]).expect("aligned ids");
        assert_eq!(resolved, vec![row(1, "salt"), row(8, "stolen")]);
    }

    #[rstest]
    fn duplicate_ids_claim_the_row_once() {
        let persisted = vec![row(1, "salt")];
        let submitted = vec![draft(Some(1), "salt"), draft(Some(1), "sea salt")];

        let plan = IngredientPlan::new(&persisted, &submitted);

        assert!(plan.updates().is_empty());
        assert_eq!(plan.inserts().len(), 1);
        assert_eq!(plan.inserts()[0].name, "sea salt");
    }

    #[rstest]
    fn empty_submission_deletes_everything() {
        let persisted = vec![row(1, "salt"), row(2, "pepper")];

        let plan = IngredientPlan::new(&persisted, &[]);

        assert_eq!(plan.deletions(), &[id(1), id(2)]);
        assert!(plan.into_ingredients(&[]).expect("no inserts").is_empty());
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![id(4), id(5)])]
    fn rejects_misaligned_generated_ids(#[case] generated: Vec<IngredientId>) {
        let plan = IngredientPlan::new(&[], &[draft(None, "salt")]);

        let err = plan.into_ingredients(&generated).expect_err("misaligned");

        assert_eq!(err.expected, 1);
        assert_eq!(err.actual, generated.len());
    }
}
