//! The shopping-list compiler: derives a consolidated aggregate from the
//! stored plan and the catalog.

use sqlx::PgPool;
use thiserror::Error;

use mealweek_db::queries::{meals, plan};

use crate::aggregate::ShoppingAggregate;

/// Errors of shopping-list compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The plan has no entries. Compiling would silently produce an empty
    /// list, so callers get an explicit signal to plan first.
    #[error("there is no plan to compile a shopping list from")]
    EmptyPlan,

    /// A plan entry references a meal id the catalog no longer resolves.
    /// This is a data-consistency failure, not user error.
    #[error("plan entry references missing meal {meal_id}")]
    MissingMeal { meal_id: i64 },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Fold every chosen meal's ingredient list into one aggregate.
///
/// Each occurrence in a meal's list counts separately, and a meal chosen for
/// several slots contributes once per slot; quantities therefore equal total
/// ingredient occurrences across the plan.
pub async fn compile(pool: &PgPool) -> Result<ShoppingAggregate, CompileError> {
    let entries = plan::entries(pool).await?;
    if entries.is_empty() {
        return Err(CompileError::EmptyPlan);
    }

    let mut aggregate = ShoppingAggregate::new();
    for entry in &entries {
        if meals::meal_name(pool, entry.meal_id).await?.is_none() {
            return Err(CompileError::MissingMeal {
                meal_id: entry.meal_id,
            });
        }
        let ingredients = meals::ingredients_of(pool, entry.meal_id).await?;
        aggregate.extend(&ingredients);
    }

    Ok(aggregate)
}
