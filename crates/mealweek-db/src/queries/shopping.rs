//! Database query functions for the `shopping_list` table.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::ShoppingEntry;

/// Delete every shopping entry. Paired with [`super::plan::clear_plan`] at
/// the start of a planning cycle.
pub async fn clear_shopping_list(pool: &PgPool) -> Result<()> {
    sqlx::query("DELETE FROM shopping_list")
        .execute(pool)
        .await
        .context("failed to clear shopping list")?;
    Ok(())
}

/// Add `delta` to an ingredient's quantity, inserting the row when the
/// ingredient is new. The planner calls this once per ingredient occurrence
/// with a delta of 1.
pub async fn upsert_entry(pool: &PgPool, ingredient: &str, delta: i64) -> Result<()> {
    sqlx::query(
        "INSERT INTO shopping_list (ingredient, quantity) VALUES ($1, $2) \
         ON CONFLICT (ingredient) \
         DO UPDATE SET quantity = shopping_list.quantity + EXCLUDED.quantity",
    )
    .bind(ingredient)
    .bind(delta)
    .execute(pool)
    .await
    .with_context(|| format!("failed to upsert shopping entry {ingredient:?}"))?;
    Ok(())
}

/// The stored shopping list, ordered by ingredient name so display and
/// export are deterministic.
pub async fn entries(pool: &PgPool) -> Result<Vec<ShoppingEntry>> {
    sqlx::query_as("SELECT ingredient, quantity FROM shopping_list ORDER BY ingredient")
        .fetch_all(pool)
        .await
        .context("failed to read shopping list")
}
