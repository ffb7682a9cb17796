//! Database query functions for the `plan_entries` table.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::{Category, PlanEntry, Weekday};

/// Delete every plan entry. Runs at the start of each planning cycle; a plan
/// is only ever rebuilt whole.
pub async fn clear_plan(pool: &PgPool) -> Result<()> {
    sqlx::query("DELETE FROM plan_entries")
        .execute(pool)
        .await
        .context("failed to clear plan")?;
    Ok(())
}

/// Record the meal chosen for one (day, category) slot.
///
/// The composite primary key rejects a second meal for the same slot; the
/// wizard never produces one, so a violation surfaces as a storage error.
pub async fn insert_entry(
    pool: &PgPool,
    day: Weekday,
    category: Category,
    meal_id: i64,
) -> Result<()> {
    sqlx::query("INSERT INTO plan_entries (day, category, meal_id) VALUES ($1, $2, $3)")
        .bind(day)
        .bind(category)
        .bind(meal_id)
        .execute(pool)
        .await
        .with_context(|| format!("failed to record plan entry for {day}/{category}"))?;
    Ok(())
}

/// Every stored plan entry, in no particular order.
pub async fn entries(pool: &PgPool) -> Result<Vec<PlanEntry>> {
    sqlx::query_as("SELECT day, category, meal_id FROM plan_entries")
        .fetch_all(pool)
        .await
        .context("failed to read plan entries")
}

/// Plan entries for one day, ordered Breakfast -> Lunch -> Dinner by the
/// caller matching on category (the query itself does not order).
pub async fn entries_for_day(pool: &PgPool, day: Weekday) -> Result<Vec<PlanEntry>> {
    sqlx::query_as("SELECT day, category, meal_id FROM plan_entries WHERE day = $1")
        .bind(day)
        .fetch_all(pool)
        .await
        .with_context(|| format!("failed to read plan entries for {day}"))
}

/// Number of stored plan entries. 21 once a plan run completes, 0 after a
/// reset.
pub async fn entry_count(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plan_entries")
        .fetch_one(pool)
        .await
        .context("failed to count plan entries")?;
    Ok(count)
}
