//! Database query functions for the meal catalog (`meals` + `ingredients`).

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::{Category, Meal};

/// A catalog meal together with its ordered ingredient list, as the `show`
/// command displays it.
#[derive(Debug, Clone)]
pub struct MealWithIngredients {
    pub meal: Meal,
    pub ingredients: Vec<String>,
}

/// Insert a meal and its ingredient rows in one transaction.
///
/// Ingredient order is preserved: rows are inserted in list order and read
/// back ordered by their generated id. Returns the generated meal id.
pub async fn insert_meal(
    pool: &PgPool,
    category: Category,
    name: &str,
    ingredients: &[String],
) -> Result<i64> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let (meal_id,): (i64,) = sqlx::query_as(
        "INSERT INTO meals (category, name) VALUES ($1, $2) RETURNING meal_id",
    )
    .bind(category)
    .bind(name)
    .fetch_one(&mut *tx)
    .await
    .with_context(|| format!("failed to insert meal {name:?}"))?;

    for ingredient in ingredients {
        sqlx::query("INSERT INTO ingredients (meal_id, name) VALUES ($1, $2)")
            .bind(meal_id)
            .bind(ingredient)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to insert ingredient {ingredient:?}"))?;
    }

    tx.commit().await.context("failed to commit transaction")?;
    Ok(meal_id)
}

/// Meal name -> id for one category.
///
/// The BTreeMap keeps names in lexicographic order, so repeated planning
/// prompts always list meals identically. Empty when the category has no
/// meals; planning cannot proceed in that case.
pub async fn meals_for_category(
    pool: &PgPool,
    category: Category,
) -> Result<BTreeMap<String, i64>> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT name, meal_id FROM meals WHERE category = $1")
            .bind(category)
            .fetch_all(pool)
            .await
            .with_context(|| format!("failed to list {category} meals"))?;

    Ok(rows.into_iter().collect())
}

/// Ordered ingredient names of one meal. Empty when the meal id is unknown;
/// callers that must distinguish check [`meal_name`] first.
pub async fn ingredients_of(pool: &PgPool, meal_id: i64) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM ingredients WHERE meal_id = $1 ORDER BY ingredient_id",
    )
    .bind(meal_id)
    .fetch_all(pool)
    .await
    .with_context(|| format!("failed to fetch ingredients of meal {meal_id}"))?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Name of a meal, or `None` when the id references nothing. The `None` case
/// signals a plan/catalog consistency problem to the shopping compiler.
pub async fn meal_name(pool: &PgPool, meal_id: i64) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT name FROM meals WHERE meal_id = $1")
        .bind(meal_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("failed to fetch meal {meal_id}"))?;

    Ok(row.map(|(name,)| name))
}

/// All meals with their ingredients, optionally restricted to one category,
/// in insertion order.
pub async fn list_meals(
    pool: &PgPool,
    category: Option<Category>,
) -> Result<Vec<MealWithIngredients>> {
    let meals: Vec<Meal> = match category {
        Some(cat) => {
            sqlx::query_as("SELECT * FROM meals WHERE category = $1 ORDER BY meal_id")
                .bind(cat)
                .fetch_all(pool)
                .await
        }
        None => {
            sqlx::query_as("SELECT * FROM meals ORDER BY meal_id")
                .fetch_all(pool)
                .await
        }
    }
    .context("failed to list meals")?;

    let mut out = Vec::with_capacity(meals.len());
    for meal in meals {
        let ingredients = ingredients_of(pool, meal.meal_id).await?;
        out.push(MealWithIngredients { meal, ingredients });
    }
    Ok(out)
}

/// Number of meals in the catalog, across all categories.
pub async fn count_meals(pool: &PgPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meals")
        .fetch_one(pool)
        .await
        .context("failed to count meals")?;
    Ok(count)
}
