//! Integration tests for the planning service and shopping-list compiler.

use sqlx::PgPool;

use mealweek_core::planner::{self, CategoryMenus, PlanError, PlanWizard, SLOTS_PER_WEEK};
use mealweek_core::shopping::{self, CompileError};
use mealweek_db::models::{Category, Weekday};
use mealweek_db::queries::{meals, plan, shopping as shopping_db};
use mealweek_test_utils::{create_test_db, drop_test_db};

fn ingredients(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// One meal per category, enough to run a full plan.
async fn seed_catalog(pool: &PgPool) {
    meals::insert_meal(
        pool,
        Category::Breakfast,
        "Oatmeal",
        &ingredients(&["Oats", "Milk"]),
    )
    .await
    .unwrap();
    meals::insert_meal(pool, Category::Lunch, "Soup", &ingredients(&["Lentils"]))
        .await
        .unwrap();
    meals::insert_meal(
        pool,
        Category::Dinner,
        "Stew",
        &ingredients(&["Beef", "Carrots"]),
    )
    .await
    .unwrap();
}

/// Drive the wizard through all 21 slots, committing every choice.
async fn run_full_plan(pool: &PgPool) {
    let menus = CategoryMenus::load(pool).await.unwrap();
    let mut wizard = PlanWizard::new(menus).unwrap();
    planner::reset_plan(pool).await.unwrap();

    while let Some(slot) = wizard.current_slot() {
        let name = match slot.category {
            Category::Breakfast => "Oatmeal",
            Category::Lunch => "Soup",
            Category::Dinner => "Stew",
        };
        let chosen = wizard.choose(name).unwrap();
        planner::commit_choice(pool, &chosen).await.unwrap();
    }
    assert!(wizard.is_complete());
}

#[tokio::test]
async fn full_plan_has_twenty_one_entries_and_consistent_shopping() {
    let (pool, db_name) = create_test_db().await;
    seed_catalog(&pool).await;

    run_full_plan(&pool).await;

    assert_eq!(
        plan::entry_count(&pool).await.unwrap(),
        SLOTS_PER_WEEK as i64
    );
    for day in Weekday::WEEK {
        let entries = plan::entries_for_day(&pool, day).await.unwrap();
        assert_eq!(entries.len(), Category::ALL.len(), "3 slots for {day}");
    }

    // Every meal appears once per day: 7 occurrences of each ingredient.
    let aggregate = shopping::compile(&pool).await.unwrap();
    let compiled = aggregate.entries();
    let names: Vec<&str> = compiled.iter().map(|e| e.ingredient.as_str()).collect();
    assert_eq!(names, ["Beef", "Carrots", "Lentils", "Milk", "Oats"]);
    assert!(compiled.iter().all(|e| e.quantity == 7));

    // The running aggregate persisted during planning agrees with the
    // compiler's result derived from the plan.
    let persisted = shopping_db::entries(&pool).await.unwrap();
    assert_eq!(persisted, compiled);

    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn repeat_choices_sum_quantities() {
    let (pool, db_name) = create_test_db().await;

    let oatmeal = meals::insert_meal(
        &pool,
        Category::Breakfast,
        "Oatmeal",
        &ingredients(&["Oats", "Milk"]),
    )
    .await
    .unwrap();
    let toast = meals::insert_meal(
        &pool,
        Category::Breakfast,
        "Toast",
        &ingredients(&["Bread", "Butter"]),
    )
    .await
    .unwrap();

    // Oatmeal on Monday and Wednesday, Toast on Tuesday; nothing else.
    plan::insert_entry(&pool, Weekday::Monday, Category::Breakfast, oatmeal)
        .await
        .unwrap();
    plan::insert_entry(&pool, Weekday::Wednesday, Category::Breakfast, oatmeal)
        .await
        .unwrap();
    plan::insert_entry(&pool, Weekday::Tuesday, Category::Breakfast, toast)
        .await
        .unwrap();

    let aggregate = shopping::compile(&pool).await.unwrap();
    let by_name: Vec<(String, i64)> = aggregate
        .entries()
        .into_iter()
        .map(|e| (e.ingredient, e.quantity))
        .collect();
    assert_eq!(
        by_name,
        [
            ("Bread".to_string(), 1),
            ("Butter".to_string(), 1),
            ("Milk".to_string(), 2),
            ("Oats".to_string(), 2),
        ]
    );

    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn compiling_an_empty_plan_short_circuits() {
    let (pool, db_name) = create_test_db().await;

    let err = shopping::compile(&pool).await.unwrap_err();
    assert!(matches!(err, CompileError::EmptyPlan));

    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn plan_referencing_missing_meal_is_reported() {
    let (pool, db_name) = create_test_db().await;
    seed_catalog(&pool).await;

    let menus = CategoryMenus::load(&pool).await.unwrap();
    let oatmeal = *menus.menu(Category::Breakfast).get("Oatmeal").unwrap();
    plan::insert_entry(&pool, Weekday::Monday, Category::Breakfast, oatmeal)
        .await
        .unwrap();

    // Meals are never deleted in normal operation; force the inconsistency
    // by removing the referential constraint and the meal underneath it.
    sqlx::query("ALTER TABLE plan_entries DROP CONSTRAINT plan_entries_meal_id_fkey")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM ingredients WHERE meal_id = $1")
        .bind(oatmeal)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM meals WHERE meal_id = $1")
        .bind(oatmeal)
        .execute(&pool)
        .await
        .unwrap();

    let err = shopping::compile(&pool).await.unwrap_err();
    match err {
        CompileError::MissingMeal { meal_id } => assert_eq!(meal_id, oatmeal),
        other => panic!("expected MissingMeal, got {other:?}"),
    }

    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn reset_discards_the_previous_cycle() {
    let (pool, db_name) = create_test_db().await;
    seed_catalog(&pool).await;

    run_full_plan(&pool).await;
    assert!(plan::entry_count(&pool).await.unwrap() > 0);
    assert!(!shopping_db::entries(&pool).await.unwrap().is_empty());

    planner::reset_plan(&pool).await.unwrap();
    assert_eq!(plan::entry_count(&pool).await.unwrap(), 0);
    assert!(shopping_db::entries(&pool).await.unwrap().is_empty());

    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn planning_requires_every_category() {
    let (pool, db_name) = create_test_db().await;

    // Breakfast only; lunch and dinner are empty.
    meals::insert_meal(
        &pool,
        Category::Breakfast,
        "Oatmeal",
        &ingredients(&["Oats"]),
    )
    .await
    .unwrap();

    let menus = CategoryMenus::load(&pool).await.unwrap();
    let err = PlanWizard::new(menus).unwrap_err();
    assert!(matches!(err, PlanError::EmptyCategory(Category::Lunch)));

    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn week_overview_resolves_meal_names() {
    let (pool, db_name) = create_test_db().await;
    seed_catalog(&pool).await;
    run_full_plan(&pool).await;

    let overview = planner::week_overview(&pool).await.unwrap();
    assert_eq!(overview.len(), 7);
    assert_eq!(overview[0].day, Weekday::Monday);
    assert_eq!(overview[6].day, Weekday::Sunday);
    for day in &overview {
        assert_eq!(day.breakfast, "Oatmeal");
        assert_eq!(day.lunch, "Soup");
        assert_eq!(day.dinner, "Stew");
    }

    drop_test_db(&db_name).await;
}
