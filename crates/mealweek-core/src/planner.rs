//! The plan wizard: a state machine over the 21 (day, category) slots of a
//! week, plus the service functions that persist accepted choices.
//!
//! The wizard itself does no I/O. The CLI session owns the prompt loop: it
//! asks the wizard for the current slot, offers the category's menu, and
//! feeds back the user's answer until the wizard accepts it.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use mealweek_db::models::{Category, Weekday};
use mealweek_db::queries::{meals, plan, shopping};

/// 7 days x 3 categories.
pub const SLOTS_PER_WEEK: usize = Weekday::WEEK.len() * Category::ALL.len();

/// One (day, category) pair awaiting a meal choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub day: Weekday,
    pub category: Category,
}

/// A meal the wizard has accepted for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChosenMeal {
    pub slot: Slot,
    pub meal_id: i64,
    pub name: String,
}

/// Errors of the planning state machine.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Fatal precondition: planning never starts while any category is
    /// empty, so no partial plan can be committed.
    #[error("there are no {0} meals in the catalog; add one before planning")]
    EmptyCategory(Category),

    /// Recoverable: the caller re-prompts the same slot.
    #[error("{0:?} is not one of the listed meals")]
    UnknownMeal(String),

    #[error("the weekly plan is already complete")]
    AlreadyComplete,
}

/// The per-category meal menus a plan run works from, loaded once so every
/// prompt in the run lists the same meals in the same order.
#[derive(Debug, Clone)]
pub struct CategoryMenus {
    breakfast: BTreeMap<String, i64>,
    lunch: BTreeMap<String, i64>,
    dinner: BTreeMap<String, i64>,
}

impl CategoryMenus {
    pub fn new(
        breakfast: BTreeMap<String, i64>,
        lunch: BTreeMap<String, i64>,
        dinner: BTreeMap<String, i64>,
    ) -> Self {
        Self {
            breakfast,
            lunch,
            dinner,
        }
    }

    /// Fetch all three category menus from the catalog.
    pub async fn load(pool: &PgPool) -> Result<Self> {
        Ok(Self {
            breakfast: meals::meals_for_category(pool, Category::Breakfast).await?,
            lunch: meals::meals_for_category(pool, Category::Lunch).await?,
            dinner: meals::meals_for_category(pool, Category::Dinner).await?,
        })
    }

    pub fn menu(&self, category: Category) -> &BTreeMap<String, i64> {
        match category {
            Category::Breakfast => &self.breakfast,
            Category::Lunch => &self.lunch,
            Category::Dinner => &self.dinner,
        }
    }

    fn first_empty(&self) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|cat| self.menu(*cat).is_empty())
    }
}

/// State machine over the week's slots, Monday/Breakfast through
/// Sunday/Dinner. Categories advance first, then the day.
#[derive(Debug)]
pub struct PlanWizard {
    menus: CategoryMenus,
    cursor: usize,
    choices: Vec<ChosenMeal>,
}

impl PlanWizard {
    /// Start a planning run. Refuses to start while any category has no
    /// meals (the sole fatal precondition of planning).
    pub fn new(menus: CategoryMenus) -> Result<Self, PlanError> {
        if let Some(category) = menus.first_empty() {
            return Err(PlanError::EmptyCategory(category));
        }
        Ok(Self {
            menus,
            cursor: 0,
            choices: Vec::with_capacity(SLOTS_PER_WEEK),
        })
    }

    /// The slot awaiting a choice, or `None` once the plan is complete.
    pub fn current_slot(&self) -> Option<Slot> {
        if self.cursor >= SLOTS_PER_WEEK {
            return None;
        }
        Some(Slot {
            day: Weekday::WEEK[self.cursor / Category::ALL.len()],
            category: Category::ALL[self.cursor % Category::ALL.len()],
        })
    }

    /// Meal names on offer for the current slot, in lexicographic order.
    pub fn current_menu(&self) -> impl Iterator<Item = &str> {
        let menu = match self.current_slot() {
            Some(slot) => Some(self.menus.menu(slot.category)),
            None => None,
        };
        menu.into_iter().flat_map(|m| m.keys()).map(String::as_str)
    }

    /// Offer a meal name for the current slot.
    ///
    /// On success the cursor advances to the next slot. An unknown name
    /// leaves the cursor unmoved; the caller's loop re-prompts the same slot
    /// as often as it takes.
    pub fn choose(&mut self, name: &str) -> Result<ChosenMeal, PlanError> {
        let slot = self.current_slot().ok_or(PlanError::AlreadyComplete)?;
        let meal_id = match self.menus.menu(slot.category).get(name) {
            Some(id) => *id,
            None => return Err(PlanError::UnknownMeal(name.to_owned())),
        };

        let chosen = ChosenMeal {
            slot,
            meal_id,
            name: name.to_owned(),
        };
        self.choices.push(chosen.clone());
        self.cursor += 1;
        Ok(chosen)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= SLOTS_PER_WEEK
    }

    /// Choices accepted so far, in slot order.
    pub fn choices(&self) -> &[ChosenMeal] {
        &self.choices
    }
}

// ---------------------------------------------------------------------------
// Persistence service
// ---------------------------------------------------------------------------

/// Clear any previously stored plan and shopping list. Idempotent; runs
/// after the precondition check and before the first slot, so re-entering
/// `plan` discards the prior cycle whole.
pub async fn reset_plan(pool: &PgPool) -> Result<()> {
    plan::clear_plan(pool).await?;
    shopping::clear_shopping_list(pool).await?;
    Ok(())
}

/// Persist one accepted choice: the plan entry, plus one shopping upsert per
/// ingredient occurrence of the chosen meal.
pub async fn commit_choice(pool: &PgPool, chosen: &ChosenMeal) -> Result<()> {
    plan::insert_entry(pool, chosen.slot.day, chosen.slot.category, chosen.meal_id).await?;

    let ingredients = meals::ingredients_of(pool, chosen.meal_id).await?;
    for ingredient in &ingredients {
        shopping::upsert_entry(pool, ingredient, 1).await?;
    }

    debug!(
        day = %chosen.slot.day,
        category = %chosen.slot.category,
        meal = %chosen.name,
        ingredients = ingredients.len(),
        "plan choice committed"
    );
    Ok(())
}

/// One day of the completed plan, resolved to meal names for display.
#[derive(Debug, Clone)]
pub struct DayOverview {
    pub day: Weekday,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

/// Read the stored plan back as one overview per day, Monday first.
///
/// Intended for display right after a completed run; a slot whose meal id no
/// longer resolves is a data-consistency error.
pub async fn week_overview(pool: &PgPool) -> Result<Vec<DayOverview>> {
    let mut overview = Vec::with_capacity(Weekday::WEEK.len());

    for day in Weekday::WEEK {
        let entries = plan::entries_for_day(pool, day).await?;
        let mut names: [Option<String>; 3] = [None, None, None];

        for entry in &entries {
            let name = meals::meal_name(pool, entry.meal_id)
                .await?
                .with_context(|| format!("plan references missing meal {}", entry.meal_id))?;
            let idx = match entry.category {
                Category::Breakfast => 0,
                Category::Lunch => 1,
                Category::Dinner => 2,
            };
            names[idx] = Some(name);
        }

        let [breakfast, lunch, dinner] = names;
        overview.push(DayOverview {
            day,
            breakfast: breakfast.with_context(|| format!("no breakfast planned for {day}"))?,
            lunch: lunch.with_context(|| format!("no lunch planned for {day}"))?,
            dinner: dinner.with_context(|| format!("no dinner planned for {day}"))?,
        });
    }

    Ok(overview)
}
