//! The interactive menu session: a line-oriented loop over the commands
//! add, show, plan, save, and exit.
//!
//! The session is generic over its input and output streams so integration
//! tests can drive it with a scripted transcript. Every re-prompt is an
//! explicit loop on the same state; a rejected line never unwinds or
//! restarts anything.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use sqlx::PgPool;
use tracing::warn;

use mealweek_core::export;
use mealweek_core::planner::{self, CategoryMenus, PlanError, PlanWizard};
use mealweek_core::shopping::{self, CompileError};
use mealweek_core::text::is_valid_text;
use mealweek_db::models::Category;
use mealweek_db::queries::meals;

/// What the menu loop does after a command finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Continue,
    Quit,
}

/// Raised when the input stream ends mid-prompt. The menu loop treats it as
/// an exit rather than an error worth reporting.
#[derive(Debug, thiserror::Error)]
#[error("input stream ended")]
struct InputEnded;

pub struct Session<R, W> {
    pool: PgPool,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(pool: PgPool, input: R, out: W) -> Self {
        Self { pool, input, out }
    }

    /// Run the menu loop until `exit` or end of input.
    ///
    /// A failed command reports its error and returns to the menu; only
    /// output-stream failures end the session abnormally.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            writeln!(
                self.out,
                "What would you like to do (add, show, plan, save, exit)?"
            )?;
            let line = match self.read_line() {
                Ok(line) => line,
                Err(e) if e.is::<InputEnded>() => return Ok(()),
                Err(e) => return Err(e),
            };

            let action = match line.trim().to_ascii_lowercase().as_str() {
                "add" => self.cmd_add().await,
                "show" => self.cmd_show().await,
                "plan" => self.cmd_plan().await,
                "save" => self.cmd_save().await,
                "exit" => {
                    writeln!(self.out, "Bye!")?;
                    Ok(MenuAction::Quit)
                }
                // Unknown command: straight back to the menu prompt.
                _ => Ok(MenuAction::Continue),
            };

            match action {
                Ok(MenuAction::Continue) => {}
                Ok(MenuAction::Quit) => return Ok(()),
                Err(e) if e.is::<InputEnded>() => return Ok(()),
                Err(e) => {
                    // Storage failures abort the command, not the session.
                    warn!(error = %e, "command failed");
                    writeln!(self.out, "An error occurred: {e:#}")?;
                }
            }
        }
    }

    // -----------------------------------------------------------------
    // add
    // -----------------------------------------------------------------

    async fn cmd_add(&mut self) -> Result<MenuAction> {
        writeln!(
            self.out,
            "Which meal do you want to add (breakfast, lunch, dinner)?"
        )?;
        let category = self.read_category()?;
        let name = self.read_meal_name()?;
        let ingredients = self.read_ingredients()?;

        meals::insert_meal(&self.pool, category, &name, &ingredients).await?;
        writeln!(self.out, "The meal has been added!")?;
        Ok(MenuAction::Continue)
    }

    /// Read lines until one parses as a category.
    fn read_category(&mut self) -> Result<Category> {
        loop {
            let line = self.read_line()?;
            match line.trim().parse::<Category>() {
                Ok(category) => return Ok(category),
                Err(_) => writeln!(
                    self.out,
                    "Wrong meal category! Choose from: breakfast, lunch, dinner."
                )?,
            }
        }
    }

    /// Read lines until one is a valid meal name.
    fn read_meal_name(&mut self) -> Result<String> {
        writeln!(self.out, "Input the meal's name:")?;
        loop {
            let line = self.read_line()?;
            let name = line.trim();
            if is_valid_text(name) {
                return Ok(name.to_owned());
            }
            writeln!(self.out, "Wrong format. Use letters only!")?;
        }
    }

    /// Read one comma-separated ingredient line; any invalid item rejects
    /// the whole line and re-prompts.
    fn read_ingredients(&mut self) -> Result<Vec<String>> {
        writeln!(self.out, "Input the ingredients:")?;
        loop {
            let line = self.read_line()?;
            let items: Vec<String> = line
                .split(',')
                .map(|item| item.trim().to_owned())
                .collect();

            if !items.is_empty() && items.iter().all(|item| is_valid_text(item)) {
                return Ok(items);
            }
            writeln!(self.out, "Wrong format. Use letters only!")?;
        }
    }

    // -----------------------------------------------------------------
    // show
    // -----------------------------------------------------------------

    async fn cmd_show(&mut self) -> Result<MenuAction> {
        if meals::count_meals(&self.pool).await? == 0 {
            writeln!(self.out, "No meals saved. Add a meal first.")?;
            return Ok(MenuAction::Continue);
        }

        writeln!(
            self.out,
            "Which category do you want to print (breakfast, lunch, dinner)?"
        )?;
        let category = self.read_category()?;

        let listed = meals::list_meals(&self.pool, Some(category)).await?;
        if listed.is_empty() {
            writeln!(self.out, "No meals found.")?;
            return Ok(MenuAction::Continue);
        }

        writeln!(self.out, "Category: {category}")?;
        for item in &listed {
            writeln!(self.out)?;
            writeln!(self.out, "Name: {}", item.meal.name)?;
            writeln!(self.out, "Ingredients:")?;
            for ingredient in &item.ingredients {
                writeln!(self.out, "{ingredient}")?;
            }
        }
        writeln!(self.out)?;
        Ok(MenuAction::Continue)
    }

    // -----------------------------------------------------------------
    // plan
    // -----------------------------------------------------------------

    async fn cmd_plan(&mut self) -> Result<MenuAction> {
        let menus = CategoryMenus::load(&self.pool).await?;
        let mut wizard = match PlanWizard::new(menus) {
            Ok(wizard) => wizard,
            Err(e @ PlanError::EmptyCategory(_)) => {
                // Fatal to the planning operation only: nothing was cleared
                // or written, and the menu takes over again.
                writeln!(self.out, "{e}")?;
                return Ok(MenuAction::Continue);
            }
            Err(e) => return Err(e.into()),
        };

        planner::reset_plan(&self.pool).await?;

        while let Some(slot) = wizard.current_slot() {
            if slot.category == Category::Breakfast {
                writeln!(self.out, "{}", slot.day.label())?;
            }

            let menu: Vec<String> = wizard.current_menu().map(str::to_owned).collect();
            for name in &menu {
                writeln!(self.out, "{name}")?;
            }
            writeln!(
                self.out,
                "Choose the {} for {} from the list above:",
                slot.category,
                slot.day.label()
            )?;

            // The sole retry mechanism: re-read until the wizard accepts.
            let chosen = loop {
                let line = self.read_line()?;
                match wizard.choose(line.trim()) {
                    Ok(chosen) => break chosen,
                    Err(PlanError::UnknownMeal(_)) => writeln!(
                        self.out,
                        "This meal doesn't exist. Choose a meal from the list above."
                    )?,
                    Err(e) => return Err(e.into()),
                }
            };
            planner::commit_choice(&self.pool, &chosen).await?;

            if slot.category == Category::Dinner {
                writeln!(
                    self.out,
                    "Yeah! We planned the meals for {}.",
                    slot.day.label()
                )?;
                writeln!(self.out)?;
            }
        }

        for day in planner::week_overview(&self.pool).await? {
            writeln!(self.out, "{}", day.day.label())?;
            writeln!(self.out, "Breakfast: {}", day.breakfast)?;
            writeln!(self.out, "Lunch: {}", day.lunch)?;
            writeln!(self.out, "Dinner: {}", day.dinner)?;
            writeln!(self.out)?;
        }

        Ok(MenuAction::Continue)
    }

    // -----------------------------------------------------------------
    // save
    // -----------------------------------------------------------------

    async fn cmd_save(&mut self) -> Result<MenuAction> {
        let aggregate = match shopping::compile(&self.pool).await {
            Ok(aggregate) => aggregate,
            Err(CompileError::EmptyPlan) => {
                writeln!(self.out, "Unable to save. Plan your meals first.")?;
                return Ok(MenuAction::Continue);
            }
            Err(e) => return Err(e.into()),
        };

        writeln!(self.out, "Input a filename:")?;
        let filename = loop {
            let line = self.read_line()?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                break trimmed.to_owned();
            }
            writeln!(self.out, "Input a filename:")?;
        };

        export::export_to_file(Path::new(&filename), &aggregate.entries())?;
        writeln!(self.out, "Saved!")?;
        Ok(MenuAction::Continue)
    }

    // -----------------------------------------------------------------

    /// Read the next input line, without its terminator.
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(InputEnded.into());
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }
}
