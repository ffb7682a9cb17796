//! Domain logic for mealweek: input validation, the plan wizard state
//! machine, ingredient aggregation, shopping-list compilation, and export
//! rendering. Persistence lives in `mealweek-db`; all interactive I/O lives
//! in the CLI crate.

pub mod aggregate;
pub mod export;
pub mod planner;
pub mod shopping;
pub mod text;
