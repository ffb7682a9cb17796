//! Persistence layer for mealweek: connection pool, embedded migrations,
//! row models, and query functions over the four tables (`meals`,
//! `ingredients`, `plan_entries`, `shopping_list`).

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
