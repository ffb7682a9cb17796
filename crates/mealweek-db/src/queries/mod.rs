//! Query functions, one module per table group.

pub mod meals;
pub mod plan;
pub mod shopping;
