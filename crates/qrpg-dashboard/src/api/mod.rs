//! API endpoint handlers.

pub mod circuit;
pub mod generate;
pub mod health;
pub mod options;
