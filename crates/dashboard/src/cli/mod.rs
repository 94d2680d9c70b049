mod commands;
pub mod demo;
pub mod mutate;
pub mod query;
pub mod setup;
pub mod shell;

pub use commands::*;
