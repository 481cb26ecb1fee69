//! CLI command handlers

pub mod commands;

pub use commands::{calculate, migrate, operations, report_error};
