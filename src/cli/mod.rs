// src/cli/mod.rs
//! CLI arguments and command handlers.

pub mod args;
pub mod dispatch;
pub mod handlers;

pub use args::{Cli, Commands};
