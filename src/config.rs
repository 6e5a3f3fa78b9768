//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive validation,
//! directory expansion, the terminal UI and logging, plus helpers to load
//! configuration from disk and the environment.

mod load;
mod schema;

pub use schema::*;
