//! Configuration loading and schema definitions
//!
//! Shared configuration types for the search widget, its WASM bindings and
//! the CLI.

mod loader;
mod schema;

pub use loader::{Config, ENV_DATASET, ENV_THRESHOLD};
pub use schema::*;
