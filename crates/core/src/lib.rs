//! Core utilities for Wayfarer
//!
//! This crate provides shared functionality used by the search crate and the CLI:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults, env overrides and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use wayfarer_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("debounce: {}ms", config.schema.search.debounce_ms);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, SearchKey};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
