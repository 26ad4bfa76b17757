//! Terminal helpers for the Wayfarer CLI
//!
//! Provides shared CLI functionality:
//! - Status messages and result formatting
//! - Progress spinners
//! - A results container that prints to the terminal

#![warn(missing_docs)]

pub mod output;
pub mod progress;
pub mod view;
