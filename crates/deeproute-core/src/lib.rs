//! deeproute Core - Reward tables and shared error types
//!
//! This crate provides the data model shared by the bandit loop and the CLI.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod reward;

pub use error::{DeeprouteError, Result};
pub use reward::RewardTable;
