//! LeakScope Rules - Detection rules and discovery queries.
//!
//! This crate defines what the scanner looks for: the detection rules the
//! classifier runs over fetched content, and the dork collection that
//! drives discovery. Rules come from a built-in set plus optional TOML
//! rule packs; everything is validated and compiled once at startup.
//!
//! # Modules
//!
//! - [`definition`] - Rule definition and compiled rule types
//! - [`ruleset`] - Ordered rule set with the built-in defaults
//! - [`dorks`] - Built-in discovery query collection
//! - [`loader`] - Strict TOML rule pack loader
//! - [`error`] - Rule errors using thiserror

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod definition;
pub mod dorks;
pub mod error;
pub mod loader;
pub mod ruleset;

// Re-export commonly used types
pub use definition::{DetectionRule, RuleDefinition};
pub use dorks::{DorkCollection, DorkGroup, DorkQuery};
pub use error::{Result, RuleError};
pub use loader::RuleLoader;
pub use ruleset::RuleSet;
