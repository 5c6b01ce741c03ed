//! # Error Handling
//!
//! Crate-wide error type and result alias. See [`types`] for the taxonomy.

pub mod types;

pub use types::{Error, Result};
