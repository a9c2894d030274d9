//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Console with quiet/verbose handling and formatting helpers

pub mod output;
