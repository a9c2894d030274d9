//! core
//!
//! Core domain types and the pure decision logic of dispatch.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ContextName, VerbName, VerbId
//! - [`naming`] - `[CONTEXT].[NAME]` targets and the two-tier index
//! - [`schema`] - Option schemas, option values, the option bag
//! - [`classify`] - Raw option tokens to typed options
//! - [`registry`] - Contexts and verb registrations
//! - [`resolve`] - Invocation to exactly one verb
//! - [`merge`] - Invocation > persisted setting > schema default
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid names at construction
//! - Every failure mode is an enumerable error variant
//! - Classification, resolution and merging are pure functions

pub mod classify;
pub mod merge;
pub mod naming;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod types;
