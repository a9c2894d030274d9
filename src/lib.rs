//! lets - run named verbs with remembered options
//!
//! A verb is addressed as `[CONTEXT.]VERB` and followed by free-form option
//! words. lets resolves the verb, interprets the words against the verb's
//! option schema, fills in anything not given from persisted settings and
//! schema defaults, and runs the verb's callback.
//!
//! # Architecture
//!
//! - [`core`] - Names, option schemas, classification, registry, resolution, merging
//! - [`settings`] - Persisted settings: stores, definitions, the persisted option tier
//! - [`engine`] - Registration and the dispatch lifecycle
//! - [`cli`] - Command-line interface and built-in verbs
//! - [`ui`] - Console output
//!
//! # Correctness Invariants
//!
//! 1. At most one verb per `(context, name)`; registration fails otherwise
//! 2. An explicit context resolves exactly; a bare name must be unique
//! 3. Option values come from the invocation, else the persisted setting,
//!    else the schema default
//! 4. A callback never runs with partially classified options

pub mod cli;
pub mod core;
pub mod engine;
pub mod settings;
pub mod ui;
