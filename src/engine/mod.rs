//! engine
//!
//! Turns an invocation into exactly one callback run.
//!
//! # Architecture
//!
//! The engine owns the lifecycle around the pure [`crate::core`] logic:
//!
//! 1. **Register**: contexts, verbs, and settings go into a
//!    [`DispatcherBuilder`]; misconfiguration fails here, at startup
//! 2. **Resolve**: the invocation's target is mapped to one registration
//! 3. **Classify**: raw option tokens become typed options
//! 4. **Merge**: invocation > persisted setting > schema default
//! 5. **Dispatch**: the callback runs with the merged options
//!
//! Each dispatch is synchronous and single-threaded. Any failure before
//! step 5 aborts the dispatch.
//!
//! # Example
//!
//! ```
//! use lets::core::schema::{OptionDef, OptionSchema};
//! use lets::engine::{CallbackError, DispatcherBuilder, VerbCall};
//! use lets::settings::MemorySettingsStore;
//! use lets::ui::output::{Console, Verbosity};
//!
//! let mut builder = DispatcherBuilder::new("lets");
//! builder.context("build", "Build tasks").unwrap();
//! builder
//!     .verb_fn(
//!         "build.compile",
//!         OptionSchema::new(vec![OptionDef::keyed("flavor").with_default("debug")]).unwrap(),
//!         "Compile",
//!         |call: &mut VerbCall<'_>| -> Result<i32, CallbackError> {
//!             let flavor = call.options.text("flavor").unwrap_or_default().to_string();
//!             call.console.print(flavor);
//!             Ok(0)
//!         },
//!     )
//!     .unwrap();
//! let dispatcher = builder.build();
//!
//! let store = MemorySettingsStore::new();
//! let (mut console, captured) = Console::buffered(Verbosity::Normal);
//! let args = vec!["compile".to_string()];
//! assert_eq!(dispatcher.run(&args, &store, &mut console).unwrap(), 0);
//! assert_eq!(captured.stdout(), "debug\n");
//! ```

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod help;
pub mod invocation;

pub use dispatch::{
    Dispatcher, DispatcherBuilder, Handler, Registration, BUILTIN_CONTEXT, VERBOSE_SETTING,
};
pub use error::{
    BuildError, CallbackError, DispatchError, EXIT_AMBIGUOUS, EXIT_CALLBACK, EXIT_CONFIGURATION,
    EXIT_NOT_FOUND, EXIT_OPTIONS, EXIT_SETTINGS, EXIT_USAGE,
};
pub use handler::{VerbCall, VerbHandler};
pub use invocation::{Invocation, Stage};
