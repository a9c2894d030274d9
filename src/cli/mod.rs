//! cli
//!
//! Command-line interface layer for lets.
//!
//! # Responsibilities
//!
//! - Parse global flags; capture the verb and its options verbatim
//! - Register the built-in verbs and settings
//! - Open the settings file and hand the invocation to the dispatcher
//! - Turn failures into messages and exit codes
//!
//! # Architecture
//!
//! The CLI layer is thin. Resolution, classification, and merging all
//! happen in [`crate::engine`] and [`crate::core`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};
pub use commands::register_builtins;

use anyhow::{Context as _, Result};

use crate::engine::{Dispatcher, DispatcherBuilder, DispatchError, EXIT_USAGE};
use crate::settings::FileSettingsStore;
use crate::ui::output::{Console, Verbosity};

/// The dispatcher for the `lets` binary: built-in verbs only.
pub fn dispatcher() -> Result<Dispatcher> {
    let mut builder = DispatcherBuilder::new("lets").about(
        "Run verbs as [CONTEXT.]VERB followed by free-form options. Options a verb \
         accepts can be given defaults with 'lets set'.",
    );
    register_builtins(&mut builder).context("Failed to register built-in verbs")?;
    Ok(builder.build())
}

/// Run the CLI application and return the process exit code.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<i32> {
    let mut console = Console::stdio(Verbosity::from_flags(cli.quiet, false));
    let dispatcher = dispatcher()?;
    let store = FileSettingsStore::discover(cli.config.as_deref())
        .context("Failed to locate settings file")?;

    let args = cli.invocation_args();
    if args.is_empty() {
        console.error(DispatchError::MissingVerb);
        console.print(format!("Run '{} help' for usage.", dispatcher.program()));
        return Ok(EXIT_USAGE);
    }

    match dispatcher.run(&args, &store, &mut console) {
        Ok(status) => Ok(status),
        Err(err) => {
            tracing::debug!(error = ?err, "dispatch failed");
            console.error(&err);
            Ok(err.exit_code())
        }
    }
}
