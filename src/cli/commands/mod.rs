//! cli::commands
//!
//! Built-in verbs of the `lets` context.
//!
//! # Verbs
//!
//! - `help [TARGET...]` - Overview, or help for verbs, settings, contexts
//! - `get [SETTING|CONTEXT...] [json]` - Print setting values
//! - `set SETTING VALUE...` - Assign a setting
//! - `add SETTING VALUE...` - Append to a list or map setting
//! - `remove SETTING VALUE...` - Remove from a list or map setting
//! - `completion SHELL` - Print a shell completion script
//!
//! # Settings
//!
//! - `lets.verbose` (`on`/`off`) - Verbose output for every invocation

mod completion;
mod help;
mod settings_cmd;

use crate::core::schema::{OptionDef, OptionSchema};
use crate::core::types::{ContextName, VerbId};
use crate::engine::{
    BuildError, DispatcherBuilder, Handler, Registration, BUILTIN_CONTEXT,
};
use crate::settings::{SettingDef, SettingValue};

use super::args::Shell;

fn builtin(name: &str, schema: OptionSchema, handler: Handler) -> Result<Registration, BuildError> {
    let verb = VerbId::parse_parts(BUILTIN_CONTEXT, name)?;
    Ok(Registration::new(verb, schema, handler))
}

/// Schema shared by `set`, `add`, and `remove`.
fn edit_schema() -> Result<OptionSchema, BuildError> {
    Ok(OptionSchema::new(vec![
        OptionDef::positional("setting").describe("Setting as [CONTEXT.]NAME"),
        OptionDef::positional("values").multiple().describe("Values to apply"),
    ])?)
}

/// Register the `lets` context with its verbs and settings.
pub fn register_builtins(builder: &mut DispatcherBuilder) -> Result<(), BuildError> {
    builder.context(BUILTIN_CONTEXT, "Built-in verbs and settings")?;

    builder.verb(
        builtin(
            "help",
            OptionSchema::new(vec![OptionDef::positional("targets")
                .multiple()
                .describe("Verbs, settings, or contexts")])?,
            Box::new(help::help),
        )?
        .summary("Show help for verbs and settings")
        .description(
            "Without arguments, list every verb and setting. With arguments, show \
             detailed help for each verb, setting, or context named.",
        )
        .example("lets help", "Overview")
        .example("lets help lets.set", "Help for the set verb"),
    )?;

    builder.verb(
        builtin(
            "get",
            OptionSchema::new(vec![
                OptionDef::toggle("json").describe("Print a JSON object"),
                OptionDef::positional("names")
                    .multiple()
                    .describe("Settings or contexts"),
            ])?,
            Box::new(settings_cmd::get),
        )?
        .summary("Print setting values")
        .description(
            "Print the value of the given settings, or of every setting in the given \
             contexts. Without arguments, print all settings.",
        )
        .example("lets get", "All settings")
        .example("lets get lets json", "Settings of the lets context as JSON"),
    )?;

    builder.verb(
        builtin("set", edit_schema()?, Box::new(settings_cmd::set))?
            .summary("Assign a setting")
            .description(
                "Text settings take one value, list settings take every value given, \
                 dictionary settings take key:value pairs.",
            )
            .example("lets set verbose on", "Always print verbose output"),
    )?;

    builder.verb(
        builtin("add", edit_schema()?, Box::new(settings_cmd::add))?
            .summary("Add values to a list or dictionary setting"),
    )?;

    builder.verb(
        builtin("remove", edit_schema()?, Box::new(settings_cmd::remove))?
            .summary("Remove values from a list or dictionary setting"),
    )?;

    builder.verb(
        builtin(
            "completion",
            OptionSchema::new(vec![OptionDef::keyed("shell")
                .with_choices(Shell::NAMES)
                .describe("Shell to generate for")])?,
            Box::new(completion::completion),
        )?
        .summary("Print a shell completion script")
        .example("lets completion bash", "Bash completion"),
    )?;

    builder.setting(
        SettingDef::new(
            ContextName::new(BUILTIN_CONTEXT)?,
            "verbose",
            SettingValue::text("off"),
        )?
        .describe("Print verbose output")
        .with_choices(["on", "off"]),
    )?;

    Ok(())
}
