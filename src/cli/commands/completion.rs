//! completion verb - Generate shell completion scripts
//!
//! The script is generated from the registered verbs, so completions
//! cover every verb (qualified, and bare when unambiguous) together with
//! its option keys and choice words.

use clap::builder::PossibleValuesParser;
use clap::{Arg, Command};
use clap_complete::{generate, shells};

use crate::core::schema::{OptionKind, OptionSchema};
use crate::engine::{CallbackError, Dispatcher, VerbCall};

use crate::cli::args::Shell;

/// Option words a user may type for `schema`.
fn option_words(schema: &OptionSchema) -> Vec<String> {
    let mut words = Vec::new();
    for def in schema.iter() {
        if def.kind != OptionKind::Positional {
            words.push(def.key.clone());
        }
        words.extend(def.choices.iter().cloned());
    }
    words
}

fn verb_command(name: String, summary: &str, schema: &OptionSchema) -> Command {
    let mut options = Arg::new("options").num_args(0..);
    let words = option_words(schema);
    if !words.is_empty() {
        options = options.value_parser(PossibleValuesParser::new(words));
    }
    Command::new(name).about(summary.to_string()).arg(options)
}

/// A clap command tree mirroring the registered verbs.
pub(crate) fn command_tree(dispatcher: &Dispatcher) -> Command {
    let registry = dispatcher.registry();
    let mut cmd = Command::new(dispatcher.program().to_string());

    for reg in registry.iter() {
        cmd = cmd.subcommand(verb_command(
            reg.verb.to_string(),
            &reg.summary,
            &reg.schema,
        ));

        let bare = reg.verb.name.as_str();
        if reg.verb.context.is_some() && registry.lookup_by_name(bare).is_ok() {
            cmd = cmd.subcommand(verb_command(bare.to_string(), &reg.summary, &reg.schema));
        }
    }
    cmd
}

pub(super) fn completion(call: &mut VerbCall<'_>) -> Result<i32, CallbackError> {
    let name = call.options.text("shell").ok_or_else(|| {
        CallbackError::usage(format!(
            "usage: lets completion {}",
            Shell::NAMES.join("|")
        ))
    })?;
    let shell = Shell::parse(name)
        .ok_or_else(|| CallbackError::usage(format!("unsupported shell {}", name)))?;

    let mut cmd = command_tree(call.dispatcher);
    let bin = cmd.get_name().to_string();
    let out = call.console.out();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, &bin, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, &bin, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, &bin, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, &bin, out),
    }

    Ok(0)
}
