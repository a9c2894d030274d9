//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! Given before the verb:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Settings file to use
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only
//!
//! Everything after the verb is captured verbatim, hyphenated tokens
//! included, and handed to the dispatcher as raw options.

use clap::Parser;
use std::path::PathBuf;

/// lets - run named verbs with remembered options
#[derive(Parser, Debug)]
#[command(name = "lets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: $LETS_CONFIG, then ~/.lets/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long)]
    pub quiet: bool,

    /// Verb to run, as [CONTEXT.]VERB
    pub verb: Option<String>,

    /// Options for the verb
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub options: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The verb followed by its options, as the dispatcher expects them.
    pub fn invocation_args(&self) -> Vec<String> {
        self.verb
            .iter()
            .cloned()
            .chain(self.options.iter().cloned())
            .collect()
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

impl Shell {
    pub const NAMES: [&'static str; 4] = ["bash", "zsh", "fish", "powershell"];

    pub fn parse(name: &str) -> Option<Self> {
        <Self as clap::ValueEnum>::from_str(name, true).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lets").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verb_and_options() {
        let cli = parse(&["build.compile", "clean", "flavor", "release"]);
        assert_eq!(cli.verb.as_deref(), Some("build.compile"));
        assert_eq!(cli.options, ["clean", "flavor", "release"]);
        assert_eq!(
            cli.invocation_args(),
            ["build.compile", "clean", "flavor", "release"]
        );
    }

    #[test]
    fn hyphenated_options_are_kept() {
        let cli = parse(&["compile", "--bogus", "-x"]);
        assert_eq!(cli.options, ["--bogus", "-x"]);
    }

    #[test]
    fn global_flags_before_verb() {
        let cli = parse(&["--quiet", "--config", "/tmp/x.toml", "get"]);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
        assert_eq!(cli.verb.as_deref(), Some("get"));
        assert!(cli.options.is_empty());
    }

    #[test]
    fn no_verb() {
        let cli = parse(&[]);
        assert!(cli.invocation_args().is_empty());
    }

    #[test]
    fn shell_names() {
        assert_eq!(Shell::parse("bash"), Some(Shell::Bash));
        assert_eq!(Shell::parse("PowerShell"), Some(Shell::PowerShell));
        assert_eq!(Shell::parse("tcsh"), None);
        for name in Shell::NAMES {
            assert!(Shell::parse(name).is_some());
        }
    }
}
