//! engine::invocation
//!
//! A single parsed invocation and the stages its dispatch moves through.

use crate::core::naming::Target;

/// `(raw_context?, raw_verb, raw_options)` for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub raw_context: Option<String>,
    pub raw_verb: String,
    pub raw_options: Vec<String>,
}

impl Invocation {
    /// Split an already-tokenized argument list.
    ///
    /// The first token is the `[CONTEXT].[VERB_NAME]` target, the rest are
    /// options. Returns `None` for an empty list.
    ///
    /// # Example
    ///
    /// ```
    /// use lets::engine::Invocation;
    ///
    /// let args: Vec<String> = ["build.compile", "clean"].iter().map(|s| s.to_string()).collect();
    /// let inv = Invocation::from_args(&args).unwrap();
    /// assert_eq!(inv.raw_context.as_deref(), Some("build"));
    /// assert_eq!(inv.raw_verb, "compile");
    /// assert_eq!(inv.raw_options, ["clean"]);
    /// ```
    pub fn from_args(args: &[String]) -> Option<Self> {
        let (target, options) = args.split_first()?;
        Some(Self::new(target, options.to_vec()))
    }

    pub fn new(target: &str, raw_options: Vec<String>) -> Self {
        let Target { context, name } = Target::parse(target);
        Self {
            raw_context: context,
            raw_verb: name,
            raw_options,
        }
    }

    /// The target as typed, normalized.
    pub fn target(&self) -> Target {
        Target {
            context: self.raw_context.clone(),
            name: self.raw_verb.clone(),
        }
    }
}

/// Dispatch stages.
///
/// `Received → Resolved → Classified → Merged → Dispatched`, or `Failed`
/// from any stage. Nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Resolved,
    Classified,
    Merged,
    Dispatched,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Resolved => "resolved",
            Stage::Classified => "classified",
            Stage::Merged => "merged",
            Stage::Dispatched => "dispatched",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
