//! core::resolve
//!
//! Map a parsed invocation to exactly one registered verb.
//!
//! # Policy
//!
//! Strictly two-tier:
//!
//! - With an explicit context, resolution is exact via
//!   [`VerbRegistry::lookup_by_full`]. It never falls back to a name-only
//!   search.
//! - Without a context, the verb name must be unique across all contexts.
//!   A shared name fails with [`ResolveError::AmbiguousVerb`] carrying
//!   every candidate so the caller can suggest an explicit context.

use thiserror::Error;

use super::naming::Target;
use super::registry::{VerbRegistration, VerbRegistry};
use super::types::VerbId;

/// Errors from verb resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown verb {0}")]
    NotFound(String),

    #[error("ambiguous verb found. Use one of following verbs: {}", format_candidates(.0))]
    AmbiguousVerb(Vec<VerbId>),
}

fn format_candidates(candidates: &[VerbId]) -> String {
    candidates
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve `(raw_context?, raw_verb)` against the registry.
///
/// # Errors
///
/// - [`ResolveError::NotFound`] when nothing matches
/// - [`ResolveError::AmbiguousVerb`] when a bare name has several owners
///
/// # Example
///
/// ```
/// use lets::core::registry::{VerbRegistration, VerbRegistry};
/// use lets::core::resolve::{resolve, ResolveError};
/// use lets::core::schema::OptionSchema;
/// use lets::core::types::{ContextName, VerbId};
///
/// let mut registry = VerbRegistry::new();
/// for ctx in ["build", "deploy"] {
///     registry.register_context(ContextName::new(ctx).unwrap(), "").unwrap();
///     let verb = VerbId::parse_parts(ctx, "push").unwrap();
///     registry.register(VerbRegistration::new(verb, OptionSchema::empty(), ())).unwrap();
/// }
///
/// assert!(matches!(resolve(&registry, None, "push"), Err(ResolveError::AmbiguousVerb(_))));
/// assert!(resolve(&registry, Some("build"), "push").is_ok());
/// ```
pub fn resolve<'r, H>(
    registry: &'r VerbRegistry<H>,
    raw_context: Option<&str>,
    raw_verb: &str,
) -> Result<&'r VerbRegistration<H>, ResolveError> {
    if raw_verb.is_empty() {
        let target = Target {
            context: raw_context.map(str::to_string),
            name: String::new(),
        };
        return Err(ResolveError::NotFound(target.to_string()));
    }

    match raw_context {
        Some(context) => registry.lookup_by_full(context, raw_verb),
        None => registry.lookup_by_name(raw_verb),
    }
}

/// Resolve a raw `[CONTEXT].[VERB_NAME]` token.
pub fn resolve_target<'r, H>(
    registry: &'r VerbRegistry<H>,
    target: &Target,
) -> Result<&'r VerbRegistration<H>, ResolveError> {
    resolve(registry, target.context.as_deref(), &target.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::OptionSchema;
    use crate::core::types::ContextName;

    fn registry() -> VerbRegistry<&'static str> {
        let mut registry = VerbRegistry::new();
        for ctx in ["build", "deploy"] {
            registry
                .register_context(ContextName::new(ctx).unwrap(), "")
                .unwrap();
        }
        let verbs = [
            ("build", "push", "build-push"),
            ("deploy", "push", "deploy-push"),
            ("build", "clean", "build-clean"),
        ];
        for (ctx, name, cb) in verbs {
            let verb = VerbId::parse_parts(ctx, name).unwrap();
            registry
                .register(VerbRegistration::new(verb, OptionSchema::empty(), cb))
                .unwrap();
        }
        registry
    }

    #[test]
    fn bare_unique_name_resolves() {
        let registry = registry();
        let found = resolve(&registry, None, "clean").unwrap();
        assert_eq!(found.callback, "build-clean");
    }

    #[test]
    fn bare_shared_name_is_ambiguous_with_all_candidates() {
        let registry = registry();
        let err = resolve(&registry, None, "push").unwrap_err();
        assert_eq!(
            err,
            ResolveError::AmbiguousVerb(vec![
                VerbId::parse_parts("build", "push").unwrap(),
                VerbId::parse_parts("deploy", "push").unwrap(),
            ])
        );
        assert!(err.to_string().contains("build.push, deploy.push"));
    }

    #[test]
    fn explicit_context_resolves_shared_name() {
        let registry = registry();
        assert_eq!(
            resolve(&registry, Some("build"), "push").unwrap().callback,
            "build-push"
        );
        assert_eq!(
            resolve(&registry, Some("deploy"), "push").unwrap().callback,
            "deploy-push"
        );
    }

    #[test]
    fn explicit_context_never_falls_back() {
        let registry = registry();
        let err = resolve(&registry, Some("deploy"), "clean").unwrap_err();
        assert_eq!(err, ResolveError::NotFound("deploy.clean".into()));
    }

    #[test]
    fn unknown_context_not_found() {
        let registry = registry();
        let err = resolve(&registry, Some("ship"), "push").unwrap_err();
        assert_eq!(err, ResolveError::NotFound("ship.push".into()));
    }

    #[test]
    fn empty_verb_not_found() {
        let registry = registry();
        assert_eq!(
            resolve(&registry, Some("build"), "").unwrap_err(),
            ResolveError::NotFound("build.".into())
        );
    }

    #[test]
    fn target_tokens() {
        let registry = registry();
        let found = resolve_target(&registry, &Target::parse("deploy.push")).unwrap();
        assert_eq!(found.callback, "deploy-push");
        assert!(resolve_target(&registry, &Target::parse(".clean")).is_ok());
    }
}
