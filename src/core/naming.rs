//! core::naming
//!
//! Qualified naming rules: the `[CONTEXT].[NAME]` target grammar and the
//! two-tier index used to look up verbs and settings.
//!
//! # Lookup Policy
//!
//! - An explicit context resolves exactly or not at all. There is no
//!   fallback to a name-only search.
//! - A bare name resolves only when exactly one entry owns that name
//!   across all contexts. Otherwise every owner is reported.
//!
//! # Example
//!
//! ```
//! use lets::core::naming::{Lookup, QualifiedIndex, Target};
//!
//! let mut index = QualifiedIndex::new();
//! index.insert(Some("build"), "push", 1);
//! index.insert(Some("deploy"), "push", 2);
//! index.insert(Some("build"), "clean", 3);
//!
//! assert!(matches!(index.lookup(&Target::parse("clean")), Lookup::Found(3)));
//! assert!(matches!(index.lookup(&Target::parse("deploy.push")), Lookup::Found(2)));
//! assert!(matches!(index.lookup(&Target::parse("push")), Lookup::Ambiguous(_)));
//! assert!(matches!(index.lookup(&Target::parse("ship")), Lookup::Missing));
//! ```

/// A parsed `[CONTEXT].[NAME]` token.
///
/// The first `.` separates context from name. An empty context (`.name`)
/// is the same as no context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub context: Option<String>,
    pub name: String,
}

impl Target {
    /// Split a raw token into context and name.
    ///
    /// # Example
    ///
    /// ```
    /// use lets::core::naming::Target;
    ///
    /// let t = Target::parse("build.push");
    /// assert_eq!(t.context.as_deref(), Some("build"));
    /// assert_eq!(t.name, "push");
    ///
    /// let t = Target::parse(".push");
    /// assert_eq!(t.context, None);
    /// ```
    pub fn parse(token: &str) -> Self {
        match token.split_once('.') {
            Some((context, name)) => Self {
                context: (!context.is_empty()).then(|| context.to_string()),
                name: name.to_string(),
            },
            None => Self {
                context: None,
                name: token.to_string(),
            },
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            context: None,
            name: name.into(),
        }
    }

    pub fn qualified(context: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{}.{}", ctx, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Outcome of a two-tier lookup.
#[derive(Debug)]
pub enum Lookup<'a, T> {
    /// Exactly one entry matched.
    Found(&'a T),
    /// A bare name matched entries in several contexts, in insertion order.
    Ambiguous(Vec<&'a T>),
    /// Nothing matched.
    Missing,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    context: Option<String>,
    name: String,
    value: T,
}

/// Insertion-ordered index keyed by `(context?, name)`.
///
/// The index itself does not reject duplicates; owners check
/// [`QualifiedIndex::contains`] first and raise their own error.
#[derive(Debug, Clone)]
pub struct QualifiedIndex<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for QualifiedIndex<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> QualifiedIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an entry exists for the exact `(context, name)` pair.
    pub fn contains(&self, context: Option<&str>, name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.context.as_deref() == context && e.name == name)
    }

    /// Append an entry.
    pub fn insert(&mut self, context: Option<&str>, name: &str, value: T) {
        self.entries.push(Entry {
            context: context.map(str::to_string),
            name: name.to_string(),
            value,
        });
    }

    /// Exact lookup by `(context, name)`.
    pub fn get(&self, context: Option<&str>, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| e.context.as_deref() == context && e.name == name)
            .map(|e| &e.value)
    }

    /// All entries owning `name`, across every context, in insertion order.
    pub fn by_name(&self, name: &str) -> Vec<&T> {
        self.entries
            .iter()
            .filter(|e| e.name == name)
            .map(|e| &e.value)
            .collect()
    }

    /// All entries registered under `context`, in insertion order.
    pub fn in_context(&self, context: &str) -> Vec<&T> {
        self.entries
            .iter()
            .filter(|e| e.context.as_deref() == Some(context))
            .map(|e| &e.value)
            .collect()
    }

    /// Resolve a target with the two-tier policy.
    pub fn lookup(&self, target: &Target) -> Lookup<'_, T> {
        if let Some(context) = &target.context {
            return match self.get(Some(context), &target.name) {
                Some(value) => Lookup::Found(value),
                None => Lookup::Missing,
            };
        }

        let mut matches = self.by_name(&target.name);
        match matches.len() {
            0 => Lookup::Missing,
            1 => Lookup::Found(matches.remove(0)),
            _ => Lookup::Ambiguous(matches),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
