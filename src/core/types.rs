//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ContextName`] - Namespace that disambiguates identically named verbs
//! - [`VerbName`] - Name of an addressable action
//! - [`VerbId`] - A verb's full identity: optional context plus name
//!
//! # Validation
//!
//! Names are validated at construction time. A name is non-empty, contains
//! no `.` (the context separator), no whitespace, and no control characters.
//!
//! # Examples
//!
//! ```
//! use lets::core::types::{ContextName, VerbId, VerbName};
//!
//! let id = VerbId::new(
//!     Some(ContextName::new("build").unwrap()),
//!     VerbName::new("push").unwrap(),
//! );
//! assert_eq!(id.to_string(), "build.push");
//!
//! assert!(VerbName::new("").is_err());
//! assert!(ContextName::new("a.b").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid context name: {0}")]
    InvalidContextName(String),

    #[error("invalid verb name: {0}")]
    InvalidVerbName(String),

    #[error("invalid setting name: {0}")]
    InvalidSettingName(String),
}

/// Check the shared identifier rules, returning a reason on failure.
fn identifier_violation(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("cannot be empty");
    }
    if name.contains('.') {
        return Some("cannot contain '.'");
    }
    if name.chars().any(char::is_whitespace) {
        return Some("cannot contain whitespace");
    }
    if name.chars().any(|c| c.is_control()) {
        return Some("cannot contain control characters");
    }
    None
}

/// Validate a setting name against the identifier rules.
///
/// Setting names share the verb name rules; a leading `_` marks the
/// setting as protected but is otherwise allowed.
pub fn check_setting_name(name: &str) -> Result<(), TypeError> {
    match identifier_violation(name) {
        Some(reason) => Err(TypeError::InvalidSettingName(format!("'{}' {}", name, reason))),
        None => Ok(()),
    }
}

/// A validated context name.
///
/// # Example
///
/// ```
/// use lets::core::types::ContextName;
///
/// let ctx = ContextName::new("deploy").unwrap();
/// assert_eq!(ctx.as_str(), "deploy");
///
/// assert!(ContextName::new("").is_err());
/// assert!(ContextName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContextName(String);

impl ContextName {
    /// Create a new validated context name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidContextName` if the name is empty or
    /// contains a `.`, whitespace, or control characters.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if let Some(reason) = identifier_violation(&name) {
            return Err(TypeError::InvalidContextName(format!(
                "'{}' {}",
                name, reason
            )));
        }
        Ok(Self(name))
    }

    /// Get the context name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContextName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ContextName> for String {
    fn from(name: ContextName) -> Self {
        name.0
    }
}

impl AsRef<str> for ContextName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContextName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated verb name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerbName(String);

impl VerbName {
    /// Create a new validated verb name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidVerbName` if the name is empty or
    /// contains a `.`, whitespace, or control characters.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if let Some(reason) = identifier_violation(&name) {
            return Err(TypeError::InvalidVerbName(format!("'{}' {}", name, reason)));
        }
        Ok(Self(name))
    }

    /// Get the verb name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VerbName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<VerbName> for String {
    fn from(name: VerbName) -> Self {
        name.0
    }
}

impl AsRef<str> for VerbName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VerbName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity of a verb: `(context?, name)`.
///
/// Displays as `context.name`, or just `name` for a context-less verb.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerbId {
    pub context: Option<ContextName>,
    pub name: VerbName,
}

impl VerbId {
    pub fn new(context: Option<ContextName>, name: VerbName) -> Self {
        Self { context, name }
    }

    /// Convenience constructor from raw strings.
    ///
    /// An empty `context` means a context-less verb.
    ///
    /// # Example
    ///
    /// ```
    /// use lets::core::types::VerbId;
    ///
    /// let id = VerbId::parse_parts("deploy", "push").unwrap();
    /// assert_eq!(id.to_string(), "deploy.push");
    ///
    /// let global = VerbId::parse_parts("", "push").unwrap();
    /// assert_eq!(global.to_string(), "push");
    /// ```
    pub fn parse_parts(context: &str, name: &str) -> Result<Self, TypeError> {
        let context = if context.is_empty() {
            None
        } else {
            Some(ContextName::new(context)?)
        };
        Ok(Self::new(context, VerbName::new(name)?))
    }

    /// The setting key holding the persisted default for option `key`.
    ///
    /// Settings are namespaced by context, so context-less verbs have none.
    pub fn setting_key(&self, key: &str) -> Option<String> {
        self.context.as_ref().map(|ctx| format!("{}.{}", ctx, key))
    }
}

impl std::fmt::Display for VerbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{}.{}", ctx, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
