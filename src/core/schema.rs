//! core::schema
//!
//! Option schemas and option values.
//!
//! # Overview
//!
//! A verb declares the options it accepts as an ordered [`OptionSchema`].
//! Each [`OptionDef`] is one of three kinds:
//!
//! - **Toggle**: the bare key switches a flag on (`clean`)
//! - **ValueKeyed**: the key is followed by its value (`flavor release`).
//!   When `choices` are declared, a bare choice word also binds the option
//!   (`release` alone means `flavor release`).
//! - **Positional**: an unkeyed value bound by its position among the
//!   tokens no key claimed. A `multiple` positional absorbs the rest.
//!
//! Most options may appear in any order. An `order_sensitive` option only
//! matches at its declared `position`.
//!
//! # Example
//!
//! ```
//! use lets::core::schema::{OptionDef, OptionSchema};
//!
//! let schema = OptionSchema::new(vec![
//!     OptionDef::positional("target").at(0),
//!     OptionDef::toggle("clean"),
//!     OptionDef::keyed("flavor")
//!         .with_choices(["debug", "release"])
//!         .with_default("debug"),
//! ])
//! .unwrap();
//!
//! assert_eq!(schema.len(), 3);
//! assert!(schema.get("flavor").is_some());
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Errors from schema validation.
///
/// These are programming errors in a verb's declaration and surface at
/// registration time, never during dispatch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("option key cannot be empty")]
    EmptyKey,

    #[error("option '{0}' is declared more than once")]
    DuplicateKey(String),

    #[error("order-sensitive option '{0}' has no position")]
    MissingPosition(String),

    #[error("option '{0}' has a position but is not order-sensitive")]
    UnexpectedPosition(String),

    #[error("options '{first}' and '{second}' both claim position {position}")]
    PositionConflict {
        first: String,
        second: String,
        position: usize,
    },

    #[error("option '{0}' declares choices but is not value-keyed")]
    ChoicesOnNonKeyed(String),

    #[error("option '{0}' is marked multiple but is not positional")]
    MultipleOnNonPositional(String),

    #[error("only one positional may be marked multiple ('{first}', '{second}')")]
    MultipleConflict { first: String, second: String },

    #[error("default '{default}' of option '{key}' is not one of its choices")]
    DefaultOutsideChoices { key: String, default: String },

    #[error("default of {kind} option '{key}' has the wrong shape")]
    DefaultKindMismatch { key: String, kind: OptionKind },
}

/// How an option is spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Toggle,
    ValueKeyed,
    Positional,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OptionKind::Toggle => "toggle",
            OptionKind::ValueKeyed => "value",
            OptionKind::Positional => "positional",
        };
        write!(f, "{}", s)
    }
}

/// A classified option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl OptionValue {
    pub fn text(value: impl Into<String>) -> Self {
        OptionValue::Text(value.into())
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            OptionValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Flag(b) => write!(f, "{}", b),
            OptionValue::Text(s) => write!(f, "{}", s),
            OptionValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

/// One declared option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    pub key: String,
    pub kind: OptionKind,
    pub order_sensitive: bool,
    /// Declared index. For keyed and toggle options this is the index in
    /// the raw option list; for positionals it is the index among the
    /// tokens no key claimed.
    pub position: Option<usize>,
    /// Positional only: absorb every remaining unclaimed token.
    pub multiple: bool,
    /// ValueKeyed only: accepted values, each usable as a bare word.
    pub choices: Vec<String>,
    pub default: Option<OptionValue>,
    pub description: String,
}

impl OptionDef {
    fn new(key: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            key: key.into(),
            kind,
            order_sensitive: false,
            position: None,
            multiple: false,
            choices: Vec::new(),
            default: None,
            description: String::new(),
        }
    }

    pub fn toggle(key: impl Into<String>) -> Self {
        Self::new(key, OptionKind::Toggle)
    }

    pub fn keyed(key: impl Into<String>) -> Self {
        Self::new(key, OptionKind::ValueKeyed)
    }

    pub fn positional(key: impl Into<String>) -> Self {
        Self::new(key, OptionKind::Positional)
    }

    /// Pin this option to a fixed position; marks it order-sensitive.
    pub fn at(mut self, position: usize) -> Self {
        self.order_sensitive = true;
        self.position = Some(position);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Text default for keyed and positional options.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(OptionValue::Text(value.into()));
        self
    }

    /// Default of any shape. A toggle takes a flag; a multiple positional
    /// may take a list.
    pub fn with_default_value(mut self, value: OptionValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check whether this option may match the token at raw index `index`.
    pub(crate) fn admits_index(&self, index: usize) -> bool {
        !self.order_sensitive || self.position == Some(index)
    }
}

/// An ordered, validated sequence of option definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSchema {
    defs: Vec<OptionDef>,
}

impl OptionSchema {
    /// Build a schema, validating its declarations.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] describing the first invalid declaration.
    pub fn new(defs: Vec<OptionDef>) -> Result<Self, SchemaError> {
        let schema = Self { defs };
        schema.validate()?;
        Ok(schema)
    }

    /// A schema accepting no options.
    pub fn empty() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), SchemaError> {
        // Keyed and toggle positions count raw tokens; positional ones count
        // the tokens left unclaimed, so the two never collide.
        let mut positions: BTreeMap<(bool, usize), &str> = BTreeMap::new();
        let mut multiple: Option<&str> = None;

        for (i, def) in self.defs.iter().enumerate() {
            if def.key.is_empty() {
                return Err(SchemaError::EmptyKey);
            }
            if self.defs[..i].iter().any(|d| d.key == def.key) {
                return Err(SchemaError::DuplicateKey(def.key.clone()));
            }

            match (def.order_sensitive, def.position) {
                (true, None) => return Err(SchemaError::MissingPosition(def.key.clone())),
                (false, Some(_)) => {
                    return Err(SchemaError::UnexpectedPosition(def.key.clone()))
                }
                (true, Some(position)) => {
                    let slot = (def.kind == OptionKind::Positional, position);
                    if let Some(first) = positions.insert(slot, def.key.as_str()) {
                        return Err(SchemaError::PositionConflict {
                            first: first.to_string(),
                            second: def.key.clone(),
                            position,
                        });
                    }
                }
                (false, None) => {}
            }

            if !def.choices.is_empty() && def.kind != OptionKind::ValueKeyed {
                return Err(SchemaError::ChoicesOnNonKeyed(def.key.clone()));
            }

            if def.multiple {
                if def.kind != OptionKind::Positional {
                    return Err(SchemaError::MultipleOnNonPositional(def.key.clone()));
                }
                if let Some(first) = multiple {
                    return Err(SchemaError::MultipleConflict {
                        first: first.to_string(),
                        second: def.key.clone(),
                    });
                }
                multiple = Some(def.key.as_str());
            }

            if let Some(default) = &def.default {
                let fits = match (def.kind, default) {
                    (OptionKind::Toggle, OptionValue::Flag(_)) => true,
                    (OptionKind::ValueKeyed, OptionValue::Text(_)) => true,
                    (OptionKind::Positional, OptionValue::Text(_)) => true,
                    (OptionKind::Positional, OptionValue::List(_)) => def.multiple,
                    _ => false,
                };
                if !fits {
                    return Err(SchemaError::DefaultKindMismatch {
                        key: def.key.clone(),
                        kind: def.kind,
                    });
                }
            }

            if let Some(OptionValue::Text(default)) = &def.default {
                if !def.choices.is_empty() && !def.choices.contains(default) {
                    return Err(SchemaError::DefaultOutsideChoices {
                        key: def.key.clone(),
                        default: default.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&OptionDef> {
        self.defs.iter().find(|d| d.key == key)
    }

    pub fn declares(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Check whether `token` is the key of a toggle or keyed option.
    pub(crate) fn is_key(&self, token: &str) -> bool {
        self.defs
            .iter()
            .any(|d| d.kind != OptionKind::Positional && d.key == token)
    }
}

/// The final option mapping handed to a verb callback.
///
/// An absent key means "unset"; the callback decides what that implies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionBag(BTreeMap<String, OptionValue>);

impl OptionBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// True only when the key is present and set to a true flag.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(OptionValue::as_flag).unwrap_or(false)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_text)
    }

    /// List values; a single text value reads as a one-element list.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(OptionValue::List(items)) => items.clone(),
            Some(OptionValue::Text(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, OptionValue)> for OptionBag {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod validation {
        use super::*;

        #[test]
        fn accepts_typical_schema() {
            let schema = OptionSchema::new(vec![
                OptionDef::positional("target").at(0),
                OptionDef::toggle("clean"),
                OptionDef::keyed("flavor").with_choices(["debug", "release"]),
                OptionDef::positional("extra").multiple(),
            ]);
            assert!(schema.is_ok());
        }

        #[test]
        fn empty_key() {
            let err = OptionSchema::new(vec![OptionDef::toggle("")]).unwrap_err();
            assert_eq!(err, SchemaError::EmptyKey);
        }

        #[test]
        fn duplicate_key() {
            let err = OptionSchema::new(vec![OptionDef::toggle("clean"), OptionDef::keyed("clean")])
                .unwrap_err();
            assert_eq!(err, SchemaError::DuplicateKey("clean".into()));
        }

        #[test]
        fn order_sensitive_needs_position() {
            let mut def = OptionDef::toggle("clean");
            def.order_sensitive = true;
            let err = OptionSchema::new(vec![def]).unwrap_err();
            assert_eq!(err, SchemaError::MissingPosition("clean".into()));
        }

        #[test]
        fn position_needs_order_sensitivity() {
            let mut def = OptionDef::toggle("clean");
            def.position = Some(1);
            let err = OptionSchema::new(vec![def]).unwrap_err();
            assert_eq!(err, SchemaError::UnexpectedPosition("clean".into()));
        }

        #[test]
        fn only_one_order_sensitive_first_slot() {
            let err = OptionSchema::new(vec![
                OptionDef::positional("target").at(0),
                OptionDef::positional("other").at(0),
            ])
            .unwrap_err();
            assert_eq!(
                err,
                SchemaError::PositionConflict {
                    first: "target".into(),
                    second: "other".into(),
                    position: 0,
                }
            );
        }

        #[test]
        fn choices_only_on_keyed() {
            let err = OptionSchema::new(vec![OptionDef::toggle("x").with_choices(["a"])])
                .unwrap_err();
            assert_eq!(err, SchemaError::ChoicesOnNonKeyed("x".into()));
        }

        #[test]
        fn multiple_only_on_positional() {
            let err = OptionSchema::new(vec![OptionDef::keyed("x").multiple()]).unwrap_err();
            assert_eq!(err, SchemaError::MultipleOnNonPositional("x".into()));
        }

        #[test]
        fn at_most_one_multiple() {
            let err = OptionSchema::new(vec![
                OptionDef::positional("a").multiple(),
                OptionDef::positional("b").multiple(),
            ])
            .unwrap_err();
            assert!(matches!(err, SchemaError::MultipleConflict { .. }));
        }

        #[test]
        fn default_must_be_a_choice() {
            let err = OptionSchema::new(vec![OptionDef::keyed("flavor")
                .with_choices(["debug", "release"])
                .with_default("fast")])
            .unwrap_err();
            assert!(err.to_string().contains("fast"));
        }

        #[test]
        fn toggle_and_positional_may_share_an_index() {
            let schema = OptionSchema::new(vec![
                OptionDef::toggle("clean").at(1),
                OptionDef::positional("dst").at(1),
            ]);
            assert!(schema.is_ok());

            let err = OptionSchema::new(vec![
                OptionDef::toggle("clean").at(1),
                OptionDef::keyed("flavor").at(1),
            ])
            .unwrap_err();
            assert!(matches!(err, SchemaError::PositionConflict { position: 1, .. }));
        }

        #[test]
        fn default_shape_follows_kind() {
            let ok = OptionSchema::new(vec![
                OptionDef::toggle("clean").with_default_value(OptionValue::Flag(true)),
                OptionDef::keyed("flavor").with_default_value(OptionValue::text("debug")),
                OptionDef::positional("files")
                    .multiple()
                    .with_default_value(OptionValue::List(vec!["a".into(), "b".into()])),
            ]);
            assert!(ok.is_ok());

            let err = OptionSchema::new(vec![OptionDef::toggle("x").with_default("y")])
                .unwrap_err();
            assert_eq!(
                err,
                SchemaError::DefaultKindMismatch {
                    key: "x".into(),
                    kind: OptionKind::Toggle,
                }
            );

            let err = OptionSchema::new(vec![
                OptionDef::keyed("flavor").with_default_value(OptionValue::Flag(false))
            ])
            .unwrap_err();
            assert!(matches!(err, SchemaError::DefaultKindMismatch { .. }));

            let err = OptionSchema::new(vec![OptionDef::positional("dst")
                .at(0)
                .with_default_value(OptionValue::List(vec!["a".into()]))])
            .unwrap_err();
            assert!(matches!(err, SchemaError::DefaultKindMismatch { .. }));
        }
    }

    mod bag {
        use super::*;

        #[test]
        fn typed_accessors() {
            let mut bag = OptionBag::new();
            bag.insert("clean", OptionValue::Flag(true));
            bag.insert("flavor", OptionValue::text("release"));
            bag.insert("files", OptionValue::List(vec!["a".into(), "b".into()]));

            assert!(bag.flag("clean"));
            assert!(!bag.flag("flavor"));
            assert!(!bag.flag("missing"));
            assert_eq!(bag.text("flavor"), Some("release"));
            assert_eq!(bag.list("files"), vec!["a", "b"]);
            assert_eq!(bag.list("flavor"), vec!["release"]);
            assert!(bag.list("missing").is_empty());
        }

        #[test]
        fn serializes_as_plain_object() {
            let bag: OptionBag = [
                ("clean".to_string(), OptionValue::Flag(true)),
                ("flavor".to_string(), OptionValue::text("debug")),
            ]
            .into_iter()
            .collect();
            let json = serde_json::to_string(&bag).unwrap();
            assert_eq!(json, r#"{"clean":true,"flavor":"debug"}"#);
        }

        #[test]
        fn value_display() {
            assert_eq!(OptionValue::Flag(true).to_string(), "true");
            assert_eq!(OptionValue::text("x").to_string(), "x");
            assert_eq!(
                OptionValue::List(vec!["a".into(), "b".into()]).to_string(),
                "a, b"
            );
        }
    }
}
