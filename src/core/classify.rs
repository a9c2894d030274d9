//! core::classify
//!
//! Option token classification.
//!
//! # Algorithm
//!
//! A single left-to-right pass over the raw option tokens. Each token is
//! tried against the schema in this order:
//!
//! 1. The key of a value-keyed option. The following token is consumed as
//!    its value unless it is itself a recognised key.
//! 2. The key of a toggle, recorded as `true`.
//! 3. A declared choice of a value-keyed option, bound to that option.
//! 4. A positional slot, chosen by the token's index among the tokens no
//!    key claimed: the order-sensitive slot declared at that index first,
//!    otherwise the next free positional in declaration order. Once a
//!    `multiple` slot is reached it absorbs every later unclaimed token.
//!
//! A token matching none of these fails the whole classification.
//! Order-sensitive keyed and toggle options only match at their declared
//! index in the raw list.
//!
//! # Invariants
//!
//! - Classification is a pure function of `(raw_options, schema)`
//! - A later occurrence of the same key overwrites an earlier one

use std::collections::HashSet;

use thiserror::Error;

use super::schema::{OptionBag, OptionDef, OptionKind, OptionSchema, OptionValue};

/// Errors from option classification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("unrecognized option: {0}")]
    UnrecognizedOption(String),

    #[error("option '{0}' expects a value")]
    MissingValue(String),

    #[error("unsupported value '{value}' for '{key}'. Choose between {}", .choices.join(", "))]
    InvalidChoice {
        key: String,
        value: String,
        choices: Vec<String>,
    },
}

impl ClassifyError {
    /// The user-supplied token this error is about.
    pub fn token(&self) -> &str {
        match self {
            ClassifyError::UnrecognizedOption(token) => token,
            ClassifyError::MissingValue(key) => key,
            ClassifyError::InvalidChoice { value, .. } => value,
        }
    }
}

/// Tracks which positional slots are filled during one pass.
struct Positionals<'s> {
    slots: Vec<&'s OptionDef>,
    drained: HashSet<&'s str>,
    absorbing: Option<(&'s OptionDef, Vec<String>)>,
}

impl<'s> Positionals<'s> {
    fn new(schema: &'s OptionSchema) -> Self {
        Self {
            slots: schema
                .iter()
                .filter(|d| d.kind == OptionKind::Positional)
                .collect(),
            drained: HashSet::new(),
            absorbing: None,
        }
    }

    /// Bind the unclaimed token at `index`, returning false when no slot
    /// can take it.
    fn bind(&mut self, index: usize, token: &str, bag: &mut OptionBag) -> bool {
        if let Some((_, items)) = self.absorbing.as_mut() {
            items.push(token.to_string());
            return true;
        }

        let slot = self
            .slots
            .iter()
            .copied()
            .find(|d| {
                d.order_sensitive && d.position == Some(index) && !self.drained.contains(d.key.as_str())
            })
            .or_else(|| {
                self.slots
                    .iter()
                    .copied()
                    .find(|d| !d.order_sensitive && !self.drained.contains(d.key.as_str()))
            });

        let Some(slot) = slot else {
            return false;
        };

        self.drained.insert(slot.key.as_str());
        if slot.multiple {
            self.absorbing = Some((slot, vec![token.to_string()]));
        } else {
            bag.insert(slot.key.clone(), OptionValue::text(token));
        }
        true
    }

    fn finish(self, bag: &mut OptionBag) {
        if let Some((slot, items)) = self.absorbing {
            bag.insert(slot.key.clone(), OptionValue::List(items));
        }
    }
}

/// Classify raw option tokens against a schema.
///
/// # Errors
///
/// - [`ClassifyError::UnrecognizedOption`] when a token matches no schema entry
/// - [`ClassifyError::MissingValue`] when a keyed option has no value
/// - [`ClassifyError::InvalidChoice`] when a keyed value is not a declared choice
///
/// # Example
///
/// ```
/// use lets::core::classify::classify;
/// use lets::core::schema::{OptionDef, OptionSchema, OptionValue};
///
/// let schema = OptionSchema::new(vec![
///     OptionDef::toggle("clean"),
///     OptionDef::keyed("flavor"),
/// ])
/// .unwrap();
///
/// let raw = vec!["flavor".to_string(), "release".to_string(), "clean".to_string()];
/// let bag = classify(&raw, &schema).unwrap();
/// assert_eq!(bag.text("flavor"), Some("release"));
/// assert!(bag.flag("clean"));
/// ```
pub fn classify(raw_options: &[String], schema: &OptionSchema) -> Result<OptionBag, ClassifyError> {
    let mut bag = OptionBag::new();
    let mut positionals = Positionals::new(schema);
    let mut unclaimed = 0usize;
    let mut i = 0usize;

    while i < raw_options.len() {
        let token = raw_options[i].as_str();

        if let Some(def) = find(schema, i, |d| {
            d.kind == OptionKind::ValueKeyed && d.key == token
        }) {
            let value = match raw_options.get(i + 1) {
                Some(next) if !schema.is_key(next) => next,
                _ => return Err(ClassifyError::MissingValue(token.to_string())),
            };
            check_choice(def, value)?;
            bag.insert(def.key.clone(), OptionValue::text(value.as_str()));
            i += 2;
            continue;
        }

        if let Some(def) = find(schema, i, |d| d.kind == OptionKind::Toggle && d.key == token) {
            bag.insert(def.key.clone(), OptionValue::Flag(true));
            i += 1;
            continue;
        }

        if let Some(def) = find(schema, i, |d| {
            d.kind == OptionKind::ValueKeyed && d.choices.iter().any(|c| c == token)
        }) {
            bag.insert(def.key.clone(), OptionValue::text(token));
            i += 1;
            continue;
        }

        if !positionals.bind(unclaimed, token, &mut bag) {
            return Err(ClassifyError::UnrecognizedOption(token.to_string()));
        }
        unclaimed += 1;
        i += 1;
    }

    positionals.finish(&mut bag);
    Ok(bag)
}

fn find<'s>(
    schema: &'s OptionSchema,
    index: usize,
    pred: impl Fn(&OptionDef) -> bool,
) -> Option<&'s OptionDef> {
    schema.iter().find(|d| d.admits_index(index) && pred(d))
}

fn check_choice(def: &OptionDef, value: &str) -> Result<(), ClassifyError> {
    if def.choices.is_empty() || def.choices.iter().any(|c| c == value) {
        Ok(())
    } else {
        Err(ClassifyError::InvalidChoice {
            key: def.key.clone(),
            value: value.to_string(),
            choices: def.choices.clone(),
        })
    }
}
