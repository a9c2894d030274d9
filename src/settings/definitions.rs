//! settings::definitions
//!
//! Registered setting definitions and the value edits the built-in
//! `set`/`add`/`remove` verbs perform.
//!
//! # Shapes
//!
//! A setting's shape (text, list, or map) is fixed by its default value.
//! Stored values of another shape are reported, never coerced.
//!
//! # Protected settings
//!
//! Names starting with `_` are protected: they never appear in listings and
//! user-facing lookups treat them as unknown. Verbs may still read and write
//! them through [`SettingRegistry::lookup`].

use std::collections::BTreeMap;

use crate::core::naming::{Lookup, QualifiedIndex, Target};
use crate::core::types::{check_setting_name, ContextName, TypeError};

use super::traits::{SettingsError, SettingsStore};
use super::value::SettingValue;

/// A registered setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDef {
    pub context: ContextName,
    pub name: String,
    pub description: String,
    /// Allowed values. Empty means unrestricted. For map settings the
    /// choices constrain the value half of each `key:value` pair.
    pub choices: Vec<String>,
    pub default: SettingValue,
}

impl SettingDef {
    /// Create a setting definition.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidSettingName`] for a malformed name.
    pub fn new(
        context: ContextName,
        name: impl Into<String>,
        default: SettingValue,
    ) -> Result<Self, TypeError> {
        let name = name.into();
        check_setting_name(&name)?;
        Ok(Self {
            context,
            name,
            description: String::new(),
            choices: Vec::new(),
            default,
        })
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
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

    /// The `context.name` store key.
    pub fn key(&self) -> String {
        format!("{}.{}", self.context, self.name)
    }

    pub fn is_protected(&self) -> bool {
        self.name.starts_with('_')
    }

    fn check_choice(&self, value: &str) -> Result<(), SettingsError> {
        if self.choices.is_empty() || self.choices.iter().any(|c| c == value) {
            return Ok(());
        }
        Err(SettingsError::invalid_value(
            self.key(),
            format!(
                "unsupported value {}. Choose between {}",
                value,
                self.choices.join(", ")
            ),
        ))
    }

    /// Build the value `set SETTING VALUE...` stores.
    ///
    /// Text settings take exactly one value, list settings take all values,
    /// map settings take `key:value` pairs.
    pub fn assign(&self, values: &[String]) -> Result<SettingValue, SettingsError> {
        match &self.default {
            SettingValue::Text(_) => match values {
                [value] => {
                    self.check_choice(value)?;
                    Ok(SettingValue::Text(value.clone()))
                }
                _ => Err(SettingsError::invalid_value(
                    self.key(),
                    format!("expected exactly one value, got {}", values.len()),
                )),
            },
            SettingValue::List(_) => {
                for value in values {
                    self.check_choice(value)?;
                }
                Ok(SettingValue::List(values.to_vec()))
            }
            SettingValue::Map(_) => Ok(SettingValue::Map(self.parse_pairs(values)?)),
        }
    }

    /// Append list items or insert map pairs.
    ///
    /// # Errors
    ///
    /// [`SettingsError::NotACollection`] for text settings.
    pub fn add(
        &self,
        current: SettingValue,
        values: &[String],
    ) -> Result<SettingValue, SettingsError> {
        match current {
            SettingValue::List(mut items) => {
                for value in values {
                    self.check_choice(value)?;
                }
                items.extend(values.iter().cloned());
                Ok(SettingValue::List(items))
            }
            SettingValue::Map(mut map) => {
                map.extend(self.parse_pairs(values)?);
                Ok(SettingValue::Map(map))
            }
            SettingValue::Text(_) => Err(SettingsError::NotACollection(self.key())),
        }
    }

    /// Remove list items or map keys. Absent entries are ignored.
    pub fn remove(
        &self,
        current: SettingValue,
        values: &[String],
    ) -> Result<SettingValue, SettingsError> {
        match current {
            SettingValue::List(mut items) => {
                for value in values {
                    if let Some(pos) = items.iter().position(|i| i == value) {
                        items.remove(pos);
                    }
                }
                Ok(SettingValue::List(items))
            }
            SettingValue::Map(mut map) => {
                for value in values {
                    map.remove(value);
                }
                Ok(SettingValue::Map(map))
            }
            SettingValue::Text(_) => Err(SettingsError::NotACollection(self.key())),
        }
    }

    fn parse_pairs(&self, values: &[String]) -> Result<BTreeMap<String, String>, SettingsError> {
        let invalid: Vec<&str> = values
            .iter()
            .filter(|v| !v.contains(':'))
            .map(String::as_str)
            .collect();
        if !invalid.is_empty() {
            return Err(SettingsError::invalid_value(
                self.key(),
                format!(
                    "invalid values {}. Values must be in the form of key:value",
                    invalid.join(", ")
                ),
            ));
        }

        let mut pairs = BTreeMap::new();
        for value in values {
            if let Some((k, v)) = value.split_once(':') {
                self.check_choice(v)?;
                pairs.insert(k.to_string(), v.to_string());
            }
        }
        Ok(pairs)
    }
}

/// All registered settings.
#[derive(Debug, Clone, Default)]
pub struct SettingRegistry {
    settings: QualifiedIndex<SettingDef>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a setting.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::DuplicateSetting`] if `context.name` is taken
    /// - [`SettingsError::InvalidValue`] if a text default is outside the choices
    pub fn register(&mut self, def: SettingDef) -> Result<(), SettingsError> {
        let context = def.context.to_string();
        if self.settings.contains(Some(context.as_str()), &def.name) {
            return Err(SettingsError::DuplicateSetting(def.key()));
        }
        if let SettingValue::Text(default) = &def.default {
            def.check_choice(default)?;
        }
        let name = def.name.clone();
        self.settings.insert(Some(context.as_str()), &name, def);
        Ok(())
    }

    /// Resolve `[context.]name`, protected settings included.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::UnknownSetting`] if nothing matches
    /// - [`SettingsError::AmbiguousSetting`] if a bare name has several owners
    pub fn lookup(&self, token: &str) -> Result<&SettingDef, SettingsError> {
        match self.settings.lookup(&Target::parse(token)) {
            Lookup::Found(def) => Ok(def),
            Lookup::Ambiguous(defs) => Err(SettingsError::AmbiguousSetting(
                defs.into_iter().map(SettingDef::key).collect(),
            )),
            Lookup::Missing => Err(SettingsError::UnknownSetting(token.to_string())),
        }
    }

    /// Resolve `[context.]name` for user-facing verbs, hiding protected
    /// settings.
    pub fn lookup_visible(&self, token: &str) -> Result<&SettingDef, SettingsError> {
        if Target::parse(token).name.starts_with('_') {
            return Err(SettingsError::UnknownSetting(token.to_string()));
        }
        self.lookup(token)
    }

    pub fn get(&self, context: &str, name: &str) -> Option<&SettingDef> {
        self.settings.get(Some(context), name)
    }

    /// Settings of one context, protected ones excluded.
    pub fn in_context(&self, context: &str) -> Vec<&SettingDef> {
        self.settings
            .in_context(context)
            .into_iter()
            .filter(|d| !d.is_protected())
            .collect()
    }

    pub fn has_context(&self, context: &str) -> bool {
        !self.settings.in_context(context).is_empty()
    }

    /// Every setting in registration order, protected ones excluded.
    pub fn visible(&self) -> impl Iterator<Item = &SettingDef> {
        self.settings.iter().filter(|d| !d.is_protected())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SettingDef> {
        self.settings.iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Current value of `def`: the stored value, else its default.
    pub fn value_of(
        &self,
        def: &SettingDef,
        store: &dyn SettingsStore,
    ) -> Result<SettingValue, SettingsError> {
        Ok(store.get(&def.key())?.unwrap_or_else(|| def.default.clone()))
    }

    /// Check stored entries against the registered settings.
    ///
    /// Returns one warning per problem: unknown contexts, unknown settings
    /// in known contexts, and values whose shape disagrees with the
    /// definition. `is_context` names contexts known elsewhere, such as
    /// verb contexts without settings of their own.
    pub fn audit(
        &self,
        entries: &BTreeMap<String, SettingValue>,
        is_context: impl Fn(&str) -> bool,
    ) -> Vec<String> {
        let mut unknown_contexts: Vec<&str> = Vec::new();
        let mut unknown_settings: Vec<&str> = Vec::new();
        let mut warnings = Vec::new();

        for (key, value) in entries {
            let (context, name) = key.split_once('.').unwrap_or(("", key.as_str()));
            match self.get(context, name) {
                Some(def) if def.default.type_name() != value.type_name() => {
                    warnings.push(format!(
                        "setting {} holds a {}, expected a {}",
                        key,
                        value.type_name(),
                        def.default.type_name()
                    ));
                }
                Some(_) => {}
                None if !self.has_context(context) && !is_context(context) => {
                    if !unknown_contexts.contains(&context) {
                        unknown_contexts.push(context);
                    }
                }
                None => unknown_settings.push(key),
            }
        }

        if !unknown_contexts.is_empty() {
            warnings.insert(
                0,
                format!("unknown contexts in settings file: {}", unknown_contexts.join(", ")),
            );
        }
        if !unknown_settings.is_empty() {
            warnings.push(format!(
                "unknown settings in settings file: {}",
                unknown_settings.join(", ")
            ));
        }
        warnings
    }
}
