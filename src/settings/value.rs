//! settings::value
//!
//! Persisted setting values.
//!
//! A setting holds text, a list of strings, or a string-to-string map.
//! The shape is inferred when reading the settings file; native TOML
//! scalars (`true`, `4`) are read as their text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A persisted setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl SettingValue {
    pub fn text(value: impl Into<String>) -> Self {
        SettingValue::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SettingValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a value read from the settings file.
    ///
    /// Strings, numbers, booleans and dates read as text; arrays of those
    /// as lists; tables of those as maps. Anything nested deeper has no
    /// setting shape and yields `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use lets::settings::SettingValue;
    ///
    /// let value = toml::Value::Boolean(true);
    /// assert_eq!(SettingValue::from_toml(&value), Some(SettingValue::text("true")));
    /// ```
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Option<Vec<_>>>()
                .map(SettingValue::List),
            toml::Value::Table(table) => table
                .iter()
                .map(|(k, v)| scalar_text(v).map(|v| (k.clone(), v)))
                .collect::<Option<BTreeMap<_, _>>>()
                .map(SettingValue::Map),
            scalar => scalar_text(scalar).map(SettingValue::Text),
        }
    }

    /// Human-readable type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Text(_) => "String",
            SettingValue::List(_) => "List",
            SettingValue::Map(_) => "Dictionary",
        }
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValue::Text(s) => write!(f, "{}", s),
            SettingValue::List(items) => write!(f, "{}", items.join(", ")),
            SettingValue::Map(map) => {
                let pairs: Vec<String> = map.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
                write!(f, "{}", pairs.join(", "))
            }
        }
    }
}

fn scalar_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Interpret a persisted text value as a toggle.
///
/// # Example
///
/// ```
/// use lets::settings::value::parse_flag;
///
/// assert_eq!(parse_flag("on"), Some(true));
/// assert_eq!(parse_flag("No"), Some(false));
/// assert_eq!(parse_flag("maybe"), None);
/// ```
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
