//! settings::snapshot
//!
//! The persisted tier of the option merge.
//!
//! For a verb `ctx.verb` and a schema key `k`, the persisted value is the
//! setting `ctx.k`. Conversion into option values follows the option kind:
//!
//! | Option            | Text                   | List   | Map     |
//! |-------------------|------------------------|--------|---------|
//! | Toggle            | `on`/`off` and friends | skip   | skip    |
//! | ValueKeyed        | text                   | skip   | skip    |
//! | Positional        | text                   | skip   | skip    |
//! | Positional (many) | text                   | list   | skip    |
//!
//! Skipped values are logged at `warn`. A text value for a toggle that is
//! not a recognised flag word is an error, as is a keyed value outside the
//! option's declared choices.

use std::collections::BTreeMap;

use crate::core::schema::{OptionKind, OptionSchema, OptionValue};
use crate::core::types::VerbId;

use super::traits::SettingsError;
use super::value::{parse_flag, SettingValue};

/// Extract the persisted option values for `verb` from a settings snapshot.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidValue`] when a toggle's setting holds
/// text that is not a flag word, or a keyed option's setting holds a value
/// outside its choices.
pub fn persisted_options(
    verb: &VerbId,
    schema: &OptionSchema,
    entries: &BTreeMap<String, SettingValue>,
) -> Result<BTreeMap<String, OptionValue>, SettingsError> {
    let mut persisted = BTreeMap::new();

    for def in schema.iter() {
        let Some(setting_key) = verb.setting_key(&def.key) else {
            break;
        };
        let Some(stored) = entries.get(&setting_key) else {
            continue;
        };

        let value = match (def.kind, stored) {
            (OptionKind::Toggle, SettingValue::Text(text)) => match parse_flag(text) {
                Some(flag) => OptionValue::Flag(flag),
                None => {
                    return Err(SettingsError::invalid_value(
                        setting_key,
                        format!("'{}' is not on or off", text),
                    ))
                }
            },
            (OptionKind::ValueKeyed, SettingValue::Text(text))
                if !def.choices.is_empty() && !def.choices.contains(text) =>
            {
                return Err(SettingsError::invalid_value(
                    setting_key,
                    format!(
                        "unsupported value '{}'. Choose between {}",
                        text,
                        def.choices.join(", ")
                    ),
                ))
            }
            (OptionKind::ValueKeyed | OptionKind::Positional, SettingValue::Text(text)) => {
                OptionValue::Text(text.clone())
            }
            (OptionKind::Positional, SettingValue::List(items)) if def.multiple => {
                OptionValue::List(items.clone())
            }
            (kind, other) => {
                tracing::warn!(
                    setting = %setting_key,
                    found = other.type_name(),
                    %kind,
                    "setting cannot feed option, ignoring"
                );
                continue;
            }
        };
        persisted.insert(def.key.clone(), value);
    }

    Ok(persisted)
}
