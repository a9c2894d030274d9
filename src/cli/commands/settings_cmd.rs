//! settings verbs - get, set, add, remove

use std::collections::BTreeMap;

use crate::core::naming::Target;
use crate::engine::{CallbackError, VerbCall};
use crate::settings::{SettingDef, SettingValue, SettingsError};
use crate::ui::output::format_aligned;

/// Settings named by `token`: every setting of a context, one qualified
/// setting, or every owner of a bare name.
fn matching<'d>(call: &VerbCall<'d>, token: &str) -> Result<Vec<&'d SettingDef>, SettingsError> {
    let settings = call.dispatcher.settings();
    if settings.has_context(token) {
        return Ok(settings.in_context(token));
    }

    let target = Target::parse(token);
    let found: Vec<&SettingDef> = match &target.context {
        Some(_) => settings.lookup_visible(token).into_iter().collect(),
        None => settings
            .visible()
            .filter(|def| def.name == target.name)
            .collect(),
    };
    if found.is_empty() {
        return Err(SettingsError::UnknownSetting(token.to_string()));
    }
    Ok(found)
}

/// Print setting values.
pub(super) fn get(call: &mut VerbCall<'_>) -> Result<i32, CallbackError> {
    let settings = call.dispatcher.settings();
    let names = call.options.list("names");

    let defs: Vec<&SettingDef> = if names.is_empty() {
        settings.visible().collect()
    } else {
        let mut defs: Vec<&SettingDef> = Vec::new();
        for name in &names {
            for def in matching(call, name)? {
                if !defs.iter().any(|d| d.key() == def.key()) {
                    defs.push(def);
                }
            }
        }
        defs
    };

    let mut values = Vec::with_capacity(defs.len());
    for def in defs {
        values.push((def.key(), settings.value_of(def, call.store)?));
    }

    if call.options.flag("json") {
        let object: BTreeMap<String, SettingValue> = values.into_iter().collect();
        let json = serde_json::to_string_pretty(&object)
            .map_err(|e| CallbackError::failed(format!("cannot render JSON: {}", e)))?;
        call.console.print(json);
    } else if !values.is_empty() {
        let rows: Vec<(String, String)> = values
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        call.console.print(format_aligned(&rows));
    }
    Ok(0)
}

/// The setting and values every editing verb needs.
fn edit_args<'d>(
    call: &VerbCall<'d>,
    verb: &str,
) -> Result<(&'d SettingDef, Vec<String>), CallbackError> {
    let usage = || CallbackError::usage(format!("usage: lets {} SETTING VALUE...", verb));
    let token = call.options.text("setting").ok_or_else(usage)?;
    let values = call.options.list("values");
    if values.is_empty() {
        return Err(usage());
    }
    let def = call.dispatcher.settings().lookup_visible(token)?;
    Ok((def, values))
}

fn store(call: &mut VerbCall<'_>, def: &SettingDef, value: SettingValue) -> Result<i32, CallbackError> {
    let key = def.key();
    call.console.verbose(format!("{} = {}", key, value));
    call.set_setting(&key, value)?;
    Ok(0)
}

/// Assign a setting.
pub(super) fn set(call: &mut VerbCall<'_>) -> Result<i32, CallbackError> {
    let (def, values) = edit_args(call, "set")?;
    let value = def.assign(&values)?;
    store(call, def, value)
}

/// Append to a list or map setting.
pub(super) fn add(call: &mut VerbCall<'_>) -> Result<i32, CallbackError> {
    let (def, values) = edit_args(call, "add")?;
    let current = call.dispatcher.settings().value_of(def, call.store)?;
    let value = def.add(current, &values)?;
    store(call, def, value)
}

/// Remove from a list or map setting.
pub(super) fn remove(call: &mut VerbCall<'_>) -> Result<i32, CallbackError> {
    let (def, values) = edit_args(call, "remove")?;
    let current = call.dispatcher.settings().value_of(def, call.store)?;
    let value = def.remove(current, &values)?;
    store(call, def, value)
}
