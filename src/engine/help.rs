//! engine::help
//!
//! Help text rendered from registrations and setting definitions.

use crate::core::registry::VerbRegistration;
use crate::core::schema::{OptionDef, OptionKind, OptionSchema};
use crate::settings::{SettingDef, SettingValue};

/// Two-column rows, left column padded to the widest label.
fn columns(rows: &[(String, String)]) -> Vec<String> {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, text)| {
            if text.is_empty() {
                format!("  {}", label)
            } else {
                format!("  {:<width$}  {}", label, text, width = width)
            }
        })
        .collect()
}

/// One usage fragment for an option.
fn usage_fragment(def: &OptionDef) -> String {
    match def.kind {
        OptionKind::Toggle => format!("[{}]", def.key),
        OptionKind::ValueKeyed if def.choices.is_empty() => format!("[{} VALUE]", def.key),
        OptionKind::ValueKeyed => format!("[{} {}]", def.key, def.choices.join("|")),
        OptionKind::Positional if def.multiple => format!("[{}...]", def.key.to_uppercase()),
        OptionKind::Positional => format!("[{}]", def.key.to_uppercase()),
    }
}

/// Usage line for a verb.
pub fn usage(program: &str, verb: &str, schema: &OptionSchema) -> String {
    let mut parts = vec![format!("usage: {} {}", program, verb)];
    parts.extend(schema.iter().map(usage_fragment));
    parts.join(" ")
}

fn option_row(def: &OptionDef) -> (String, String) {
    let label = match def.kind {
        OptionKind::ValueKeyed => format!("{} VALUE", def.key),
        OptionKind::Positional => def.key.to_uppercase(),
        OptionKind::Toggle => def.key.clone(),
    };

    let mut notes = Vec::new();
    if !def.choices.is_empty() {
        notes.push(format!("choices: {}", def.choices.join(", ")));
    }
    if let Some(default) = &def.default {
        notes.push(format!("default: {}", default));
    }
    let text = match (def.description.is_empty(), notes.is_empty()) {
        (_, true) => def.description.clone(),
        (true, false) => format!("({})", notes.join("; ")),
        (false, false) => format!("{} ({})", def.description, notes.join("; ")),
    };
    (label, text)
}

/// Full help for one verb.
pub fn verb_help<H>(program: &str, reg: &VerbRegistration<H>) -> String {
    let verb = reg.verb.to_string();
    let mut lines = vec![usage(program, &verb, &reg.schema)];

    let about = if reg.description.is_empty() {
        &reg.summary
    } else {
        &reg.description
    };
    if !about.is_empty() {
        lines.push(String::new());
        lines.push(about.clone());
    }

    if !reg.schema.is_empty() {
        lines.push(String::new());
        lines.push("options:".to_string());
        let rows: Vec<(String, String)> = reg.schema.iter().map(option_row).collect();
        lines.extend(columns(&rows));
    }

    if !reg.examples.is_empty() {
        lines.push(String::new());
        lines.push("examples:".to_string());
        for (command, explanation) in &reg.examples {
            lines.push(format!("  {}", command));
            if !explanation.is_empty() {
                lines.push(format!("      {}", explanation));
            }
        }
    }

    lines.join("\n")
}

/// One-line description of a setting, with its allowed values.
fn setting_summary(def: &SettingDef) -> String {
    if def.choices.is_empty() {
        def.description.clone()
    } else if def.description.is_empty() {
        format!("({})", def.choices.join(", "))
    } else {
        format!("{} ({})", def.description, def.choices.join(", "))
    }
}

/// Full help for one setting.
pub fn setting_help(def: &SettingDef, current: &SettingValue) -> String {
    let mut rows = vec![
        ("type".to_string(), def.default.type_name().to_string()),
        ("value".to_string(), current.to_string()),
        ("default".to_string(), def.default.to_string()),
    ];
    if !def.choices.is_empty() {
        rows.push(("choices".to_string(), def.choices.join(", ")));
    }

    let mut lines = vec![format!("setting {}", def.key())];
    if !def.description.is_empty() {
        lines.push(String::new());
        lines.push(def.description.clone());
    }
    lines.push(String::new());
    lines.extend(columns(&rows));
    lines.join("\n")
}

/// Overview: usage, description, verbs, and settings.
pub fn overview<'a, H: 'a>(
    program: &str,
    about: &str,
    verbs: impl IntoIterator<Item = &'a VerbRegistration<H>>,
    settings: impl IntoIterator<Item = &'a SettingDef>,
) -> String {
    let mut lines = vec![format!("usage: {} [CONTEXT.]VERB [OPTIONS...]", program)];
    if !about.is_empty() {
        lines.push(String::new());
        lines.push(about.to_string());
    }

    let verb_rows: Vec<(String, String)> = verbs
        .into_iter()
        .map(|reg| (reg.verb.to_string(), reg.summary.clone()))
        .collect();
    if !verb_rows.is_empty() {
        lines.push(String::new());
        lines.push("verbs:".to_string());
        lines.extend(columns(&verb_rows));
    }

    let setting_rows: Vec<(String, String)> = settings
        .into_iter()
        .map(|def| (def.key(), setting_summary(def)))
        .collect();
    if !setting_rows.is_empty() {
        lines.push(String::new());
        lines.push("settings:".to_string());
        lines.extend(columns(&setting_rows));
    }

    lines.push(String::new());
    lines.push(format!(
        "Run '{} help VERB' or '{} help SETTING' for details.",
        program, program
    ));
    lines.join("\n")
}
