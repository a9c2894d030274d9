//! help verb - Overview, or help for verbs, settings, and contexts

use crate::core::naming::Target;
use crate::core::resolve::{resolve_target, ResolveError};
use crate::engine::help::{overview, setting_help, verb_help};
use crate::engine::{CallbackError, VerbCall};
use crate::settings::SettingsError;
use crate::ui::output::format_list;

pub(super) fn help(call: &mut VerbCall<'_>) -> Result<i32, CallbackError> {
    let dispatcher = call.dispatcher;
    let targets = call.options.list("targets");

    if targets.is_empty() {
        let text = overview(
            dispatcher.program(),
            dispatcher.about(),
            dispatcher.registry().iter(),
            dispatcher.settings().visible(),
        );
        call.console.print(text);
        return Ok(0);
    }

    let mut sections = Vec::new();
    for token in &targets {
        sections.push(topic(call, token)?);
    }
    call.console.print(sections.join("\n\n"));
    Ok(0)
}

/// Help for one token: a context, a verb, or a setting, in that order.
fn topic(call: &VerbCall<'_>, token: &str) -> Result<String, CallbackError> {
    let dispatcher = call.dispatcher;

    if let Some(info) = dispatcher
        .registry()
        .contexts()
        .iter()
        .find(|c| c.name.as_str() == token)
    {
        let verbs: Vec<String> = dispatcher
            .registry()
            .iter()
            .filter(|reg| reg.verb.context.as_ref() == Some(&info.name))
            .map(|reg| reg.verb.to_string())
            .collect();
        let settings: Vec<String> = dispatcher
            .settings()
            .in_context(token)
            .into_iter()
            .map(|def| def.key())
            .collect();

        let mut lines = vec![format!("context {}", info.name)];
        if !info.description.is_empty() {
            lines.push(String::new());
            lines.push(info.description.clone());
        }
        if !verbs.is_empty() {
            lines.push(String::new());
            lines.push("verbs:".to_string());
            lines.push(format_list(&verbs, "  "));
        }
        if !settings.is_empty() {
            lines.push(String::new());
            lines.push("settings:".to_string());
            lines.push(format_list(&settings, "  "));
        }
        return Ok(lines.join("\n"));
    }

    match resolve_target(dispatcher.registry(), &Target::parse(token)) {
        Ok(reg) => return Ok(verb_help(dispatcher.program(), reg)),
        Err(ResolveError::NotFound(_)) => {}
        Err(err) => return Err(err.into()),
    }

    match dispatcher.settings().lookup_visible(token) {
        Ok(def) => {
            let current = dispatcher.settings().value_of(def, call.store)?;
            Ok(setting_help(def, &current))
        }
        Err(SettingsError::UnknownSetting(_)) => {
            Err(ResolveError::NotFound(token.to_string()).into())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::run;
    use crate::settings::MemorySettingsStore;

    #[test]
    fn overview_without_targets() {
        let store = MemorySettingsStore::new();
        let (result, captured) = run(&store, &["help"]);
        assert_eq!(result.unwrap(), 0);
        let out = captured.stdout();
        assert!(out.contains("verbs:"));
        assert!(out.contains("lets.set"));
        assert!(out.contains("lets.verbose"));
        assert!(!out.contains("_token"));
    }

    #[test]
    fn verb_help() {
        let store = MemorySettingsStore::new();
        let (result, captured) = run(&store, &["help", "lets.set"]);
        assert_eq!(result.unwrap(), 0);
        assert!(captured
            .stdout()
            .starts_with("usage: lets lets.set [SETTING] [VALUES...]"));
    }

    #[test]
    fn setting_help_shows_current_value() {
        let store = MemorySettingsStore::new();
        let (_, captured) = run(&store, &["help", "flavor"]);
        let out = captured.stdout();
        assert!(out.starts_with("setting build.flavor"));
        assert!(out.contains("debug, release"));
    }

    #[test]
    fn context_help() {
        let store = MemorySettingsStore::new();
        let (_, captured) = run(&store, &["help", "build"]);
        let out = captured.stdout();
        assert!(out.starts_with("context build"));
        assert!(out.contains("  build.flavor"));
        assert!(!out.contains("_token"));
    }

    #[test]
    fn unknown_topic() {
        let store = MemorySettingsStore::new();
        let (result, _) = run(&store, &["help", "ship"]);
        assert_eq!(result.unwrap_err().exit_code(), 2);
    }

    #[test]
    fn protected_setting_is_unknown() {
        let store = MemorySettingsStore::new();
        let (result, _) = run(&store, &["help", "build._token"]);
        assert_eq!(result.unwrap_err().exit_code(), 2);
    }
}
