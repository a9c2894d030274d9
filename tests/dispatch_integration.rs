//! Integration tests for dispatching through a file-backed settings store.
//!
//! Each test builds its own dispatcher and points the store at a fresh
//! temporary directory, so nothing touches the user's real settings.

use lets::core::schema::{OptionDef, OptionSchema};
use lets::engine::{
    CallbackError, DispatchError, Dispatcher, DispatcherBuilder, Invocation, VerbCall,
    EXIT_AMBIGUOUS, EXIT_NOT_FOUND, EXIT_OPTIONS, EXIT_SETTINGS,
};
use lets::settings::{FileSettingsStore, SettingValue, SettingsStore};
use lets::ui::output::{Captured, Console, Verbosity};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Print the verb followed by its merged options, `key=value` each.
fn echo(call: &mut VerbCall<'_>) -> Result<i32, CallbackError> {
    let rendered: Vec<String> = call
        .options
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    let line = format!("{} {}", call.verb, rendered.join(" "));
    call.console.print(line.trim_end());
    Ok(0)
}

fn dispatcher() -> Dispatcher {
    let mut builder = DispatcherBuilder::new("lets");
    builder.context("build", "Build tasks").unwrap();
    builder.context("deploy", "Deploy tasks").unwrap();

    let compile = OptionSchema::new(vec![
        OptionDef::toggle("clean"),
        OptionDef::keyed("flavor")
            .with_choices(["debug", "release"])
            .with_default("debug"),
    ])
    .unwrap();
    builder
        .verb_fn("build.compile", compile, "Compile the project", echo)
        .unwrap();
    builder
        .verb_fn("build.push", OptionSchema::empty(), "Push artifacts", echo)
        .unwrap();
    builder
        .verb_fn(
            "deploy.push",
            OptionSchema::new(vec![OptionDef::keyed("target")]).unwrap(),
            "Push a release",
            echo,
        )
        .unwrap();
    builder
        .verb_fn("deploy.fail", OptionSchema::empty(), "Always fails", |_call: &mut VerbCall<'_>| {
            Err(CallbackError::failed("remote rejected"))
        })
        .unwrap();
    builder.build()
}

struct Fixture {
    _dir: TempDir,
    store: FileSettingsStore,
    dispatcher: Dispatcher,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::with_path(dir.path().join("config.toml"));
        Self {
            _dir: dir,
            store,
            dispatcher: dispatcher(),
        }
    }

    fn run(&self, raw: &[&str]) -> (Result<i32, DispatchError>, Captured) {
        let args: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        let (mut console, captured) = Console::buffered(Verbosity::Normal);
        let result = self.dispatcher.run(&args, &self.store, &mut console);
        (result, captured)
    }
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn shared_name_needs_context() {
    let fx = Fixture::new();

    let (result, _) = fx.run(&["push"]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), EXIT_AMBIGUOUS);
    let message = err.to_string();
    assert!(message.contains("build.push"));
    assert!(message.contains("deploy.push"));

    let (result, out) = fx.run(&["deploy.push", "target", "prod"]);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(out.stdout(), "deploy.push target=prod\n");
}

#[test]
fn unique_bare_name_resolves() {
    let fx = Fixture::new();
    let (result, out) = fx.run(&["compile"]);
    assert_eq!(result.unwrap(), 0);
    assert!(out.stdout().starts_with("build.compile"));
}

#[test]
fn explicit_context_does_not_fall_back() {
    let fx = Fixture::new();
    let (result, _) = fx.run(&["deploy.compile"]);
    assert_eq!(result.unwrap_err().exit_code(), EXIT_NOT_FOUND);
}

// =============================================================================
// Options and persisted settings
// =============================================================================

#[test]
fn defaults_apply_without_settings() {
    let fx = Fixture::new();
    let (result, out) = fx.run(&["build.compile"]);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(out.stdout(), "build.compile flavor=debug\n");
}

#[test]
fn persisted_setting_beats_default_and_loses_to_invocation() {
    let fx = Fixture::new();
    fx.store
        .set("build.flavor", SettingValue::text("release"))
        .unwrap();

    let (result, out) = fx.run(&["build.compile", "clean"]);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(out.stdout(), "build.compile clean=true flavor=release\n");

    let (result, out) = fx.run(&["build.compile", "debug"]);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(out.stdout(), "build.compile flavor=debug\n");
}

#[test]
fn persisted_settings_survive_a_new_store() {
    let fx = Fixture::new();
    fx.store
        .set("deploy.target", SettingValue::text("staging"))
        .unwrap();

    let reopened = FileSettingsStore::with_path(fx.store.path());
    assert_eq!(
        reopened.get("deploy.target").unwrap(),
        Some(SettingValue::text("staging"))
    );

    let (result, out) = fx.run(&["deploy.push"]);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(out.stdout(), "deploy.push target=staging\n");
}

#[test]
fn persisted_toggle_word_is_parsed() {
    let fx = Fixture::new();
    fx.store.set("build.clean", SettingValue::text("yes")).unwrap();
    let (result, out) = fx.run(&["build.compile"]);
    assert_eq!(result.unwrap(), 0);
    assert!(out.stdout().contains("clean=true"));

    fx.store
        .set("build.clean", SettingValue::text("sometimes"))
        .unwrap();
    let (result, _) = fx.run(&["build.compile"]);
    assert_eq!(result.unwrap_err().exit_code(), EXIT_SETTINGS);
}

#[test]
fn native_toml_scalars_in_settings_file() {
    let fx = Fixture::new();
    std::fs::write(fx.store.path(), "[build]\nclean = true\nflavor = \"release\"\n").unwrap();

    let (result, out) = fx.run(&["build.compile"]);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(out.stdout(), "build.compile clean=true flavor=release\n");
}

#[test]
fn persisted_value_outside_choices_fails_before_callback() {
    let fx = Fixture::new();
    fx.store.set("build.flavor", SettingValue::text("fast")).unwrap();

    let (result, out) = fx.run(&["build.compile"]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), EXIT_SETTINGS);
    assert!(err.to_string().contains("fast"));
    assert!(out.stdout().is_empty());
}

#[test]
fn bad_options_abort_before_callback() {
    let fx = Fixture::new();

    let (result, out) = fx.run(&["build.compile", "--bogus"]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), EXIT_OPTIONS);
    assert!(err.to_string().contains("--bogus"));
    assert!(out.stdout().is_empty());

    let (result, _) = fx.run(&["build.compile", "flavor", "fast"]);
    assert_eq!(result.unwrap_err().exit_code(), EXIT_OPTIONS);
}

#[test]
fn unknown_stored_keys_only_warn() {
    let fx = Fixture::new();
    fx.store
        .set("ship.speed", SettingValue::text("fast"))
        .unwrap();

    let (result, out) = fx.run(&["build.compile"]);
    assert_eq!(result.unwrap(), 0);
    assert!(out.stderr().contains("warning: unknown contexts in settings file: ship"));
}

// =============================================================================
// Callbacks and reserved words
// =============================================================================

#[test]
fn callback_failure_is_reported_with_verb() {
    let fx = Fixture::new();
    let (result, _) = fx.run(&["deploy.fail"]);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("deploy.fail failed"));
    assert!(err.to_string().contains("remote rejected"));
}

#[test]
fn help_word_prints_verb_help() {
    let fx = Fixture::new();
    let (result, out) = fx.run(&["build.compile", "help"]);
    assert_eq!(result.unwrap(), 0);
    assert!(out.stdout().contains("usage: lets build.compile"));
    assert!(out.stdout().contains("flavor"));
}

#[test]
fn verbose_word_is_stripped() {
    let fx = Fixture::new();
    let (result, out) = fx.run(&["build.compile", "verbose"]);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(out.stdout(), "build.compile flavor=debug\n");
    assert!(out.stderr().contains("running build.compile"));
}

#[test]
fn dispatch_takes_a_prebuilt_invocation() {
    let fx = Fixture::new();
    let invocation = Invocation::new("build.push", Vec::new());
    let (mut console, out) = Console::buffered(Verbosity::Normal);
    let status = fx
        .dispatcher
        .dispatch(&invocation, &fx.store, &mut console)
        .unwrap();
    assert_eq!(status, 0);
    assert_eq!(out.stdout(), "build.push\n");
}
