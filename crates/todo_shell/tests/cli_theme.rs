use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("todoapp-{nanos}-{file_name}"))
}

fn run_theme(scheme: Option<&str>, args: &[&str]) -> Output {
    let store_path = temp_path("theme-store.json");
    let mut command = Command::new(env!("CARGO_BIN_EXE_todo_shell"));
    command
        .args(args)
        .env("TODOAPP_STORE_PATH", &store_path)
        .env("TODOAPP_CONFIG_PATH", temp_path("no-config.json"))
        .env_remove("COLORFGBG");
    match scheme {
        Some(value) => command.env("TODOAPP_COLOR_SCHEME", value),
        None => command.env_remove("TODOAPP_COLOR_SCHEME"),
    };

    let output = command.output().expect("failed to run todo_shell");
    std::fs::remove_file(&store_path).ok();
    output
}

#[test]
fn dark_preference_toggles_to_light() {
    let output = run_theme(Some("dark"), &["theme"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Theme: light");
}

#[test]
fn missing_preference_defaults_to_light() {
    let output = run_theme(None, &["theme"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Theme: dark");
}

#[test]
fn config_override_beats_ambient_preference() {
    let output = run_theme(Some("dark"), &["theme", "--config-override", "theme=light"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Theme: dark");
}

#[test]
fn system_theme_override_uses_ambient_preference() {
    let output = run_theme(Some("dark"), &["theme", "--config-override", "theme=system"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Theme: light");
}
