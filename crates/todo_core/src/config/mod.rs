use crate::error::AppError;
use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TODOAPP_CONFIG_PATH";
const SYSTEM_THEME: &str = "system";

/// Normalizes a theme name to `light`, `dark`, `system`, or a cleaned-up unknown name.
pub fn canonical_theme_name(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    match cleaned.trim_matches('_') {
        "" | "auto" | "default" => SYSTEM_THEME.to_string(),
        "vanilla" | "light" | "light_mode" | "lightmode" => "light".to_string(),
        "dark" | "dark_mode" | "darkmode" | "noir" => "dark".to_string(),
        other => other.to_string(),
    }
}

fn default_restore_on_startup() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default = "default_restore_on_startup")]
    pub restore_on_startup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: None,
            restore_on_startup: default_restore_on_startup(),
        }
    }
}

impl Config {
    /// The configured theme mode, or `None` when the ambient preference applies.
    pub fn theme_mode(&self) -> Option<ThemeMode> {
        self.theme.as_deref().and_then(ThemeMode::parse)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub restore_on_startup: Option<bool>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("todoapp")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("todoapp")
            .join(CONFIG_FILE_NAME))
    }
}

/// Loads the config file, falling back to defaults on any failure.
pub fn load_config_with_fallback() -> ConfigLoad {
    let load = match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    };

    if let Some(err) = load.error.as_ref() {
        warn!(error = %err, "using default configuration");
    }

    load
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.map(|name| canonical_theme_name(&name));
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_ref() {
        merged.theme = Some(canonical_theme_name(theme));
    }

    if let Some(restore) = overrides.restore_on_startup {
        merged.restore_on_startup = restore;
    }

    merged
}
