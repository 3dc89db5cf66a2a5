use clap::{Parser, Subcommand};
use todo_core::config::ConfigOverrides;
use todo_core::error::AppError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Type into the input field without submitting
    ///
    /// Example: input "Buy milk"
    Input {
        #[arg(allow_hyphen_values = true)]
        text: Option<String>,
    },
    /// Submit whatever is in the input field
    Submit,
    /// Add a new task (submits the input field when no text is given)
    ///
    /// Example: todo add "Buy milk"
    Add {
        #[arg(allow_hyphen_values = true)]
        text: Option<String>,
    },
    /// Check or uncheck the task in a row
    ///
    /// Example: todo toggle 1
    Toggle { row: usize },
    /// Delete the task in a row
    ///
    /// Example: todo remove 1
    #[command(visible_alias = "delete")]
    Remove { row: usize },
    /// Show the task list
    List,
    /// Switch between light and dark mode
    Theme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    RestoreOnStartup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    match field.as_str() {
        "theme" => Ok(ParsedConfigOverride {
            target: ConfigOverrideTarget::Theme,
            value,
        }),
        "restore_on_startup" | "restore" => Ok(ParsedConfigOverride {
            target: ConfigOverrideTarget::RestoreOnStartup,
            value,
        }),
        other => Err(format!("unknown config field '{other}'")),
    }
}

/// Collects every `--config-override` into one set of overrides; later values win.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::RestoreOnStartup => {
                let restore = parse_bool(&parsed.value).ok_or_else(|| {
                    AppError::invalid_input(format!(
                        "restore_on_startup expects true or false, got '{}'",
                        parsed.value
                    ))
                })?;
                overrides.restore_on_startup = Some(restore);
            }
        }
    }

    Ok(overrides)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits one interactive input line into arguments, honouring double quotes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}
