use std::fmt;

const SCHEME_ENV_VAR: &str = "TODOAPP_COLOR_SCHEME";
const COLORFGBG_ENV_VAR: &str = "COLORFGBG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The environment's preferred colour scheme, read once at startup.
pub fn ambient_preference() -> ThemeMode {
    let scheme = std::env::var(SCHEME_ENV_VAR).ok();
    let colorfgbg = std::env::var(COLORFGBG_ENV_VAR).ok();
    preference_from(scheme.as_deref(), colorfgbg.as_deref())
}

fn preference_from(scheme: Option<&str>, colorfgbg: Option<&str>) -> ThemeMode {
    if let Some(mode) = scheme.and_then(ThemeMode::parse) {
        return mode;
    }

    // COLORFGBG is "fg;bg" (sometimes "fg;default;bg"); the last field is the background.
    let background = colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());

    match background {
        Some(0..=6 | 8) => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

/// ANSI escapes for one theme mode. Empty fields render as plain text.
#[derive(Debug, Clone)]
pub struct Palette {
    pub text: &'static str,
    pub muted: &'static str,
    pub strike: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn plain() -> Self {
        Self {
            text: "",
            muted: "",
            strike: "",
            reset: "",
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                text: "\x1b[38;5;235m",
                muted: "\x1b[38;5;242m",
                strike: "\x1b[9m",
                reset: "\x1b[0m",
            },
            ThemeMode::Dark => Self {
                text: "\x1b[38;5;255m",
                muted: "\x1b[38;5;248m",
                strike: "\x1b[9m",
                reset: "\x1b[0m",
            },
        }
    }

    pub fn textize(&self, text: &str) -> String {
        self.wrap(self.text, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        self.wrap(self.muted, text)
    }

    pub fn strike_through(&self, text: &str) -> String {
        if self.strike.is_empty() {
            return text.to_string();
        }
        format!("{}{}{}{}", self.strike, self.muted, text, self.reset)
    }

    fn wrap(&self, code: &str, text: &str) -> String {
        if code.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", code, text, self.reset)
        }
    }
}
