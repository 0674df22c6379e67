//! Theme selection and terminal palettes
//!
//! The theme is stored as `light`, `dark`, or `system`. `system` is resolved
//! against the terminal's reported background each time a palette is built.

use colored::{Color, ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// A concrete theme after `system` has been resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::System => write!(f, "system"),
        }
    }
}

impl Theme {
    /// All themes in display order
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    /// Parse a theme name
    ///
    /// # Examples
    ///
    /// ```
    /// use chatterm::preferences::Theme;
    ///
    /// assert_eq!(Theme::parse_str("Dark").unwrap(), Theme::Dark);
    /// assert!(Theme::parse_str("sepia").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" | "auto" => Ok(Self::System),
            other => Err(format!(
                "Unknown theme: {} (expected light, dark, or system)",
                other
            )),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Light => "Light backgrounds, dark text",
            Self::Dark => "Dark backgrounds, light text",
            Self::System => "Follow the terminal",
        }
    }

    /// Resolve `system` from the process environment
    pub fn resolve(self) -> ResolvedTheme {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve `system` using the supplied environment lookup
    ///
    /// Terminals that report `COLORFGBG` as `fg;bg` with a background of
    /// 7 or 15 are treated as light; everything else (including a missing
    /// variable) is treated as dark.
    pub fn resolve_with<F>(self, lookup: F) -> ResolvedTheme
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            Self::Light => ResolvedTheme::Light,
            Self::Dark => ResolvedTheme::Dark,
            Self::System => {
                let background = lookup("COLORFGBG")
                    .and_then(|v| v.rsplit(';').next().map(|bg| bg.trim().to_string()));
                match background.as_deref() {
                    Some("7") | Some("15") => ResolvedTheme::Light,
                    _ => ResolvedTheme::Dark,
                }
            }
        }
    }
}

/// Colours used to render the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub theme: ResolvedTheme,
    pub user: Color,
    pub assistant: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Palette {
    pub fn for_theme(theme: ResolvedTheme) -> Self {
        match theme {
            ResolvedTheme::Light => Self {
                theme,
                user: Color::Blue,
                assistant: Color::Black,
                accent: Color::Magenta,
                muted: Color::BrightBlack,
            },
            ResolvedTheme::Dark => Self {
                theme,
                user: Color::BrightCyan,
                assistant: Color::White,
                accent: Color::BrightMagenta,
                muted: Color::BrightBlack,
            },
        }
    }

    pub fn user(&self, text: &str) -> ColoredString {
        text.color(self.user)
    }

    pub fn assistant(&self, text: &str) -> ColoredString {
        text.color(self.assistant)
    }

    pub fn accent(&self, text: &str) -> ColoredString {
        text.color(self.accent).bold()
    }

    pub fn muted(&self, text: &str) -> ColoredString {
        text.color(self.muted)
    }
}
