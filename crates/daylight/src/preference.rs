//! Theme preference and resolved theme values.
//!
//! [`ThemePreference`] is what the user chose and what gets persisted.
//! [`ResolvedTheme`] is what the UI actually shows; it is never stored and
//! is always derived with [`resolve`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParsePreferenceError;

/// The user's stored theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the operating system's color scheme.
    #[default]
    System,
}

impl ThemePreference {
    /// The literal persisted for this preference.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    /// Returns true when the preference defers to the OS.
    pub fn follows_system(&self) -> bool {
        matches!(self, ThemePreference::System)
    }

    /// The preference that a toggle moves to.
    ///
    /// `Light` goes to `Dark`, `Dark` goes to `System`, and `System` leaves
    /// system-following mode by picking the opposite of `os`.
    pub fn toggled(&self, os: ResolvedTheme) -> ThemePreference {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::System,
            ThemePreference::System => os.opposite().into(),
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ParsePreferenceError;

    /// Parses one of the persisted literals. Matching is exact: `"Dark"` and
    /// `" dark"` are rejected just like `""`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(ParsePreferenceError {
                value: other.to_string(),
            }),
        }
    }
}

impl From<ResolvedTheme> for ThemePreference {
    fn from(theme: ResolvedTheme) -> Self {
        match theme {
            ResolvedTheme::Light => ThemePreference::Light,
            ResolvedTheme::Dark => ThemePreference::Dark,
        }
    }
}

/// The concrete light or dark theme applied to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    #[default]
    Light,
    Dark,
}

impl ResolvedTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ResolvedTheme::Dark)
    }

    pub fn opposite(&self) -> ResolvedTheme {
        match self {
            ResolvedTheme::Light => ResolvedTheme::Dark,
            ResolvedTheme::Dark => ResolvedTheme::Light,
        }
    }

    /// Maps an OS "prefers dark" condition to a theme.
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            ResolvedTheme::Dark
        } else {
            ResolvedTheme::Light
        }
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a preference against the OS color scheme.
///
/// Pure: explicit preferences ignore `os` entirely.
pub fn resolve(preference: ThemePreference, os: ResolvedTheme) -> ResolvedTheme {
    match preference {
        ThemePreference::Light => ResolvedTheme::Light,
        ThemePreference::Dark => ResolvedTheme::Dark,
        ThemePreference::System => os,
    }
}
