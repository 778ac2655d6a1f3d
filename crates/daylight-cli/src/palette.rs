//! Terminal styles matching the resolved theme.

use console::Style;
use daylight::{Adaptive, ResolvedTheme};

/// Styles for the CLI's key/value output, one set per theme.
#[derive(Debug, Clone)]
pub struct Palette {
    label: Adaptive<Style>,
    value: Adaptive<Style>,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            label: Adaptive::new(Style::new().black().dim(), Style::new().white().dim()),
            value: Adaptive::new(Style::new().blue().bold(), Style::new().yellow().bold()),
        }
    }

    pub fn label(&self, theme: ResolvedTheme) -> &Style {
        self.label.select(theme)
    }

    pub fn value(&self, theme: ResolvedTheme) -> &Style {
        self.value.select(theme)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
