//! Light/dark value pairs for presentation code.

use crate::preference::ResolvedTheme;
use crate::scope::ScopeFlag;

/// A pair of presentation values, one per resolved theme.
///
/// Contains separate values for light and dark themes and hands back the one
/// matching the current resolution or style flag.
///
/// # Example
///
/// ```rust
/// use daylight::{Adaptive, ResolvedTheme};
///
/// let background = Adaptive::new("#ffffff", "#111827");
/// assert_eq!(*background.select(ResolvedTheme::Dark), "#111827");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Adaptive<T> {
    light: T,
    dark: T,
}

impl<T> Adaptive<T> {
    /// Creates a pair with separate light and dark variants.
    pub fn new(light: T, dark: T) -> Self {
        Self { light, dark }
    }

    pub fn light(&self) -> &T {
        &self.light
    }

    pub fn dark(&self) -> &T {
        &self.dark
    }

    /// Returns the variant for `theme`.
    pub fn select(&self, theme: ResolvedTheme) -> &T {
        match theme {
            ResolvedTheme::Light => &self.light,
            ResolvedTheme::Dark => &self.dark,
        }
    }

    /// Returns the variant matching the current state of `flag`.
    pub fn for_flag(&self, flag: &ScopeFlag) -> &T {
        self.select(flag.theme())
    }

    /// Applies `f` to both variants.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Adaptive<U> {
        Adaptive {
            light: f(self.light),
            dark: f(self.dark),
        }
    }
}
