//! The UI style-scope flag.
//!
//! Presentation code keys its palette off a single "dark" marker (a class on
//! the root element, a global style toggle). [`StyleScope`] is where the
//! store writes that marker; nothing else should.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::preference::ResolvedTheme;

/// Receiver of the resolved theme.
pub trait StyleScope {
    /// Applies `theme` to the root presentation scope.
    fn apply(&mut self, theme: ResolvedTheme);
}

impl<F: FnMut(ResolvedTheme)> StyleScope for F {
    fn apply(&mut self, theme: ResolvedTheme) {
        self(theme)
    }
}

/// A shared boolean "dark styling enabled" flag.
///
/// Clones observe the same flag, so the store can own one while the
/// presentation layer reads another.
///
/// # Example
///
/// ```rust
/// use daylight::{ResolvedTheme, ScopeFlag, StyleScope};
///
/// let flag = ScopeFlag::new();
/// let mut writer = flag.clone();
/// writer.apply(ResolvedTheme::Dark);
/// assert!(flag.is_dark());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScopeFlag {
    dark: Arc<AtomicBool>,
}

impl ScopeFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::SeqCst)
    }

    /// The theme the flag currently encodes.
    pub fn theme(&self) -> ResolvedTheme {
        ResolvedTheme::from_prefers_dark(self.is_dark())
    }
}

impl StyleScope for ScopeFlag {
    fn apply(&mut self, theme: ResolvedTheme) {
        self.dark.store(theme.is_dark(), Ordering::SeqCst);
    }
}
