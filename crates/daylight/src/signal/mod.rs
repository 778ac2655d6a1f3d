//! OS color-scheme signal: query the current scheme and subscribe to changes.
//!
//! This module provides:
//!
//! - [`ColorSchemeSource`]: the query-and-subscribe seam the store depends on
//! - [`Subscription`]: a guard that releases a subscription exactly once
//! - [`OsColorScheme`]: OS detection with a polling watcher thread
//! - [`ManualColorScheme`]: a source whose value the host pushes in
//!
//! Notifications are delivered over an [`mpsc`](std::sync::mpsc) channel so
//! the receiving side handles them one at a time on its own thread.

mod manual;
mod os;
mod subscription;

use std::sync::mpsc::Sender;

pub use manual::ManualColorScheme;
pub use os::{reset_theme_detector, set_theme_detector, OsColorScheme, ThemeDetector};
pub use subscription::Subscription;

use crate::error::SignalError;
use crate::preference::ResolvedTheme;

/// A queryable, subscribable "OS prefers dark" condition.
pub trait ColorSchemeSource {
    /// Reads the current OS color scheme.
    fn query(&self) -> Result<ResolvedTheme, SignalError>;

    /// Starts delivering the new scheme to `sender` whenever it changes.
    ///
    /// Delivery stops when the returned [`Subscription`] is released or
    /// dropped.
    fn subscribe(&self, sender: Sender<ResolvedTheme>) -> Subscription;
}

impl<C: ColorSchemeSource + ?Sized> ColorSchemeSource for Box<C> {
    fn query(&self) -> Result<ResolvedTheme, SignalError> {
        (**self).query()
    }

    fn subscribe(&self, sender: Sender<ResolvedTheme>) -> Subscription {
        (**self).subscribe(sender)
    }
}
