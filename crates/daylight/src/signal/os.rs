//! Color scheme reported by the operating system.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;

use super::{ColorSchemeSource, Subscription};
use crate::config::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
use crate::error::SignalError;
use crate::preference::ResolvedTheme;

/// Function used to read the OS color scheme.
pub type ThemeDetector = fn() -> Result<ResolvedTheme, SignalError>;

static THEME_DETECTOR: Lazy<Mutex<ThemeDetector>> = Lazy::new(|| Mutex::new(os_theme_detector));

/// Overrides the detector used to determine whether the OS prefers a light or dark theme.
///
/// This is useful for testing or when you want to force a specific color scheme.
/// The override is process-wide and also affects running watchers.
pub fn set_theme_detector(detector: ThemeDetector) {
    let mut guard = THEME_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    *guard = detector;
}

/// Restores the real OS detector.
pub fn reset_theme_detector() {
    set_theme_detector(os_theme_detector);
}

pub(crate) fn detect_color_scheme() -> Result<ResolvedTheme, SignalError> {
    let detector = *THEME_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    detector()
}

fn os_theme_detector() -> Result<ResolvedTheme, SignalError> {
    match detect_os_theme() {
        OsThemeMode::Dark => Ok(ResolvedTheme::Dark),
        OsThemeMode::Light => Ok(ResolvedTheme::Light),
    }
}

/// The OS color scheme.
///
/// Queries go straight to the detector. Subscribing starts a watcher thread
/// that re-detects every `poll_interval` and sends each change; releasing
/// the subscription stops and joins that thread.
#[derive(Debug, Clone, Copy)]
pub struct OsColorScheme {
    poll_interval: Duration,
}

impl OsColorScheme {
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for OsColorScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSchemeSource for OsColorScheme {
    fn query(&self) -> Result<ResolvedTheme, SignalError> {
        detect_color_scheme()
    }

    fn subscribe(&self, sender: Sender<ResolvedTheme>) -> Subscription {
        let stop = Arc::new(AtomicBool::new(false));
        let watcher_stop = Arc::clone(&stop);
        let interval = self.poll_interval;
        let initial = detect_color_scheme().ok();

        let spawned = thread::Builder::new()
            .name("daylight-os-watch".to_string())
            .spawn(move || watch(sender, initial, interval, &watcher_stop));

        match spawned {
            Ok(handle) => Subscription::new(move || {
                stop.store(true, Ordering::SeqCst);
                handle.thread().unpark();
                if handle.join().is_err() {
                    tracing::warn!("color scheme watcher panicked");
                }
            }),
            Err(e) => {
                tracing::warn!("failed to start color scheme watcher: {}", e);
                Subscription::inactive()
            }
        }
    }
}

fn watch(
    sender: Sender<ResolvedTheme>,
    mut last: Option<ResolvedTheme>,
    interval: Duration,
    stop: &AtomicBool,
) {
    loop {
        thread::park_timeout(interval);
        if stop.load(Ordering::SeqCst) {
            break;
        }
        // Losing the signal is a change too: queries now resolve to light.
        let current = detect_color_scheme().ok();
        if last == current {
            continue;
        }
        last = current;
        let reported = current.unwrap_or(ResolvedTheme::Light);
        tracing::debug!(scheme = %reported, available = current.is_some(), "os color scheme changed");
        if sender.send(reported).is_err() {
            break;
        }
    }
}
