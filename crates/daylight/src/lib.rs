//! # Daylight - light, dark and system theme preferences
//!
//! `daylight` keeps a UI's theme consistent with what the user picked and,
//! when they picked "system", with the operating system's color scheme.
//!
//! ## Core Concepts
//!
//! - [`ThemePreference`]: the persisted choice, `Light`, `Dark` or `System`
//! - [`ResolvedTheme`]: the `Light` or `Dark` theme actually shown
//! - [`ThemeStore`]: loads, persists and toggles the preference and keeps the
//!   style-scope flag equal to the resolved theme
//! - [`PreferenceStorage`]: where the preference lives between runs
//! - [`ColorSchemeSource`]: the OS "prefers dark" signal
//! - [`StyleScope`] / [`ScopeFlag`]: the single marker presentation code reads
//! - [`Adaptive`]: light/dark pairs of presentation values
//!
//! ## Quick Start
//!
//! ```rust
//! use daylight::{ManualColorScheme, MemoryStorage, ResolvedTheme, ThemePreference, ThemeStore};
//!
//! let storage = MemoryStorage::new();
//! let mut store = ThemeStore::new(storage.clone(), ManualColorScheme::new(ResolvedTheme::Dark));
//!
//! // Nothing persisted yet: follow the OS.
//! assert_eq!(store.preference(), ThemePreference::System);
//! assert!(store.is_dark());
//!
//! // Toggling out of system mode picks the opposite of the OS theme.
//! store.toggle_preference();
//! assert_eq!(store.preference(), ThemePreference::Light);
//! assert_eq!(storage.get("theme").as_deref(), Some("light"));
//! ```
//!
//! ## Failure handling
//!
//! Theming is never fatal. Unreadable or corrupt storage loads as `System`,
//! failed writes are logged and dropped, and an unavailable OS signal
//! resolves to `Light`. Errors are reported through `tracing`.

pub mod adaptive;
pub mod config;
pub mod error;
pub mod preference;
pub mod scope;
pub mod signal;
pub mod storage;
pub mod store;

pub use adaptive::Adaptive;
pub use config::{StoreConfig, DEFAULT_POLL_INTERVAL, DEFAULT_STORAGE_KEY, MIN_POLL_INTERVAL};
pub use error::{ParsePreferenceError, SignalError, StorageError};
pub use preference::{resolve, ResolvedTheme, ThemePreference};
pub use scope::{ScopeFlag, StyleScope};
pub use signal::{
    reset_theme_detector, set_theme_detector, ColorSchemeSource, ManualColorScheme,
    OsColorScheme, Subscription, ThemeDetector,
};
pub use storage::{FileStorage, MemoryStorage, PreferenceStorage};
pub use store::{ThemeSnapshot, ThemeStore, ThemeStoreBuilder};
