//! The theme preference store.
//!
//! [`ThemeStore`] owns the user's [`ThemePreference`], persists it on every
//! change, and keeps the style-scope flag equal to the resolved theme.
//!
//! # Lifecycle
//!
//! 1. [`ThemeStoreBuilder::build`] loads the persisted preference (falling
//!    back to `System`), subscribes to the color-scheme source and applies
//!    the resolved theme once.
//! 2. The host calls the preference operations in response to UI actions,
//!    and drains OS notifications from its event loop with
//!    [`ThemeStore::process_signals`] or [`ThemeStore::wait_for_signal`].
//! 3. [`ThemeStore::close`], or dropping the store, releases the
//!    subscription. No notification is handled after that.
//!
//! # Example
//!
//! ```rust
//! use daylight::{ManualColorScheme, MemoryStorage, ResolvedTheme, ThemePreference, ThemeStore};
//!
//! let os = ManualColorScheme::new(ResolvedTheme::Light);
//! let mut store = ThemeStore::builder()
//!     .storage(MemoryStorage::new())
//!     .color_scheme(os.clone())
//!     .build();
//!
//! assert_eq!(store.preference(), ThemePreference::System);
//! assert_eq!(store.resolved_theme(), ResolvedTheme::Light);
//!
//! os.set(ResolvedTheme::Dark);
//! store.process_signals();
//! assert!(store.is_dark());
//! ```

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::preference::{resolve, ResolvedTheme, ThemePreference};
use crate::scope::{ScopeFlag, StyleScope};
use crate::signal::{ColorSchemeSource, OsColorScheme, Subscription};
use crate::storage::{MemoryStorage, PreferenceStorage};

/// Point-in-time view of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSnapshot {
    pub preference: ThemePreference,
    pub resolved: ResolvedTheme,
    /// State of the style-scope flag.
    pub dark: bool,
}

/// Single source of truth for the theme preference.
pub struct ThemeStore {
    key: String,
    preference: ThemePreference,
    storage: Box<dyn PreferenceStorage>,
    source: Box<dyn ColorSchemeSource>,
    flag: ScopeFlag,
    scope: Option<Box<dyn StyleScope>>,
    signals: Receiver<ResolvedTheme>,
    subscription: Option<Subscription>,
}

impl ThemeStore {
    /// Creates a new builder for constructing a store.
    pub fn builder() -> ThemeStoreBuilder {
        ThemeStoreBuilder::new()
    }

    /// Creates a store over `storage` and `source` with default settings.
    pub fn new(
        storage: impl PreferenceStorage + 'static,
        source: impl ColorSchemeSource + 'static,
    ) -> Self {
        Self::builder().storage(storage).color_scheme(source).build()
    }

    /// Returns the stored preference.
    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    /// Returns the theme to display.
    ///
    /// The OS is queried only when the preference is `System`; if that query
    /// fails the result is `Light`.
    pub fn resolved_theme(&self) -> ResolvedTheme {
        match self.preference {
            ThemePreference::System => resolve(self.preference, self.os_theme()),
            explicit => resolve(explicit, ResolvedTheme::Light),
        }
    }

    /// Sets, persists and applies a preference.
    pub fn set_preference(&mut self, preference: ThemePreference) {
        tracing::debug!(from = %self.preference, to = %preference, "setting theme preference");
        self.preference = preference;
        self.persist();
        self.apply();
    }

    /// Sets the preference from its string form.
    ///
    /// Anything other than `"light"`, `"dark"` or `"system"` is ignored and
    /// leaves the store unchanged.
    pub fn set_preference_str(&mut self, value: &str) {
        match value.parse() {
            Ok(preference) => self.set_preference(preference),
            Err(e) => tracing::debug!("ignoring theme preference: {}", e),
        }
    }

    /// Moves to the next preference and returns it.
    ///
    /// `Light` becomes `Dark`, `Dark` becomes `System`, and `System` becomes
    /// the opposite of what the OS currently reports.
    pub fn toggle_preference(&mut self) -> ThemePreference {
        let next = self.preference.toggled(self.resolved_theme());
        self.set_preference(next);
        next
    }

    /// Handles every queued OS notification and returns how many there were.
    ///
    /// Never blocks. Returns 0 once the store is closed or the source has
    /// disconnected.
    pub fn process_signals(&mut self) -> usize {
        if self.subscription.is_none() {
            return 0;
        }
        let mut handled = 0;
        loop {
            match self.signals.try_recv() {
                Ok(reported) => {
                    self.handle_signal(reported);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.source_disconnected();
                    break;
                }
            }
        }
        handled
    }

    /// Waits up to `timeout` for one OS notification and handles it.
    ///
    /// Returns whether a notification was handled. A disconnected source
    /// releases the subscription, after which [`is_subscribed`](Self::is_subscribed)
    /// is false and this returns immediately.
    pub fn wait_for_signal(&mut self, timeout: Duration) -> bool {
        if self.subscription.is_none() {
            return false;
        }
        match self.signals.recv_timeout(timeout) {
            Ok(reported) => {
                self.handle_signal(reported);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.source_disconnected();
                false
            }
        }
    }

    /// Returns the style-scope flag as last applied.
    pub fn is_dark(&self) -> bool {
        self.flag.is_dark()
    }

    /// Returns a read handle to the style-scope flag.
    pub fn flag(&self) -> ScopeFlag {
        self.flag.clone()
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        ThemeSnapshot {
            preference: self.preference,
            resolved: self.resolved_theme(),
            dark: self.is_dark(),
        }
    }

    /// The key the preference is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Returns whether OS notifications are still being received.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Releases the OS subscription and drops the store.
    pub fn close(mut self) {
        self.teardown();
    }

    fn handle_signal(&mut self, reported: ResolvedTheme) {
        if self.preference.follows_system() {
            tracing::debug!(os = %reported, "reapplying theme after os change");
            self.apply();
        } else {
            tracing::trace!(os = %reported, preference = %self.preference, "os change ignored");
        }
    }

    fn os_theme(&self) -> ResolvedTheme {
        self.source.query().unwrap_or_else(|e| {
            tracing::warn!("{}; falling back to light", e);
            ResolvedTheme::Light
        })
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.write(&self.key, self.preference.as_str()) {
            tracing::warn!("failed to persist theme preference: {}", e);
        }
    }

    fn apply(&mut self) {
        let theme = self.resolved_theme();
        self.flag.apply(theme);
        if let Some(scope) = self.scope.as_mut() {
            scope.apply(theme);
        }
    }

    fn source_disconnected(&mut self) {
        tracing::warn!("color scheme source disconnected; os changes will no longer be followed");
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("released color scheme subscription");
        }
    }
}

impl Drop for ThemeStore {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("key", &self.key)
            .field("preference", &self.preference)
            .field("dark", &self.flag.is_dark())
            .field("subscribed", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ThemeStore`].
///
/// Unset parts default to in-memory storage, the OS color scheme and no
/// external style scope.
#[derive(Default)]
pub struct ThemeStoreBuilder {
    storage: Option<Box<dyn PreferenceStorage>>,
    source: Option<Box<dyn ColorSchemeSource>>,
    scope: Option<Box<dyn StyleScope>>,
    config: StoreConfig,
}

impl ThemeStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the persisted key-value store.
    pub fn storage(mut self, storage: impl PreferenceStorage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Sets the OS color-scheme source.
    pub fn color_scheme(mut self, source: impl ColorSchemeSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Adds a style scope that receives every applied theme, in addition to
    /// the store's own [`ScopeFlag`].
    pub fn scope(mut self, scope: impl StyleScope + 'static) -> Self {
        self.scope = Some(Box::new(scope));
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage_key = key.into();
        self
    }

    /// Loads the persisted preference, subscribes and applies the theme.
    pub fn build(self) -> ThemeStore {
        let storage = self
            .storage
            .unwrap_or_else(|| Box::new(MemoryStorage::new()) as Box<dyn PreferenceStorage>);
        let poll_interval = self.config.poll_interval();
        let source = self.source.unwrap_or_else(|| {
            Box::new(OsColorScheme::with_poll_interval(poll_interval)) as Box<dyn ColorSchemeSource>
        });
        let key = self.config.storage_key;
        let preference = load_preference(storage.as_ref(), &key);

        let (sender, signals) = mpsc::channel();
        let subscription = source.subscribe(sender);

        let mut store = ThemeStore {
            key,
            preference,
            storage,
            source,
            flag: ScopeFlag::new(),
            scope: self.scope,
            signals,
            subscription: Some(subscription),
        };
        store.apply();
        tracing::debug!(preference = %store.preference, dark = store.is_dark(), "theme store ready");
        store
    }
}

impl fmt::Debug for ThemeStoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStoreBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn load_preference(storage: &dyn PreferenceStorage, key: &str) -> ThemePreference {
    match storage.read(key) {
        Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
            tracing::warn!("{}; using system", e);
            ThemePreference::System
        }),
        Ok(None) => ThemePreference::System,
        Err(e) => {
            tracing::warn!("failed to read theme preference: {}; using system", e);
            ThemePreference::System
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SignalError, StorageError};
    use crate::signal::ManualColorScheme;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct BrokenStorage;

    impl PreferenceStorage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }
    }

    /// A source that drops its sender at once, like a watcher that never started.
    struct SilentColorScheme;

    impl ColorSchemeSource for SilentColorScheme {
        fn query(&self) -> Result<ResolvedTheme, SignalError> {
            Ok(ResolvedTheme::Light)
        }

        fn subscribe(&self, _sender: mpsc::Sender<ResolvedTheme>) -> Subscription {
            Subscription::inactive()
        }
    }

    fn store_with(
        storage: MemoryStorage,
        os: ResolvedTheme,
    ) -> (ThemeStore, MemoryStorage, ManualColorScheme) {
        let scheme = ManualColorScheme::new(os);
        let store = ThemeStore::new(storage.clone(), scheme.clone());
        (store, storage, scheme)
    }

    #[test]
    fn test_empty_storage_defaults_to_system() {
        let (store, _, _) = store_with(MemoryStorage::new(), ResolvedTheme::Light);
        assert_eq!(store.preference(), ThemePreference::System);
        assert_eq!(store.resolved_theme(), ResolvedTheme::Light);
        assert!(!store.is_dark());
    }

    #[test]
    fn test_persisted_dark_ignores_light_os() {
        let storage = MemoryStorage::with_value("theme", "dark");
        let (store, _, _) = store_with(storage, ResolvedTheme::Light);
        assert_eq!(store.preference(), ThemePreference::Dark);
        assert_eq!(store.resolved_theme(), ResolvedTheme::Dark);
        assert!(store.is_dark());
    }

    #[test]
    fn test_corrupt_value_loads_as_system() {
        let storage = MemoryStorage::with_value("theme", "midnight");
        let (store, _, _) = store_with(storage, ResolvedTheme::Dark);
        assert_eq!(store.preference(), ThemePreference::System);
        assert!(store.is_dark());
    }

    #[test]
    fn test_initial_flag_applied_in_system_mode() {
        let (store, _, _) = store_with(MemoryStorage::new(), ResolvedTheme::Dark);
        assert!(store.is_dark());
    }

    #[test]
    fn test_set_persists_and_applies() {
        let (mut store, storage, _) = store_with(MemoryStorage::new(), ResolvedTheme::Light);

        store.set_preference(ThemePreference::Dark);
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
        assert!(store.is_dark());

        store.set_preference(ThemePreference::System);
        assert_eq!(storage.get("theme").as_deref(), Some("system"));
        assert!(!store.is_dark());
    }

    #[test]
    fn test_set_str_ignores_invalid() {
        let storage = MemoryStorage::with_value("theme", "dark");
        let (mut store, storage, _) = store_with(storage, ResolvedTheme::Light);

        store.set_preference_str("");
        store.set_preference_str("Light");
        assert_eq!(store.preference(), ThemePreference::Dark);
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));

        store.set_preference_str("light");
        assert_eq!(store.preference(), ThemePreference::Light);
    }

    #[test]
    fn test_toggle_cycle() {
        let (mut store, storage, _) = store_with(MemoryStorage::new(), ResolvedTheme::Light);

        assert_eq!(store.toggle_preference(), ThemePreference::Dark);
        assert_eq!(store.toggle_preference(), ThemePreference::System);
        assert_eq!(store.toggle_preference(), ThemePreference::Dark);
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_toggle_from_system_with_dark_os() {
        let (mut store, storage, _) = store_with(MemoryStorage::new(), ResolvedTheme::Dark);
        assert_eq!(store.toggle_preference(), ThemePreference::Light);
        assert_eq!(storage.get("theme").as_deref(), Some("light"));
        assert!(!store.is_dark());
    }

    #[test]
    fn test_os_change_reapplied_in_system_mode() {
        let (mut store, _, os) = store_with(MemoryStorage::new(), ResolvedTheme::Light);

        os.set(ResolvedTheme::Dark);
        assert_eq!(store.process_signals(), 1);
        assert!(store.is_dark());
        assert_eq!(store.resolved_theme(), ResolvedTheme::Dark);
    }

    #[test]
    fn test_os_change_ignored_with_explicit_preference() {
        let storage = MemoryStorage::with_value("theme", "light");
        let (mut store, _, os) = store_with(storage, ResolvedTheme::Light);

        os.set(ResolvedTheme::Dark);
        assert_eq!(store.process_signals(), 1);
        assert!(!store.is_dark());
        assert_eq!(store.resolved_theme(), ResolvedTheme::Light);
    }

    #[test]
    fn test_external_scope_receives_every_apply() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let os = ManualColorScheme::new(ResolvedTheme::Light);

        let mut store = ThemeStore::builder()
            .color_scheme(os.clone())
            .scope(move |theme: ResolvedTheme| sink.borrow_mut().push(theme))
            .build();

        store.set_preference(ThemePreference::Dark);
        store.set_preference(ThemePreference::System);
        os.set(ResolvedTheme::Dark);
        store.process_signals();

        assert_eq!(
            *seen.borrow(),
            vec![
                ResolvedTheme::Light,
                ResolvedTheme::Dark,
                ResolvedTheme::Light,
                ResolvedTheme::Dark,
            ]
        );
    }

    #[test]
    fn test_broken_storage_falls_back() {
        let mut store = ThemeStore::new(BrokenStorage, ManualColorScheme::new(ResolvedTheme::Dark));
        assert_eq!(store.preference(), ThemePreference::System);

        store.set_preference(ThemePreference::Light);
        assert_eq!(store.preference(), ThemePreference::Light);
        assert!(!store.is_dark());
    }

    #[test]
    fn test_unavailable_signal_resolves_light() {
        let os = ManualColorScheme::unavailable();
        let store = ThemeStore::new(MemoryStorage::new(), os.clone());
        assert_eq!(os.query(), Err(SignalError::Unavailable));
        assert_eq!(store.resolved_theme(), ResolvedTheme::Light);
        assert!(!store.is_dark());
    }

    #[test]
    fn test_custom_storage_key() {
        let storage = MemoryStorage::new();
        let mut store = ThemeStore::builder()
            .storage(storage.clone())
            .color_scheme(ManualColorScheme::new(ResolvedTheme::Light))
            .storage_key("ui-theme")
            .build();

        store.set_preference(ThemePreference::Dark);
        assert_eq!(store.storage_key(), "ui-theme");
        assert_eq!(storage.get("ui-theme").as_deref(), Some("dark"));
        assert_eq!(storage.get("theme"), None);
    }

    #[test]
    fn test_close_unsubscribes() {
        let os = ManualColorScheme::new(ResolvedTheme::Light);
        let store = ThemeStore::new(MemoryStorage::new(), os.clone());
        assert!(store.is_subscribed());
        assert_eq!(os.listener_count(), 1);

        store.close();
        assert_eq!(os.listener_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let os = ManualColorScheme::new(ResolvedTheme::Light);
        {
            let _store = ThemeStore::new(MemoryStorage::new(), os.clone());
            assert_eq!(os.listener_count(), 1);
        }
        assert_eq!(os.listener_count(), 0);
    }

    #[test]
    fn test_wait_for_signal_times_out() {
        let (mut store, _, _) = store_with(MemoryStorage::new(), ResolvedTheme::Light);
        assert!(!store.wait_for_signal(Duration::from_millis(10)));
    }

    #[test]
    fn test_wait_for_signal_handles_pending() {
        let (mut store, _, os) = store_with(MemoryStorage::new(), ResolvedTheme::Light);
        os.set(ResolvedTheme::Dark);
        assert!(store.wait_for_signal(Duration::from_millis(10)));
        assert!(store.is_dark());
    }

    #[test]
    fn test_disconnected_source_releases_subscription() {
        let mut store = ThemeStore::new(MemoryStorage::new(), SilentColorScheme);
        assert!(store.is_subscribed());

        assert!(!store.wait_for_signal(Duration::from_millis(10)));
        assert!(!store.is_subscribed());
        assert!(!store.wait_for_signal(Duration::from_secs(5)));
    }

    #[test]
    fn test_process_signals_detects_disconnect() {
        let mut store = ThemeStore::new(MemoryStorage::new(), SilentColorScheme);
        assert_eq!(store.process_signals(), 0);
        assert!(!store.is_subscribed());
    }

    #[test]
    fn test_unavailable_os_reapplies_light() {
        let (mut store, _, os) = store_with(MemoryStorage::new(), ResolvedTheme::Dark);
        assert!(store.is_dark());

        os.set_unavailable();
        assert_eq!(store.process_signals(), 1);
        assert_eq!(store.resolved_theme(), ResolvedTheme::Light);
        assert!(!store.is_dark());
    }

    #[test]
    fn test_snapshot() {
        let (mut store, _, _) = store_with(MemoryStorage::new(), ResolvedTheme::Dark);
        assert_eq!(
            store.snapshot(),
            ThemeSnapshot {
                preference: ThemePreference::System,
                resolved: ResolvedTheme::Dark,
                dark: true,
            }
        );

        store.set_preference(ThemePreference::Light);
        let json = serde_json::to_string(&store.snapshot()).unwrap();
        assert_eq!(json, r#"{"preference":"light","resolved":"light","dark":false}"#);
    }
}
