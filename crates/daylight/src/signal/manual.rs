use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ColorSchemeSource, Subscription};
use crate::error::SignalError;
use crate::preference::ResolvedTheme;

/// A color-scheme source driven by the host.
///
/// Useful when the platform delivers appearance changes through its own
/// event loop (a window event, a portal signal) rather than something the
/// store can poll. Clones share state, so one handle can be given to the
/// store while another pushes changes.
///
/// # Example
///
/// ```rust
/// use daylight::{ManualColorScheme, ColorSchemeSource, ResolvedTheme};
///
/// let scheme = ManualColorScheme::new(ResolvedTheme::Light);
/// scheme.set_prefers_dark(true);
/// assert_eq!(scheme.query(), Ok(ResolvedTheme::Dark));
/// ```
#[derive(Debug, Clone)]
pub struct ManualColorScheme {
    state: Arc<Mutex<ManualState>>,
}

#[derive(Debug)]
struct ManualState {
    current: Option<ResolvedTheme>,
    listeners: Vec<(u64, Sender<ResolvedTheme>)>,
    next_id: u64,
}

impl ManualColorScheme {
    pub fn new(initial: ResolvedTheme) -> Self {
        Self::from_state(Some(initial))
    }

    /// A source whose queries fail until a value is set.
    pub fn unavailable() -> Self {
        Self::from_state(None)
    }

    fn from_state(current: Option<ResolvedTheme>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                current,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Updates the scheme and notifies subscribers if it changed.
    pub fn set(&self, theme: ResolvedTheme) {
        let mut state = self.lock();
        if state.current == Some(theme) {
            return;
        }
        state.current = Some(theme);
        state
            .listeners
            .retain(|(_, sender)| sender.send(theme).is_ok());
    }

    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.set(ResolvedTheme::from_prefers_dark(prefers_dark));
    }

    /// Makes subsequent queries fail.
    ///
    /// If a value was available, subscribers are notified with `Light`, the
    /// theme an unavailable signal resolves to.
    pub fn set_unavailable(&self) {
        let mut state = self.lock();
        if state.current.take().is_none() {
            return;
        }
        state
            .listeners
            .retain(|(_, sender)| sender.send(ResolvedTheme::Light).is_ok());
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ColorSchemeSource for ManualColorScheme {
    fn query(&self) -> Result<ResolvedTheme, SignalError> {
        self.lock().current.ok_or(SignalError::Unavailable)
    }

    fn subscribe(&self, sender: Sender<ResolvedTheme>) -> Subscription {
        let id = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, sender));
            id
        };

        let state = Arc::clone(&self.state);
        Subscription::new(move || {
            let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
            state.listeners.retain(|(listener, _)| *listener != id);
        })
    }
}
