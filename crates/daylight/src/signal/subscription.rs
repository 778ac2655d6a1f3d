use std::fmt;

/// Handle to an active color-scheme subscription.
///
/// The release action runs once: on [`unsubscribe`](Self::unsubscribe) or on
/// drop, whichever comes first.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps the action that tears the subscription down.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release, for sources that never notify.
    pub fn inactive() -> Self {
        Self { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Releases the subscription now.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting() -> (Rc<Cell<u32>>, Subscription) {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        (calls, sub)
    }

    #[test]
    fn test_unsubscribe_releases_once() {
        let (calls, sub) = counting();
        assert!(sub.is_active());
        sub.unsubscribe();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_drop_releases_once() {
        let (calls, sub) = counting();
        drop(sub);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_inactive_has_nothing_to_release() {
        let sub = Subscription::inactive();
        assert!(!sub.is_active());
        sub.unsubscribe();
    }
}
