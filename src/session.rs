//! Session-expired signal shared by every request of a client.

use std::{fmt, sync::Arc};

use arc_swap::ArcSwapOption;

/// Callback invoked when a request is rejected with 401.
pub type SessionCallback = Box<dyn Fn() + Send + Sync>;

/// Assignable slot for the session-expired callback.
///
/// Cloning shares the slot, so every clone of an [`ApiClient`](crate::ApiClient)
/// sees the same callback. The session owner is the only writer: it calls
/// [`SessionHook::set`] when a session starts and [`SessionHook::clear`] on
/// teardown. Assignment is a single atomic pointer swap: last writer wins
/// and readers never block. An empty slot makes notification a no-op.
#[derive(Clone, Default)]
pub struct SessionHook {
    slot: Arc<ArcSwapOption<SessionCallback>>,
}

impl fmt::Debug for SessionHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHook")
            .field("assigned", &self.is_set())
            .finish()
    }
}

impl SessionHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the callback, replacing any previous one.
    pub fn set<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let callback: SessionCallback = Box::new(callback);
        self.slot.store(Some(Arc::new(callback)));
    }

    pub fn clear(&self) {
        self.slot.store(None);
    }

    pub fn is_set(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Runs the callback, if any, synchronously on the caller's task.
    pub(crate) fn notify(&self) {
        // Own the Arc so the callback may itself set or clear the hook.
        if let Some(callback) = self.slot.load_full() {
            #[cfg(feature = "tracing")]
            tracing::debug!("session expired; notifying session hook");
            (**callback)();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::SessionHook;

    #[test]
    fn unassigned_notify_is_noop() {
        let hook = SessionHook::new();
        assert!(!hook.is_set());
        hook.notify();
    }

    #[test]
    fn clones_share_the_slot() {
        let hook = SessionHook::new();
        let shared = hook.clone();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        hook.set(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        shared.notify();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        hook.clear();
        shared.notify();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!shared.is_set());
    }

    #[test]
    fn callback_may_clear_itself() {
        let hook = SessionHook::new();
        let inner = hook.clone();
        hook.set(move || inner.clear());
        hook.notify();
        assert!(!hook.is_set());
    }

    #[test]
    fn debug_hides_callback() {
        let hook = SessionHook::new();
        hook.set(|| {});
        assert_eq!(format!("{hook:?}"), "SessionHook { assigned: true }");
    }

    #[test]
    fn concurrent_swaps_never_block_notify() {
        let hook = SessionHook::new();
        let calls = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let hook = hook.clone();
                let calls = Arc::clone(&calls);
                scope.spawn(move || {
                    for _ in 0..100 {
                        let counter = Arc::clone(&calls);
                        hook.set(move || {
                            counter.fetch_add(1, Ordering::SeqCst);
                        });
                        hook.notify();
                        hook.clear();
                    }
                });
            }
        });

        assert!(!hook.is_set());
        assert!(calls.load(Ordering::SeqCst) <= 400);
    }
}
