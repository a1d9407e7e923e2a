//! Session observation. Callbacks see every auth state change for one visit.
//!
//! `observe` returns a `Subscription`; dropping it unsubscribes. Callbacks run
//! synchronously on the caller of `set`, outside the observer's locks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::auth::AuthUser;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthPhase {
    /// Session presence not yet known.
    Pending,
    Anonymous,
    Authenticated(AuthUser),
}

type Callback = Arc<dyn Fn(&AuthPhase) + Send + Sync>;

struct Inner {
    phase: Mutex<AuthPhase>,
    subscribers: Mutex<Vec<(u64, Callback)>>,
    next_id: AtomicU64,
}

#[derive(Clone)]
pub struct AuthObserver {
    inner: Arc<Inner>,
}

impl Default for AuthObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthObserver {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                phase: Mutex::new(AuthPhase::Pending),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.inner.phase.lock().clone()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        match &*self.inner.phase.lock() {
            AuthPhase::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// Registers `callback`. If the phase is already known it is delivered immediately.
    pub fn observe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AuthPhase) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback = Arc::new(callback);
        self.inner.subscribers.lock().push((id, callback.clone()));

        let phase = self.phase();
        if phase != AuthPhase::Pending {
            callback(&phase);
        }

        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn set(&self, phase: AuthPhase) {
        *self.inner.phase.lock() = phase.clone();
        let subscribers: Vec<Callback> = self
            .inner
            .subscribers
            .lock()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in subscribers {
            callback(&phase);
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

/// Live registration with an `AuthObserver`. Unsubscribes on drop.
pub struct Subscription {
    inner: Weak<Inner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.subscribers.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> AuthUser {
        AuthUser {
            uid: "uid-1".into(),
            email: Some("name@example.com".into()),
            display_name: None,
            provider: "password".into(),
            signed_in_at: Utc::now(),
        }
    }

    #[test]
    fn test_starts_pending_without_immediate_delivery() {
        let observer = AuthObserver::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = observer.observe(move |p| sink.lock().push(p.clone()));
        assert!(seen.lock().is_empty());
        assert_eq!(observer.phase(), AuthPhase::Pending);
    }

    #[test]
    fn test_known_phase_delivered_on_subscribe() {
        let observer = AuthObserver::new();
        observer.set(AuthPhase::Anonymous);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = observer.observe(move |p| sink.lock().push(p.clone()));
        assert_eq!(*seen.lock(), vec![AuthPhase::Anonymous]);
    }

    #[test]
    fn test_changes_are_delivered_in_order() {
        let observer = AuthObserver::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = observer.observe(move |p| sink.lock().push(p.clone()));

        let u = user();
        observer.set(AuthPhase::Authenticated(u.clone()));
        observer.set(AuthPhase::Anonymous);

        assert_eq!(
            *seen.lock(),
            vec![AuthPhase::Authenticated(u), AuthPhase::Anonymous]
        );
        assert!(observer.current_user().is_none());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let observer = AuthObserver::new();
        let seen = Arc::new(Mutex::new(0usize));
        let sink = seen.clone();
        let sub = observer.observe(move |_| *sink.lock() += 1);
        assert_eq!(observer.subscriber_count(), 1);

        drop(sub);
        observer.set(AuthPhase::Anonymous);

        assert_eq!(observer.subscriber_count(), 0);
        assert_eq!(*seen.lock(), 0);
    }

    #[test]
    fn test_callback_may_read_observer() {
        let observer = AuthObserver::new();
        let reader = observer.clone();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let _sub = observer.observe(move |_| *sink.lock() = reader.current_user());
        observer.set(AuthPhase::Authenticated(user()));
        assert_eq!(seen.lock().as_ref().map(|u| u.uid.clone()), Some("uid-1".into()));
    }
}
