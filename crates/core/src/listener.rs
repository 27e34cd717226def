// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Phase-change listener registry.
//!
//! Listeners are notified synchronously, in registration order, over a
//! snapshot of the list. The snapshot lets a listener register or remove
//! listeners (itself included) during notification, which the restart
//! composition relies on. A panicking listener is isolated so the
//! remaining listeners still run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use crate::phase::Phase;

/// Observer of accepted lifecycle transitions.
pub trait PhaseListener: Send + Sync {
    /// Called after a transition has been persisted, outside the
    /// orchestrator's lock. Calling back into the orchestrator is safe.
    fn phase_changed(&self, phase: Phase);
}

/// Ordered set of listeners, registered and removed by pointer identity.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Mutex<Vec<Arc<dyn PhaseListener>>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Re-adding the same `Arc` is a no-op.
    pub fn add(&self, listener: Arc<dyn PhaseListener>) {
        let mut listeners = lock_unpoisoned(&self.listeners);
        if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// Remove a listener by identity. Unknown listeners are ignored.
    pub fn remove(&self, listener: &Arc<dyn PhaseListener>) {
        let mut listeners = lock_unpoisoned(&self.listeners);
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        lock_unpoisoned(&self.listeners).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notify every listener registered at the time of the call.
    pub fn notify(&self, phase: Phase) {
        let snapshot: Vec<Arc<dyn PhaseListener>> = lock_unpoisoned(&self.listeners).clone();
        for listener in snapshot {
            let result = catch_unwind(AssertUnwindSafe(|| listener.phase_changed(phase)));
            if result.is_err() {
                tracing::warn!("phase listener panicked during {} notification", phase);
            }
        }
    }
}

/// A panic elsewhere poisons the mutex but cannot leave the guarded Vec
/// inconsistent, so recover the guard instead of propagating.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
