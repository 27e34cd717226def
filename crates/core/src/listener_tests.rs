// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Weak;

struct Recorder {
    seen: Mutex<Vec<Phase>>,
}

impl Recorder {
    fn new() -> Arc<Self> {
        Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<Phase> {
        self.seen.lock().unwrap().clone()
    }
}

impl PhaseListener for Recorder {
    fn phase_changed(&self, phase: Phase) {
        self.seen.lock().unwrap().push(phase);
    }
}

struct Panicker;

impl PhaseListener for Panicker {
    fn phase_changed(&self, _phase: Phase) {
        panic!("listener blew up");
    }
}

#[test]
fn notify_reaches_all_listeners_in_order() {
    let set = ListenerSet::new();
    let a = Recorder::new();
    let b = Recorder::new();
    set.add(a.clone());
    set.add(b.clone());

    set.notify(Phase::Starting);
    set.notify(Phase::Running);

    assert_eq!(a.seen(), vec![Phase::Starting, Phase::Running]);
    assert_eq!(b.seen(), vec![Phase::Starting, Phase::Running]);
}

#[test]
fn duplicate_add_is_ignored() {
    let set = ListenerSet::new();
    let a = Recorder::new();
    set.add(a.clone());
    set.add(a.clone());
    assert_eq!(set.len(), 1);

    set.notify(Phase::Stopped);
    assert_eq!(a.seen(), vec![Phase::Stopped]);
}

#[test]
fn removed_listener_no_longer_notified() {
    let set = ListenerSet::new();
    let a = Recorder::new();
    let dyn_a: Arc<dyn PhaseListener> = a.clone();
    set.add(dyn_a.clone());
    set.notify(Phase::Starting);
    set.remove(&dyn_a);
    set.notify(Phase::Running);
    assert_eq!(a.seen(), vec![Phase::Starting]);
    assert!(set.is_empty());
}

#[test]
fn removing_unknown_listener_is_noop() {
    let set = ListenerSet::new();
    set.add(Recorder::new());
    let stranger: Arc<dyn PhaseListener> = Recorder::new();
    set.remove(&stranger);
    assert_eq!(set.len(), 1);
}

#[test]
fn panicking_listener_does_not_block_others() {
    let set = ListenerSet::new();
    let a = Recorder::new();
    set.add(Arc::new(Panicker));
    set.add(a.clone());

    set.notify(Phase::Stopping);
    set.notify(Phase::Stopped);

    assert_eq!(a.seen(), vec![Phase::Stopping, Phase::Stopped]);
    assert_eq!(set.len(), 2);
}

struct SelfRemover {
    set: Weak<ListenerSet>,
    this: Mutex<Weak<SelfRemover>>,
    fired: AtomicUsize,
}

impl PhaseListener for SelfRemover {
    fn phase_changed(&self, _phase: Phase) {
        self.fired.fetch_add(1, Ordering::SeqCst);
        let (Some(set), Some(this)) = (self.set.upgrade(), self.this.lock().unwrap().upgrade())
        else {
            return;
        };
        let this: Arc<dyn PhaseListener> = this;
        set.remove(&this);
    }
}

#[test]
fn listener_may_remove_itself_during_notification() {
    let set = Arc::new(ListenerSet::new());
    let remover = Arc::new(SelfRemover {
        set: Arc::downgrade(&set),
        this: Mutex::new(Weak::new()),
        fired: AtomicUsize::new(0),
    });
    *remover.this.lock().unwrap() = Arc::downgrade(&remover);
    set.add(remover.clone());

    set.notify(Phase::Stopped);
    assert_eq!(remover.fired.load(Ordering::SeqCst), 1);
    assert!(set.is_empty());

    set.notify(Phase::Starting);
    assert_eq!(remover.fired.load(Ordering::SeqCst), 1);
}
