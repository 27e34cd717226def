// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync process orchestrator.
//!
//! Owns the lifecycle state machine and the background workers that drive
//! each phase. Public lifecycle calls return immediately; the actual
//! start-up, drain-and-stop, and drain-and-pause sequences run on
//! dedicated threads that request the next transition when they finish.
//!
//! Every accepted transition is atomic: validation against the phase
//! table, the persistence write, and the phase swap all happen under one
//! lock. Listener notification happens after the lock is released, over a
//! snapshot of the listener list, so a listener may call back into the
//! orchestrator (the restart composition does).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::collab::{Collaborators, TransferEngine};
use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::listener::{ListenerSet, PhaseListener};
use crate::phase::Phase;
use crate::process_error::ProcessError;
use crate::state_file::{PersistedState, RuntimeStateFile};
use crate::stats::ProcessStats;

/// How the stop and pause workers wait for in-flight transfers.
///
/// Draining is a fixed-interval poll of the engine's in-flight set. The
/// optional timeout bounds a drain wedged on a stuck transfer: when it
/// elapses the engine is force-shut and the machine lands in
/// [`Phase::Error`].
#[derive(Debug, Clone, Copy)]
pub struct DrainPolicy {
    /// How often to re-check the in-flight set.
    pub poll_interval: Duration,
    /// Give up after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for DrainPolicy {
    fn default() -> Self {
        DrainPolicy {
            poll_interval: Duration::from_secs(3),
            timeout: None,
        }
    }
}

/// Mutable state guarded by the orchestrator lock.
struct Inner {
    phase: Phase,
    error: Option<ProcessError>,
    started_at: Option<DateTime<Utc>>,
    /// The running engine, present between a successful start sequence and
    /// the end of the next drain. Replaced wholesale on each start/resume.
    engine: Option<Arc<dyn TransferEngine>>,
}

struct Shared {
    inner: Mutex<Inner>,
    listeners: ListenerSet,
    state_file: RuntimeStateFile,
    config: SyncConfig,
    collab: Collaborators,
    drain: DrainPolicy,
}

/// The sync process orchestrator. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Orchestrator {
    shared: Arc<Shared>,
}

impl Orchestrator {
    /// Construct with the default drain policy. See [`Self::with_drain_policy`].
    pub fn new(config: SyncConfig, state_file: RuntimeStateFile, collab: Collaborators) -> Self {
        Self::with_drain_policy(config, state_file, collab, DrainPolicy::default())
    }

    /// Construct the orchestrator and, when the persisted phase shows the
    /// previous process died while running and the configuration is
    /// complete, start automatically. Auto-start failure is logged and
    /// leaves the machine stopped; it is not retried.
    pub fn with_drain_policy(
        config: SyncConfig,
        state_file: RuntimeStateFile,
        collab: Collaborators,
        drain: DrainPolicy,
    ) -> Self {
        let persisted = state_file.load();
        let orch = Orchestrator {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    phase: Phase::Stopped,
                    error: None,
                    started_at: None,
                    engine: None,
                }),
                listeners: ListenerSet::new(),
                state_file,
                config,
                collab,
                drain,
            }),
        };
        if persisted.phase == Some(Phase::Running) {
            if orch.shared.config.is_complete() {
                tracing::info!("previous run ended while running; starting automatically");
                orch.start();
            } else {
                tracing::warn!(
                    "previous run ended while running but configuration is incomplete; staying stopped"
                );
            }
        }
        orch
    }

    fn from_shared(shared: Arc<Shared>) -> Self {
        Orchestrator { shared }
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// The retained error from the most recent failure, if any.
    pub fn error(&self) -> Option<ProcessError> {
        self.lock().error.clone()
    }

    /// Drop the retained error.
    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    /// Snapshot of the live counters. Valid in any phase; the counts are
    /// zero when nothing is running.
    pub fn stats(&self) -> ProcessStats {
        let started_at = self.lock().started_at;
        ProcessStats {
            started_at,
            queued: self.shared.collab.queue.len(),
            failed: self.shared.collab.status.failed().len(),
        }
    }

    /// Register a phase-change listener.
    pub fn add_listener(&self, listener: Arc<dyn PhaseListener>) {
        self.shared.listeners.add(listener);
    }

    /// Unregister a phase-change listener by identity.
    pub fn remove_listener(&self, listener: &Arc<dyn PhaseListener>) {
        self.shared.listeners.remove(listener);
    }

    /// Start syncing. Legal only from [`Phase::Stopped`].
    ///
    /// Returns immediately; the start sequence (connect, build engine)
    /// runs on a background worker and resolves to `Running`, or to
    /// `Stopped` with a retained error on failure. If the transfer
    /// optimizer is running the request is refused without a phase change
    /// and an error is retained.
    pub fn start(&self) {
        {
            let mut inner = self.lock();
            if inner.phase == Phase::Stopped && self.shared.collab.optimizer.is_running() {
                tracing::warn!("start refused: transfer optimizer is running");
                inner.error = Some(
                    ProcessError::new(Error::OptimizerBusy.to_string())
                        .with_keys("sync.error.optimizer", "sync.error.optimizer.resolution"),
                );
                return;
            }
        }
        self.begin_start();
    }

    /// Stop syncing. Legal from [`Phase::Running`] and [`Phase::Paused`];
    /// a duplicate request while already stopping is a no-op.
    ///
    /// The background worker halts engine intake, waits for in-flight
    /// transfers to finish, discards the change queue, and lands in
    /// `Stopped`.
    pub fn stop(&self) {
        // An operator stop is only meaningful from Running or Paused; a
        // start sequence in flight must not be interrupted even though the
        // failure path shares the Starting -> Stopping edge.
        if self.transition_from(Phase::Running, Phase::Stopping)
            || self.transition_from(Phase::Paused, Phase::Stopping)
        {
            self.spawn_worker("skiff-stop", move |orch| {
                orch.run_drain(Phase::Stopped, true);
            });
        } else {
            tracing::debug!("ignoring stop request while {}", self.phase());
        }
    }

    /// Pause syncing. Legal only from [`Phase::Running`].
    ///
    /// Same drain as [`Self::stop`], but queued changes are preserved so
    /// `resume` continues without a re-scan.
    pub fn pause(&self) {
        if self.transition(Phase::Pausing) {
            self.spawn_worker("skiff-pause", move |orch| {
                orch.run_drain(Phase::Paused, false);
            });
        }
    }

    /// Resume syncing after a pause. Legal only from [`Phase::Paused`].
    ///
    /// Runs the identical start sequence as [`Self::start`], without the
    /// optimizer precondition.
    pub fn resume(&self) {
        if self.transition(Phase::Resuming) {
            self.spawn_worker("skiff-resume", move |orch| {
                orch.run_start_sequence();
            });
        }
    }

    /// Stop, then start again once `Stopped` is observed. Legal only from
    /// [`Phase::Running`].
    ///
    /// Restart is not a phase of its own: it chains the two legal
    /// transitions through a one-shot listener.
    pub fn restart(&self) {
        // Claim the Stopping edge from Running before registering the
        // listener: a request that loses the race to a concurrent pause or
        // stop must leave nothing behind. The drain worker is spawned
        // after registration, so the listener cannot miss Stopped.
        if self.transition_from(Phase::Running, Phase::Stopping) {
            RestartListener::register(self);
            self.spawn_worker("skiff-stop", move |orch| {
                orch.run_drain(Phase::Stopped, true);
            });
        } else {
            tracing::debug!("ignoring restart request while {}", self.phase());
        }
    }

    /// Enter the start sequence from Stopped without re-checking the
    /// optimizer. Shared by `start` and the restart listener.
    fn begin_start(&self) {
        let accepted = self.transition_with(Phase::Starting, |inner| {
            inner.error = None;
            inner.started_at = Some(Utc::now());
        });
        if accepted {
            self.spawn_worker("skiff-start", move |orch| {
                orch.run_start_sequence();
            });
        }
    }

    /// The asynchronous start sequence, run from Starting or Resuming.
    fn run_start_sequence(&self) {
        match self.bring_up() {
            Ok(engine) => {
                self.lock().engine = Some(engine.clone());
                if !self.transition(Phase::Running) {
                    // The machine moved somewhere else while we were
                    // starting; this engine has no owner, take it down.
                    engine.halt_intake();
                    engine.shutdown();
                    self.lock().engine = None;
                }
            }
            Err(e) => {
                tracing::error!("start sequence failed: {}", e);
                self.record_error(
                    ProcessError::new(e.to_string())
                        .with_keys("sync.error.start", "sync.error.start.resolution"),
                );
                // Resolve the failure to Stopped. From Resuming the table
                // has no edge to Stopping, so a failed resume lands in the
                // terminal Error phase instead.
                if self.transition(Phase::Stopping) {
                    self.transition(Phase::Stopped);
                } else {
                    self.transition(Phase::Error);
                }
            }
        }
    }

    /// Validate configuration, authenticate, and start the engine. The
    /// factory unwinds partially started components on error.
    fn bring_up(&self) -> Result<Arc<dyn TransferEngine>> {
        if self.shared.config.watch_dirs.is_empty() {
            return Err(Error::NoWatchDirs);
        }
        let store = self.shared.collab.connector.connect()?;
        self.shared
            .collab
            .factory
            .start_engine(&self.shared.config, store)
    }

    /// Halt intake, drain in-flight transfers, shut the engine down, and
    /// land in `terminal`. `discard_queue` distinguishes stop from pause.
    fn run_drain(&self, terminal: Phase, discard_queue: bool) {
        let engine = self.lock().engine.clone();
        if let Some(engine) = &engine {
            engine.halt_intake();
            let drain = self.shared.drain;
            let started = Instant::now();
            loop {
                let in_flight = engine.files_in_transfer();
                if in_flight.is_empty() {
                    break;
                }
                if let Some(timeout) = drain.timeout {
                    if started.elapsed() >= timeout {
                        tracing::error!(
                            "drain timed out with {} transfers in flight",
                            in_flight.len()
                        );
                        self.record_error(
                            ProcessError::new(format!(
                                "drain timed out; {} transfers still in flight",
                                in_flight.len()
                            ))
                            .with_keys("sync.error.stuck", "sync.error.stuck.resolution"),
                        );
                        engine.shutdown();
                        self.lock().engine = None;
                        self.transition(Phase::Error);
                        return;
                    }
                }
                tracing::debug!("waiting for {} in-flight transfers", in_flight.len());
                std::thread::sleep(drain.poll_interval);
            }
            engine.shutdown();
        }
        self.lock().engine = None;
        if discard_queue {
            self.shared.collab.queue.clear();
        }
        self.transition(terminal);
    }

    /// Request a phase transition with no extra state changes.
    fn transition(&self, to: Phase) -> bool {
        self.transition_inner(to, None, |_| {})
    }

    /// Request a phase transition accepted only while the current phase is
    /// `from`. Used where an operation is legal from a strict subset of
    /// the phases the table allows for the target, so the check and the
    /// swap stay under one lock.
    fn transition_from(&self, from: Phase, to: Phase) -> bool {
        self.transition_inner(to, Some(from), |_| {})
    }

    /// Request a phase transition. When accepted, `on_accept` runs under
    /// the same lock as the swap. Rejections (illegal per the table, or a
    /// refused persistence write) are silent apart from the log.
    fn transition_with(&self, to: Phase, on_accept: impl FnOnce(&mut Inner)) -> bool {
        self.transition_inner(to, None, on_accept)
    }

    fn transition_inner(
        &self,
        to: Phase,
        only_from: Option<Phase>,
        on_accept: impl FnOnce(&mut Inner),
    ) -> bool {
        let accepted = {
            let mut inner = self.lock();
            if only_from.is_some_and(|from| inner.phase != from) {
                tracing::debug!("ignoring transition to {} while {}", to, inner.phase);
                false
            } else if !inner.phase.can_transition_to(to) {
                tracing::debug!(
                    "ignoring illegal transition {} -> {} (legal targets: {})",
                    inner.phase,
                    to,
                    inner.phase.valid_targets()
                );
                false
            } else if let Err(e) = self
                .shared
                .state_file
                .save(&PersistedState { phase: Some(to) })
            {
                tracing::error!("refusing transition {} -> {}: {}", inner.phase, to, e);
                inner.error = Some(
                    ProcessError::new(e.to_string())
                        .with_keys("sync.error.state", "sync.error.state.resolution"),
                );
                false
            } else {
                tracing::info!("phase {} -> {}", inner.phase, to);
                inner.phase = to;
                on_accept(&mut inner);
                true
            }
        };
        if accepted {
            self.shared.listeners.notify(to);
        }
        accepted
    }

    fn record_error(&self, error: ProcessError) {
        self.lock().error = Some(error);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.shared.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn spawn_worker(&self, name: &str, body: impl FnOnce(Orchestrator) + Send + 'static) {
        let orch = self.clone();
        let spawned = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || body(orch));
        if let Err(e) = spawned {
            tracing::error!("failed to spawn {} worker: {}", name, e);
        }
    }
}

/// One-shot listener implementing the restart composition: on observing
/// `Stopped` it deregisters itself and re-enters the start sequence.
///
/// Holds the orchestrator weakly so an unfired listener does not keep the
/// orchestrator (and itself) alive through the registry.
struct RestartListener {
    shared: Weak<Shared>,
    this: Mutex<Weak<RestartListener>>,
    fired: AtomicBool,
}

impl RestartListener {
    fn register(orch: &Orchestrator) {
        let listener = Arc::new(RestartListener {
            shared: Arc::downgrade(&orch.shared),
            this: Mutex::new(Weak::new()),
            fired: AtomicBool::new(false),
        });
        if let Ok(mut this) = listener.this.lock() {
            *this = Arc::downgrade(&listener);
        }
        orch.add_listener(listener);
    }
}

impl PhaseListener for RestartListener {
    fn phase_changed(&self, phase: Phase) {
        if phase != Phase::Stopped {
            return;
        }
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let orch = Orchestrator::from_shared(shared);
        let this = match self.this.lock() {
            Ok(weak) => weak.upgrade(),
            Err(poisoned) => poisoned.into_inner().upgrade(),
        };
        if let Some(this) = this {
            let this: Arc<dyn PhaseListener> = this;
            orch.remove_listener(&this);
        }
        tracing::info!("restart: stop observed, starting again");
        orch.begin_start();
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
