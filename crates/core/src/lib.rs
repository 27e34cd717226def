// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! skiff-core: lifecycle core for the skiff sync agent
//!
//! This crate provides the sync process orchestrator: the lifecycle state
//! machine, its persisted runtime state, the error and stats value types,
//! the phase-change listener registry, and the collaborator contracts the
//! transfer engine plugs into.

pub mod collab;
pub mod config;
pub mod error;
pub mod listener;
pub mod orchestrator;
pub mod phase;
pub mod process_error;
pub mod state_file;
pub mod stats;

pub use collab::{
    ChangeQueue, Collaborators, EngineFactory, OptimizerGuard, RemoteStore, StatusTracker,
    StoreConnector, StoreHandle, TransferEngine, TransferOutcome, TransferRecord,
};
pub use config::{StoreConfig, SyncConfig};
pub use error::{Error, Result};
pub use listener::{ListenerSet, PhaseListener};
pub use orchestrator::{DrainPolicy, Orchestrator};
pub use phase::Phase;
pub use process_error::ProcessError;
pub use state_file::{PersistedState, RuntimeStateFile};
pub use stats::ProcessStats;
