// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle phases of the sync process state machine.
//!
//! Exactly one phase is active at a time. The transition table in
//! [`Phase::can_transition_to`] is the single source of truth for which
//! phase changes the orchestrator will accept; everything else is rejected
//! as a no-op.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A named state of the sync process lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No engine running. Initial state and the only state `start` accepts.
    Stopped,
    /// Start sequence in flight: authenticating and bringing up the engine.
    Starting,
    /// Engine up, changes being detected and transferred.
    Running,
    /// Draining in-flight transfers; the change queue is preserved.
    Pausing,
    /// Engine down, queued changes retained for `resume`.
    Paused,
    /// Start sequence in flight after a pause.
    Resuming,
    /// Draining in-flight transfers; queued changes will be discarded.
    Stopping,
    /// Terminal: a drain got stuck. Requires a process restart.
    Error,
}

/// All phases, in a fixed order. Used for exhaustive checks.
pub const ALL_PHASES: [Phase; 8] = [
    Phase::Stopped,
    Phase::Starting,
    Phase::Running,
    Phase::Pausing,
    Phase::Paused,
    Phase::Resuming,
    Phase::Stopping,
    Phase::Error,
];

impl Phase {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Stopped => "stopped",
            Phase::Starting => "starting",
            Phase::Running => "running",
            Phase::Pausing => "pausing",
            Phase::Paused => "paused",
            Phase::Resuming => "resuming",
            Phase::Stopping => "stopping",
            Phase::Error => "error",
        }
    }

    /// Check whether a transition from this phase to `target` is legal.
    ///
    /// This is the complete transition table; there is no path out of
    /// [`Phase::Error`].
    pub fn can_transition_to(&self, target: Phase) -> bool {
        use Phase::*;
        matches!(
            (*self, target),
            (Stopped, Starting)
                | (Starting, Running)
                | (Starting, Stopping)
                | (Starting, Error)
                | (Running, Stopping)
                | (Running, Pausing)
                | (Running, Error)
                | (Stopping, Stopped)
                | (Stopping, Error)
                | (Pausing, Paused)
                | (Pausing, Error)
                | (Paused, Resuming)
                | (Paused, Stopping)
                | (Paused, Error)
                | (Resuming, Running)
                | (Resuming, Error)
        )
    }

    /// Get legal transition targets as a formatted string, for logs.
    pub fn valid_targets(&self) -> String {
        let targets: Vec<&str> = ALL_PHASES
            .iter()
            .filter(|t| self.can_transition_to(**t))
            .map(|t| t.as_str())
            .collect();
        if targets.is_empty() {
            "(none)".to_string()
        } else {
            targets.join(", ")
        }
    }

}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Phase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "stopped" => Ok(Phase::Stopped),
            "starting" => Ok(Phase::Starting),
            "running" => Ok(Phase::Running),
            "pausing" => Ok(Phase::Pausing),
            "paused" => Ok(Phase::Paused),
            "resuming" => Ok(Phase::Resuming),
            "stopping" => Ok(Phase::Stopping),
            "error" => Ok(Phase::Error),
            _ => Err(Error::InvalidPhase(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
