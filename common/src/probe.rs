//! Result of a single reachability check.

use std::fmt;

use chrono::{DateTime, Local};

/// Classification of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The check ran and the target answered.
    Success,
    /// The check ran and the target did not answer.
    Failure,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Success => write!(f, "reachable"),
            ProbeStatus::Failure => write!(f, "unreachable"),
        }
    }
}

/// What one probe observed. Consumed by the engine for branching and by the
/// audit log for recording, then dropped.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,
    /// Raw output of the check (stdout on success, stderr or stdout on failure).
    pub diagnostics: String,
    pub observed_at: DateTime<Local>,
}

impl ProbeOutcome {
    pub fn new(status: ProbeStatus, diagnostics: impl Into<String>) -> Self {
        Self {
            status,
            diagnostics: diagnostics.into(),
            observed_at: Local::now(),
        }
    }

    pub fn success(diagnostics: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Success, diagnostics)
    }

    pub fn failure(diagnostics: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Failure, diagnostics)
    }

    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}
