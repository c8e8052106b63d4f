//! # Escalation Engine
//!
//! Drives one target through its attempt budget:
//!
//! ```text
//! Attempting(1) ──fail──▶ Attempting(2) ──fail──▶ … ──fail──▶ Attempting(max) ──fail──▶ Escalated
//!       │                      │                                    │
//!       └────────success───────┴──────────────success───────────────┴──▶ Succeeded
//! ```
//!
//! Every attempt produces exactly one audit entry (INFO on success, ERROR on
//! failure) before the next attempt starts. The notifier is called once, after
//! the `max`-th failure, so a budget of 1 escalates on the first failure.

use pingwatch_common::config::MonitorConfig;
use pingwatch_common::notification::NotificationEvent;
use pingwatch_common::probe::{ProbeOutcome, ProbeStatus};
use pingwatch_common::target::Target;
use tracing::{debug, error, info, warn};

use crate::audit::{AuditEntry, AuditSink};
use crate::error::MonitorError;
use crate::notifier::Notifier;
use crate::prober::Prober;

/// How many failed attempts a target gets before it is escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    max_attempts: u32,
}

impl EscalationPolicy {
    pub fn new(max_attempts: u32) -> Result<Self, MonitorError> {
        if max_attempts == 0 {
            return Err(MonitorError::InvalidPolicy(
                "max_failures must be at least 1".to_string(),
            ));
        }
        Ok(Self { max_attempts })
    }

    pub fn from_config(cfg: &MonitorConfig) -> Result<Self, MonitorError> {
        Self::new(cfg.max_failures)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Terminal state of one target's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Succeeded { attempts: u32 },
    Escalated { attempts: u32 },
}

impl Verdict {
    pub fn attempts(&self) -> u32 {
        match self {
            Verdict::Succeeded { attempts } | Verdict::Escalated { attempts } => *attempts,
        }
    }

    pub fn is_escalated(&self) -> bool {
        matches!(self, Verdict::Escalated { .. })
    }
}

/// Attempt counter for a single target. The first attempt is attempt 1.
struct RetryState {
    attempt: u32,
}

impl RetryState {
    fn new() -> Self {
        Self { attempt: 1 }
    }

    fn is_last(&self, policy: &EscalationPolicy) -> bool {
        self.attempt >= policy.max_attempts
    }

    fn advance(&mut self) {
        self.attempt += 1;
    }
}

/// Probes `target` until it answers or the budget in `policy` is spent.
///
/// # Errors
/// * [`MonitorError::ProbeExecution`] when the check could not run at all.
/// * [`MonitorError::AuditSink`] when an attempt could not be recorded.
/// * [`MonitorError::NotificationDelivery`] when the escalation could not be
///   sent. All failure entries for the target are already written by then.
pub async fn monitor<P, N, A>(
    target: &Target,
    policy: &EscalationPolicy,
    prober: &P,
    notifier: &N,
    audit: &A,
) -> Result<Verdict, MonitorError>
where
    P: Prober + ?Sized,
    N: Notifier + ?Sized,
    A: AuditSink + ?Sized,
{
    let max = policy.max_attempts();
    let mut state = RetryState::new();

    loop {
        let attempt = state.attempt;
        debug!("Probing {target}, attempt {attempt}/{max}");

        let outcome = prober
            .probe(&target.address)
            .await
            .map_err(|source| MonitorError::ProbeExecution {
                target: target.to_string(),
                attempt,
                source,
            })?;

        audit.record(audit_entry(target, attempt, max, &outcome))?;

        match outcome.status {
            ProbeStatus::Success => {
                info!("{target} is reachable (attempt {attempt}/{max})");
                return Ok(Verdict::Succeeded { attempts: attempt });
            }
            ProbeStatus::Failure if state.is_last(policy) => {
                error!("{target} unreachable after {attempt} attempts, escalating");
                let event = NotificationEvent::new(target, max);
                notifier.notify(&event).await.map_err(|source| {
                    MonitorError::NotificationDelivery {
                        target: target.to_string(),
                        source,
                    }
                })?;
                return Ok(Verdict::Escalated { attempts: attempt });
            }
            ProbeStatus::Failure => {
                warn!("{target} did not answer (attempt {attempt}/{max})");
                state.advance();
            }
        }
    }
}

fn audit_entry(target: &Target, attempt: u32, max: u32, outcome: &ProbeOutcome) -> AuditEntry {
    let headline = match outcome.status {
        ProbeStatus::Success => format!(
            "Ping to {} ({}) successful, attempt {attempt}/{max}",
            target.name, target.address
        ),
        ProbeStatus::Failure => format!(
            "Failed to ping {} ({}), attempt {attempt}/{max}",
            target.name, target.address
        ),
    };

    let message = if outcome.diagnostics.is_empty() {
        headline
    } else {
        format!("{headline}\n{}", outcome.diagnostics)
    };

    let entry = match outcome.status {
        ProbeStatus::Success => AuditEntry::info(message),
        ProbeStatus::Failure => AuditEntry::error(message),
    };
    entry.at(outcome.observed_at)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
