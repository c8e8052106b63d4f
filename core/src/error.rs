use thiserror::Error;

use crate::audit::AuditError;
use crate::notifier::NotifyError;
use crate::prober::ProbeError;

/// Faults that end a monitoring run. An unreachable target is not one of
/// them: that is an ordinary [`Verdict`](crate::Verdict).
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid escalation policy: {0}")]
    InvalidPolicy(String),

    #[error("probe of {target} could not run on attempt {attempt}")]
    ProbeExecution {
        target: String,
        attempt: u32,
        #[source]
        source: ProbeError,
    },

    #[error("escalation for {target} was not delivered")]
    NotificationDelivery {
        target: String,
        #[source]
        source: NotifyError,
    },

    #[error("audit log is unavailable")]
    AuditSink(#[from] AuditError),

    #[error("pre-probe preparation failed")]
    Preparation(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("monitoring task failed: {0}")]
    Task(String),
}
