//! The **abstraction** for a single reachability check.
//!
//! The escalation engine depends only on [`Prober`]; the concrete check (the
//! system [`ping`] utility) lives in a submodule and can be swapped for a
//! scripted implementation in tests.
//!
//! A probe has three possible results:
//! * `Ok` with [`ProbeStatus::Success`](pingwatch_common::probe::ProbeStatus::Success): the target answered.
//! * `Ok` with [`ProbeStatus::Failure`](pingwatch_common::probe::ProbeStatus::Failure): the check ran, the target did not answer.
//! * `Err(ProbeError)`: the check itself could not run. This is never counted as a retry.

use async_trait::async_trait;
use pingwatch_common::probe::ProbeOutcome;
use thiserror::Error;

mod ping;

pub use ping::PingProber;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("refusing to probe an empty address")]
    EmptyAddress,

    #[error("refusing to probe '{address}': '{program}' would read it as an option")]
    InvalidAddress { program: String, address: String },

    #[error("failed to run '{program}' against {address}")]
    Execution {
        program: String,
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' against {address} was terminated before reporting a status")]
    Terminated { program: String, address: String },
}

/// Issues one reachability check and classifies it.
///
/// Implementations must not write to the audit log or notify anyone; both are
/// the engine's job.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, address: &str) -> Result<ProbeOutcome, ProbeError>;
}
