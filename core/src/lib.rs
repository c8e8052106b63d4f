//! # pingwatch-core
//!
//! The retry-and-escalation engine and the ports it drives.
//!
//! ## Layout
//! * **[`prober`]**: the [`Prober`](prober::Prober) seam and the system `ping` implementation.
//! * **[`audit`]**: the append-only audit trail every attempt is written to.
//! * **[`notifier`]**: escalation delivery (SMTP, or a dry-run logger).
//! * **[`escalation`]**: the per-target state machine.
//! * **[`monitor`]**: runs the engine over a whole inventory, sequentially or concurrently.
//!
//! High-level callers should only need [`monitor::Monitor`]; the free function
//! [`escalation::monitor`] is exposed for callers that bring their own loop.

pub mod audit;
pub mod error;
pub mod escalation;
pub mod monitor;
pub mod notifier;
pub mod prober;

pub use error::MonitorError;
pub use escalation::{EscalationPolicy, Verdict};
pub use monitor::{Monitor, RunReport, TargetReport};
