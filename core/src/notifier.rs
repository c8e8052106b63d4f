//! Escalation delivery.
//!
//! The engine hands a [`NotificationEvent`] to a [`Notifier`] once per
//! escalated target and treats any error as a delivery fault. Notifiers never
//! retry on their own.

use async_trait::async_trait;
use pingwatch_common::notification::NotificationEvent;
use thiserror::Error;

mod dry_run;
mod smtp;

pub use dry_run::DryRunNotifier;
pub use smtp::SmtpNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("failed to compose notification: {0}")]
    Message(String),

    #[error("mail delivery through {server} failed: {reason}")]
    Transport { server: String, reason: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &NotificationEvent) -> Result<(), NotifyError>;
}
