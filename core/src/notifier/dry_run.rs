use async_trait::async_trait;
use pingwatch_common::notification::NotificationEvent;
use tracing::warn;

use super::{Notifier, NotifyError};

/// Logs the rendered escalation instead of sending it.
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn notify(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        warn!("[dry-run] {}: {}", event.subject(), event.body());
        Ok(())
    }
}
