//! Mail notifier: STARTTLS relay with username/password authentication.
//!
//! The transport is built for a single message and dropped once it is sent
//! or has failed, so no session outlives a notification.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use pingwatch_common::config::SmtpSettings;
use pingwatch_common::notification::NotificationEvent;
use tracing::{debug, info};

use super::{Notifier, NotifyError};

pub struct SmtpNotifier {
    settings: SmtpSettings,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Validates the sender and recipient up front so a bad address shows up
    /// before the first probe rather than at escalation time.
    pub fn new(settings: SmtpSettings) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&settings.from)?;
        let to = parse_mailbox(&settings.to)?;
        Ok(Self { settings, from, to })
    }

    pub fn compose(&self, event: &NotificationEvent) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(event.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(event.body())
            .map_err(|e| NotifyError::Message(e.to_string()))
    }

    fn transport_error(&self, reason: impl ToString) -> NotifyError {
        NotifyError::Transport {
            server: format!("{}:{}", self.settings.server, self.settings.port),
            reason: reason.to_string(),
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse::<Mailbox>().map_err(|e| NotifyError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        let message = self.compose(event)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.server)
            .map_err(|e| self.transport_error(e))?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.username.clone(),
                self.settings.password.clone(),
            ))
            .build();

        debug!(
            "Sending escalation for {} via {}:{}",
            event.target_name, self.settings.server, self.settings.port
        );
        transport
            .send(message)
            .await
            .map_err(|e| self.transport_error(e))?;

        info!("Escalation mail sent to {}", self.to);
        Ok(())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
