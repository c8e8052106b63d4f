//! Payload handed to a notifier when a target exhausts its attempt budget.

use crate::target::Target;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub target_name: String,
    pub target_address: String,
    /// The configured budget the target exhausted.
    pub max_failures: u32,
}

impl NotificationEvent {
    pub fn new(target: &Target, max_failures: u32) -> Self {
        Self {
            target_name: target.name.clone(),
            target_address: target.address.clone(),
            max_failures,
        }
    }

    pub fn subject(&self) -> String {
        format!("Failed to ping device {}", self.target_name)
    }

    pub fn body(&self) -> String {
        format!(
            "failure to ping device {} ({}) after {} attempts.",
            self.target_name, self.target_address, self.max_failures
        )
    }
}
