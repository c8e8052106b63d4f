//! # Monitored Target Model
//!
//! A [`Target`] is one device under watch: a human-readable name and the
//! address handed to the prober.
//!
//! Targets can be written as:
//! * A bare address (e.g., `10.0.0.1`, `core-sw.example.net`), named after itself.
//! * A named pair `name=address` (e.g., `router1=10.0.0.1`).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// A device whose reachability is being monitored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Target {
    pub name: String,
    pub address: String,
}

impl Target {
    /// Builds a target, rejecting blank names and addresses.
    ///
    /// An address may not start with `-`, since the prober would hand it to
    /// the `ping` utility as an option.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Result<Self, String> {
        let name = name.into().trim().to_string();
        let address = address.into().trim().to_string();

        if name.is_empty() {
            return Err(format!("target for '{address}' has an empty name"));
        }
        if address.is_empty() {
            return Err(format!("target '{name}' has an empty address"));
        }
        if address.starts_with('-') || address.chars().any(char::is_whitespace) {
            return Err(format!("invalid address for target '{name}': {address}"));
        }

        Ok(Self { name, address })
    }

    /// Re-checks a target that came in through deserialization.
    pub fn validate(&self) -> Result<(), String> {
        Self::new(self.name.as_str(), self.address.as_str()).map(|_| ())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.address {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} ({})", self.name, self.address)
        }
    }
}

impl FromStr for Target {
    type Err = String;

    /// Parses a string into a `Target`.
    ///
    /// Supported formats:
    /// * **Named**: "router1=10.0.0.1".
    /// * **Bare**: "10.0.0.1" (the name defaults to the address).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("invalid target: empty string".to_string());
        }

        match s.split_once('=') {
            Some((name, address)) => Target::new(name, address),
            None => Target::new(s, s),
        }
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
