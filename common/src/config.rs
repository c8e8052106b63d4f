//! # Run Configuration
//!
//! Loaded once, before any probing, from a YAML/TOML/JSON file (format picked
//! by extension) layered with `PINGWATCH_*` environment overrides.
//!
//! Key names follow the flat layout of the legacy `config.yaml`, so existing
//! files (including their `email_form` spelling) load unchanged.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::target::Target;

const ENV_PREFIX: &str = "PINGWATCH";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_PING_COUNT: u32 = 4;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONCURRENCY: usize = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Number of failed attempts after which a target is escalated.
    pub max_failures: u32,
    /// Audit log file. Truncated at the start of every run.
    pub log_path: PathBuf,

    pub smtp_server: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    #[serde(alias = "email_form")]
    pub email_from: Option<String>,
    pub email_to: Option<String>,

    /// Echo requests sent per probe.
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,
    /// Upper bound on one probe, on top of the ping utility's own limits.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Targets monitored at once. `1` keeps the run strictly sequential.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub targets: Vec<Target>,
}

/// Everything a mail notifier needs, present only when fully configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_ping_count() -> u32 {
    DEFAULT_PING_COUNT
}

fn default_probe_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl MonitorConfig {
    /// Reads `path`, applies environment overrides and validates the result.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading configuration from {}", path.display());

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let cfg: MonitorConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_failures < 1 {
            return Err(ConfigError::invalid("max_failures", "must be at least 1"));
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("log_path", "must not be empty"));
        }
        if self.ping_count < 1 {
            return Err(ConfigError::invalid("ping_count", "must be at least 1"));
        }
        if self.probe_timeout_secs < 1 {
            return Err(ConfigError::invalid("probe_timeout_secs", "must be at least 1"));
        }
        if self.concurrency < 1 {
            return Err(ConfigError::invalid("concurrency", "must be at least 1"));
        }
        for target in &self.targets {
            target
                .validate()
                .map_err(|reason| ConfigError::invalid("targets", reason))?;
        }
        self.smtp()?;
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Returns the mail settings, `None` when none of them are set.
    ///
    /// A partially filled block is an error rather than a silent downgrade to
    /// "no notifications".
    pub fn smtp(&self) -> Result<Option<SmtpSettings>, ConfigError> {
        let fields = [
            ("smtp_server", &self.smtp_server),
            ("smtp_username", &self.smtp_username),
            ("smtp_password", &self.smtp_password),
            ("email_from", &self.email_from),
            ("email_to", &self.email_to),
        ];

        if fields.iter().all(|(_, value)| value.is_none()) {
            return Ok(None);
        }

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::invalid(
                "smtp",
                format!("incomplete mail settings, missing {}", missing.join(", ")),
            ));
        }

        Ok(Some(SmtpSettings {
            server: self.smtp_server.clone().unwrap_or_default(),
            port: self.smtp_port,
            username: self.smtp_username.clone().unwrap_or_default(),
            password: self.smtp_password.clone().unwrap_or_default(),
            from: self.email_from.clone().unwrap_or_default(),
            to: self.email_to.clone().unwrap_or_default(),
        }))
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
