//! Reachability check backed by the operating system's `ping` utility.
//!
//! Each probe sends a fixed number of echo requests and is classified by the
//! utility's exit status. Every run is additionally bounded by an explicit
//! timeout; a run that exceeds it is killed and reported as a failure.

use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use pingwatch_common::probe::ProbeOutcome;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::{ProbeError, Prober};

const PING_PROGRAM: &str = "ping";

pub struct PingProber {
    program: String,
    count: u32,
    timeout: Duration,
}

impl PingProber {
    pub fn new(count: u32, timeout: Duration) -> Self {
        Self {
            program: PING_PROGRAM.to_string(),
            count: count.max(1),
            timeout,
        }
    }

    /// Replaces the executable, e.g. with `ping6` or an absolute path.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn args(&self, address: &str) -> Vec<String> {
        let count_flag = if cfg!(windows) { "-n" } else { "-c" };
        vec![
            count_flag.to_string(),
            self.count.to_string(),
            address.to_string(),
        ]
    }

    fn classify(&self, address: &str, output: Output) -> Result<ProbeOutcome, ProbeError> {
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            return Ok(ProbeOutcome::success(stdout));
        }

        // No exit code means a signal ended the utility, so nothing was measured.
        let Some(code) = output.status.code() else {
            return Err(ProbeError::Terminated {
                program: self.program.clone(),
                address: address.to_string(),
            });
        };

        trace!("{} exited with {code} for {address}", self.program);
        let diagnostics = match (stderr.is_empty(), stdout.is_empty()) {
            (false, false) => format!("{stderr}\n{stdout}"),
            (false, true) => stderr,
            (true, _) => stdout,
        };
        Ok(ProbeOutcome::failure(diagnostics))
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, address: &str) -> Result<ProbeOutcome, ProbeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ProbeError::EmptyAddress);
        }
        if address.starts_with('-') {
            return Err(ProbeError::InvalidAddress {
                program: self.program.clone(),
                address: address.to_string(),
            });
        }

        debug!("{} {}", self.program, self.args(address).join(" "));

        let child = Command::new(&self.program)
            .args(self.args(address))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Execution {
                program: self.program.clone(),
                address: address.to_string(),
                source,
            })?;

        match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => self.classify(address, output),
            Ok(Err(source)) => Err(ProbeError::Execution {
                program: self.program.clone(),
                address: address.to_string(),
                source,
            }),
            // Dropping the future drops the child, which kills it.
            Err(_elapsed) => Ok(ProbeOutcome::failure(format!(
                "no answer from {address} within {}s",
                self.timeout.as_secs()
            ))),
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
