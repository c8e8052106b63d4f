use std::time::Duration;

use anyhow::Context;
use colored::*;

use pingwatch_common::probe::ProbeStatus;
use pingwatch_core::prober::{PingProber, Prober};

use crate::terminal::{colors, print};

/// One probe, no audit log and no escalation.
pub async fn check(address: &str, count: u32, timeout_secs: u64) -> anyhow::Result<()> {
    let prober = PingProber::new(count, Duration::from_secs(timeout_secs));
    let outcome = prober
        .probe(address)
        .await
        .with_context(|| format!("could not probe {address}"))?;

    let status: ColoredString = match outcome.status {
        ProbeStatus::Success => outcome.status.to_string().color(colors::REACHABLE).bold(),
        ProbeStatus::Failure => outcome.status.to_string().color(colors::ESCALATED).bold(),
    };

    print::aligned_line("Address", address.color(colors::ADDRESS));
    print::aligned_line("Status", status);
    print::indented_block(&outcome.diagnostics);

    if !outcome.is_success() {
        anyhow::bail!("{address} did not answer");
    }
    Ok(())
}
