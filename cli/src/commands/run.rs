use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, ensure};
use colored::*;
use tracing::{info, warn};

use pingwatch_common::config::MonitorConfig;
use pingwatch_common::target::Target;
use pingwatch_core::audit::FileAuditLog;
use pingwatch_core::notifier::{DryRunNotifier, Notifier, SmtpNotifier};
use pingwatch_core::prober::PingProber;
use pingwatch_core::{EscalationPolicy, Monitor, RunReport, TargetReport, Verdict};

use crate::terminal::{colors, print};

type Detail = (String, ColoredString);

pub async fn run(
    config_path: &Path,
    cli_targets: Vec<Target>,
    dry_run: bool,
    concurrency: Option<usize>,
) -> anyhow::Result<()> {
    let cfg = MonitorConfig::load(config_path)
        .with_context(|| format!("could not use configuration {}", config_path.display()))?;

    let targets: Vec<Target> = if cli_targets.is_empty() {
        cfg.targets.clone()
    } else {
        cli_targets
    };

    if targets.is_empty() {
        warn!(
            "No targets to monitor: add 'targets' to {} or pass --target",
            config_path.display()
        );
        return Ok(());
    }

    let limit: usize = concurrency.unwrap_or(cfg.concurrency);
    ensure!(limit >= 1, "--concurrency must be at least 1");

    let policy = EscalationPolicy::from_config(&cfg)?;
    let notifier = build_notifier(&cfg, dry_run)?;
    let audit = FileAuditLog::create(&cfg.log_path)?;
    info!("Recording attempts to {}", audit.path().display());

    let prober = PingProber::new(cfg.ping_count, cfg.probe_timeout());
    let monitor = Monitor::new(policy, Arc::new(prober), notifier, Arc::new(audit));

    info!(
        "Monitoring {} target(s), escalating after {} failed attempt(s)",
        targets.len(),
        policy.max_attempts()
    );

    let start_time: Instant = Instant::now();
    let report: RunReport = monitor
        .run_concurrent(&targets, limit)
        .await
        .context("monitoring run aborted")?;

    run_ends(&report, start_time.elapsed());
    Ok(())
}

fn build_notifier(cfg: &MonitorConfig, dry_run: bool) -> anyhow::Result<Arc<dyn Notifier>> {
    match cfg.smtp()? {
        Some(settings) if !dry_run => {
            let notifier = SmtpNotifier::new(settings).context("invalid mail settings")?;
            Ok(Arc::new(notifier))
        }
        Some(_) => {
            info!("Dry run: escalations will be logged, not mailed");
            Ok(Arc::new(DryRunNotifier))
        }
        None => {
            warn!("No mail settings configured, escalations will only be logged");
            Ok(Arc::new(DryRunNotifier))
        }
    }
}

fn run_ends(report: &RunReport, total_time: Duration) {
    print::header("monitoring results");

    for (idx, target_report) in report.targets.iter().enumerate() {
        print_target_tree(target_report, idx);
    }

    let summary: String = format!(
        "{} reachable, {} escalated in {:.2}s",
        report.reachable(),
        report.escalated(),
        total_time.as_secs_f64()
    );
    let color = if report.escalated() == 0 {
        colors::REACHABLE
    } else {
        colors::ESCALATED
    };

    print::fat_separator();
    print::centerln(&summary, color);
}

fn print_target_tree(report: &TargetReport, idx: usize) {
    print::tree_head(idx, &report.target.name);
    let details: Vec<Detail> = verdict_to_details(&report.target, &report.verdict);
    print::as_tree_one_level(details);
}

fn verdict_to_details(target: &Target, verdict: &Verdict) -> Vec<Detail> {
    let status: ColoredString = match verdict {
        Verdict::Succeeded { .. } => "reachable".color(colors::REACHABLE).bold(),
        Verdict::Escalated { .. } => "escalated".color(colors::ESCALATED).bold(),
    };

    vec![
        ("Address".to_string(), target.address.color(colors::ADDRESS)),
        ("Status".to_string(), status),
        ("Attempts".to_string(), verdict.attempts().to_string().normal()),
    ]
}
