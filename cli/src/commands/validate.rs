use std::path::Path;

use anyhow::Context;
use colored::*;

use pingwatch_common::config::MonitorConfig;

use crate::terminal::{colors, print};

pub fn validate(config_path: &Path) -> anyhow::Result<()> {
    let cfg = MonitorConfig::load(config_path)
        .with_context(|| format!("could not use configuration {}", config_path.display()))?;

    print::aligned_line("Attempts", cfg.max_failures);
    print::aligned_line("Audit log", cfg.log_path.display());
    print::aligned_line(
        "Probe",
        format!(
            "{} echo requests, {}s timeout",
            cfg.ping_count, cfg.probe_timeout_secs
        ),
    );
    print::aligned_line("Parallel", cfg.concurrency);

    let mail: ColoredString = match cfg.smtp()? {
        Some(smtp) => format!("{} via {}:{}", smtp.to, smtp.server, smtp.port).normal(),
        None => "not configured, escalations are only logged".yellow(),
    };
    print::aligned_line("Mail", mail);

    print::aligned_line("Targets", cfg.targets.len());
    for (idx, target) in cfg.targets.iter().enumerate() {
        print::tree_head(idx, &target.name);
        print::as_tree_one_level(vec![(
            "Address".to_string(),
            target.address.color(colors::ADDRESS),
        )]);
    }

    Ok(())
}
