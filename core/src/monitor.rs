//! # Monitoring Run
//!
//! Runs the escalation engine over a whole inventory.
//!
//! [`Monitor`] owns the injected ports (prober, notifier, audit sink, preparer)
//! and the [`EscalationPolicy`]. A run:
//! 1. records a run-start audit entry,
//! 2. lets the [`Preparer`] ready the devices (once, before any probe),
//! 3. monitors every target to a [`Verdict`],
//! 4. records a run-summary audit entry.
//!
//! The first fault stops the run and is returned; no target is skipped silently.

use std::sync::Arc;

use async_trait::async_trait;
use pingwatch_common::target::Target;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::audit::{AuditEntry, AuditSink};
use crate::error::MonitorError;
use crate::escalation::{self, EscalationPolicy, Verdict};
use crate::notifier::Notifier;
use crate::prober::Prober;

pub type PrepareError = Box<dyn std::error::Error + Send + Sync>;

/// Readies devices before they are probed, e.g. lifting an ICMP rate limit.
#[async_trait]
pub trait Preparer: Send + Sync {
    async fn prepare(&self, targets: &[Target]) -> Result<(), PrepareError>;
}

/// Leaves devices as they are.
pub struct NoopPreparer;

#[async_trait]
impl Preparer for NoopPreparer {
    async fn prepare(&self, _targets: &[Target]) -> Result<(), PrepareError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: Target,
    pub verdict: Verdict,
}

/// Per-target verdicts, in the order the targets were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    pub fn reachable(&self) -> usize {
        self.targets
            .iter()
            .filter(|report| !report.verdict.is_escalated())
            .count()
    }

    pub fn escalated(&self) -> usize {
        self.targets
            .iter()
            .filter(|report| report.verdict.is_escalated())
            .count()
    }
}

pub struct Monitor {
    policy: EscalationPolicy,
    prober: Arc<dyn Prober>,
    notifier: Arc<dyn Notifier>,
    audit: Arc<dyn AuditSink>,
    preparer: Arc<dyn Preparer>,
}

impl Monitor {
    pub fn new(
        policy: EscalationPolicy,
        prober: Arc<dyn Prober>,
        notifier: Arc<dyn Notifier>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            policy,
            prober,
            notifier,
            audit,
            preparer: Arc::new(NoopPreparer),
        }
    }

    pub fn with_preparer(mut self, preparer: Arc<dyn Preparer>) -> Self {
        self.preparer = preparer;
        self
    }

    /// Monitors `targets` one after another, in order.
    pub async fn run(&self, targets: &[Target]) -> Result<RunReport, MonitorError> {
        self.begin(targets).await?;

        let mut report = RunReport::default();
        for target in targets {
            let verdict = escalation::monitor(
                target,
                &self.policy,
                self.prober.as_ref(),
                self.notifier.as_ref(),
                self.audit.as_ref(),
            )
            .await?;
            report.targets.push(TargetReport {
                target: target.clone(),
                verdict,
            });
        }

        self.finish(report)
    }

    /// Monitors up to `limit` targets at once.
    ///
    /// Attempts for one target stay strictly ordered; only distinct targets
    /// overlap. On the first fault every outstanding target is aborted.
    pub async fn run_concurrent(
        &self,
        targets: &[Target],
        limit: usize,
    ) -> Result<RunReport, MonitorError> {
        if limit <= 1 || targets.len() <= 1 {
            return self.run(targets).await;
        }

        self.begin(targets).await?;
        debug!("Monitoring {} targets, {limit} at a time", targets.len());

        let permits = Arc::new(Semaphore::new(limit));
        let mut tasks: JoinSet<Result<(usize, TargetReport), MonitorError>> = JoinSet::new();

        for (idx, target) in targets.iter().cloned().enumerate() {
            let permits = permits.clone();
            let policy = self.policy;
            let prober = self.prober.clone();
            let notifier = self.notifier.clone();
            let audit = self.audit.clone();

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| MonitorError::Task(e.to_string()))?;

                let verdict = escalation::monitor(
                    &target,
                    &policy,
                    prober.as_ref(),
                    notifier.as_ref(),
                    audit.as_ref(),
                )
                .await?;

                Ok((idx, TargetReport { target, verdict }))
            });
        }

        let mut slots: Vec<Option<TargetReport>> = vec![None; targets.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok((idx, report))) => slots[idx] = Some(report),
                Ok(Err(err)) => {
                    tasks.abort_all();
                    return Err(err);
                }
                Err(join_err) => {
                    tasks.abort_all();
                    return Err(MonitorError::Task(join_err.to_string()));
                }
            }
        }

        let report = RunReport {
            targets: slots.into_iter().flatten().collect(),
        };
        self.finish(report)
    }

    async fn begin(&self, targets: &[Target]) -> Result<(), MonitorError> {
        self.audit.record(AuditEntry::info(format!(
            "Monitoring run started for {} target(s), up to {} attempt(s) each",
            targets.len(),
            self.policy.max_attempts()
        )))?;

        self.preparer
            .prepare(targets)
            .await
            .map_err(MonitorError::Preparation)
    }

    fn finish(&self, report: RunReport) -> Result<RunReport, MonitorError> {
        let summary = format!(
            "Monitoring run finished: {} reachable, {} escalated",
            report.reachable(),
            report.escalated()
        );
        info!("{summary}");
        self.audit.record(AuditEntry::info(summary))?;
        Ok(report)
    }
}
