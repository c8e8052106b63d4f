//! Whole-inventory runs through `Monitor`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pingwatch_common::target::Target;
use pingwatch_core::audit::{FileAuditLog, MemoryAuditLog, Severity};
use pingwatch_core::monitor::{PrepareError, Preparer};
use pingwatch_core::{EscalationPolicy, Monitor, MonitorError, Verdict};

use crate::doubles::{Answer, Broken, RecordingNotifier, ScriptedProber, Silent};

fn inventory() -> Vec<Target> {
    vec![
        Target::new("router1", "10.0.0.1").unwrap(),
        Target::new("spine", "10.0.0.2").unwrap(),
        Target::new("leaf", "10.0.0.3").unwrap(),
    ]
}

fn scripted() -> ScriptedProber {
    ScriptedProber::new()
        .script("10.0.0.1", &[Silent, Answer])
        .script("10.0.0.2", &[Silent, Silent, Silent])
        .script("10.0.0.3", &[Answer])
}

struct Ports {
    prober: Arc<ScriptedProber>,
    notifier: Arc<RecordingNotifier>,
    audit: Arc<MemoryAuditLog>,
}

fn monitor_with(prober: ScriptedProber, max: u32) -> (Monitor, Ports) {
    let ports = Ports {
        prober: Arc::new(prober),
        notifier: Arc::new(RecordingNotifier::new()),
        audit: Arc::new(MemoryAuditLog::new()),
    };
    let monitor = Monitor::new(
        EscalationPolicy::new(max).unwrap(),
        ports.prober.clone(),
        ports.notifier.clone(),
        ports.audit.clone(),
    );
    (monitor, ports)
}

/// Attempt numbers recorded for `address`, in audit order.
fn attempts_for(audit: &MemoryAuditLog, address: &str) -> Vec<u32> {
    let needle = format!("({address}), attempt ");
    audit
        .entries()
        .iter()
        .filter_map(|entry| {
            let headline = entry.message.lines().next()?;
            let (_, rest) = headline.split_once(&needle)?;
            rest.split('/').next()?.parse().ok()
        })
        .collect()
}

#[tokio::test]
async fn sequential_run_reports_in_input_order() {
    let (monitor, ports) = monitor_with(scripted(), 3);

    let report = monitor.run(&inventory()).await.unwrap();

    let verdicts: Vec<Verdict> = report.targets.iter().map(|t| t.verdict).collect();
    assert_eq!(
        verdicts,
        vec![
            Verdict::Succeeded { attempts: 2 },
            Verdict::Escalated { attempts: 3 },
            Verdict::Succeeded { attempts: 1 },
        ]
    );
    assert_eq!(report.reachable(), 2);
    assert_eq!(report.escalated(), 1);

    // run start + 6 attempts + run summary
    assert_eq!(ports.audit.len(), 8);
    assert_eq!(ports.audit.count(Severity::Error), 4);
    assert_eq!(ports.prober.total_calls(), 6);

    let events = ports.notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].target_name, "spine");
}

#[tokio::test]
async fn concurrent_run_matches_sequential_verdicts() {
    let prober = scripted().with_delay(Duration::from_millis(5));
    let (monitor, ports) = monitor_with(prober, 3);

    let report = monitor.run_concurrent(&inventory(), 3).await.unwrap();

    let names: Vec<&str> = report.targets.iter().map(|t| t.target.name.as_str()).collect();
    assert_eq!(names, vec!["router1", "spine", "leaf"]);
    assert_eq!(report.targets[1].verdict, Verdict::Escalated { attempts: 3 });
    assert_eq!(ports.notifier.events().len(), 1);
    assert_eq!(ports.audit.len(), 8);

    assert_eq!(attempts_for(&ports.audit, "10.0.0.1"), vec![1, 2]);
    assert_eq!(attempts_for(&ports.audit, "10.0.0.2"), vec![1, 2, 3]);
    assert_eq!(attempts_for(&ports.audit, "10.0.0.3"), vec![1]);
}

#[tokio::test]
async fn empty_inventory_is_an_empty_report() {
    let (monitor, ports) = monitor_with(ScriptedProber::new(), 2);

    let report = monitor.run(&[]).await.unwrap();

    assert!(report.targets.is_empty());
    assert_eq!(ports.prober.total_calls(), 0);
    assert_eq!(ports.audit.count(Severity::Info), 2);
}

#[tokio::test]
async fn probe_fault_aborts_the_run() {
    let prober = ScriptedProber::new()
        .script("10.0.0.1", &[Answer])
        .script("10.0.0.2", &[Broken]);
    let (monitor, ports) = monitor_with(prober, 3);

    let result = monitor.run(&inventory()).await;

    assert!(matches!(result, Err(MonitorError::ProbeExecution { .. })));
    assert_eq!(ports.prober.calls_for("10.0.0.3"), 0);
}

#[tokio::test]
async fn concurrent_probe_fault_is_returned() {
    let prober = ScriptedProber::new()
        .script("10.0.0.1", &[Answer])
        .script("10.0.0.2", &[Broken])
        .script("10.0.0.3", &[Answer]);
    let (monitor, _ports) = monitor_with(prober, 3);

    let result = monitor.run_concurrent(&inventory(), 2).await;

    assert!(matches!(result, Err(MonitorError::ProbeExecution { .. })));
}

struct CountingPreparer {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl Preparer for CountingPreparer {
    async fn prepare(&self, targets: &[Target]) -> Result<(), PrepareError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(format!("could not configure {} devices", targets.len()).into());
        }
        Ok(())
    }
}

#[tokio::test]
async fn preparer_runs_once_before_probing() {
    let (monitor, ports) = monitor_with(scripted(), 3);
    let preparer = Arc::new(CountingPreparer {
        calls: AtomicUsize::new(0),
        fail: false,
    });
    let monitor = monitor.with_preparer(preparer.clone());

    monitor.run(&inventory()).await.unwrap();

    assert_eq!(preparer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(ports.prober.total_calls(), 6);
}

#[tokio::test]
async fn preparer_fault_stops_before_any_probe() {
    let (monitor, ports) = monitor_with(scripted(), 3);
    let monitor = monitor.with_preparer(Arc::new(CountingPreparer {
        calls: AtomicUsize::new(0),
        fail: true,
    }));

    let result = monitor.run_concurrent(&inventory(), 3).await;

    assert!(matches!(result, Err(MonitorError::Preparation(_))));
    assert_eq!(ports.prober.total_calls(), 0);
    assert_eq!(ports.audit.len(), 1);
}

#[tokio::test]
async fn file_audit_log_holds_one_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ping.log");
    std::fs::write(&path, "previous run\n").unwrap();

    let monitor = Monitor::new(
        EscalationPolicy::new(2).unwrap(),
        Arc::new(ScriptedProber::new().script("10.0.0.1", &[Silent, Silent])),
        Arc::new(RecordingNotifier::new()),
        Arc::new(FileAuditLog::create(&path).unwrap()),
    );

    let target = Target::new("router1", "10.0.0.1").unwrap();
    let report = monitor.run(&[target]).await.unwrap();
    assert_eq!(report.escalated(), 1);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("previous run"));

    let error_headlines: Vec<&str> = contents
        .lines()
        .filter(|line| line.contains(" - pingwatch - ERROR - "))
        .collect();
    assert_eq!(error_headlines.len(), 2);
    assert!(error_headlines[0].ends_with("Failed to ping router1 (10.0.0.1), attempt 1/2"));
}
