//! Per-target behaviour of the escalation engine.

use pingwatch_common::target::Target;
use pingwatch_core::audit::{MemoryAuditLog, Severity};
use pingwatch_core::escalation::monitor;
use pingwatch_core::{EscalationPolicy, MonitorError, Verdict};

use crate::doubles::{Answer, Broken, FullDiskAudit, RecordingNotifier, ScriptedProber, Silent};

const ROUTER_ADDR: &str = "10.0.0.1";

fn router() -> Target {
    Target::new("router1", ROUTER_ADDR).unwrap()
}

fn policy(max: u32) -> EscalationPolicy {
    EscalationPolicy::new(max).unwrap()
}

#[tokio::test]
async fn always_failing_target_escalates_once_after_budget() {
    for max in 1..=5u32 {
        let prober = ScriptedProber::new();
        let notifier = RecordingNotifier::new();
        let audit = MemoryAuditLog::new();

        let verdict = monitor(&router(), &policy(max), &prober, &notifier, &audit)
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::Escalated { attempts: max });
        assert_eq!(prober.calls_for(ROUTER_ADDR), max as usize);
        assert_eq!(audit.count(Severity::Error), max as usize);
        assert_eq!(audit.count(Severity::Info), 0);

        let events = notifier.events();
        assert_eq!(events.len(), 1, "budget {max}");
        assert_eq!(events[0].max_failures, max);
    }
}

#[tokio::test]
async fn success_on_attempt_k_stops_probing() {
    let max = 4;
    for k in 1..=max {
        let mut script = vec![Silent; (k - 1) as usize];
        script.push(Answer);
        script.push(Silent);

        let prober = ScriptedProber::new().script(ROUTER_ADDR, &script);
        let notifier = RecordingNotifier::new();
        let audit = MemoryAuditLog::new();

        let verdict = monitor(&router(), &policy(max), &prober, &notifier, &audit)
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::Succeeded { attempts: k });
        assert_eq!(prober.calls_for(ROUTER_ADDR), k as usize);
        assert_eq!(audit.len(), k as usize);
        assert_eq!(audit.count(Severity::Error), (k - 1) as usize);
        assert_eq!(audit.count(Severity::Info), 1);
        assert!(notifier.events().is_empty());
    }
}

#[tokio::test]
async fn every_attempt_is_a_fresh_probe() {
    let prober = ScriptedProber::new().script(ROUTER_ADDR, &[Silent, Answer]);
    let notifier = RecordingNotifier::new();
    let audit = MemoryAuditLog::new();

    monitor(&router(), &policy(2), &prober, &notifier, &audit)
        .await
        .unwrap();

    let entries = audit.entries();
    assert_eq!(prober.calls_for(ROUTER_ADDR), 2);
    assert_eq!(entries[0].severity, Severity::Error);
    assert_eq!(entries[1].severity, Severity::Info);
}

#[tokio::test]
async fn single_attempt_budget_notifies_without_retry() {
    let prober = ScriptedProber::new().script(ROUTER_ADDR, &[Silent, Answer]);
    let notifier = RecordingNotifier::new();
    let audit = MemoryAuditLog::new();

    let verdict = monitor(&router(), &policy(1), &prober, &notifier, &audit)
        .await
        .unwrap();

    assert_eq!(verdict, Verdict::Escalated { attempts: 1 });
    assert_eq!(prober.calls_for(ROUTER_ADDR), 1);
    assert_eq!(notifier.events().len(), 1);
}

#[tokio::test]
async fn router_recovers_on_third_attempt() {
    let prober = ScriptedProber::new().script(ROUTER_ADDR, &[Silent, Silent, Answer]);
    let notifier = RecordingNotifier::new();
    let audit = MemoryAuditLog::new();

    let verdict = monitor(&router(), &policy(3), &prober, &notifier, &audit)
        .await
        .unwrap();

    assert_eq!(verdict, Verdict::Succeeded { attempts: 3 });
    assert_eq!(audit.count(Severity::Error), 2);
    assert_eq!(audit.count(Severity::Info), 1);
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn router_escalates_after_three_failures() {
    let prober = ScriptedProber::new().script(ROUTER_ADDR, &[Silent, Silent, Silent]);
    let notifier = RecordingNotifier::new();
    let audit = MemoryAuditLog::new();

    let verdict = monitor(&router(), &policy(3), &prober, &notifier, &audit)
        .await
        .unwrap();

    assert_eq!(verdict, Verdict::Escalated { attempts: 3 });
    assert_eq!(audit.count(Severity::Error), 3);

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].target_name, "router1");
    assert_eq!(events[0].target_address, ROUTER_ADDR);
    assert_eq!(events[0].max_failures, 3);
    assert_eq!(events[0].subject(), "Failed to ping device router1");
}

#[tokio::test]
async fn notifier_fault_keeps_recorded_attempts() {
    let prober = ScriptedProber::new();
    let notifier = RecordingNotifier::unavailable();
    let audit = MemoryAuditLog::new();

    let result = monitor(&router(), &policy(3), &prober, &notifier, &audit).await;

    assert!(matches!(
        result,
        Err(MonitorError::NotificationDelivery { .. })
    ));
    assert_eq!(audit.count(Severity::Error), 3);
    assert_eq!(notifier.events().len(), 1);
}

#[tokio::test]
async fn broken_prober_is_a_fault_not_a_retry() {
    let prober = ScriptedProber::new().script(ROUTER_ADDR, &[Silent, Broken, Answer]);
    let notifier = RecordingNotifier::new();
    let audit = MemoryAuditLog::new();

    let result = monitor(&router(), &policy(5), &prober, &notifier, &audit).await;

    match result {
        Err(MonitorError::ProbeExecution { attempt, .. }) => assert_eq!(attempt, 2),
        other => panic!("expected a probe execution fault, got {other:?}"),
    }
    assert_eq!(prober.calls_for(ROUTER_ADDR), 2);
    assert_eq!(audit.len(), 1);
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn audit_fault_stops_the_loop_immediately() {
    let prober = ScriptedProber::new();
    let notifier = RecordingNotifier::new();
    let audit = FullDiskAudit::new(1);

    let result = monitor(&router(), &policy(3), &prober, &notifier, &audit).await;

    assert!(matches!(result, Err(MonitorError::AuditSink(_))));
    assert_eq!(prober.calls_for(ROUTER_ADDR), 2);
    assert_eq!(audit.written(), 1);
    assert!(notifier.events().is_empty());
}
