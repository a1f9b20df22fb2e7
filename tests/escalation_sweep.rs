mod support;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::Duration;
use rental_legal::cases::{
    AllowAll, CaseRepository, CaseService, PartyRole, RiskLevel,
};
use rental_legal::config::{DeadlineConfig, EngineConfig};
use rental_legal::disputes::{Dispute, DisputeRepository, DisputeType};
use rental_legal::scheduler::{EscalationSubject, EscalationSweep, SweepError};
use support::{contract, date, intake, MemoryCaseRepository, MemoryDisputeRepository};

fn sweep(
    cases: Arc<MemoryCaseRepository>,
    disputes: Arc<MemoryDisputeRepository>,
) -> EscalationSweep<MemoryCaseRepository, MemoryDisputeRepository> {
    EscalationSweep::new(cases, disputes, EngineConfig::default())
}

#[test]
fn one_bad_record_does_not_abort_the_sweep() {
    let cases = Arc::new(MemoryCaseRepository::default());
    let disputes = Arc::new(MemoryDisputeRepository::default());
    let service = CaseService::new(cases.clone(), Arc::new(AllowAll), EngineConfig::default());
    let today = date(2025, 5, 1);

    let healthy_a = service
        .open_case(intake(500_000, today - Duration::days(20)), today)
        .expect("case opens")
        .case;
    let broken = service
        .open_case(intake(700_000, today), today)
        .expect("case opens")
        .case;
    let healthy_b = service
        .open_case(intake(900_000, today - Duration::days(40)), today)
        .expect("case opens")
        .case;

    // Corrupt the middle record: a default date in the future makes every
    // later accrual evaluation fail.
    let mut stored = cases
        .load(&broken.id)
        .expect("load")
        .expect("present");
    let expected = stored.version;
    stored.first_default_date = today + Duration::days(30);
    stored.version += 1;
    cases.save(stored, expected).expect("corruption saved");

    let now = today + Duration::days(20);
    let report = sweep(cases.clone(), disputes)
        .run(now, &AtomicBool::new(false))
        .expect("sweep runs");

    assert!(!report.cancelled);
    assert_eq!(report.refreshed.len(), 2);
    assert!(report.refreshed.contains(&healthy_a.id));
    assert!(report.refreshed.contains(&healthy_b.id));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].case_id, broken.id);
    assert!(matches!(
        report.failures[0].error,
        SweepError::Recomputation(_)
    ));

    // Interest on the healthy cases was rolled forward to `now`.
    let refreshed = cases
        .load(&healthy_a.id)
        .expect("load")
        .expect("present");
    assert!(refreshed.financials.accumulated_interest > 0);
    assert_eq!(refreshed.updated_on, now);
}

#[test]
fn a_lapsed_deadline_escalates_exactly_once() {
    let cases = Arc::new(MemoryCaseRepository::default());
    let disputes = Arc::new(MemoryDisputeRepository::default());
    let service = CaseService::new(cases.clone(), Arc::new(AllowAll), EngineConfig::default());
    let today = date(2025, 5, 1);

    let opened = service
        .open_case(intake(500_000, today - Duration::days(20)), today)
        .expect("case opens")
        .case;
    let deadline = opened.next_deadline.expect("deadline set");

    let now = deadline + Duration::days(5);
    let sweeper = sweep(cases.clone(), disputes);

    let first = sweeper
        .run(now, &AtomicBool::new(false))
        .expect("first sweep");
    assert_eq!(first.escalations.len(), 1);
    let event = &first.escalations[0];
    assert_eq!(event.lapsed_deadline, deadline);
    assert!(matches!(
        &event.subject,
        EscalationSubject::Case { id, .. } if *id == opened.id
    ));

    let stored = cases.load(&opened.id).expect("load").expect("present");
    assert_eq!(stored.missed_deadlines, 1);
    assert_eq!(stored.last_escalated_deadline, Some(deadline));
    assert!(stored.risk_level >= RiskLevel::High);

    // The same lapsed deadline stays quiet on the next run.
    let second = sweeper
        .run(now + Duration::days(1), &AtomicBool::new(false))
        .expect("second sweep");
    assert!(second.escalations.is_empty());
    let stored = cases.load(&opened.id).expect("load").expect("present");
    assert_eq!(stored.missed_deadlines, 1);
}

#[test]
fn escalating_reanchors_the_deadline_past_the_sweep_date() {
    let cases = Arc::new(MemoryCaseRepository::default());
    let disputes = Arc::new(MemoryDisputeRepository::default());
    let service = CaseService::new(cases.clone(), Arc::new(AllowAll), EngineConfig::default());
    let today = date(2025, 5, 1);

    let opened = service
        .open_case(intake(500_000, today - Duration::days(20)), today)
        .expect("case opens")
        .case;
    let deadline = opened.next_deadline.expect("deadline set");

    let now = deadline + Duration::days(5);
    sweep(cases.clone(), disputes)
        .run(now, &AtomicBool::new(false))
        .expect("sweep runs");

    let stored = cases.load(&opened.id).expect("load").expect("present");
    let reanchored = stored.next_deadline.expect("deadline still set");
    assert!(reanchored >= stored.updated_on);
    assert_eq!(
        reanchored,
        now + Duration::days(DeadlineConfig::default().notice_days)
    );
}

#[test]
fn a_cancelled_sweep_touches_nothing() {
    let cases = Arc::new(MemoryCaseRepository::default());
    let disputes = Arc::new(MemoryDisputeRepository::default());
    let service = CaseService::new(cases.clone(), Arc::new(AllowAll), EngineConfig::default());
    let today = date(2025, 5, 1);

    let opened = service
        .open_case(intake(500_000, today - Duration::days(20)), today)
        .expect("case opens")
        .case;

    let report = sweep(cases.clone(), disputes)
        .run(today + Duration::days(30), &AtomicBool::new(true))
        .expect("sweep returns");

    assert!(report.cancelled);
    assert!(report.refreshed.is_empty());
    assert!(report.escalations.is_empty());

    let stored = cases.load(&opened.id).expect("load").expect("present");
    assert_eq!(stored.version, opened.version);
}

#[test]
fn disputes_past_the_sla_raise_advisory_escalations() {
    let cases = Arc::new(MemoryCaseRepository::default());
    let disputes = Arc::new(MemoryDisputeRepository::default());
    let today = date(2025, 5, 1);

    let stale = Dispute::open(
        DisputeType::TenantClaim,
        contract(),
        PartyRole::Tenant,
        200_000,
        "deposit refund stalled".to_string(),
        today - Duration::days(45),
    );
    let fresh = Dispute::open(
        DisputeType::OwnerClaim,
        contract(),
        PartyRole::Owner,
        150_000,
        "cleaning costs".to_string(),
        today - Duration::days(5),
    );
    let stale_id = stale.id.clone();
    let stale_version = stale.version;
    disputes.insert(stale).expect("stale dispute stored");
    disputes.insert(fresh).expect("fresh dispute stored");

    let report = sweep(cases, disputes.clone())
        .run(today, &AtomicBool::new(false))
        .expect("sweep runs");

    assert_eq!(report.escalations.len(), 1);
    assert!(matches!(
        &report.escalations[0].subject,
        EscalationSubject::Dispute { id, .. } if *id == stale_id
    ));

    // Advisory only; the dispute record itself is never written.
    let stored = disputes
        .load(&stale_id)
        .expect("load")
        .expect("present");
    assert_eq!(stored.version, stale_version);
}
