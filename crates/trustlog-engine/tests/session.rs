use chrono::{Duration, NaiveDate};
use trustlog_engine::{
    AnalysisError, AnalysisOptions, AnalysisSession, ErrorPolicy, PendingPolicy, SessionEvent,
    analyze,
};
use trustlog_types::*;

fn at(millis: i64) -> Timestamp {
    NaiveDate::from_ymd_opt(2021, 3, 4)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + Duration::milliseconds(millis)
}

fn record(millis: i64, module: &str, message: &str) -> Record {
    Record::new(at(millis), "INFO", module, message)
}

fn received(millis: i64, address: &str, mid: u32) -> Record {
    record(
        millis,
        "trust",
        &format!(
            "Received trust info via POST from {} of length 40 (mid={})",
            address, mid
        ),
    )
}

#[test]
fn test_envmon_task_pairing() {
    let records = vec![
        record(0, "A-envmon", "Generated message (len=10)"),
        record(1000, "A-envmon", "Message sent to coap://[fd00::1]:5683"),
    ];

    let (session, result) = analyze(records, AnalysisOptions::default());
    result.unwrap();

    assert_eq!(
        session.tasks(),
        &[Task {
            target: "fd00::1".parse().unwrap(),
            time: at(1000),
            details: TaskDetails::Monitoring { length: 10 },
        }]
    );
    assert_eq!(session.pending_task("A-envmon"), None);
}

#[test]
fn test_modules_pair_independently() {
    let records = vec![
        record(0, "A-envmon", "Generated message (len=10)"),
        record(
            10,
            "A-routing",
            "Generated message (len=64) for path from (51.5,-0.12) to (52.2,0.13)",
        ),
        record(20, "A-routing", "Message sent to coap://[fd00::2]:5683"),
        record(30, "A-envmon", "Message sent to coap://[fd00::3]:5683"),
    ];

    let (session, result) = analyze(records, AnalysisOptions::default());
    result.unwrap();

    let targets: Vec<String> = session.tasks().iter().map(|t| t.target.to_string()).collect();
    assert_eq!(targets, vec!["fd00::2", "fd00::3"]);
    assert_eq!(session.tasks()[0].details.capability(), "routing");
    assert_eq!(session.pending_task_count(), 0);
}

#[test]
fn test_sent_without_generated_is_correlation_missing() {
    let mut session = AnalysisSession::new(AnalysisOptions::default());
    let event = session
        .ingest(&record(0, "A-envmon", "Message sent to coap://[fd00::1]:5683"))
        .unwrap();

    assert_eq!(event, None);
    assert!(session.tasks().is_empty());
    assert!(matches!(
        session.diagnostics()[0].error,
        AnalysisError::CorrelationMissing { ref module, .. } if module == "A-envmon"
    ));

    let mut strict = AnalysisSession::new(AnalysisOptions::strict());
    let err = strict
        .ingest(&record(0, "A-envmon", "Message sent to coap://[fd00::1]:5683"))
        .unwrap_err();
    assert_eq!(err.kind(), "correlation_missing");
    assert!(strict.diagnostics().is_empty());
}

#[test]
fn test_duplicate_pending_overwrite() {
    let records = vec![
        record(0, "A-envmon", "Generated message (len=10)"),
        record(10, "A-envmon", "Generated message (len=20)"),
        record(20, "A-envmon", "Message sent to coap://[fd00::1]:5683"),
    ];

    let (session, result) = analyze(records, AnalysisOptions::default());
    result.unwrap();

    assert_eq!(session.tasks().len(), 1);
    assert_eq!(session.tasks()[0].details, TaskDetails::Monitoring { length: 20 });
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_duplicate_pending_reject() {
    let options = AnalysisOptions {
        duplicate_pending: PendingPolicy::Reject,
        ..AnalysisOptions::default()
    };
    let records = vec![
        record(0, "A-envmon", "Generated message (len=10)"),
        record(10, "A-envmon", "Generated message (len=20)"),
        record(20, "A-envmon", "Message sent to coap://[fd00::1]:5683"),
    ];

    let (session, result) = analyze(records, options);
    result.unwrap();

    assert_eq!(session.tasks().len(), 1);
    assert_eq!(session.tasks()[0].details, TaskDetails::Monitoring { length: 10 });
    assert_eq!(session.diagnostics().len(), 1);
    assert_eq!(session.diagnostics()[0].time, at(10));
    assert_eq!(session.diagnostics()[0].error.kind(), "duplicate_pending");
}

#[test]
fn test_reputation_success_scenario() {
    let records = vec![
        received(0, "fd00::2", 7),
        record(
            1000,
            "trust",
            "res_trust_post_handler: successfully queued trust to be verified from fd00::2 (mid=7)",
        ),
    ];

    let (session, result) = analyze(records, AnalysisOptions::default());
    result.unwrap();

    assert_eq!(
        session
            .reputation_receive()
            .get("fd00::2", ReputationReceiveOutcome::Success),
        1
    );
    assert_eq!(session.tracked_mid(7), None);
}

#[test]
fn test_every_mid_resolves_once() {
    let outcomes = [
        "Missing public key, need to request it (mid={})",
        "res_trust_post_handler: out of memory (mid={})",
        "res_trust_post_handler: queue verify failed (mid={})",
        "res_trust_post_handler: successfully queued trust to be verified from fd00::{} (mid={})",
    ];

    let mut records = Vec::new();
    for mid in 0..12u32 {
        let peer = format!("fd00::{}", mid % 3);
        records.push(received(mid as i64 * 10, &peer, mid));
    }
    for mid in 0..12u32 {
        let template = outcomes[mid as usize % outcomes.len()];
        let message = if template.contains("from fd00") {
            template
                .replacen("{}", &(mid % 3).to_string(), 1)
                .replacen("{}", &mid.to_string(), 1)
        } else {
            template.replacen("{}", &mid.to_string(), 1)
        };
        records.push(record(1000 + mid as i64, "trust", &message));
    }

    let (session, result) = analyze(records, AnalysisOptions::strict());
    result.unwrap();

    let counts = session.reputation_receive();
    assert_eq!(counts.total(), 12);
    assert_eq!(session.tracked_mid_count(), 0);
    assert!(session.diagnostics().is_empty());

    let by_outcome = |outcome| {
        counts
            .iter()
            .map(|(_, per_peer)| per_peer.get(outcome))
            .sum::<u64>()
    };
    assert_eq!(by_outcome(ReputationReceiveOutcome::MissingKey), 3);
    assert_eq!(by_outcome(ReputationReceiveOutcome::OutOfMemory), 3);
    assert_eq!(by_outcome(ReputationReceiveOutcome::VerifyFail), 3);
    assert_eq!(by_outcome(ReputationReceiveOutcome::Success), 3);
}

#[test]
fn test_unknown_mid_is_correlation_missing() {
    let outcome = record(0, "trust", "res_trust_post_handler: out of memory (mid=42)");

    let (session, result) = analyze(vec![outcome.clone()], AnalysisOptions::default());
    result.unwrap();
    assert_eq!(session.diagnostics()[0].error.kind(), "correlation_missing");
    assert_eq!(session.reputation_receive().total(), 0);

    let (_, result) = analyze(vec![outcome], AnalysisOptions::strict());
    assert!(matches!(
        result,
        Err(AnalysisError::CorrelationMissing { ref correlation, .. }) if correlation == "mid=42"
    ));
}

#[test]
fn test_second_resolution_is_correlation_missing() {
    let oom = "res_trust_post_handler: out of memory (mid=3)";
    let records = vec![
        received(0, "fd00::2", 3),
        record(10, "trust", oom),
        record(20, "trust", oom),
    ];

    let (session, result) = analyze(records, AnalysisOptions::default());
    result.unwrap();

    assert_eq!(
        session
            .reputation_receive()
            .get("fd00::2", ReputationReceiveOutcome::OutOfMemory),
        1
    );
    assert_eq!(session.diagnostic_counts().get("correlation_missing"), Some(&1));
}

#[test]
fn test_duplicate_mid_skip_replaces_request() {
    let records = vec![
        received(0, "fd00::2", 5),
        received(10, "fd00::3", 5),
        record(20, "trust", "Missing public key, need to request it (mid=5)"),
    ];

    let (session, result) = analyze(records, AnalysisOptions::default());
    result.unwrap();

    assert_eq!(
        session
            .reputation_receive()
            .get("fd00::3", ReputationReceiveOutcome::MissingKey),
        1
    );
    assert_eq!(session.reputation_receive().entity("fd00::2"), None);
    assert_eq!(session.diagnostics()[0].error.kind(), "duplicate_correlation");
}

#[test]
fn test_send_disabled_is_one_way() {
    let records = vec![
        record(0, "trust", "trust_tx_continue: coap_send_request trust done"),
        record(10, "trust", "Cannot allocate memory for periodic_action trust request"),
        record(20, "trust", "Periodic broadcast of trust information disabled"),
        record(30, "trust", "trust_tx_continue: coap_send_request trust done"),
        record(40, "trust", "trust_tx_continue: coap_send_request trust failed"),
    ];

    let mut session = AnalysisSession::new(AnalysisOptions::default());
    for r in &records[..2] {
        session.ingest(r).unwrap();
    }
    assert_eq!(
        session.reputation_send().get(ReputationSendOutcome::Success),
        Some(1)
    );
    assert_eq!(
        session.reputation_send().get(ReputationSendOutcome::OutOfMemory),
        Some(1)
    );

    for r in &records[2..] {
        session.ingest(r).unwrap();
    }
    assert!(session.reputation_send().is_disabled());
    assert_eq!(session.reputation_send().get(ReputationSendOutcome::Success), None);
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_keystore_first_seen_is_set_once() {
    let device = "00124b0014d52bd6";
    let records = vec![
        record(0, "main", "Node ID: 1"),
        record(500, "keystore", &format!("Successfully verified public key for {}", device)),
        record(900, "keystore", &format!("Sucessfully verfied public key for {}", device)),
        record(1200, "keystore", &format!("keystore_add: enqueue failed for {}", device)),
        record(1300, "keystore", "Requesting public key for 00124b0014d52bd6"),
    ];

    let (session, result) = analyze(records, AnalysisOptions::default());
    result.unwrap();

    let keystore = session.keystore();
    assert_eq!(
        keystore.counts().get(device, KeystoreAdmissionOutcome::Success),
        2
    );
    assert_eq!(
        keystore.first_seen(device, KeystoreAdmissionOutcome::Success),
        Some(at(500))
    );
    assert_eq!(
        keystore.first_seen(device, KeystoreAdmissionOutcome::EnqueueFail),
        Some(at(1200))
    );
    assert_eq!(keystore.counts().total(), 3);
}

#[test]
fn test_banded_samples_append_in_order() {
    let records = vec![
        record(0, "trust-band", "Trust value for edge aa01 and capability envmon=0.500000 at 1/4"),
        record(10, "trust-band", "Trust value for edge aa01 and capability envmon=0.500000 at 1/4"),
        record(20, "trust-band", "Trust value for edge bb02 and capability routing=0.900000 at 4/4"),
    ];

    let (session, result) = analyze(records, AnalysisOptions::default());
    result.unwrap();

    let values = session.trust_values().unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0], values[1].clone());
    assert_eq!(values[2].peer, "bb02");
    assert_eq!(values[2].time, at(20));
}

#[test]
fn test_unrecognized_content_is_ignored() {
    let records = vec![
        record(0, "rpl", "Received DIO from fe80::1"),
        record(10, "trust-comm", "Sending ping to f4ce36b29cb59ade"),
        record(20, "trust", "Requesting trust from fd00::5"),
        record(30, "A-cr", "Challenge sent"),
    ];

    let (session, result) = analyze(records, AnalysisOptions::strict());
    result.unwrap();

    assert!(session.diagnostics().is_empty());
    assert!(session.trust_updates().is_empty());
    assert_eq!(session.end_time(), Some(at(30)));
}

#[test]
fn test_abort_keeps_snapshot_of_prefix() {
    let records = vec![
        record(0, "A-envmon", "Generated message (len=10)"),
        record(10, "A-envmon", "Message sent to coap://[fd00::1]:5683"),
        record(20, "A-envmon", "Message sent to coap://[fd00::1]:5683"),
        record(30, "A-envmon", "Generated message (len=10)"),
    ];
    let options = AnalysisOptions {
        correlation: ErrorPolicy::Abort,
        ..AnalysisOptions::default()
    };

    let (session, result) = analyze(records, options);

    assert!(result.is_err());
    assert_eq!(session.tasks().len(), 1);
    assert_eq!(session.end_time(), Some(at(20)));
    assert_eq!(session.pending_task_count(), 0);
}

#[test]
fn test_events_are_returned_per_record() {
    let mut session = AnalysisSession::default();
    let event = session
        .ingest(&record(
            0,
            "trust-comm",
            "Updating Edge f4ce36b29cb59ade TM last ping: 272676 -> 275228",
        ))
        .unwrap();

    match event {
        Some(SessionEvent::TrustModelUpdate(update)) => {
            assert_eq!(update.observation, Observation::LastPing);
            assert_eq!(update.after, TrustState::LastPing { ticks: 275228 });
        }
        other => panic!("unexpected event: {:?}", other),
    }
}
