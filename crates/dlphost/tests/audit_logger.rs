//! Audit logger tests: append semantics, date partitioning, and the field
//! allowlist that keeps raw content out of the log.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeSet;
use std::fs;

use chrono::{TimeZone, Utc};

use dlphost::audit::AuditLogger;
use dlphost_core::schema::{
    EventType, FileSignals, PolicyDecision, TelemetryEvent, TextSignals, Verdict,
};

fn text_event(id: &str) -> TelemetryEvent {
    TelemetryEvent {
        event_id: id.into(),
        timestamp: "2026-08-26T12:00:00Z".into(),
        event_type: EventType::ClipboardPaste,
        url: "https://chat.example.com".into(),
        domain: "chat.example.com".into(),
        tab_id: 3,
        correlation_id: "corr".into(),
        text_signals: Some(TextSignals {
            length: 250,
            sha256_prefix: "c29tZWhhc2g=".into(),
            patterns: vec!["CREDIT_CARD".into(), "EMAIL".into()],
        }),
        file_signals: None,
    }
}

fn decision_for(evt: &TelemetryEvent) -> PolicyDecision {
    PolicyDecision {
        event_id: evt.event_id.clone(),
        decision: Verdict::Warn,
        policy_id: "pol-1".into(),
        policy_version: "1".into(),
        decision_reason: "[rule-sensitive] sensitive pattern detected".into(),
    }
}

fn read_lines(dir: &std::path::Path) -> Vec<(String, Vec<String>)> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let lines = fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        out.push((path.file_name().unwrap().to_string_lossy().into_owned(), lines));
    }
    out.sort();
    out
}

#[test]
fn n_events_produce_n_lines_in_one_daily_file() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let logger = AuditLogger::new(&logs);

    let now = Utc.with_ymd_and_hms(2026, 8, 26, 9, 30, 0).unwrap();
    for i in 0..5 {
        let evt = text_event(&format!("evt-{i}"));
        logger.log_event_at(&evt, &decision_for(&evt), now).unwrap();
    }

    let files = read_lines(&logs);
    assert_eq!(files.len(), 1, "exactly one file for the UTC day");
    let (name, lines) = &files[0];
    assert_eq!(name, "events-20260826.ndjson");
    assert_eq!(lines.len(), 5);

    for (i, line) in lines.iter().enumerate() {
        let obj: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(obj["event_id"], format!("evt-{i}"));
        assert_eq!(obj["decision"], "warn");
        assert_eq!(obj["text_length"], 250);
    }
}

#[test]
fn rotates_at_utc_date_change() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let logger = AuditLogger::new(&logs);

    let evt = text_event("evt-a");
    let d = decision_for(&evt);
    let before_midnight = Utc.with_ymd_and_hms(2026, 8, 26, 23, 59, 59).unwrap();
    let after_midnight = Utc.with_ymd_and_hms(2026, 8, 27, 0, 0, 1).unwrap();
    logger.log_event_at(&evt, &d, before_midnight).unwrap();
    logger.log_event_at(&evt, &d, after_midnight).unwrap();

    let files = read_lines(&logs);
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].0, "events-20260826.ndjson");
    assert_eq!(files[1].0, "events-20260827.ndjson");
    assert_eq!(files[0].1.len(), 1);
    assert_eq!(files[1].1.len(), 1);
}

#[test]
fn reopened_logger_appends_to_same_day_file() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let now = Utc.with_ymd_and_hms(2026, 8, 26, 9, 0, 0).unwrap();
    let evt = text_event("evt-a");
    let d = decision_for(&evt);

    {
        let logger = AuditLogger::new(&logs);
        logger.log_event_at(&evt, &d, now).unwrap();
        logger.flush_and_close();
    }
    {
        let logger = AuditLogger::new(&logs);
        logger.log_event_at(&evt, &d, now).unwrap();
    }

    let files = read_lines(&logs);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].1.len(), 2);
}

#[test]
fn entry_fields_are_allowlisted_only() {
    let allowlist: BTreeSet<&str> = [
        "timestamp",
        "event_id",
        "event_type",
        "domain",
        "url",
        "tab_id",
        "correlation_id",
        "text_length",
        "sha256_prefix",
        "patterns",
        "file_name",
        "file_extension",
        "file_mime_type",
        "file_size_bytes",
        "decision",
        "policy_id",
        "policy_version",
        "decision_reason",
    ]
    .into();

    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let logger = AuditLogger::new(&logs);
    let now = Utc.with_ymd_and_hms(2026, 8, 26, 9, 0, 0).unwrap();

    let text = text_event("evt-text");
    logger.log_event_at(&text, &decision_for(&text), now).unwrap();

    let file = TelemetryEvent {
        event_id: "evt-file".into(),
        event_type: EventType::FileUploadAttempt,
        text_signals: None,
        file_signals: Some(FileSignals {
            file_name: "report.xlsx".into(),
            extension: ".xlsx".into(),
            mime_type: "application/vnd.ms-excel".into(),
            size_bytes: 9000,
        }),
        ..text_event("evt-file")
    };
    logger.log_event_at(&file, &decision_for(&file), now).unwrap();

    let files = read_lines(&logs);
    for line in &files[0].1 {
        let obj: serde_json::Value = serde_json::from_str(line).unwrap();
        for key in obj.as_object().unwrap().keys() {
            assert!(allowlist.contains(key.as_str()), "field {key} is not allowlisted");
        }
        // No raw-content fields, ever.
        for forbidden in ["text", "content", "clipboard", "body", "data", "bytes"] {
            assert!(obj.get(forbidden).is_none(), "found forbidden field {forbidden}");
        }
    }
}

#[test]
fn concurrent_writers_never_interleave_lines() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let logger = AuditLogger::new(&logs);
    let now = Utc.with_ymd_and_hms(2026, 8, 26, 9, 0, 0).unwrap();

    const THREADS: usize = 8;
    const PER_THREAD: usize = 25;
    std::thread::scope(|s| {
        for t in 0..THREADS {
            let logger = &logger;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    let evt = text_event(&format!("evt-{t}-{i}"));
                    logger.log_event_at(&evt, &decision_for(&evt), now).unwrap();
                }
            });
        }
    });

    let files = read_lines(&logs);
    assert_eq!(files.len(), 1);
    let lines = &files[0].1;
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    // Each physical line is one complete, distinct entry: a torn or
    // interleaved write would fail the parse or collapse ids.
    let mut seen = BTreeSet::new();
    for line in lines {
        let obj: serde_json::Value =
            serde_json::from_str(line).expect("every line parses as one object");
        seen.insert(obj["event_id"].as_str().unwrap().to_string());
    }
    assert_eq!(seen.len(), THREADS * PER_THREAD);
}

#[test]
fn unwritable_directory_reports_audit_write_error() {
    let dir = tempfile::tempdir().unwrap();
    // A file where the log directory should be makes create_dir_all fail.
    let blocker = dir.path().join("logs");
    fs::write(&blocker, b"not a directory").unwrap();

    let logger = AuditLogger::new(blocker.join("sub"));
    let evt = text_event("evt-a");
    let err = logger.log_event(&evt, &decision_for(&evt)).expect_err("must fail");
    assert_eq!(err.code(), "AUDIT_WRITE");
}
