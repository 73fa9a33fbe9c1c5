//! Audit logger: NDJSON, one line per decision, date-partitioned.
//!
//! Every line is a projection of (event, decision) through an explicit field
//! allowlist — signals and metadata only, never raw content. Adding a field
//! here is a privacy-relevant change and requires an allowlist review.
//!
//! Files are `events-YYYYMMDD.ndjson` (UTC) in the configured directory,
//! append-only. Rotation happens when a write's UTC date differs from the
//! open file's date, not on a timer. Every write is flushed before the call
//! returns. A mutex serializes the rotate-and-append critical section so
//! concurrent callers can never interleave partial lines.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use dlphost_core::schema::{PolicyDecision, TelemetryEvent};
use dlphost_core::{DlpError, Result};

pub struct AuditLogger {
    dir: PathBuf,
    inner: Mutex<Option<OpenFile>>,
}

struct OpenFile {
    file: File,
    /// `YYYYMMDD` of the file currently open.
    date: String,
}

impl AuditLogger {
    /// Remember the target directory. Directory and file creation are lazy,
    /// on the first append, so a bad path degrades per-write instead of
    /// failing startup.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            inner: Mutex::new(None),
        }
    }

    /// Append one audit line for this (event, decision) pair, stamped with
    /// the current UTC time.
    pub fn log_event(&self, evt: &TelemetryEvent, decision: &PolicyDecision) -> Result<()> {
        self.log_event_at(evt, decision, Utc::now())
    }

    /// Append one audit line with an explicit timestamp.
    pub fn log_event_at(
        &self,
        evt: &TelemetryEvent,
        decision: &PolicyDecision,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let entry = AuditEntry::project(evt, decision, now);
        let line = serde_json::to_string(&entry)
            .map_err(|e| DlpError::AuditWrite(format!("serialize entry: {e}")))?;
        self.append_line(&line, now.format("%Y%m%d").to_string())
    }

    fn append_line(&self, line: &str, today: String) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| DlpError::AuditWrite("audit lock poisoned".to_string()))?;

        let needs_open = match guard.as_ref() {
            Some(open) => open.date != today,
            None => true,
        };
        if needs_open {
            if let Some(mut old) = guard.take() {
                let _ = old.file.flush();
            }
            fs::create_dir_all(&self.dir)
                .map_err(|e| DlpError::AuditWrite(format!("create {}: {e}", self.dir.display())))?;
            let path = self.dir.join(format!("events-{today}.ndjson"));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| DlpError::AuditWrite(format!("open {}: {e}", path.display())))?;
            *guard = Some(OpenFile { file, date: today });
        }

        if let Some(open) = guard.as_mut() {
            open.file
                .write_all(line.as_bytes())
                .and_then(|()| open.file.write_all(b"\n"))
                .and_then(|()| open.file.flush())
                .map_err(|e| DlpError::AuditWrite(format!("append: {e}")))?;
        }
        Ok(())
    }

    /// Flush and release the open file handle. Called on every host exit
    /// path; further appends would lazily reopen.
    pub fn flush_and_close(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            if let Some(mut open) = guard.take() {
                let _ = open.file.flush();
            }
        }
    }
}

impl Drop for AuditLogger {
    fn drop(&mut self) {
        self.flush_and_close();
    }
}

/// The allowlisted audit projection. Only signals, decisions, and metadata;
/// there is deliberately no field that could carry raw text or file bytes.
#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    /// Server-assigned UTC timestamp (RFC 3339).
    timestamp: String,
    event_id: &'a str,
    event_type: &'static str,
    domain: &'a str,
    url: &'a str,
    tab_id: i64,
    correlation_id: &'a str,

    // Text signals only — no raw text.
    #[serde(skip_serializing_if = "Option::is_none")]
    text_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256_prefix: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patterns: Option<&'a [String]>,

    // File signals only — no file content.
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_extension: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_size_bytes: Option<u64>,

    decision: &'static str,
    policy_id: &'a str,
    policy_version: &'a str,
    decision_reason: &'a str,
}

impl<'a> AuditEntry<'a> {
    fn project(evt: &'a TelemetryEvent, decision: &'a PolicyDecision, now: DateTime<Utc>) -> Self {
        let text = evt.text_signals.as_ref();
        let file = evt.file_signals.as_ref();
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
            event_id: &evt.event_id,
            event_type: evt.event_type.as_str(),
            domain: &evt.domain,
            url: &evt.url,
            tab_id: evt.tab_id,
            correlation_id: &evt.correlation_id,
            text_length: text.map(|t| t.length),
            sha256_prefix: text.map(|t| t.sha256_prefix.as_str()),
            patterns: text.map(|t| t.patterns.as_slice()),
            file_name: file.map(|f| f.file_name.as_str()),
            file_extension: file.map(|f| f.extension.as_str()),
            file_mime_type: file.map(|f| f.mime_type.as_str()),
            file_size_bytes: file.map(|f| f.size_bytes),
            decision: decision.decision.as_str(),
            policy_id: &decision.policy_id,
            policy_version: &decision.policy_version,
            decision_reason: &decision.decision_reason,
        }
    }
}
