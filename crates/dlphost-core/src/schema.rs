//! Wire schema for telemetry events and policy decisions.
//!
//! Field names follow the documented snake_case wire contract. Raw user
//! content (clipboard text, file bytes) has no representation here at all:
//! events carry only derived signals (length, hash prefix, pattern ids,
//! file metadata). That absence is a security invariant, not a convention.

use serde::{Deserialize, Serialize};

/// Kind of observed user action. Closed set; the wire strings below are the
/// explicit serialization table and are covered by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "CLIPBOARD_COPY")]
    ClipboardCopy,
    #[serde(rename = "CLIPBOARD_PASTE")]
    ClipboardPaste,
    #[serde(rename = "FILE_UPLOAD_ATTEMPT")]
    FileUploadAttempt,
    #[serde(rename = "LLM_PROMPT_PASTE")]
    LlmPromptPaste,
}

impl EventType {
    /// Wire string for this event type.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::ClipboardCopy => "CLIPBOARD_COPY",
            EventType::ClipboardPaste => "CLIPBOARD_PASTE",
            EventType::FileUploadAttempt => "FILE_UPLOAD_ATTEMPT",
            EventType::LlmPromptPaste => "LLM_PROMPT_PASTE",
        }
    }
}

/// Outcome kind of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Allow,
    Warn,
    Block,
}

impl Verdict {
    /// Wire string for this verdict.
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Allow => "allow",
            Verdict::Warn => "warn",
            Verdict::Block => "block",
        }
    }

    /// Parse a config-supplied decision string, case-insensitively.
    /// Returns `None` for anything that is not allow/warn/block so the
    /// caller can surface the configuration problem and normalize.
    pub fn parse_lenient(s: &str) -> Option<Verdict> {
        if s.eq_ignore_ascii_case("allow") {
            Some(Verdict::Allow)
        } else if s.eq_ignore_ascii_case("warn") {
            Some(Verdict::Warn)
        } else if s.eq_ignore_ascii_case("block") {
            Some(Verdict::Block)
        } else {
            None
        }
    }
}

/// Privacy-safe signals derived from text content. Never raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSignals {
    /// Character count of the original text.
    #[serde(default)]
    pub length: u64,
    /// Base64 of the first 8 bytes of the content's SHA-256.
    #[serde(default)]
    pub sha256_prefix: String,
    /// Ids of detector patterns that matched (e.g. `CREDIT_CARD`).
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Privacy-safe file metadata. Never file bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSignals {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub size_bytes: u64,
}

/// One observed user action, as reported by the browser extension.
/// Immutable once parsed; consumed by the policy engine and audit logger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Caller-generated opaque unique id.
    pub event_id: String,
    /// ISO-8601 timestamp set by the collaborator.
    #[serde(default)]
    pub timestamp: String,
    pub event_type: EventType,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub tab_id: i64,
    /// Groups related events (e.g. copy followed by paste).
    #[serde(default)]
    pub correlation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_signals: Option<TextSignals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_signals: Option<FileSignals>,
}

/// Output of one policy evaluation. Created fresh per event, echoed back to
/// the peer and projected into the audit log; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    /// Echoes the input event id.
    pub event_id: String,
    pub decision: Verdict,
    pub policy_id: String,
    pub policy_version: String,
    /// `[<id>] <description-or-reason>` identifying what fired.
    pub decision_reason: String,
}
