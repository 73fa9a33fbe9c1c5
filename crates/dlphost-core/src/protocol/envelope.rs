//! Message envelope (JSON).
//!
//! Every frame body is `{"type": ..., "payload": ...}`. Inbound payloads are
//! stored as `RawValue` so the host can inspect `type` before paying for a
//! full telemetry-event parse.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::schema::PolicyDecision;

/// `type` value for inbound telemetry events.
pub const MSG_TYPE_EVENT: &str = "event";

/// `type` value for outbound decisions.
pub const MSG_TYPE_DECISION: &str = "decision";

/// Inbound envelope. Unknown fields are tolerated; the browser side may
/// version its envelope independently of the host.
#[derive(Debug, Deserialize)]
pub struct NativeEnvelope {
    /// Message kind (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Opaque payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub payload: Option<Box<RawValue>>,
}

/// Outbound decision envelope.
#[derive(Debug, Serialize)]
pub struct DecisionEnvelope<'a> {
    #[serde(rename = "type")]
    msg_type: &'static str,
    payload: &'a PolicyDecision,
}

impl<'a> DecisionEnvelope<'a> {
    /// Wrap a decision for the response frame.
    pub fn new(payload: &'a PolicyDecision) -> Self {
        Self {
            msg_type: MSG_TYPE_DECISION,
            payload,
        }
    }
}
