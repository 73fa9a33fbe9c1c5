//! Shared error type across dlphost crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, DlpError>;

/// Unified error type used by the core and the host process.
///
/// Each variant carries a fixed recovery policy (see `code` docs): framing
/// length errors are skippable, truncation drains the connection, policy
/// load failures degrade to allow-all, and audit failures are swallowed
/// after the decision has been delivered.
#[derive(Debug, Error)]
pub enum DlpError {
    /// Length prefix outside `(0, MAX_MESSAGE_SIZE]`. Recoverable: the host
    /// skips the header and keeps reading.
    #[error("invalid frame length: {0}")]
    InvalidFrameLength(u32),
    /// Stream closed mid-header or mid-body. Fatal to the connection; no
    /// further frames can be trusted.
    #[error("stream closed mid-frame")]
    TruncatedMessage,
    /// Outbound payload exceeds `MAX_MESSAGE_SIZE`. Aborts that write only;
    /// nothing is put on the stream, so framing stays aligned.
    #[error("message too large: {0} bytes")]
    MessageTooLarge(usize),
    /// Policy file missing, unreadable, or unparseable. The host degrades
    /// to an allow-all pseudo-policy instead of exiting.
    #[error("policy load failed: {0}")]
    PolicyLoad(String),
    /// Event payload did not deserialize as a telemetry event. The event is
    /// dropped without a response.
    #[error("malformed event payload: {0}")]
    MalformedEvent(String),
    /// Audit append failed. Reported to the caller; the decision has already
    /// been sent to the peer by the time audit logging runs.
    #[error("audit write failed: {0}")]
    AuditWrite(String),
    /// Transport I/O failure.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// Invariant breach that is not the peer's fault.
    #[error("internal: {0}")]
    Internal(String),
}

impl DlpError {
    /// Stable diagnostic code used in operational logs.
    pub fn code(&self) -> &'static str {
        match self {
            DlpError::InvalidFrameLength(_) => "INVALID_FRAME_LENGTH",
            DlpError::TruncatedMessage => "TRUNCATED_MESSAGE",
            DlpError::MessageTooLarge(_) => "MESSAGE_TOO_LARGE",
            DlpError::PolicyLoad(_) => "POLICY_LOAD",
            DlpError::MalformedEvent(_) => "MALFORMED_EVENT",
            DlpError::AuditWrite(_) => "AUDIT_WRITE",
            DlpError::Io(_) => "IO",
            DlpError::Internal(_) => "INTERNAL",
        }
    }
}
