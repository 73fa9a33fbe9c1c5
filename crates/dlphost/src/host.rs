//! Host loop: reads event frames, evaluates policy, writes decision frames,
//! and records audit lines.
//!
//! Lifecycle: `Starting -> Running -> Draining -> Stopped`. The loop is
//! strictly sequential — one frame is fully read, evaluated, responded to,
//! and audited before the next read begins, so decisions leave in the exact
//! order events arrived. Shutdown is cooperative: the watch channel is
//! observed at the read point, which also unblocks a pending read.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;

use dlphost_core::protocol::envelope::{DecisionEnvelope, NativeEnvelope, MSG_TYPE_EVENT};
use dlphost_core::schema::TelemetryEvent;
use dlphost_core::{DlpError, Result};

use crate::audit::AuditLogger;
use crate::policy::PolicyEngine;
use crate::transport;

/// Lifecycle states, logged on transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostState {
    Running,
    Draining,
    Stopped,
}

/// The host process core. Dependencies are constructed once at startup and
/// passed in explicitly; there are no ambient singletons.
pub struct HostLoop {
    engine: PolicyEngine,
    audit: AuditLogger,
}

impl HostLoop {
    pub fn new(engine: PolicyEngine, audit: AuditLogger) -> Self {
        Self { engine, audit }
    }

    /// Run until EOF, shutdown, or a fatal stream error.
    ///
    /// `Ok(())` after a clean EOF or a shutdown request; `Err` after stream
    /// corruption or transport failure. The audit logger is flushed and
    /// closed on every exit path.
    pub async fn run<R, W>(
        &self,
        input: &mut R,
        output: &mut W,
        shutdown: watch::Receiver<bool>,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::debug!(state = ?HostState::Running, "host loop started");
        let result = self.read_loop(input, output, shutdown).await;

        tracing::debug!(state = ?HostState::Draining, "host loop draining");
        self.audit.flush_and_close();

        tracing::debug!(state = ?HostState::Stopped, "host loop stopped");
        result
    }

    async fn read_loop<R, W>(
        &self,
        input: &mut R,
        output: &mut W,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let read = tokio::select! {
                // A dropped sender counts as a shutdown request too.
                _ = shutdown.changed() => {
                    tracing::info!("shutdown requested, draining");
                    return Ok(());
                }
                read = transport::read_frame(input) => read,
            };

            match read {
                Ok(None) => {
                    tracing::info!("eof on input, draining");
                    return Ok(());
                }
                Ok(Some(body)) => self.handle_frame(&body, output).await?,
                Err(err @ DlpError::InvalidFrameLength(_)) => {
                    // Compatibility: a bad length header is skipped and the
                    // loop keeps reading at the current stream position,
                    // matching the original host. A misread length can still
                    // leave framing desynchronized; there is no resync token.
                    tracing::warn!(code = err.code(), %err, "skipping frame with invalid length header");
                }
                Err(err @ DlpError::TruncatedMessage) => {
                    tracing::error!(code = err.code(), %err, "stream corrupted, draining");
                    return Err(err);
                }
                Err(err) => {
                    tracing::error!(code = err.code(), %err, "stream read failed, draining");
                    return Err(err);
                }
            }
        }
    }

    async fn handle_frame<W>(&self, body: &[u8], output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let env: NativeEnvelope = match serde_json::from_slice(body) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(error = %e, "discarding undecodable envelope");
                return Ok(());
            }
        };

        if env.msg_type != MSG_TYPE_EVENT {
            tracing::warn!(msg_type = %env.msg_type, "ignoring non-event message");
            return Ok(());
        }
        let Some(payload) = env.payload else {
            tracing::warn!("event message missing payload");
            return Ok(());
        };

        let evt: TelemetryEvent = match serde_json::from_str(payload.get()) {
            Ok(evt) => evt,
            Err(e) => {
                let err = DlpError::MalformedEvent(e.to_string());
                tracing::warn!(code = err.code(), %err, "dropping event");
                return Ok(());
            }
        };
        tracing::info!(
            event_id = %evt.event_id,
            event_type = evt.event_type.as_str(),
            domain = %evt.domain,
            "event received"
        );

        let decision = self.engine.evaluate(&evt);
        tracing::info!(
            event_id = %decision.event_id,
            decision = decision.decision.as_str(),
            reason = %decision.decision_reason,
            "decision"
        );

        // The decision must reach the peer before, and regardless of, the
        // audit outcome.
        let frame = serde_json::to_vec(&DecisionEnvelope::new(&decision))
            .map_err(|e| DlpError::Internal(format!("serialize decision: {e}")))?;
        match transport::write_frame(output, &frame).await {
            Ok(()) => {}
            Err(err @ DlpError::MessageTooLarge(_)) => {
                // Aborts this response only; nothing was written, so the
                // stream is still frame-aligned.
                tracing::error!(code = err.code(), %err, "decision frame dropped");
                return Ok(());
            }
            Err(err) => return Err(err),
        }

        if let Err(err) = self.audit.log_event(&evt, &decision) {
            tracing::error!(code = err.code(), %err, "audit write failed");
        }
        Ok(())
    }
}
