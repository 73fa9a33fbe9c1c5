//! Async frame I/O over any byte stream.
//!
//! Layers the core's panic-free header parsing onto `AsyncRead`/`AsyncWrite`
//! so the same code runs against stdin/stdout in production and
//! `tokio::io::duplex` pipes in tests.

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use dlphost_core::protocol::frame::{self, HEADER_LEN};
use dlphost_core::{DlpError, Result};

/// Read one frame body.
///
/// `Ok(None)` is clean EOF: the stream closed before a full 4-byte header
/// was available. A close mid-body is `TruncatedMessage`. An invalid
/// length prefix is `InvalidFrameLength`, returned without consuming any
/// body bytes so the caller can decide whether to keep reading.
pub async fn read_frame<R>(input: &mut R) -> Result<Option<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = input.read(&mut header[filled..]).await?;
        if n == 0 {
            return Ok(None);
        }
        filled += n;
    }

    let len = frame::decode_length(&header[..])?;

    let mut body = vec![0u8; len];
    input.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            DlpError::TruncatedMessage
        } else {
            DlpError::Io(e)
        }
    })?;

    Ok(Some(Bytes::from(body)))
}

/// Write one frame: length header, body, flush.
///
/// The size check happens before anything touches the stream, so a
/// `MessageTooLarge` failure leaves the stream frame-aligned.
pub async fn write_frame<W>(output: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let header = frame::encode_length(payload.len())?;
    output.write_all(&header).await?;
    output.write_all(payload).await?;
    output.flush().await?;
    Ok(())
}
