// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line framing: payload plus a single `\n` terminator.
//!
//! There is no escaping mechanism; payloads must not contain a raw
//! newline, and `write_line` rejects ones that do. End-of-stream before
//! any byte of a line is an orderly close (`Ok(None)`), not an error.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on a single protocol line, terminator included.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Errors from line framing.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection closed mid-line")]
    Truncated,

    #[error("timed out waiting for peer")]
    Timeout,

    #[error("line exceeds {MAX_LINE_BYTES} bytes")]
    LineTooLong,

    #[error("payload contains a raw newline")]
    EmbeddedNewline,

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the next line, stripping the `\n` terminator.
///
/// Returns `Ok(None)` on a clean end-of-stream. A stream that ends in the
/// middle of a line is reported as [`ProtocolError::Truncated`]. When
/// `timeout` is `None` the read waits indefinitely (an open connection may
/// sit idle between commands).
pub async fn read_line<R>(
    reader: &mut R,
    timeout: Option<Duration>,
) -> Result<Option<String>, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    // Bound how much one line may pull in; one extra byte distinguishes
    // "too long" from "exactly at the limit".
    let mut limited = (&mut *reader).take(MAX_LINE_BYTES as u64 + 1);
    let read = limited.read_until(b'\n', &mut buf);
    let n = match timeout {
        Some(limit) => tokio::time::timeout(limit, read)
            .await
            .map_err(|_| ProtocolError::Timeout)??,
        None => read.await?,
    };
    if n == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') {
        if buf.len() > MAX_LINE_BYTES {
            return Err(ProtocolError::LineTooLong);
        }
        return Err(ProtocolError::Truncated);
    }
    buf.pop();
    String::from_utf8(buf).map(Some).map_err(|_| ProtocolError::InvalidUtf8)
}

/// Write `payload` followed by a single `\n` and flush.
pub async fn write_line<W>(
    writer: &mut W,
    payload: &str,
    timeout: Option<Duration>,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if payload.contains('\n') {
        return Err(ProtocolError::EmbeddedNewline);
    }
    if payload.len() + 1 > MAX_LINE_BYTES {
        return Err(ProtocolError::LineTooLong);
    }
    let write = async {
        writer.write_all(payload.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await
    };
    match timeout {
        Some(limit) => {
            tokio::time::timeout(limit, write).await.map_err(|_| ProtocolError::Timeout)??
        }
        None => write.await?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "line_tests.rs"]
mod tests;
