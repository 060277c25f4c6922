//! Framing primitives for the NetFS protocol over a connected stream socket.
//!
//! A single transport read or write is permitted to transfer fewer bytes than
//! requested, so every header, payload, and entry record goes through
//! [`read_exact`] / [`write_exact`], which loop until the full byte count has
//! moved or the transfer fails. Nothing here knows message semantics beyond
//! the header shape and the entry record framing; dispatch lives in the
//! server and client modules.
//!
//! No operation takes a timeout. Callers that need bounded latency wrap the
//! whole exchange themselves.

use std::fmt;
use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::protocol::message::{self, MsgHeader, Serialize as _};
use crate::protocol::{HEADER_SIZE, MAX_ENTRY_NAME_BYTES};

/// Failures of one framed exchange. All of them are local to a single
/// connection, which is considered unusable afterwards.
#[derive(Debug)]
pub enum WireError {
    /// Hard socket-level failure, not retried.
    Transport(io::Error),
    /// The peer closed the stream before the expected byte count arrived.
    EndOfStream,
    /// A peer-supplied length field exceeds the hard maximum for its record.
    OverLength { length: u64, max: usize },
    /// The bytes on the wire do not form a valid message.
    Decode(io::Error),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::Transport(e) => write!(f, "transport failure: {e}"),
            WireError::EndOfStream => write!(f, "peer closed the stream mid-message"),
            WireError::OverLength { length, max } => {
                write!(f, "peer-supplied length {length} exceeds maximum {max}")
            }
            WireError::Decode(e) => write!(f, "malformed message: {e}"),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WireError::Transport(e) | WireError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// Writes all of `buf`, retrying short writes until every byte is sent.
pub async fn write_exact<S>(stream: &mut S, buf: &[u8]) -> Result<(), WireError>
where
    S: AsyncWrite + Unpin,
{
    let mut sent = 0;
    while sent < buf.len() {
        let n = stream.write(&buf[sent..]).await.map_err(WireError::Transport)?;
        if n == 0 {
            return Err(WireError::Transport(io::Error::new(
                io::ErrorKind::WriteZero,
                "transport accepted zero bytes",
            )));
        }
        sent += n;
    }
    Ok(())
}

/// Fills `buf` completely, accumulating across short reads.
///
/// A zero-byte read before the buffer is full signals that the peer closed
/// the stream and yields [`WireError::EndOfStream`], not a transport error.
pub async fn read_exact<S>(stream: &mut S, buf: &mut [u8]) -> Result<(), WireError>
where
    S: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = stream.read(&mut buf[filled..]).await.map_err(WireError::Transport)?;
        if n == 0 {
            return Err(WireError::EndOfStream);
        }
        filled += n;
    }
    Ok(())
}

/// Writes one message header.
pub async fn write_header<S>(stream: &mut S, header: &MsgHeader) -> Result<(), WireError>
where
    S: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(HEADER_SIZE);
    header.serialize(&mut buf).map_err(WireError::Decode)?;
    write_exact(stream, &buf).await
}

/// Reads one message header.
pub async fn read_header<S>(stream: &mut S) -> Result<MsgHeader, WireError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = [0_u8; HEADER_SIZE];
    read_exact(stream, &mut buf).await?;
    let header = message::deserialize::<MsgHeader>(&mut &buf[..]).map_err(WireError::Decode)?;
    trace!("read header: {:?}", header);
    Ok(header)
}

/// Reads a payload of `length` bytes after validating it against `max`.
///
/// The bound check happens before any allocation; an oversized length never
/// sizes a buffer.
pub async fn read_payload<S>(
    stream: &mut S,
    length: u64,
    max: usize,
) -> Result<Vec<u8>, WireError>
where
    S: AsyncRead + Unpin,
{
    if length > max as u64 {
        return Err(WireError::OverLength { length, max });
    }
    let mut payload = vec![0_u8; length as usize];
    read_exact(stream, &mut payload).await?;
    Ok(payload)
}

/// Writes one directory entry record: a 16-bit length prefix followed by the
/// name bytes and their NUL sentinel.
pub async fn write_entry<S>(stream: &mut S, name: &[u8]) -> Result<(), WireError>
where
    S: AsyncWrite + Unpin,
{
    let length = name.len() + 1;
    if length > MAX_ENTRY_NAME_BYTES {
        return Err(WireError::OverLength { length: length as u64, max: MAX_ENTRY_NAME_BYTES });
    }
    write_exact(stream, &(length as u16).to_be_bytes()).await?;
    write_exact(stream, name).await?;
    write_exact(stream, &[0_u8]).await
}

/// Writes the zero-length record that terminates a listing. No payload
/// follows the terminator.
pub async fn write_listing_end<S>(stream: &mut S) -> Result<(), WireError>
where
    S: AsyncWrite + Unpin,
{
    write_exact(stream, &0_u16.to_be_bytes()).await
}

/// Reads the next directory entry record, with the sentinel stripped.
///
/// Returns `None` on the zero-length terminator; callers must not read
/// further entries after that.
pub async fn read_entry<S>(stream: &mut S) -> Result<Option<Vec<u8>>, WireError>
where
    S: AsyncRead + Unpin,
{
    let mut prefix = [0_u8; 2];
    read_exact(stream, &mut prefix).await?;
    let length = u16::from_be_bytes(prefix) as usize;
    if length == 0 {
        return Ok(None);
    }
    if length > MAX_ENTRY_NAME_BYTES {
        return Err(WireError::OverLength { length: length as u64, max: MAX_ENTRY_NAME_BYTES });
    }
    let mut name = vec![0_u8; length];
    read_exact(stream, &mut name).await?;
    let name = message::trim_sentinel(&name).to_vec();
    Ok(Some(name))
}
