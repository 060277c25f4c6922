//! Wire protocol for the NetFS listing exchange.
//!
//! The protocol is deliberately small: a fixed-size message header selects a
//! request type and announces how many payload bytes follow, and the one
//! implemented response shape is a stream of length-prefixed directory entry
//! records closed by a zero-length terminator.
//!
//! All multi-byte integers on the wire are big-endian on both endpoints,
//! independent of host architecture.

pub mod message;
pub mod wire;

/// Well-known port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 5555;

/// Size in bytes of the message header: `payload_length: u64` followed by
/// `message_type: u16`, with no padding between them.
pub const HEADER_SIZE: usize = 10;

/// Hard upper bound on a request path payload. Header payload lengths are
/// peer-controlled and must be checked against this before sizing a buffer.
pub const MAX_PATH_BYTES: usize = 1024;

/// Hard upper bound on a single directory entry name record.
pub const MAX_ENTRY_NAME_BYTES: usize = 1024;
