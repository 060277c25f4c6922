//! Message encoding and decoding for the NetFS protocol.
//!
//! Every exchange starts with a fixed 10-byte header carrying the payload
//! length and the message type. Only `READDIR` has a defined server-side
//! behavior; the other three types are reserved tags the server recognizes
//! but declines to execute.
//!
//! Path payloads and entry names travel with their terminating NUL sentinel,
//! so an encoded path is always `strlen + 1` bytes long. Integers are
//! big-endian regardless of host byte order.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive as _, ToPrimitive as _};

/// The protocol assumes big endian encoding.
pub type WireEndian = BigEndian;

pub trait Serialize {
    /// Serializes the implementing type to the provided writer.
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()>;
}

pub trait Deserialize {
    /// Deserializes data from the provided reader into the implementing type.
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()>;
}

/// Deserialization based on the [Default] value of the type T.
pub fn deserialize<T>(src: &mut impl Read) -> std::io::Result<T>
where
    T: Deserialize + Default,
{
    let mut val = T::default();
    val.deserialize(src)?;

    Ok(val)
}

pub(crate) fn invalid_data(m: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, m)
}

/// Request type tag carried in the message header.
///
/// The enumeration is closed: a tag outside this set fails header decoding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum MsgType {
    #[default]
    Open = 0,
    Read = 1,
    Readdir = 2,
    Getattr = 3,
}

/// Fixed-size header preceding every message.
///
/// `payload_len` counts only the payload bytes that follow the header, never
/// the header itself, and is computed from the actual payload about to be
/// sent. On receive it is peer-controlled and must be bounds-checked before
/// it is used to size a buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MsgHeader {
    pub payload_len: u64,
    pub msg_type: MsgType,
}

impl MsgHeader {
    pub fn new(msg_type: MsgType, payload_len: u64) -> Self {
        Self { payload_len, msg_type }
    }
}

impl Serialize for MsgHeader {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        dest.write_u64::<WireEndian>(self.payload_len)?;
        let tag = self
            .msg_type
            .to_u16()
            .ok_or_else(|| invalid_data("message type out of range"))?;
        dest.write_u16::<WireEndian>(tag)
    }
}

impl Deserialize for MsgHeader {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.payload_len = src.read_u64::<WireEndian>()?;
        let tag = src.read_u16::<WireEndian>()?;
        self.msg_type =
            MsgType::from_u16(tag).ok_or_else(|| invalid_data("unknown message type"))?;
        Ok(())
    }
}

/// Encodes a request path as a payload, appending the NUL sentinel.
pub fn encode_path(path: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(path.len() + 1);
    payload.extend_from_slice(path.as_bytes());
    payload.push(0);
    payload
}

/// Decodes a request path payload, stripping the trailing sentinel.
pub fn decode_path(payload: &[u8]) -> std::io::Result<String> {
    let bytes = match payload.split_last() {
        Some((0, rest)) => rest,
        _ => payload,
    };
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| invalid_data("path is not valid UTF-8"))
}

/// Strips the trailing sentinel from a received entry name record.
pub fn trim_sentinel(name: &[u8]) -> &[u8] {
    match name.split_last() {
        Some((0, rest)) => rest,
        _ => name,
    }
}
