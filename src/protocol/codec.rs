// src/protocol/codec.rs
//! Framing for the Server List Ping exchange.
//!
//! Every packet is `VarInt length | VarInt packet id | body`. Only the three
//! packets needed for a status query are built here.

use byteorder::{BigEndian, WriteBytesExt};
use std::fmt;
use tokio::io::{AsyncRead, AsyncReadExt};

pub const DEFAULT_PORT: u16 = 25565;
pub const PROTOCOL_VERSION: i32 = 47;

/// Upper bound on a single frame. Status replies carry a base64 favicon, so
/// they are larger than most packets, but a couple of MiB is already generous.
pub const MAX_FRAME_LEN: usize = 2 * 1024 * 1024;

const MAX_VARINT_LEN: usize = 5;
const HANDSHAKE_ID: i32 = 0x00;
const STATUS_REQUEST_ID: i32 = 0x00;
const STATUS_RESPONSE_ID: i32 = 0x00;
const NEXT_STATE_STATUS: i32 = 1;

#[derive(Debug)]
pub enum CodecError {
    VarIntTooLong,
    NegativeLength(i32),
    FrameTooLarge(usize),
    UnexpectedPacket(i32),
    Truncated,
    InvalidUtf8,
    Io(std::io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VarIntTooLong => write!(f, "VarInt longer than {} bytes", MAX_VARINT_LEN),
            Self::NegativeLength(len) => write!(f, "Negative length prefix {}", len),
            Self::FrameTooLarge(len) => {
                write!(f, "Frame of {} bytes exceeds limit of {}", len, MAX_FRAME_LEN)
            }
            Self::UnexpectedPacket(id) => write!(f, "Unexpected packet id 0x{:02X}", id),
            Self::Truncated => write!(f, "Packet ended early"),
            Self::InvalidUtf8 => write!(f, "String field is not valid UTF-8"),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut remaining = value as u32;
    loop {
        if remaining & !0x7F == 0 {
            buf.push(remaining as u8);
            return;
        }
        buf.push((remaining & 0x7F) as u8 | 0x80);
        remaining >>= 7;
    }
}

/// Reads a VarInt from the front of `buf`, advancing it past the bytes consumed.
pub fn read_varint(buf: &mut &[u8]) -> Result<i32, CodecError> {
    let mut result: u32 = 0;
    for i in 0..MAX_VARINT_LEN {
        let (&byte, rest) = buf.split_first().ok_or(CodecError::Truncated)?;
        *buf = rest;
        result |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result as i32);
        }
    }
    Err(CodecError::VarIntTooLong)
}

pub async fn read_varint_async<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32, CodecError> {
    let mut result: u32 = 0;
    for i in 0..MAX_VARINT_LEN {
        let byte = reader.read_u8().await?;
        result |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result as i32);
        }
    }
    Err(CodecError::VarIntTooLong)
}

pub fn write_string(buf: &mut Vec<u8>, value: &str) {
    write_varint(buf, value.len() as i32);
    buf.extend_from_slice(value.as_bytes());
}

pub fn read_string(buf: &mut &[u8]) -> Result<String, CodecError> {
    let len = read_varint(buf)?;
    if len < 0 {
        return Err(CodecError::NegativeLength(len));
    }
    let len = len as usize;
    if len > buf.len() {
        return Err(CodecError::Truncated);
    }
    let (raw, rest) = buf.split_at(len);
    *buf = rest;
    String::from_utf8(raw.to_vec()).map_err(|_| CodecError::InvalidUtf8)
}

/// Prefixes `packet_id | body` with its VarInt length.
pub fn frame(packet_id: i32, body: &[u8]) -> Vec<u8> {
    let mut inner = Vec::with_capacity(body.len() + MAX_VARINT_LEN);
    write_varint(&mut inner, packet_id);
    inner.extend_from_slice(body);

    let mut out = Vec::with_capacity(inner.len() + MAX_VARINT_LEN);
    write_varint(&mut out, inner.len() as i32);
    out.extend_from_slice(&inner);
    out
}

/// Reads one length-prefixed frame (packet id included) from the stream.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, CodecError> {
    let len = read_varint_async(reader).await?;
    if len < 0 {
        return Err(CodecError::NegativeLength(len));
    }
    let len = len as usize;
    if len > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge(len));
    }
    let mut data = vec![0u8; len];
    reader.read_exact(&mut data).await?;
    Ok(data)
}

/// Handshake announcing that the connection moves to the status state.
pub fn handshake_packet(server_address: &str, port: u16) -> std::io::Result<Vec<u8>> {
    let mut body = Vec::with_capacity(server_address.len() + 8);
    write_varint(&mut body, PROTOCOL_VERSION);
    write_string(&mut body, server_address);
    body.write_u16::<BigEndian>(port)?;
    write_varint(&mut body, NEXT_STATE_STATUS);
    Ok(frame(HANDSHAKE_ID, &body))
}

pub fn status_request_packet() -> Vec<u8> {
    frame(STATUS_REQUEST_ID, &[])
}

/// Builds the server side of the exchange. Used by mock servers in tests and
/// kept next to its decoder so the two cannot drift apart.
pub fn status_response_packet(json: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(json.len() + MAX_VARINT_LEN);
    write_string(&mut body, json);
    frame(STATUS_RESPONSE_ID, &body)
}

/// Extracts the JSON document from a status response frame.
pub fn decode_status_response(frame: &[u8]) -> Result<String, CodecError> {
    let mut cursor = frame;
    let packet_id = read_varint(&mut cursor)?;
    if packet_id != STATUS_RESPONSE_ID {
        return Err(CodecError::UnexpectedPacket(packet_id));
    }
    read_string(&mut cursor)
}
