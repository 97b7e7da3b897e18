use std::fmt;

use serde_json::Value;

use crate::cbor::decode_cbor;
use crate::errors::DecodeError;

/// Request method carried in the high nibble of the packet's first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Unknown(u8),
}

impl Method {
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble {
            0 => Method::Get,
            1 => Method::Post,
            2 => Method::Put,
            3 => Method::Delete,
            other => Method::Unknown(other),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
            Method::Put => f.write_str("PUT"),
            Method::Delete => f.write_str("DELETE"),
            Method::Unknown(_) => f.write_str("unknown METHOD"),
        }
    }
}

/// Topic carried in the low nibble of the packet's first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Event,
    Config,
    State,
    Unknown(u8),
}

impl Topic {
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble {
            0 => Topic::Event,
            1 => Topic::Config,
            2 => Topic::State,
            other => Topic::Unknown(other),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Event => f.write_str("event"),
            Topic::Config => f.write_str("config"),
            Topic::State => f.write_str("state"),
            Topic::Unknown(_) => f.write_str("unknown topic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub method: Method,
    pub topic: Topic,
    pub body: Value,
}

/// Turns a hex dump such as `"10, a1, 62"` into bytes. The separator is removed
/// first, then any remaining ASCII whitespace.
pub fn parse_hex(input: &str, separator: Option<&str>) -> Result<Vec<u8>, DecodeError> {
    let without_separator = match separator {
        Some(sep) if !sep.is_empty() => input.replace(sep, ""),
        _ => input.to_string(),
    };
    let compact: String = without_separator
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();

    Ok(hex::decode(compact)?)
}

/// Splits the request-type byte from the CBOR body and decodes both.
pub fn decode_packet(bytes: &[u8]) -> Result<Packet, DecodeError> {
    let (&request_type, body) = bytes.split_first().ok_or(DecodeError::EmptyPacket)?;

    Ok(Packet {
        method: Method::from_nibble((request_type & 0xf0) >> 4),
        topic: Topic::from_nibble(request_type & 0x0f),
        body: decode_cbor(body)?,
    })
}
