use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("no payload or payload too short")]
    EmptyPacket,

    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("unexpected end of CBOR input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("{count} trailing bytes after CBOR item at offset {offset}")]
    TrailingBytes { offset: usize, count: usize },

    #[error("reserved additional info {info} for major type {major} at offset {offset}")]
    Reserved { major: u8, info: u8, offset: usize },

    #[error("unexpected break code at offset {offset}")]
    UnexpectedBreak { offset: usize },

    #[error("invalid chunk in indefinite-length string at offset {offset}")]
    InvalidChunk { offset: usize },

    #[error("text string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    #[error("integer at offset {offset} does not fit in a JSON number")]
    IntegerOverflow { offset: usize },

    #[error("unsupported simple value {value} at offset {offset}")]
    UnsupportedSimple { value: u8, offset: usize },

    #[error("CBOR nesting deeper than {limit} levels")]
    TooDeep { limit: usize },
}
