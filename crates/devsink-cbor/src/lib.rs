pub mod cbor;
pub mod errors;
pub mod packet;
pub mod stream;

pub use cbor::decode_cbor;
pub use errors::DecodeError;
pub use packet::{decode_packet, parse_hex, Method, Packet, Topic};
pub use stream::{decode_line, decode_stream, write_body, StreamSummary};

#[cfg(test)]
mod tests;
