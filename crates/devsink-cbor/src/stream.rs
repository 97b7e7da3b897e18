use std::io::{self, BufRead, Write};

use tracing::{debug, error};

use crate::errors::DecodeError;
use crate::packet::{decode_packet, parse_hex, Packet};

/// Counts of what [`decode_stream`] did with each input line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub decoded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Decodes one hex-encoded packet.
pub fn decode_line(line: &str, separator: Option<&str>) -> Result<Packet, DecodeError> {
    let bytes = parse_hex(line, separator)?;
    let packet = decode_packet(&bytes)?;
    debug!("got request: {} {}", packet.method, packet.topic);
    Ok(packet)
}

/// Writes the packet body as one compact JSON line and flushes.
pub fn write_body<W: Write>(out: &mut W, packet: &Packet) -> io::Result<()> {
    serde_json::to_writer(&mut *out, &packet.body)?;
    writeln!(out)?;
    out.flush()
}

/// Decodes every line of `input` to `out`. Blank lines are skipped and lines
/// that fail to decode are logged; only I/O errors end the stream.
pub fn decode_stream<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    separator: Option<&str>,
) -> io::Result<StreamSummary> {
    let mut summary = StreamSummary::default();

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            summary.skipped += 1;
            continue;
        }
        match decode_line(&line, separator) {
            Ok(packet) => {
                write_body(out, &packet)?;
                summary.decoded += 1;
            }
            Err(err) => {
                error!("failed to process input line: {err}");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
