//! Minimal CBOR (RFC 8949) reader producing `serde_json::Value`.
//!
//! Only the subset that maps onto JSON is supported: byte strings become
//! lowercase hex, tags are dropped, `undefined` becomes `null` and
//! non-finite floats become `null`.

use serde_json::{Map, Number, Value};

use crate::errors::DecodeError;

pub const MAX_DEPTH: usize = 128;

const BREAK: u8 = 0xff;

const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_NEGATIVE: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_TAG: u8 = 6;
const MAJOR_SIMPLE: u8 = 7;

/// Decodes exactly one CBOR data item; trailing bytes are an error.
pub fn decode_cbor(bytes: &[u8]) -> Result<Value, DecodeError> {
    let mut decoder = Decoder { input: bytes, pos: 0 };
    let value = decoder.item(0)?;

    if decoder.pos < bytes.len() {
        return Err(DecodeError::TrailingBytes {
            offset: decoder.pos,
            count: bytes.len() - decoder.pos,
        });
    }

    Ok(value)
}

struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn byte(&mut self) -> Result<u8, DecodeError> {
        let byte = *self
            .input
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEnd { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    fn peek(&self) -> Result<u8, DecodeError> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEnd { offset: self.pos })
    }

    fn take(&mut self, len: u64) -> Result<&'a [u8], DecodeError> {
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| self.pos.checked_add(len))
            .filter(|end| *end <= self.input.len())
            .ok_or(DecodeError::UnexpectedEnd { offset: self.pos })?;
        let slice = &self.input[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N as u64)?);
        Ok(out)
    }

    /// Reads the argument following an initial byte. `None` means indefinite length.
    fn argument(&mut self, major: u8, info: u8, offset: usize) -> Result<Option<u64>, DecodeError> {
        match info {
            0..=23 => Ok(Some(u64::from(info))),
            24 => Ok(Some(u64::from(self.byte()?))),
            25 => Ok(Some(u64::from(u16::from_be_bytes(self.take_array()?)))),
            26 => Ok(Some(u64::from(u32::from_be_bytes(self.take_array()?)))),
            27 => Ok(Some(u64::from_be_bytes(self.take_array()?))),
            31 => Ok(None),
            _ => Err(DecodeError::Reserved { major, info, offset }),
        }
    }

    fn definite(&mut self, major: u8, info: u8, offset: usize) -> Result<u64, DecodeError> {
        self.argument(major, info, offset)?
            .ok_or(DecodeError::Reserved { major, info, offset })
    }

    fn item(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep { limit: MAX_DEPTH });
        }

        let offset = self.pos;
        let initial = self.byte()?;
        let major = initial >> 5;
        let info = initial & 0x1f;

        match major {
            MAJOR_UNSIGNED => Ok(Value::from(self.definite(major, info, offset)?)),
            MAJOR_NEGATIVE => {
                let n = self.definite(major, info, offset)?;
                let n = i64::try_from(n).map_err(|_| DecodeError::IntegerOverflow { offset })?;
                Ok(Value::from(-1 - n))
            }
            MAJOR_BYTES => {
                let bytes = self.string_bytes(major, info, offset)?;
                Ok(Value::String(hex::encode(bytes)))
            }
            MAJOR_TEXT => {
                let bytes = self.string_bytes(major, info, offset)?;
                String::from_utf8(bytes)
                    .map(Value::String)
                    .map_err(|_| DecodeError::InvalidUtf8 { offset })
            }
            MAJOR_ARRAY => self.array(major, info, offset, depth),
            MAJOR_MAP => self.map(major, info, offset, depth),
            MAJOR_TAG => {
                self.definite(major, info, offset)?;
                self.item(depth + 1)
            }
            MAJOR_SIMPLE => self.simple(info, offset),
            _ => unreachable!("major type is three bits"),
        }
    }

    fn string_bytes(&mut self, major: u8, info: u8, offset: usize) -> Result<Vec<u8>, DecodeError> {
        if let Some(len) = self.argument(major, info, offset)? {
            return Ok(self.take(len)?.to_vec());
        }

        let mut out = Vec::new();
        loop {
            if self.peek()? == BREAK {
                self.pos += 1;
                return Ok(out);
            }
            let chunk_offset = self.pos;
            let chunk = self.byte()?;
            if chunk >> 5 != major {
                return Err(DecodeError::InvalidChunk { offset: chunk_offset });
            }
            let len = self
                .argument(major, chunk & 0x1f, chunk_offset)?
                .ok_or(DecodeError::InvalidChunk { offset: chunk_offset })?;
            out.extend_from_slice(self.take(len)?);
        }
    }

    fn array(
        &mut self,
        major: u8,
        info: u8,
        offset: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let mut items = Vec::new();
        match self.argument(major, info, offset)? {
            Some(len) => {
                for _ in 0..len {
                    items.push(self.item(depth + 1)?);
                }
            }
            None => {
                while self.peek()? != BREAK {
                    items.push(self.item(depth + 1)?);
                }
                self.pos += 1;
            }
        }
        Ok(Value::Array(items))
    }

    fn map(
        &mut self,
        major: u8,
        info: u8,
        offset: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let mut entries = Map::new();
        match self.argument(major, info, offset)? {
            Some(len) => {
                for _ in 0..len {
                    let key = self.item(depth + 1)?;
                    let value = self.item(depth + 1)?;
                    entries.insert(key_to_string(key), value);
                }
            }
            None => {
                while self.peek()? != BREAK {
                    let key = self.item(depth + 1)?;
                    let value = self.item(depth + 1)?;
                    entries.insert(key_to_string(key), value);
                }
                self.pos += 1;
            }
        }
        Ok(Value::Object(entries))
    }

    fn simple(&mut self, info: u8, offset: usize) -> Result<Value, DecodeError> {
        match info {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 | 23 => Ok(Value::Null),
            24 => {
                let value = self.byte()?;
                Err(DecodeError::UnsupportedSimple { value, offset })
            }
            25 => Ok(float(f16_to_f64(u16::from_be_bytes(self.take_array()?)))),
            26 => Ok(float(f64::from(f32::from_be_bytes(self.take_array()?)))),
            27 => Ok(float(f64::from_be_bytes(self.take_array()?))),
            31 => Err(DecodeError::UnexpectedBreak { offset }),
            0..=19 => Err(DecodeError::UnsupportedSimple { value: info, offset }),
            _ => Err(DecodeError::Reserved {
                major: MAJOR_SIMPLE,
                info,
                offset,
            }),
        }
    }
}

fn key_to_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn float(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

fn f16_to_f64(bits: u16) -> f64 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = i32::from((bits >> 10) & 0x1f);
    let mantissa = f64::from(bits & 0x3ff);

    let magnitude = match exponent {
        0 => mantissa * 2f64.powi(-24),
        31 if mantissa == 0.0 => f64::INFINITY,
        31 => f64::NAN,
        _ => (mantissa + 1024.0) * 2f64.powi(exponent - 25),
    };

    sign * magnitude
}
