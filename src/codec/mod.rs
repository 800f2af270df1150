//! Codec catalogue
//!
//! A codec is a pure `decode(owner, wire) -> domain` / `encode(owner, domain) -> wire`
//! pair. `owner` is the backing record the field lives in, for codecs whose
//! interpretation depends on a sibling field (flags depend on the discriminator).
//!
//! Codecs never perform I/O and never mutate the owner.

mod amount;
mod error;
mod flag_set;
mod hex_text;
mod scaled;
mod time;
mod wrapped;

pub use amount::{parse_decimal, Amount, AMOUNT, DROPS_PER_NATIVE, NATIVE_CURRENCY};
pub use error::CodecError;
pub use flag_set::{FLAGS, FLAG_INDEX};
pub use hex_text::{hex_to_text, text_to_hex, HEX_TEXT};
pub use scaled::{TRANSFER_FEE, TRANSFER_FEE_SCALE, TRANSFER_RATE};
pub use time::{RIPPLE_TIME, RIPPLE_TIME_EPOCH};
pub use wrapped::{CREDENTIALS, HOOK_PARAMETERS, MEMOS, PERMISSIONS, SIGNERS, SIGNER_ENTRIES};

use rust_decimal::Decimal;
use serde_json::Value;

use crate::schema::WireRecord;

/// Converts one direction of a codec
pub type CodecFn = fn(&WireRecord, Value) -> Result<Value, CodecError>;

/// Decode/encode pair for one field representation.
///
/// Either half may be absent; schema tables refuse to bind such a codec
/// (see [`crate::schema::SchemaError::UnresolvedCodec`]).
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    name: &'static str,
    decoder: Option<CodecFn>,
    encoder: Option<CodecFn>,
}

impl Codec {
    pub const fn new(name: &'static str, decode: CodecFn, encode: CodecFn) -> Self {
        Self {
            name,
            decoder: Some(decode),
            encoder: Some(encode),
        }
    }

    /// A codec with only a decode half. Readable, never bindable to a schema.
    pub const fn decode_only(name: &'static str, decode: CodecFn) -> Self {
        Self {
            name,
            decoder: Some(decode),
            encoder: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn decoder(&self) -> Option<CodecFn> {
        self.decoder
    }

    pub fn encoder(&self) -> Option<CodecFn> {
        self.encoder
    }

    pub fn decode(&self, owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
        let decode = self.decoder.ok_or(CodecError::Unresolved {
            codec: self.name,
            missing: "decode",
        })?;
        decode(owner, wire)
    }

    pub fn encode(&self, owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
        let encode = self.encoder.ok_or(CodecError::Unresolved {
            codec: self.name,
            missing: "encode",
        })?;
        encode(owner, domain)
    }
}

// =========================================================================
// Shared value helpers
// =========================================================================

pub(crate) fn wire_uint(value: &Value, codec: &'static str, max: u64) -> Result<u64, CodecError> {
    let raw = value
        .as_u64()
        .ok_or_else(|| CodecError::shape("unsigned integer"))?;
    if raw > max {
        return Err(CodecError::out_of_range(codec, raw));
    }
    Ok(raw)
}

/// Domain decimals are accepted as strings or JSON numbers.
pub(crate) fn domain_decimal(value: &Value) -> Result<Decimal, CodecError> {
    match value {
        Value::String(text) => parse_decimal(text),
        Value::Number(number) => parse_decimal(&number.to_string()),
        _ => Err(CodecError::shape("decimal string or number")),
    }
}

/// Domain decimals are emitted as normalized strings.
pub(crate) fn decimal_value(value: Decimal) -> Value {
    Value::String(value.normalize().to_string())
}
