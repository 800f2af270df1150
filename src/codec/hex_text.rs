//! Hex/text codec
//!
//! Wire form is the upper-case hex of the UTF-8 bytes. Lower-case hex decodes
//! fine but re-encodes upper-case, so `encode(decode(y)) == y` holds for
//! canonical (upper-case) wire values.

use serde_json::Value;

use super::{Codec, CodecError};
use crate::schema::WireRecord;

pub fn hex_to_text(hex: &str) -> Result<String, CodecError> {
    let bytes = hex::decode(hex).map_err(|_| CodecError::InvalidHex(hex.to_string()))?;
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
}

pub fn text_to_hex(text: &str) -> String {
    hex::encode_upper(text.as_bytes())
}

fn decode(_owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
    let hex = wire.as_str().ok_or_else(|| CodecError::shape("hex string"))?;
    hex_to_text(hex).map(Value::String)
}

fn encode(_owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
    let text = domain.as_str().ok_or_else(|| CodecError::shape("string"))?;
    Ok(Value::String(text_to_hex(text)))
}

/// Hex-encoded bytes ⇄ text (`Domain`, `URI`, `CredentialType`)
pub const HEX_TEXT: Codec = Codec::new("HEX_TEXT", decode, encode);
