//! Wire-type descriptors
//!
//! A wire type knows how to read and write one field of a backing record
//! and which JSON shapes are legal for it. Absent and `null` read the same.

use serde_json::{Map, Value};

use crate::codec::CodecError;

/// Ordered field-name → wire-value store backing every entity.
pub type WireRecord = Map<String, Value>;

pub type WireGetter = fn(&WireRecord, &str) -> Result<Option<Value>, CodecError>;
pub type WireSetter = fn(&mut WireRecord, &str, Value) -> Result<(), CodecError>;

/// Getter/setter pair bound to one wire type.
#[derive(Debug, Clone, Copy)]
pub struct WireType {
    pub name: &'static str,
    pub get: Option<WireGetter>,
    pub set: Option<WireSetter>,
}

impl WireType {
    pub const fn new(name: &'static str, get: WireGetter, set: WireSetter) -> Self {
        Self {
            name,
            get: Some(get),
            set: Some(set),
        }
    }

    /// Descriptor that can be read but not written.
    pub const fn read_only(name: &'static str, get: WireGetter) -> Self {
        Self {
            name,
            get: Some(get),
            set: None,
        }
    }
}

fn read(
    record: &WireRecord,
    field: &str,
    accepts: fn(&Value) -> bool,
    expected: &'static str,
) -> Result<Option<Value>, CodecError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) if accepts(value) => Ok(Some(value.clone())),
        Some(_) => Err(CodecError::shape(expected)),
    }
}

fn write(
    record: &mut WireRecord,
    field: &str,
    value: Value,
    accepts: fn(&Value) -> bool,
    expected: &'static str,
) -> Result<(), CodecError> {
    if !accepts(&value) {
        return Err(CodecError::shape(expected));
    }
    record.insert(field.to_string(), value);
    Ok(())
}

macro_rules! wire_type {
    ($(#[$doc:meta])* $name:ident, $expected:literal, $accepts:expr) => {
        $(#[$doc])*
        pub const $name: WireType = {
            fn get(record: &WireRecord, field: &str) -> Result<Option<Value>, CodecError> {
                read(record, field, $accepts, $expected)
            }
            fn set(record: &mut WireRecord, field: &str, value: Value) -> Result<(), CodecError> {
                write(record, field, value, $accepts, $expected)
            }
            WireType::new(stringify!($name), get, set)
        };
    };
}

// =========================================================================
// Shape checks
// =========================================================================

fn is_hex(text: &str) -> bool {
    text.len() % 2 == 0 && text.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_hex_of_len<const LEN: usize>(value: &Value) -> bool {
    value.as_str().is_some_and(|text| text.len() == LEN && is_hex(text))
}

fn is_vector256(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(is_hex_of_len::<64>))
}

fn is_blob(value: &Value) -> bool {
    value.as_str().is_some_and(is_hex)
}

fn is_account_id(value: &Value) -> bool {
    value.as_str().is_some_and(|text| {
        text.starts_with('r')
            && (25..=35).contains(&text.len())
            && text.bytes().all(|b| b.is_ascii_alphanumeric())
    })
}

fn is_currency(value: &Value) -> bool {
    value.as_str().is_some_and(|code| {
        (code.len() == 3 && code.bytes().all(|b| b.is_ascii_graphic())) || (code.len() == 40 && is_hex(code))
    })
}

fn is_uint<const MAX: u64>(value: &Value) -> bool {
    value.as_u64().is_some_and(|n| n <= MAX)
}

fn is_uint64(value: &Value) -> bool {
    value.as_str().is_some_and(|text| {
        !text.is_empty() && text.len() <= 16 && text.bytes().all(|b| b.is_ascii_hexdigit())
    })
}

fn is_amount(value: &Value) -> bool {
    match value {
        Value::String(drops) => !drops.is_empty() && drops.bytes().all(|b| b.is_ascii_digit()),
        Value::Object(issued) => {
            issued.get("currency").is_some_and(Value::is_string)
                && issued.get("value").is_some_and(Value::is_string)
        }
        _ => false,
    }
}

fn is_string(value: &Value) -> bool {
    value.is_string()
}

// =========================================================================
// Catalogue
// =========================================================================

wire_type!(
    /// Base58 classic address
    ACCOUNT_ID, "classic address", is_account_id
);
wire_type!(HASH128, "32-character hex hash", is_hex_of_len::<32>);
wire_type!(HASH256, "64-character hex hash", is_hex_of_len::<64>);
wire_type!(
    /// Arbitrary hex-encoded bytes (may be empty)
    BLOB, "hex string", is_blob
);
wire_type!(CURRENCY, "currency code", is_currency);
wire_type!(UINT8, "unsigned 8-bit integer", is_uint::<{ u8::MAX as u64 }>);
wire_type!(UINT16, "unsigned 16-bit integer", is_uint::<{ u16::MAX as u64 }>);
wire_type!(UINT32, "unsigned 32-bit integer", is_uint::<{ u32::MAX as u64 }>);
wire_type!(
    /// 64-bit values are hex strings on the wire
    UINT64, "hex-encoded 64-bit integer", is_uint64
);
wire_type!(AMOUNT, "drops string or {currency, value} object", is_amount);
wire_type!(VECTOR256, "array of 64-character hex hashes", is_vector256);
wire_type!(STARRAY, "array", Value::is_array);
wire_type!(STOBJECT, "object", Value::is_object);
wire_type!(STRING, "string", is_string);
wire_type!(TRANSACTION_TYPE, "transaction type name", is_string);
wire_type!(LEDGER_ENTRY_TYPE, "ledger entry type name", is_string);
