//! Ledger time codec

use chrono::{DateTime, SecondsFormat};
use serde_json::Value;

use super::{wire_uint, Codec, CodecError};
use crate::schema::WireRecord;

/// Unix timestamp of the ledger epoch, 2000-01-01T00:00:00Z.
pub const RIPPLE_TIME_EPOCH: i64 = 946_684_800;

fn decode(_owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
    let seconds = wire_uint(&wire, "RIPPLE_TIME", u32::MAX.into())?;
    let timestamp = DateTime::from_timestamp(RIPPLE_TIME_EPOCH + seconds as i64, 0)
        .ok_or_else(|| CodecError::InvalidTimestamp(seconds.to_string()))?;
    Ok(Value::String(
        timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
    ))
}

fn encode(_owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
    let text = domain
        .as_str()
        .ok_or_else(|| CodecError::shape("RFC 3339 timestamp"))?;
    let timestamp = DateTime::parse_from_rfc3339(text)
        .map_err(|_| CodecError::InvalidTimestamp(text.to_string()))?;

    let seconds = u32::try_from(timestamp.timestamp() - RIPPLE_TIME_EPOCH)
        .map_err(|_| CodecError::out_of_range("RIPPLE_TIME", text))?;
    Ok(Value::from(seconds))
}

/// Seconds since the ledger epoch ⇄ RFC 3339 UTC timestamp (second precision)
pub const RIPPLE_TIME: Codec = Codec::new("RIPPLE_TIME", decode, encode);
