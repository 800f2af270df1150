//! Amount codec
//!
//! Native amounts travel as a string of drops, issued amounts as
//! `{currency, issuer, value}`. Both decode to the same object shape so
//! callers never branch on the wire form.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{decimal_value, domain_decimal, Codec, CodecError};
use crate::schema::WireRecord;

/// Currency code of the ledger's native asset.
pub const NATIVE_CURRENCY: &str = "XRP";

/// Drops per one unit of the native asset.
pub const DROPS_PER_NATIVE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Decoded amount, native or issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub value: Decimal,
}

impl Amount {
    pub fn native(value: Decimal) -> Self {
        Self {
            currency: NATIVE_CURRENCY.to_string(),
            issuer: None,
            value,
        }
    }

    pub fn is_native(&self) -> bool {
        self.issuer.is_none() && self.currency == NATIVE_CURRENCY
    }

    /// Native amount from a wire drops string.
    pub fn from_drops(drops: &str) -> Result<Self, CodecError> {
        Ok(Self::native(parse_decimal(drops)? / DROPS_PER_NATIVE))
    }
}

/// Parse a ledger decimal string, plain or in scientific notation (`1e-15`).
pub fn parse_decimal(text: &str) -> Result<Decimal, CodecError> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| CodecError::InvalidDecimal(text.to_string()))
}

fn native_object(value: Decimal) -> Value {
    let mut object = Map::with_capacity(2);
    object.insert("currency".to_string(), Value::from(NATIVE_CURRENCY));
    object.insert("value".to_string(), decimal_value(value));
    Value::Object(object)
}

fn decode(_owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
    match wire {
        Value::String(drops) => Ok(native_object(Amount::from_drops(&drops)?.value)),
        Value::Object(issued) if issued.contains_key("currency") && issued.contains_key("value") => {
            Ok(Value::Object(issued))
        }
        _ => Err(CodecError::shape("drops string or {currency, value} object")),
    }
}

fn encode(_owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
    let Value::Object(object) = &domain else {
        return Err(CodecError::shape("{currency, value} object"));
    };
    let currency = object
        .get("currency")
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::shape("{currency, value} object"))?;
    let value = object
        .get("value")
        .ok_or_else(|| CodecError::shape("{currency, value} object"))?;

    if currency != NATIVE_CURRENCY || object.contains_key("issuer") {
        return Ok(domain);
    }

    let drops = domain_decimal(value)? * DROPS_PER_NATIVE;
    if drops.is_sign_negative() || drops.fract() != Decimal::ZERO {
        return Err(CodecError::out_of_range("AMOUNT", drops));
    }
    Ok(Value::String(drops.normalize().to_string()))
}

/// Native drops string ⇄ `{currency, value}`; issued objects pass through
pub const AMOUNT: Codec = Codec::new("AMOUNT", decode, encode);

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn owner() -> WireRecord {
        WireRecord::new()
    }

    #[test]
    fn test_native_amount_round_trip() {
        let decoded = AMOUNT.decode(&owner(), json!("1500000")).unwrap();
        assert_eq!(decoded, json!({ "currency": "XRP", "value": "1.5" }));
        assert_eq!(AMOUNT.encode(&owner(), decoded).unwrap(), json!("1500000"));
    }

    #[test]
    fn test_issued_amount_passes_through() {
        let issued = json!({
            "currency": "USD",
            "issuer": "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B",
            "value": "-42.5"
        });
        assert_eq!(AMOUNT.decode(&owner(), issued.clone()).unwrap(), issued);
        assert_eq!(AMOUNT.encode(&owner(), issued.clone()).unwrap(), issued);
    }

    #[test]
    fn test_sub_drop_native_amount_rejected() {
        let err = AMOUNT
            .encode(&owner(), json!({ "currency": "XRP", "value": "0.0000001" }))
            .unwrap_err();
        assert!(matches!(err, CodecError::OutOfRange { .. }));
    }

    #[test]
    fn test_typed_amount() {
        let amount: Amount =
            serde_json::from_value(json!({ "currency": "XRP", "value": "0.000012" })).unwrap();
        assert!(amount.is_native());
        assert_eq!(amount.value, dec!(0.000012));
        assert_eq!(Amount::from_drops("12").unwrap(), amount);
    }

    #[test]
    fn test_parse_decimal_scientific() {
        assert_eq!(parse_decimal("1e-3").unwrap(), dec!(0.001));
        assert_eq!(parse_decimal("-42.5").unwrap(), dec!(-42.5));
        assert!(parse_decimal("forty").is_err());
    }

    #[test]
    fn test_malformed_amount_rejected() {
        assert!(AMOUNT.decode(&owner(), json!(12)).is_err());
        assert!(AMOUNT.decode(&owner(), json!({ "value": "1" })).is_err());
        assert!(AMOUNT.encode(&owner(), json!("12")).is_err());
    }
}
