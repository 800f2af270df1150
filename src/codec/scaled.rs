//! Fixed-point scaling codecs
//!
//! Fees and rates are carried on the wire as scaled integers and exposed as
//! percentages (decimal strings). Encoding rounds half away from zero to the
//! nearest representable wire integer.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use super::{decimal_value, domain_decimal, wire_uint, Codec, CodecError};
use crate::schema::WireRecord;

/// Wire units per percent for `TransferFee`: `314` on the wire is `0.314` %.
pub const TRANSFER_FEE_SCALE: u64 = 1_000;

/// Largest accepted `TransferFee` (50 %).
const TRANSFER_FEE_MAX: u64 = 50_000;

/// `TransferRate` is in billionths; this value means "no fee".
const TRANSFER_RATE_PARITY: u64 = 1_000_000_000;

/// Wire units per percent for `TransferRate`.
const TRANSFER_RATE_SCALE: u64 = 10_000_000;

/// Largest accepted `TransferRate` (100 %).
const TRANSFER_RATE_MAX: u64 = 2_000_000_000;

fn scale_to_wire(percent: Decimal, scale: u64, codec: &'static str) -> Result<u64, CodecError> {
    (percent * Decimal::from(scale))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or_else(|| CodecError::out_of_range(codec, percent))
}

fn decode_transfer_fee(_owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
    let raw = wire_uint(&wire, "TRANSFER_FEE", TRANSFER_FEE_MAX)?;
    Ok(decimal_value(
        Decimal::from(raw) / Decimal::from(TRANSFER_FEE_SCALE),
    ))
}

fn encode_transfer_fee(_owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
    let percent = domain_decimal(&domain)?;
    let raw = scale_to_wire(percent, TRANSFER_FEE_SCALE, "TRANSFER_FEE")?;
    if raw > TRANSFER_FEE_MAX {
        return Err(CodecError::out_of_range("TRANSFER_FEE", percent));
    }
    Ok(Value::from(raw))
}

/// `TransferFee` (UInt16, 0..=50 000) ⇄ percent, scale 1 000
pub const TRANSFER_FEE: Codec = Codec::new("TRANSFER_FEE", decode_transfer_fee, encode_transfer_fee);

fn decode_transfer_rate(_owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
    let raw = wire_uint(&wire, "TRANSFER_RATE", TRANSFER_RATE_MAX)?;
    if raw == 0 {
        return Ok(decimal_value(Decimal::ZERO));
    }
    if raw < TRANSFER_RATE_PARITY {
        return Err(CodecError::out_of_range("TRANSFER_RATE", raw));
    }
    Ok(decimal_value(
        Decimal::from(raw - TRANSFER_RATE_PARITY) / Decimal::from(TRANSFER_RATE_SCALE),
    ))
}

fn encode_transfer_rate(_owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
    let percent = domain_decimal(&domain)?;
    if percent.is_zero() {
        return Ok(Value::from(0u64));
    }
    let raw = scale_to_wire(percent, TRANSFER_RATE_SCALE, "TRANSFER_RATE")?
        .checked_add(TRANSFER_RATE_PARITY)
        .filter(|raw| *raw <= TRANSFER_RATE_MAX)
        .ok_or_else(|| CodecError::out_of_range("TRANSFER_RATE", percent))?;
    Ok(Value::from(raw))
}

/// `TransferRate` (UInt32 billionths) ⇄ percent.
///
/// Both `0` and `1 000 000 000` mean 0 %; the latter re-encodes as `0`.
pub const TRANSFER_RATE: Codec = Codec::new("TRANSFER_RATE", decode_transfer_rate, encode_transfer_rate);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn owner() -> WireRecord {
        WireRecord::new()
    }

    #[test]
    fn test_transfer_fee_fixtures() {
        for (wire, domain) in [(0, "0"), (314, "0.314"), (1_000, "1"), (50_000, "50")] {
            assert_eq!(TRANSFER_FEE.decode(&owner(), json!(wire)).unwrap(), json!(domain));
            assert_eq!(TRANSFER_FEE.encode(&owner(), json!(domain)).unwrap(), json!(wire));
        }
    }

    #[test]
    fn test_transfer_fee_rounds_to_nearest_unit() {
        assert_eq!(TRANSFER_FEE.encode(&owner(), json!("0.3145")).unwrap(), json!(315));
        assert_eq!(TRANSFER_FEE.encode(&owner(), json!(0.3144)).unwrap(), json!(314));
    }

    #[test]
    fn test_transfer_fee_out_of_range() {
        assert!(matches!(
            TRANSFER_FEE.decode(&owner(), json!(50_001)),
            Err(CodecError::OutOfRange { .. })
        ));
        assert!(TRANSFER_FEE.encode(&owner(), json!("50.001")).is_err());
        assert!(TRANSFER_FEE.encode(&owner(), json!("-1")).is_err());
    }

    #[test]
    fn test_transfer_rate_fixtures() {
        for (wire, domain) in [
            (0u64, "0"),
            (1_002_000_000, "0.2"),
            (1_005_000_000, "0.5"),
            (2_000_000_000, "100"),
        ] {
            assert_eq!(TRANSFER_RATE.decode(&owner(), json!(wire)).unwrap(), json!(domain));
            assert_eq!(TRANSFER_RATE.encode(&owner(), json!(domain)).unwrap(), json!(wire));
        }
    }

    #[test]
    fn test_transfer_rate_parity_is_lossy() {
        let decoded = TRANSFER_RATE.decode(&owner(), json!(1_000_000_000)).unwrap();
        assert_eq!(decoded, json!("0"));
        assert_eq!(TRANSFER_RATE.encode(&owner(), decoded).unwrap(), json!(0));
    }

    #[test]
    fn test_transfer_rate_below_parity_rejected() {
        assert!(TRANSFER_RATE.decode(&owner(), json!(999_999_999)).is_err());
        assert!(TRANSFER_RATE.encode(&owner(), json!("100.1")).is_err());
    }

    proptest! {
        #[test]
        fn prop_transfer_fee_wire_round_trips(raw in 0u64..=TRANSFER_FEE_MAX) {
            let domain = TRANSFER_FEE.decode(&owner(), json!(raw)).unwrap();
            prop_assert_eq!(TRANSFER_FEE.encode(&owner(), domain).unwrap(), json!(raw));
        }

        #[test]
        fn prop_transfer_rate_wire_round_trips(raw in (TRANSFER_RATE_PARITY + 1)..=TRANSFER_RATE_MAX) {
            let domain = TRANSFER_RATE.decode(&owner(), json!(raw)).unwrap();
            prop_assert_eq!(TRANSFER_RATE.encode(&owner(), domain).unwrap(), json!(raw));
        }
    }
}
