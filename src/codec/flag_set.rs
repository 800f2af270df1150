//! Flags codec
//!
//! `Flags` ⇄ `{name: bool}` using the flag table of the owner record's
//! discriminator. Bits outside that table do not survive a round trip.
//!
//! `SetFlag` / `ClearFlag` carry one flag as an index rather than a mask.

use serde_json::Value;

use super::{wire_uint, Codec, CodecError};
use crate::flags::{self, EntityKind};
use crate::schema::WireRecord;

fn decode(owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
    let (kind, discriminator) = EntityKind::of_record(owner).ok_or(CodecError::MissingDiscriminator)?;
    let raw = wire_uint(&wire, "FLAGS", u32::MAX.into())? as u32;
    Ok(flags::decode(kind, discriminator, raw).to_value())
}

/// Accepts `{name: bool}`, a list of names, or the raw integer.
fn encode(owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
    let (kind, discriminator) = EntityKind::of_record(owner).ok_or(CodecError::MissingDiscriminator)?;

    let raw = match &domain {
        Value::Number(_) => wire_uint(&domain, "FLAGS", u32::MAX.into())? as u32,
        Value::Object(named) => flags::encode(
            kind,
            discriminator,
            named
                .iter()
                .filter(|(_, set)| set.as_bool().unwrap_or(false))
                .map(|(name, _)| name.as_str()),
        )?,
        Value::Array(names) => {
            let names = names
                .iter()
                .map(|name| name.as_str().ok_or_else(|| CodecError::shape("flag name")))
                .collect::<Result<Vec<_>, _>>()?;
            flags::encode(kind, discriminator, names)?
        }
        _ => return Err(CodecError::shape("flag map, flag name list or integer")),
    };

    Ok(Value::from(raw))
}

/// `Flags` (UInt32) ⇄ named booleans scoped by the owner's discriminator
pub const FLAGS: Codec = Codec::new("FLAGS", decode, encode);

fn discriminator(owner: &WireRecord) -> Result<&str, CodecError> {
    owner
        .get("TransactionType")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingDiscriminator)
}

fn decode_index(owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
    let index = wire_uint(&wire, "FLAG_INDEX", u32::MAX.into())? as u32;
    Ok(Value::from(flags::index_name(discriminator(owner)?, index)?))
}

/// Accepts a flag name or a known index.
fn encode_index(owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
    let discriminator = discriminator(owner)?;
    let index = match &domain {
        Value::String(name) => flags::index_of(discriminator, name)?,
        Value::Number(_) => {
            let index = wire_uint(&domain, "FLAG_INDEX", u32::MAX.into())? as u32;
            flags::index_name(discriminator, index)?;
            index
        }
        _ => return Err(CodecError::shape("flag name or index")),
    };
    Ok(Value::from(index))
}

/// `SetFlag` / `ClearFlag` (UInt32) ⇄ a single flag name
pub const FLAG_INDEX: Codec = Codec::new("FLAG_INDEX", decode_index, encode_index);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn owner(record: Value) -> WireRecord {
        record.as_object().cloned().unwrap()
    }

    #[test]
    fn test_decode_uses_owner_discriminator() {
        let offer = owner(json!({ "LedgerEntryType": "NFTokenOffer" }));
        assert_eq!(FLAGS.decode(&offer, json!(1)).unwrap(), json!({ "SellNFToken": true }));
    }

    #[test]
    fn test_encode_from_map_and_list() {
        let tx = owner(json!({ "TransactionType": "OfferCreate" }));

        let from_map = FLAGS
            .encode(&tx, json!({ "ImmediateOrCancel": true, "FillOrKill": true, "Sell": false }))
            .unwrap();
        assert_eq!(from_map, json!(393216));

        let from_list = FLAGS.encode(&tx, json!(["tfFillOrKill", "ImmediateOrCancel"])).unwrap();
        assert_eq!(from_list, json!(393216));
    }

    #[test]
    fn test_missing_discriminator_rejected() {
        assert_eq!(
            FLAGS.decode(&WireRecord::new(), json!(0)).unwrap_err(),
            CodecError::MissingDiscriminator
        );
    }

    #[test]
    fn test_flag_index_round_trip() {
        let tx = owner(json!({ "TransactionType": "AccountSet" }));

        assert_eq!(FLAG_INDEX.decode(&tx, json!(4)).unwrap(), json!("asfDisableMaster"));
        assert_eq!(FLAG_INDEX.encode(&tx, json!("asfDisableMaster")).unwrap(), json!(4));
        assert_eq!(FLAG_INDEX.encode(&tx, json!("DefaultRipple")).unwrap(), json!(8));
        assert_eq!(FLAG_INDEX.encode(&tx, json!(9)).unwrap(), json!(9));
    }

    #[test]
    fn test_flag_index_unknown_rejected() {
        let tx = owner(json!({ "TransactionType": "AccountSet" }));

        assert!(matches!(FLAG_INDEX.decode(&tx, json!(11)), Err(CodecError::Flag(_))));
        assert!(matches!(FLAG_INDEX.encode(&tx, json!(99)), Err(CodecError::Flag(_))));
        assert!(matches!(
            FLAG_INDEX.encode(&tx, json!("asfBogus")),
            Err(CodecError::Flag(_))
        ));
        assert_eq!(
            FLAG_INDEX.decode(&WireRecord::new(), json!(4)).unwrap_err(),
            CodecError::MissingDiscriminator
        );
    }

    #[test]
    fn test_unknown_flag_name_rejected() {
        let tx = owner(json!({ "TransactionType": "Payment" }));
        assert!(matches!(
            FLAGS.encode(&tx, json!(["Bogus"])),
            Err(CodecError::Flag(_))
        ));
    }
}
