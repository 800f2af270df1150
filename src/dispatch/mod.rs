//! Dispatch Module
//!
//! Discriminator-keyed factories turning raw wire records into decoded
//! entities. Lookup is a single hash-map lookup per record.
//!
//! The factories differ in what a miss means:
//! - an unregistered transaction type decodes as [`Transaction::Fallback`];
//! - an unregistered pseudo transaction type decodes as [`PseudoTransaction::Fallback`];
//! - an unregistered ledger entry type decodes as `None`.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;

use crate::entity::{
    ledger_object_constructors, pseudo_transaction_constructors, transaction_constructors,
    FallbackTransaction, LedgerObject, LedgerObjectConstructor, PseudoTransaction,
    PseudoTransactionConstructor, Transaction, TransactionConstructor,
};
use crate::schema::WireRecord;

/// Envelope containers for the inner transaction, primary first.
const TRANSACTION_CONTAINERS: [&str; 2] = ["tx_json", "tx"];

/// Metadata containers, primary first.
const META_CONTAINERS: [&str; 2] = ["meta", "metaData"];

/// Envelope fields copied into the inner transaction when it lacks them.
const ENVELOPE_FIELDS: [&str; 4] = ["hash", "ledger_index", "date", "ctid"];

static TRANSACTIONS: LazyLock<HashMap<&'static str, TransactionConstructor>> =
    LazyLock::new(transaction_constructors);

static PSEUDO_TRANSACTIONS: LazyLock<HashMap<&'static str, PseudoTransactionConstructor>> =
    LazyLock::new(pseudo_transaction_constructors);

static LEDGER_OBJECTS: LazyLock<HashMap<&'static str, LedgerObjectConstructor>> =
    LazyLock::new(ledger_object_constructors);

/// Dispatch errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Not an object, or no discriminator anywhere it is looked for
    #[error("Malformed record: {0}")]
    MalformedRecord(&'static str),
}

fn discriminator_of<'a>(record: &'a WireRecord, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

fn take_meta(record: &mut WireRecord) -> Option<WireRecord> {
    META_CONTAINERS
        .iter()
        .find_map(|container| match record.remove(*container) {
            Some(Value::Object(meta)) => Some(meta),
            _ => None,
        })
}

/// Split a raw payload into discriminator, inner transaction and metadata.
///
/// The inner transaction is the first container (primary, then legacy)
/// that carries a `TransactionType`; the discriminator always comes from
/// that same record. Without one, the payload itself is the transaction.
/// Metadata delivered as a binary blob is not decodable here and is dropped.
fn split_envelope(
    mut raw: WireRecord,
) -> Result<(String, WireRecord, Option<WireRecord>), DispatchError> {
    let meta = take_meta(&mut raw);

    let container = TRANSACTION_CONTAINERS.iter().find(|container| {
        raw.get(**container)
            .and_then(Value::as_object)
            .is_some_and(|inner| discriminator_of(inner, "TransactionType").is_some())
    });

    let Some(container) = container else {
        let discriminator = discriminator_of(&raw, "TransactionType")
            .ok_or(DispatchError::MalformedRecord("no TransactionType"))?
            .to_string();
        return Ok((discriminator, raw, meta));
    };

    let Some(Value::Object(mut inner)) = raw.remove(*container) else {
        return Err(DispatchError::MalformedRecord("transaction container is not an object"));
    };
    let discriminator = discriminator_of(&inner, "TransactionType")
        .ok_or(DispatchError::MalformedRecord("no TransactionType"))?
        .to_string();

    // A legacy envelope may still nest metadata inside the transaction
    let meta = meta.or_else(|| take_meta(&mut inner));

    for field in ENVELOPE_FIELDS {
        if !inner.contains_key(field) {
            if let Some(value) = raw.remove(field) {
                inner.insert(field.to_string(), value);
            }
        }
    }

    Ok((discriminator, inner, meta))
}

/// Decode a raw transaction payload of either envelope shape.
pub fn transaction_from_json(raw: Value) -> Result<Transaction, DispatchError> {
    match raw {
        Value::Object(record) => transaction_from_record(record),
        _ => Err(DispatchError::MalformedRecord("transaction payload is not an object")),
    }
}

/// Decode a raw transaction record.
///
/// Accepts `{tx_json, meta}`, the legacy `{tx, meta}` / `{tx, metaData}`,
/// or a flat transaction. Unregistered types decode as the fallback kind.
pub fn transaction_from_record(raw: WireRecord) -> Result<Transaction, DispatchError> {
    let (discriminator, inner, meta) = split_envelope(raw)?;

    match TRANSACTIONS.get(discriminator.as_str()) {
        Some(construct) => Ok(construct(inner, meta)),
        None => {
            tracing::debug!(
                discriminator = %discriminator,
                "Unregistered transaction type, decoding as fallback"
            );
            Ok(Transaction::Fallback(FallbackTransaction::from_record(
                &discriminator,
                inner,
                meta,
            )))
        }
    }
}

/// Decode a pseudo transaction of the given type.
///
/// Pseudo transactions are never on a ledger, so the payload is always a
/// flat record without metadata. Unregistered types decode as
/// [`PseudoTransaction::Fallback`].
pub fn pseudo_transaction_from_json(raw: Value, pseudo_type: &str) -> Result<PseudoTransaction, DispatchError> {
    let Value::Object(record) = raw else {
        return Err(DispatchError::MalformedRecord("pseudo transaction is not an object"));
    };

    match PSEUDO_TRANSACTIONS.get(pseudo_type) {
        Some(construct) => Ok(construct(record)),
        None => {
            tracing::debug!(
                discriminator = %pseudo_type,
                "Unregistered pseudo transaction type, decoding as fallback"
            );
            Ok(PseudoTransaction::Fallback(FallbackTransaction::from_record(
                pseudo_type,
                record,
                None,
            )))
        }
    }
}

/// Decode a raw ledger entry. `Ok(None)` for unregistered entry types.
pub fn ledger_object_from_json(raw: Value) -> Result<Option<LedgerObject>, DispatchError> {
    match raw {
        Value::Object(record) => ledger_object_from_record(record),
        _ => Err(DispatchError::MalformedRecord("ledger entry is not an object")),
    }
}

pub fn ledger_object_from_record(raw: WireRecord) -> Result<Option<LedgerObject>, DispatchError> {
    let discriminator = discriminator_of(&raw, "LedgerEntryType")
        .ok_or(DispatchError::MalformedRecord("no LedgerEntryType"))?;

    match LEDGER_OBJECTS.get(discriminator) {
        Some(construct) => Ok(Some(construct(raw))),
        None => {
            tracing::debug!(discriminator = %discriminator, "Unregistered ledger entry type");
            Ok(None)
        }
    }
}

/// Registered transaction types, sorted.
pub fn registered_transaction_types() -> Vec<&'static str> {
    let mut types: Vec<_> = TRANSACTIONS.keys().copied().collect();
    types.sort_unstable();
    types
}

/// Registered pseudo transaction types, sorted.
pub fn registered_pseudo_transaction_types() -> Vec<&'static str> {
    let mut types: Vec<_> = PSEUDO_TRANSACTIONS.keys().copied().collect();
    types.sort_unstable();
    types
}

/// Registered ledger entry types, sorted.
pub fn registered_ledger_entry_types() -> Vec<&'static str> {
    let mut types: Vec<_> = LEDGER_OBJECTS.keys().copied().collect();
    types.sort_unstable();
    types
}
