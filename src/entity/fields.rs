//! Common field groups
//!
//! Every transaction schema starts with [`TRANSACTION_COMMON`], every
//! pseudo-transaction schema with [`PSEUDO_COMMON`], every ledger-object
//! schema with [`LEDGER_ENTRY_COMMON`].

use crate::codec;
use crate::schema::wire::{
    ACCOUNT_ID, AMOUNT, BLOB, HASH256, LEDGER_ENTRY_TYPE, STARRAY, TRANSACTION_TYPE, UINT32,
};
use crate::schema::{FieldSchema, SchemaTable, WireType};

pub(crate) const fn field(name: &'static str, wire: WireType) -> FieldSchema {
    FieldSchema::new(name, wire)
}

pub const TRANSACTION_COMMON: &[FieldSchema] = &[
    // Envelope metadata, assigned by the ledger
    field("hash", HASH256).readonly(),
    field("ledger_index", UINT32).readonly(),
    field("date", UINT32).readonly().with_codec(codec::RIPPLE_TIME),
    field("ctid", BLOB).readonly(),
    field("TransactionType", TRANSACTION_TYPE).required().readonly(),
    field("Account", ACCOUNT_ID).required(),
    field("Sequence", UINT32).required(),
    field("Fee", AMOUNT).with_codec(codec::AMOUNT),
    field("Flags", UINT32).with_codec(codec::FLAGS),
    field("SourceTag", UINT32),
    field("LastLedgerSequence", UINT32),
    field("FirstLedgerSequence", UINT32),
    field("TicketSequence", UINT32),
    field("OperationLimit", UINT32),
    field("NetworkID", UINT32),
    field("AccountTxnID", HASH256),
    field("Memos", STARRAY).with_codec(codec::MEMOS),
    field("Signers", STARRAY).with_codec(codec::SIGNERS),
    field("HookParameters", STARRAY).with_codec(codec::HOOK_PARAMETERS),
    field("SigningPubKey", BLOB),
    field("TxnSignature", BLOB),
];

/// Signable-but-never-submitted transactions carry no fee, flags or ledger
/// placement.
pub const PSEUDO_COMMON: &[FieldSchema] = &[
    field("hash", HASH256).readonly(),
    field("TransactionType", TRANSACTION_TYPE).required().readonly(),
    field("Account", ACCOUNT_ID),
    field("Sequence", UINT32),
    field("SourceTag", UINT32),
    field("TicketSequence", UINT32),
    field("LastLedgerSequence", UINT32),
    field("AccountTxnID", HASH256),
    field("Memos", STARRAY).with_codec(codec::MEMOS),
    field("Signers", STARRAY).with_codec(codec::SIGNERS),
    field("SigningPubKey", BLOB),
    field("TxnSignature", BLOB),
];

pub const LEDGER_ENTRY_COMMON: &[FieldSchema] = &[
    field("index", HASH256).readonly(),
    field("LedgerEntryType", LEDGER_ENTRY_TYPE).required().readonly(),
    field("Flags", UINT32).with_codec(codec::FLAGS),
    field("PreviousTxnID", HASH256),
    field("PreviousTxnLgrSeq", UINT32),
];

/// Build a built-in schema table.
///
/// Built-in tables are constants of this crate, so a failure here is a
/// programming error caught by the schema tests.
pub(crate) fn builtin(discriminator: &str, groups: &[&[FieldSchema]]) -> SchemaTable {
    SchemaTable::build(groups).unwrap_or_else(|err| panic!("{discriminator} schema does not resolve: {err}"))
}
