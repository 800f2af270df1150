//! Entity Module
//!
//! Decoded transactions and ledger objects. Every concrete kind is a flat
//! struct around an [`Entity`]; field logic lives in the schema tables, not
//! in a type hierarchy.

mod base;
mod fields;
pub mod ledger;
pub mod pseudo;
pub mod transaction;

pub use base::{AccountPatch, AccountRef, Entity};
pub use fields::{LEDGER_ENTRY_COMMON, PSEUDO_COMMON, TRANSACTION_COMMON};
pub use ledger::LedgerObject;
pub use pseudo::PseudoTransaction;
pub use transaction::{FallbackTransaction, SignerEntry, Transaction};

pub(crate) use ledger::{ledger_object_constructors, LedgerObjectConstructor};
pub(crate) use pseudo::{pseudo_transaction_constructors, PseudoTransactionConstructor};
pub(crate) use transaction::{transaction_constructors, TransactionConstructor};
