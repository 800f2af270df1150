//! ledger-entities Library
//!
//! Schema-driven decoding and encoding of ledger transactions and ledger
//! entries: wire-type descriptors, value codecs, flag tables, typed entity
//! wrappers, discriminator dispatch, trust-line projection and metadata
//! analysis, plus the LRU cache and keyed task queue the lookup layers
//! share.

pub mod cache;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod entity;
pub mod flags;
pub mod logging;
pub mod meta;
pub mod queue;
pub mod schema;
pub mod trustline;

mod error;

pub use cache::LruCache;
pub use codec::{Amount, Codec, CodecError};
pub use config::{Config, ConfigError};
pub use dispatch::{
    ledger_object_from_json, ledger_object_from_record, pseudo_transaction_from_json,
    transaction_from_json, transaction_from_record, DispatchError,
};
pub use entity::{Entity, LedgerObject, PseudoTransaction, Transaction};
pub use error::{CoreResult, Error};
pub use flags::{decode as decode_flags, encode as encode_flags, DecodedFlags, EntityKind, FlagError};
pub use logging::init_tracing;
pub use queue::{KeyedTaskQueue, TaskError, TaskHandle};
pub use schema::{FieldError, FieldSchema, SchemaError, SchemaTable, WireRecord, WireType};
pub use trustline::{project, TrustLineView};
