//! Flag decoding
//!
//! Turns a 32-bit `Flags` integer into named booleans, scoped by the
//! entity kind and discriminator that own it, and back again.
//!
//! One canonical table exists per discriminator. Prefixed legacy names
//! (`lsfDisableMaster`, `tfPartialPayment`) resolve to the canonical name
//! wherever a flag is looked up by name.

mod tables;

pub use tables::FlagBit;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use tables::{index_table, LEDGER_ENTRY_TABLES, TRANSACTION_TABLES};

/// Legacy naming prefixes, longest first.
const LEGACY_PREFIXES: [&str; 2] = ["lsf", "tf"];

/// Which family of discriminators an entity belongs to.
///
/// Some discriminators (`DepositPreauth`) exist in both families with
/// different flag layouts, so lookups are always scoped by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Transaction,
    LedgerEntry,
}

impl EntityKind {
    /// Name of the wire field holding this kind's discriminator.
    pub fn discriminator_field(&self) -> &'static str {
        match self {
            EntityKind::Transaction => "TransactionType",
            EntityKind::LedgerEntry => "LedgerEntryType",
        }
    }

    /// Resolve kind and discriminator from a raw record.
    /// `LedgerEntryType` wins when both are present.
    pub fn of_record(record: &Map<String, Value>) -> Option<(EntityKind, &str)> {
        [EntityKind::LedgerEntry, EntityKind::Transaction]
            .into_iter()
            .find_map(|kind| {
                record
                    .get(kind.discriminator_field())
                    .and_then(Value::as_str)
                    .map(|discriminator| (kind, discriminator))
            })
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Transaction => write!(f, "transaction"),
            EntityKind::LedgerEntry => write!(f, "ledger entry"),
        }
    }
}

/// Flag lookup and encoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    #[error("No flag table registered for {kind} {discriminator}")]
    NoFlagTable {
        kind: EntityKind,
        discriminator: String,
    },

    #[error("Unknown flag {name} for {discriminator}")]
    UnknownFlag { discriminator: String, name: String },

    #[error("No flag index table registered for {discriminator}")]
    NoIndexTable { discriminator: String },

    #[error("Unknown flag index {index} for {discriminator}")]
    UnknownIndex { discriminator: String, index: u32 },
}

/// Registered table for a discriminator, universal bits included.
pub fn table(kind: EntityKind, discriminator: &str) -> Option<&'static [FlagBit]> {
    match kind {
        EntityKind::Transaction => TRANSACTION_TABLES.get(discriminator).map(Vec::as_slice),
        EntityKind::LedgerEntry => LEDGER_ENTRY_TABLES.get(discriminator).copied(),
    }
}

/// All discriminators of a kind that have a registered table.
pub fn registered(kind: EntityKind) -> Vec<&'static str> {
    let mut discriminators: Vec<&'static str> = match kind {
        EntityKind::Transaction => TRANSACTION_TABLES.keys().copied().collect(),
        EntityKind::LedgerEntry => LEDGER_ENTRY_TABLES.keys().copied().collect(),
    };
    discriminators.sort_unstable();
    discriminators
}

fn canonical(table: &'static [FlagBit], name: &str) -> Option<FlagBit> {
    let exact = table.iter().find(|(flag, _)| *flag == name);
    exact
        .or_else(|| {
            LEGACY_PREFIXES
                .iter()
                .filter_map(|prefix| name.strip_prefix(prefix))
                .find_map(|stripped| table.iter().find(|(flag, _)| *flag == stripped))
        })
        .copied()
}

/// Decode a raw flags integer.
///
/// A discriminator without a table yields an empty result. Bits that are
/// not in the table are ignored.
pub fn decode(kind: EntityKind, discriminator: &str, raw: u32) -> DecodedFlags {
    let Some(table) = table(kind, discriminator) else {
        return DecodedFlags::default();
    };

    DecodedFlags {
        table,
        values: table.iter().map(|(_, mask)| mask & raw == *mask).collect(),
    }
}

/// Encode a set of flag names into the wire integer.
pub fn encode<'a, I>(kind: EntityKind, discriminator: &str, names: I) -> Result<u32, FlagError>
where
    I: IntoIterator<Item = &'a str>,
{
    let table = table(kind, discriminator).ok_or_else(|| FlagError::NoFlagTable {
        kind,
        discriminator: discriminator.to_string(),
    })?;

    names.into_iter().try_fold(0u32, |raw, name| {
        canonical(table, name)
            .map(|(_, mask)| raw | mask)
            .ok_or_else(|| FlagError::UnknownFlag {
                discriminator: discriminator.to_string(),
                name: name.to_string(),
            })
    })
}

// =========================================================================
// Index-valued flags
// =========================================================================

fn index_table_for(discriminator: &str) -> Result<&'static [FlagBit], FlagError> {
    index_table(discriminator).ok_or_else(|| FlagError::NoIndexTable {
        discriminator: discriminator.to_string(),
    })
}

/// Name of a single flag carried as an index (`AccountSet.SetFlag`).
pub fn index_name(discriminator: &str, index: u32) -> Result<&'static str, FlagError> {
    index_table_for(discriminator)?
        .iter()
        .find(|(_, known)| *known == index)
        .map(|(name, _)| *name)
        .ok_or_else(|| FlagError::UnknownIndex {
            discriminator: discriminator.to_string(),
            index,
        })
}

/// Index of a single named flag. The `asf` prefix may be omitted.
pub fn index_of(discriminator: &str, name: &str) -> Result<u32, FlagError> {
    let table = index_table_for(discriminator)?;
    table
        .iter()
        .find(|(flag, _)| *flag == name)
        .or_else(|| {
            table
                .iter()
                .find(|(flag, _)| flag.strip_prefix("asf") == Some(name))
        })
        .map(|(_, index)| *index)
        .ok_or_else(|| FlagError::UnknownFlag {
            discriminator: discriminator.to_string(),
            name: name.to_string(),
        })
}

/// Named booleans decoded from one flags integer, in table order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedFlags {
    table: &'static [FlagBit],
    values: Vec<bool>,
}

impl DecodedFlags {
    /// Whether a flag is set. Unknown names read as `false`.
    pub fn is_set(&self, name: &str) -> bool {
        canonical(self.table, name)
            .and_then(|(flag, _)| self.iter().find(|(known, _)| *known == flag))
            .is_some_and(|(_, set)| set)
    }

    /// Every registered flag with its state.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.table
            .iter()
            .zip(&self.values)
            .map(|((name, _), set)| (*name, *set))
    }

    /// Names of the flags that are set.
    pub fn enabled(&self) -> Vec<&'static str> {
        self.iter().filter(|(_, set)| *set).map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON object of every registered flag name to its state.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(name, set)| (name.to_string(), Value::Bool(set)))
                .collect(),
        )
    }
}

impl Serialize for DecodedFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, set) in self.iter() {
            map.serialize_entry(name, &set)?;
        }
        map.end()
    }
}
