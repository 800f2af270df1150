//! Entity base
//!
//! Discriminator, backing record and schema-driven accessors shared by
//! every decoded transaction and ledger object.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::CodecError;
use crate::flags::{self, DecodedFlags, EntityKind};
use crate::schema::{FieldAccessor, FieldError, SchemaTable, WireRecord};

/// Address plus optional tag, read from two sibling fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<u32>,
}

/// Partial update for a composite account field.
///
/// `None` leaves that half untouched; `tag: Some(None)` clears the tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub address: Option<String>,
    pub tag: Option<Option<u32>>,
}

impl AccountPatch {
    pub fn address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            tag: None,
        }
    }

    pub fn tag(tag: Option<u32>) -> Self {
        Self {
            address: None,
            tag: Some(tag),
        }
    }

    pub fn with_tag(self, tag: Option<u32>) -> Self {
        Self {
            tag: Some(tag),
            ..self
        }
    }
}

/// A decoded entity: immutable discriminator over a mutable wire record.
#[derive(Debug, Clone)]
pub struct Entity {
    kind: EntityKind,
    discriminator: String,
    record: WireRecord,
    schema: &'static SchemaTable,
}

impl Entity {
    /// Wrap a record, stamping the discriminator field so the record
    /// always agrees with the entity's kind.
    pub(crate) fn new(
        kind: EntityKind,
        discriminator: impl Into<String>,
        mut record: WireRecord,
        schema: &'static SchemaTable,
    ) -> Self {
        let discriminator = discriminator.into();
        record.insert(
            kind.discriminator_field().to_string(),
            Value::String(discriminator.clone()),
        );
        Self {
            kind,
            discriminator,
            record,
            schema,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    pub fn record(&self) -> &WireRecord {
        &self.record
    }

    pub fn into_record(self) -> WireRecord {
        self.record
    }

    pub fn schema(&self) -> &'static SchemaTable {
        self.schema
    }

    fn accessor(&self, name: &str) -> Result<&'static FieldAccessor, FieldError> {
        self.schema.field(name).ok_or_else(|| FieldError::UnknownField {
            discriminator: self.discriminator.clone(),
            field: name.to_string(),
        })
    }

    /// Domain value of a declared field, `None` when absent.
    pub fn get(&self, name: &str) -> Result<Option<Value>, FieldError> {
        self.accessor(name)?.get(&self.record)
    }

    /// Wire value of a declared field, bypassing its codec.
    pub fn get_raw(&self, name: &str) -> Result<Option<Value>, FieldError> {
        self.accessor(name)?.get_raw(&self.record)
    }

    /// Domain value deserialized into a concrete type.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, FieldError> {
        let accessor = self.accessor(name)?;
        accessor
            .get(&self.record)?
            .map(|value| {
                serde_json::from_value(value).map_err(|_| FieldError::Codec {
                    field: accessor.name(),
                    source: CodecError::shape(std::any::type_name::<T>()),
                })
            })
            .transpose()
    }

    /// Write a domain value through the field's codec.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FieldError> {
        let accessor = self.accessor(name)?;
        accessor.set(&mut self.record, value.into())
    }

    /// Composite `{address, tag}` read from two sibling fields.
    /// `None` when the address is absent or not declared for this kind.
    pub fn composite(&self, address_field: &str, tag_field: &str) -> Result<Option<AccountRef>, FieldError> {
        if !self.schema.contains(address_field) {
            return Ok(None);
        }
        let Some(address) = self.get_as::<String>(address_field)? else {
            return Ok(None);
        };
        let tag = if self.schema.contains(tag_field) {
            self.get_as::<u32>(tag_field)?
        } else {
            None
        };
        Ok(Some(AccountRef { address, tag }))
    }

    /// Apply a partial update to a composite account field.
    pub fn set_composite(
        &mut self,
        address_field: &str,
        tag_field: &str,
        patch: AccountPatch,
    ) -> Result<(), FieldError> {
        if let Some(address) = patch.address {
            self.set(address_field, address)?;
        }
        if let Some(tag) = patch.tag {
            self.set(tag_field, tag.map_or(Value::Null, Value::from))?;
        }
        Ok(())
    }

    /// `Account` + `SourceTag`
    pub fn account(&self) -> Result<Option<AccountRef>, FieldError> {
        self.composite("Account", "SourceTag")
    }

    pub fn set_account(&mut self, patch: AccountPatch) -> Result<(), FieldError> {
        self.set_composite("Account", "SourceTag", patch)
    }

    pub fn sequence(&self) -> Result<Option<u32>, FieldError> {
        self.get_optional("Sequence")
    }

    pub fn previous_txn_id(&self) -> Result<Option<String>, FieldError> {
        self.get_optional("PreviousTxnID")
    }

    pub fn previous_txn_lgr_seq(&self) -> Result<Option<u32>, FieldError> {
        self.get_optional("PreviousTxnLgrSeq")
    }

    fn get_optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, FieldError> {
        if !self.schema.contains(name) {
            return Ok(None);
        }
        self.get_as(name)
    }

    /// Raw `Flags` integer, `0` when absent or not declared for this kind.
    pub fn raw_flags(&self) -> Result<u32, FieldError> {
        if !self.schema.contains("Flags") {
            return Ok(0);
        }
        match self.get_raw("Flags")? {
            None => Ok(0),
            Some(value) => value
                .as_u64()
                .and_then(|raw| u32::try_from(raw).ok())
                .ok_or(FieldError::Codec {
                    field: "Flags",
                    source: CodecError::shape("unsigned 32-bit integer"),
                }),
        }
    }

    /// Flags decoded against this entity's own discriminator.
    pub fn flags(&self) -> Result<DecodedFlags, FieldError> {
        Ok(flags::decode(self.kind, &self.discriminator, self.raw_flags()?))
    }

    /// Replace `Flags` with exactly the named flags.
    pub fn set_flags<'a, I>(&mut self, names: I) -> Result<(), FieldError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let raw = flags::encode(self.kind, &self.discriminator, names).map_err(|err| FieldError::Codec {
            field: "Flags",
            source: err.into(),
        })?;
        self.set("Flags", raw)
    }

    /// First required field missing from the record, as an error.
    pub fn validate(&self) -> Result<(), FieldError> {
        for field in self.schema.required() {
            if field.get_raw(&self.record)?.is_none() {
                return Err(FieldError::MissingRequired(field.name()));
            }
        }
        Ok(())
    }

    /// The record restricted to declared fields, in record order.
    pub fn to_json(&self) -> WireRecord {
        self.record
            .iter()
            .filter(|(name, _)| self.schema.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}
