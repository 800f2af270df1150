//! Field schemas and resolved accessors

use std::collections::HashMap;

use serde_json::Value;

use super::error::{FieldError, SchemaError};
use super::wire::{WireGetter, WireRecord, WireSetter, WireType};
use crate::codec::{Codec, CodecError, CodecFn};

/// Declarative description of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub name: &'static str,
    pub required: bool,
    pub readonly: bool,
    pub wire: WireType,
    pub codec: Option<Codec>,
}

impl FieldSchema {
    pub const fn new(name: &'static str, wire: WireType) -> Self {
        Self {
            name,
            required: false,
            readonly: false,
            wire,
            codec: None,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn readonly(self) -> Self {
        Self {
            readonly: true,
            ..self
        }
    }

    pub const fn with_codec(self, codec: Codec) -> Self {
        Self {
            codec: Some(codec),
            ..self
        }
    }
}

/// Null, empty string and empty collections count as "no value".
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(members) => members.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Get/set pair for one field, resolved against its wire type and codec.
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor {
    schema: FieldSchema,
    getter: WireGetter,
    setter: WireSetter,
    decode: Option<CodecFn>,
    encode: Option<CodecFn>,
}

impl FieldAccessor {
    /// Resolve a schema, failing if any function the accessor needs is missing.
    pub fn new(schema: FieldSchema) -> Result<Self, SchemaError> {
        let unresolved = |missing| SchemaError::UnresolvedCodec {
            field: schema.name,
            missing,
        };

        let getter = schema.wire.get.ok_or_else(|| unresolved("wire getter"))?;
        let setter = schema.wire.set.ok_or_else(|| unresolved("wire setter"))?;

        let (decode, encode) = match schema.codec {
            Some(codec) => (
                Some(codec.decoder().ok_or_else(|| unresolved("codec decode"))?),
                Some(codec.encoder().ok_or_else(|| unresolved("codec encode"))?),
            ),
            None => (None, None),
        };

        Ok(Self {
            schema,
            getter,
            setter,
            decode,
            encode,
        })
    }

    pub fn name(&self) -> &'static str {
        self.schema.name
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    fn codec_error(&self, source: CodecError) -> FieldError {
        FieldError::Codec {
            field: self.schema.name,
            source,
        }
    }

    /// Wire value as stored, without the codec.
    pub fn get_raw(&self, record: &WireRecord) -> Result<Option<Value>, FieldError> {
        (self.getter)(record, self.schema.name).map_err(|err| self.codec_error(err))
    }

    /// Domain value: the wire value passed through the codec, if any.
    pub fn get(&self, record: &WireRecord) -> Result<Option<Value>, FieldError> {
        let Some(raw) = self.get_raw(record)? else {
            return Ok(None);
        };
        match self.decode {
            Some(decode) => decode(record, raw)
                .map(Some)
                .map_err(|err| self.codec_error(err)),
            None => Ok(Some(raw)),
        }
    }

    /// Write a domain value.
    ///
    /// Read-only fields reject every write. An empty value clears an optional
    /// field and is rejected for a required one.
    pub fn set(&self, record: &mut WireRecord, value: Value) -> Result<(), FieldError> {
        if self.schema.readonly {
            return Err(FieldError::ReadOnly(self.schema.name));
        }

        if is_empty_value(&value) {
            if self.schema.required {
                return Err(FieldError::MissingRequired(self.schema.name));
            }
            record.remove(self.schema.name);
            return Ok(());
        }

        let wire = match self.encode {
            Some(encode) => encode(record, value).map_err(|err| self.codec_error(err))?,
            None => value,
        };
        (self.setter)(record, self.schema.name, wire).map_err(|err| self.codec_error(err))
    }
}

/// Resolved accessors for one entity kind, in declaration order.
#[derive(Debug)]
pub struct SchemaTable {
    fields: Vec<FieldAccessor>,
    index: HashMap<&'static str, usize>,
}

impl SchemaTable {
    /// Resolve every field in every group. Later groups extend earlier ones.
    pub fn build(groups: &[&[FieldSchema]]) -> Result<Self, SchemaError> {
        let mut fields = Vec::new();
        let mut index = HashMap::new();

        for schema in groups.iter().flat_map(|group| group.iter()) {
            if index.insert(schema.name, fields.len()).is_some() {
                return Err(SchemaError::DuplicateField(schema.name));
            }
            fields.push(FieldAccessor::new(*schema)?);
        }

        Ok(Self { fields, index })
    }

    pub fn field(&self, name: &str) -> Option<&FieldAccessor> {
        self.index.get(name).map(|position| &self.fields[*position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldAccessor> {
        self.fields.iter()
    }

    pub fn required(&self) -> impl Iterator<Item = &FieldAccessor> {
        self.fields.iter().filter(|field| field.schema.required)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
