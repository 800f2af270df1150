//! Schema Errors
//!
//! `SchemaError` is raised while building a schema table, `FieldError` while
//! reading or writing a field through it.

use crate::codec::CodecError;

/// Schema construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Wire type or codec lacks one of the functions an accessor needs
    #[error("Field {field} cannot be bound: missing {missing}")]
    UnresolvedCodec {
        field: &'static str,
        missing: &'static str,
    },

    #[error("Field {0} is declared more than once")]
    DuplicateField(&'static str),
}

/// Field access errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A required field was cleared, or is absent at validation time
    #[error("Missing required field: {0}")]
    MissingRequired(&'static str),

    #[error("Field is read-only: {0}")]
    ReadOnly(&'static str),

    #[error("{discriminator} has no field {field}")]
    UnknownField {
        discriminator: String,
        field: String,
    },

    #[error("Field {field}: {source}")]
    Codec {
        field: &'static str,
        #[source]
        source: CodecError,
    },
}

impl FieldError {
    /// Whether the caller attempted a write the schema forbids
    pub fn is_validation_error(&self) -> bool {
        matches!(self, FieldError::MissingRequired(_) | FieldError::ReadOnly(_))
    }

    /// Whether the backing record or the supplied value had the wrong shape
    pub fn is_codec_error(&self) -> bool {
        matches!(self, FieldError::Codec { .. })
    }
}
