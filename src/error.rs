//! Error handling module
//!
//! Crate-wide error type. Each module keeps its own error enum; this one
//! wraps them so callers chaining several operations can use `?` freely.

use crate::codec::CodecError;
use crate::config::ConfigError;
use crate::dispatch::DispatchError;
use crate::flags::FlagError;
use crate::schema::{FieldError, SchemaError};

/// Crate-wide Result type
pub type CoreResult<T> = Result<T, Error>;

/// Crate-wide error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    // Decode / validation errors
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Flag(#[from] FlagError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    // Setup errors
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the caller attempted a write the schema forbids
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Field(err) if err.is_validation_error())
    }

    /// Whether a value or record had a shape the codecs cannot handle
    pub fn is_codec_error(&self) -> bool {
        match self {
            Error::Codec(_) | Error::Flag(_) => true,
            Error::Field(err) => err.is_codec_error(),
            _ => false,
        }
    }
}
