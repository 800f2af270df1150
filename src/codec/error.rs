//! Codec Errors
//!
//! Failures converting a single value between wire and domain form.

use crate::flags::FlagError;

/// Errors raised by wire-type descriptors and codecs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The JSON value does not have the shape the wire type or codec expects
    #[error("Unexpected value shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },

    /// Not a well-formed hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Hex decoded to bytes that are not UTF-8 text
    #[error("Decoded bytes are not valid UTF-8")]
    InvalidUtf8,

    /// A scaled or bounded value falls outside what the wire type can carry
    #[error("Value {value} is out of range for {codec}")]
    OutOfRange { codec: &'static str, value: String },

    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Codec invoked in a direction it does not implement
    #[error("Codec {codec} has no {missing} function")]
    Unresolved {
        codec: &'static str,
        missing: &'static str,
    },

    /// The owner record carries no discriminator to scope a flag lookup
    #[error("Owner record has no discriminator")]
    MissingDiscriminator,

    #[error(transparent)]
    Flag(#[from] FlagError),
}

impl CodecError {
    pub(crate) fn shape(expected: &'static str) -> Self {
        Self::UnexpectedShape { expected }
    }

    pub(crate) fn out_of_range(codec: &'static str, value: impl ToString) -> Self {
        Self::OutOfRange {
            codec,
            value: value.to_string(),
        }
    }
}
