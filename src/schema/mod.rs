//! Schema Module
//!
//! Declarative field schemas and the accessors resolved from them.
//! Resolution happens once, when a schema table is built; a table that
//! builds successfully can read and write every field it declares.

mod error;
mod field;
pub mod wire;

pub use error::{FieldError, SchemaError};
pub use field::{FieldAccessor, FieldSchema, SchemaTable};
pub use wire::{WireRecord, WireType};
