//! Wrapped-list codecs
//!
//! STArray fields arrive as lists of single-key wrapper objects:
//! `[{"Signer": {...}}, {"Signer": {...}}]`. Decoding unwraps each element,
//! encoding wraps it again. Order and count are preserved.

use serde_json::{Map, Value};

use super::{hex_text, Codec, CodecError};
use crate::schema::WireRecord;

/// Memo members stored hex-encoded on the wire.
const MEMO_MEMBERS: [&str; 3] = ["MemoData", "MemoType", "MemoFormat"];

pub(crate) fn unwrap_list(wrapper: &str, wire: Value) -> Result<Value, CodecError> {
    let Value::Array(items) = wire else {
        return Err(CodecError::shape("array of wrapper objects"));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut wrapped) if wrapped.len() == 1 => wrapped
                .remove(wrapper)
                .ok_or_else(|| CodecError::shape("single-key wrapper object")),
            _ => Err(CodecError::shape("single-key wrapper object")),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

pub(crate) fn wrap_list(wrapper: &str, domain: Value) -> Result<Value, CodecError> {
    let Value::Array(items) = domain else {
        return Err(CodecError::shape("array"));
    };

    Ok(Value::Array(
        items
            .into_iter()
            .map(|item| {
                let mut wrapped = Map::with_capacity(1);
                wrapped.insert(wrapper.to_string(), item);
                Value::Object(wrapped)
            })
            .collect(),
    ))
}

macro_rules! wrapped_list_codec {
    ($(#[$doc:meta])* $codec:ident, $wrapper:literal, $decode:ident, $encode:ident) => {
        fn $decode(_owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
            unwrap_list($wrapper, wire)
        }

        fn $encode(_owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
            wrap_list($wrapper, domain)
        }

        $(#[$doc])*
        pub const $codec: Codec = Codec::new(stringify!($codec), $decode, $encode);
    };
}

wrapped_list_codec!(
    /// `Signers` ⇄ list of `Signer` records
    SIGNERS, "Signer", decode_signers, encode_signers
);
wrapped_list_codec!(
    /// `SignerEntries` ⇄ list of `SignerEntry` records
    SIGNER_ENTRIES, "SignerEntry", decode_signer_entries, encode_signer_entries
);
wrapped_list_codec!(
    /// `HookParameters` ⇄ list of `HookParameter` records
    HOOK_PARAMETERS, "HookParameter", decode_hook_parameters, encode_hook_parameters
);
wrapped_list_codec!(
    /// `AuthorizeCredentials` ⇄ list of `Credential` records
    CREDENTIALS, "Credential", decode_credentials, encode_credentials
);
wrapped_list_codec!(
    /// `Permissions` ⇄ list of `Permission` records
    PERMISSIONS, "Permission", decode_permissions, encode_permissions
);

fn map_memo_members(
    memo: Value,
    convert: fn(&str) -> Result<String, CodecError>,
) -> Result<Value, CodecError> {
    let Value::Object(mut memo) = memo else {
        return Err(CodecError::shape("memo object"));
    };

    for member in MEMO_MEMBERS {
        if let Some(value) = memo.get_mut(member) {
            let text = value.as_str().ok_or_else(|| CodecError::shape("string memo member"))?;
            *value = Value::String(convert(text)?);
        }
    }

    Ok(Value::Object(memo))
}

fn decode_memos(_owner: &WireRecord, wire: Value) -> Result<Value, CodecError> {
    let Value::Array(memos) = unwrap_list("Memo", wire)? else {
        return Err(CodecError::shape("array"));
    };

    memos
        .into_iter()
        .map(|memo| map_memo_members(memo, hex_text::hex_to_text))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn encode_memos(_owner: &WireRecord, domain: Value) -> Result<Value, CodecError> {
    let Value::Array(memos) = domain else {
        return Err(CodecError::shape("array"));
    };

    let encoded = memos
        .into_iter()
        .map(|memo| map_memo_members(memo, |text| Ok(hex_text::text_to_hex(text))))
        .collect::<Result<Vec<_>, _>>()?;

    wrap_list("Memo", Value::Array(encoded))
}

/// `Memos` ⇄ list of `Memo` records with their members as plain text
pub const MEMOS: Codec = Codec::new("MEMOS", decode_memos, encode_memos);
