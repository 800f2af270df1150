//! Trust-line projection
//!
//! A `RippleState` entry describes one credit line between a low and a high
//! account. [`project`] turns it into the view of one of the two parties.
//!
//! The stored balance is signed from the low party's side. The high party's
//! view only strips a leading minus: a positive raw balance is passed
//! through as-is, so the transform is one-directional.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::codec::CodecError;
use crate::entity::ledger::RippleState;
use crate::schema::FieldError;

/// Quality is not recorded on the line itself.
const QUALITY_PLACEHOLDER: u32 = 0;

/// A trust line as seen by one of its two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustLineView {
    /// Counterparty address
    pub account: String,
    pub balance: String,
    pub currency: String,
    pub limit: String,
    pub limit_peer: String,
    pub no_ripple: bool,
    pub no_ripple_peer: bool,
    pub quality_in: u32,
    pub quality_out: u32,
}

/// One side of the raw line.
struct Side<'a> {
    issuer: &'a str,
    limit: &'a str,
}

fn amount_object<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Map<String, Value>, FieldError> {
    record
        .get(field)
        .ok_or(FieldError::MissingRequired(field))?
        .as_object()
        .ok_or(FieldError::Codec {
            field,
            source: CodecError::shape("issued amount object"),
        })
}

fn member<'a>(
    amount: &'a Map<String, Value>,
    field: &'static str,
    name: &'static str,
) -> Result<&'a str, FieldError> {
    amount
        .get(name)
        .and_then(Value::as_str)
        .ok_or(FieldError::Codec {
            field,
            source: CodecError::shape("issued amount object"),
        })
}

fn side<'a>(record: &'a Map<String, Value>, field: &'static str) -> Result<Side<'a>, FieldError> {
    let amount = amount_object(record, field)?;
    Ok(Side {
        issuer: member(amount, field, "issuer")?,
        limit: member(amount, field, "value")?,
    })
}

/// Project a trust line onto `observer`.
///
/// The observer is the high party iff it issued `HighLimit`; any other
/// observer sees the line as the low party.
pub fn project(line: &RippleState, observer: &str) -> Result<TrustLineView, FieldError> {
    let record = line.entity().record();
    let high = side(record, "HighLimit")?;
    let low = side(record, "LowLimit")?;

    let balance = amount_object(record, "Balance")?;
    let raw_balance = member(balance, "Balance", "value")?;
    let currency = member(balance, "Balance", "currency")?;

    let flags = line.entity().flags()?;
    let high_no_ripple = flags.is_set("HighNoRipple");
    let low_no_ripple = flags.is_set("LowNoRipple");

    let view = if high.issuer == observer {
        TrustLineView {
            account: low.issuer.to_string(),
            balance: raw_balance.strip_prefix('-').unwrap_or(raw_balance).to_string(),
            currency: currency.to_string(),
            limit: high.limit.to_string(),
            limit_peer: low.limit.to_string(),
            no_ripple: high_no_ripple,
            no_ripple_peer: low_no_ripple,
            quality_in: QUALITY_PLACEHOLDER,
            quality_out: QUALITY_PLACEHOLDER,
        }
    } else {
        TrustLineView {
            account: high.issuer.to_string(),
            balance: raw_balance.to_string(),
            currency: currency.to_string(),
            limit: low.limit.to_string(),
            limit_peer: high.limit.to_string(),
            no_ripple: low_no_ripple,
            no_ripple_peer: high_no_ripple,
            quality_in: QUALITY_PLACEHOLDER,
            quality_out: QUALITY_PLACEHOLDER,
        }
    };

    Ok(view)
}
