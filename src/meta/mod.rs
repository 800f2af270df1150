//! Mutation analysis
//!
//! Derived views over a transaction and its metadata: who gained or lost
//! what, owner-reserve changes, offer outcomes, created tickets, hook
//! executions, the engine result and the concise transaction id. These are
//! free functions; decoded entities never gain or lose capabilities after
//! construction.
//!
//! Nodes that cannot be read (unknown shape, unparsable amounts) are
//! skipped rather than failing the whole analysis.

use std::collections::BTreeSet;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::codec::{parse_decimal, Amount, DROPS_PER_NATIVE, NATIVE_CURRENCY};
use crate::entity::Transaction;

/// Engine result code of a successful transaction.
const SUCCESS: &str = "tesSUCCESS";

const NODE_KINDS: [&str; 3] = ["CreatedNode", "ModifiedNode", "DeletedNode"];

/// Balance change values are reported to this many decimal places.
const BALANCE_DECIMALS: u32 = 8;

/// Concise transaction id limits: 28-bit ledger, 16-bit index and network.
const CTID_MAX_LEDGER: u32 = 0x0FFF_FFFF;
const CTID_PREFIX: u64 = 0xC000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Inc,
    Dec,
}

/// Net change of one currency for one account. `value` is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceChange {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub value: Decimal,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerCountChange {
    pub address: String,
    pub value: u32,
    pub action: Action,
}

/// What a transaction did to one offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Created,
    PartiallyFilled,
    Filled,
    Cancelled,
    Killed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionResult {
    pub success: bool,
    pub code: String,
}

/// Signed delta of one currency for one account, before grouping.
struct Delta {
    address: String,
    currency: String,
    issuer: Option<String>,
    value: Decimal,
}

/// One affected node: its type and its final and previous field sets.
struct Node<'a> {
    kind: &'a str,
    entry_type: &'a str,
    ledger_index: Option<&'a str>,
    fields: &'a Map<String, Value>,
    previous: Option<&'a Map<String, Value>>,
}

fn nodes(meta: &Map<String, Value>) -> impl Iterator<Item = Node<'_>> {
    meta.get("AffectedNodes")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|affected| {
            let affected = affected.as_object()?;
            let (kind, node) = NODE_KINDS
                .iter()
                .find_map(|kind| affected.get(*kind).and_then(Value::as_object).map(|node| (*kind, node)))?;
            let fields = node
                .get("FinalFields")
                .or_else(|| node.get("NewFields"))
                .and_then(Value::as_object)?;
            Some(Node {
                kind,
                entry_type: node.get("LedgerEntryType").and_then(Value::as_str)?,
                ledger_index: node.get("LedgerIndex").and_then(Value::as_str),
                fields,
                previous: node.get("PreviousFields").and_then(Value::as_object),
            })
        })
}

fn text<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

fn issued_value(fields: &Map<String, Value>, name: &str) -> Option<Decimal> {
    let amount = fields.get(name)?.as_object()?;
    parse_decimal(amount.get("value")?.as_str()?).ok()
}

/// Value before the transaction. A created node started from zero; a
/// modified node without the field in `PreviousFields` did not change it.
fn previous_value<F>(node: &Node<'_>, read: F) -> Option<Decimal>
where
    F: Fn(&Map<String, Value>) -> Option<Decimal>,
{
    match node.previous {
        Some(previous) => read(previous),
        None if node.kind == "CreatedNode" => Some(Decimal::ZERO),
        None => None,
    }
}

fn account_root_delta(node: &Node<'_>) -> Option<Delta> {
    let drops = |fields: &Map<String, Value>| parse_decimal(text(fields, "Balance")?).ok();
    let current = drops(node.fields)?;
    let previous = previous_value(node, drops)?;

    Some(Delta {
        address: text(node.fields, "Account")?.to_string(),
        currency: NATIVE_CURRENCY.to_string(),
        issuer: None,
        value: (current - previous) / DROPS_PER_NATIVE,
    })
}

/// Both parties' deltas for a trust line. The stored balance is the low
/// party's view; the high party sees its negation.
fn ripple_state_deltas(node: &Node<'_>) -> Option<[Delta; 2]> {
    let balance = |fields: &Map<String, Value>| issued_value(fields, "Balance");
    let current = balance(node.fields)?;
    let previous = previous_value(node, balance)?;
    let delta = current - previous;

    let currency = node.fields.get("Balance")?.get("currency")?.as_str()?;
    let low = node.fields.get("LowLimit")?.get("issuer")?.as_str()?;
    let high = node.fields.get("HighLimit")?.get("issuer")?.as_str()?;

    Some([
        Delta {
            address: low.to_string(),
            currency: currency.to_string(),
            issuer: Some(high.to_string()),
            value: delta,
        },
        Delta {
            address: high.to_string(),
            currency: currency.to_string(),
            issuer: Some(low.to_string()),
            value: -delta,
        },
    ])
}

fn deltas(meta: &Map<String, Value>) -> Vec<Delta> {
    let mut deltas = Vec::new();
    for node in nodes(meta) {
        match node.entry_type {
            "AccountRoot" => deltas.extend(account_root_delta(&node)),
            "RippleState" => deltas.extend(ripple_state_deltas(&node).into_iter().flatten()),
            _ => {}
        }
    }
    deltas
}

/// Fee actually burned by `owner`, if `owner` submitted the transaction.
fn fee_paid_by(tx: &Transaction, owner: &str) -> Option<Decimal> {
    let record = tx.entity().record();
    if text(record, "Account")? != owner {
        return None;
    }
    Amount::from_drops(text(record, "Fee")?).ok().map(|fee| fee.value)
}

/// Net balance changes of `owner`, grouped by action and currency.
///
/// The fee `owner` paid for submitting `tx` is not a balance change and is
/// removed from the native decrease (or added back to a native increase).
pub fn balance_changes(tx: &Transaction, owner: &str) -> Vec<BalanceChange> {
    let Some(meta) = tx.meta() else {
        return Vec::new();
    };

    // (action, currency) → change, in first-seen order
    let mut grouped: Vec<BalanceChange> = Vec::new();
    for delta in deltas(meta).into_iter().filter(|delta| delta.address == owner) {
        if delta.value.is_zero() {
            continue;
        }
        let action = if delta.value.is_sign_positive() { Action::Inc } else { Action::Dec };
        let value = round_balance(delta.value.abs());

        let existing = grouped
            .iter()
            .position(|change| change.action == action && change.currency == delta.currency);
        match existing {
            Some(position) => grouped[position].value += value,
            None => grouped.push(BalanceChange {
                currency: delta.currency,
                issuer: delta.issuer,
                value,
                action,
            }),
        }
    }

    if let Some(fee) = fee_paid_by(tx, owner) {
        remove_fee(&mut grouped, fee);
    }

    for change in &mut grouped {
        change.value = round_balance(change.value).normalize();
    }
    grouped.retain(|change| !change.value.is_zero());
    grouped
}

fn round_balance(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(BALANCE_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

fn is_native(change: &BalanceChange) -> bool {
    change.currency == NATIVE_CURRENCY && change.issuer.is_none()
}

fn remove_fee(changes: &mut Vec<BalanceChange>, fee: Decimal) {
    if let Some(position) = changes.iter().position(|c| is_native(c) && c.action == Action::Dec) {
        let change = &mut changes[position];
        change.value -= fee;
        if change.value.is_zero() {
            changes.remove(position);
        } else if change.value.is_sign_negative() {
            change.value = change.value.abs();
            change.action = Action::Inc;
        }
    } else if let Some(change) = changes.iter_mut().find(|c| is_native(c) && c.action == Action::Inc) {
        change.value += fee;
    }
}

/// Change in `owner`'s owned-object count, if any.
pub fn owner_count_change(tx: &Transaction, owner: &str) -> Option<OwnerCountChange> {
    let meta = tx.meta()?;
    let count = |fields: &Map<String, Value>| fields.get("OwnerCount").and_then(Value::as_u64);

    nodes(meta)
        .filter(|node| node.entry_type == "AccountRoot" && text(node.fields, "Account") == Some(owner))
        .find_map(|node| {
            let current = count(node.fields)?;
            let previous = count(node.previous?)?;
            let (value, action) = match current.cmp(&previous) {
                std::cmp::Ordering::Greater => (current - previous, Action::Inc),
                std::cmp::Ordering::Less => (previous - current, Action::Dec),
                std::cmp::Ordering::Equal => return None,
            };
            Some(OwnerCountChange {
                address: owner.to_string(),
                value: u32::try_from(value).ok()?,
                action,
            })
        })
}

/// Engine result from the metadata.
pub fn transaction_result(tx: &Transaction) -> Option<TransactionResult> {
    let code = text(tx.meta()?, "TransactionResult")?;
    Some(TransactionResult {
        success: code == SUCCESS,
        code: code.to_string(),
    })
}

fn offer_node_status(node: &Node<'_>) -> OfferStatus {
    match node.kind {
        "CreatedNode" => OfferStatus::Created,
        "ModifiedNode" => OfferStatus::PartiallyFilled,
        // A consumed offer records what it paid out before deletion
        _ if node.previous.is_some_and(|previous| previous.contains_key("TakerPays")) => {
            OfferStatus::Filled
        }
        _ => OfferStatus::Cancelled,
    }
}

/// Outcome of the offer `offer_index` placed by `owner`.
///
/// An offer missing from the metadata either crossed immediately (some
/// trust line of `owner` moved) or was killed. A created offer that also
/// moved one of `owner`'s trust lines was partially filled on placement.
pub fn offer_status(tx: &Transaction, owner: &str, offer_index: &str) -> Option<OfferStatus> {
    let meta = tx.meta()?;

    let status = nodes(meta)
        .find(|node| node.entry_type == "Offer" && node.ledger_index == Some(offer_index))
        .map(|node| offer_node_status(&node));

    let trust_line_moved = || {
        nodes(meta).any(|node| {
            node.kind == "ModifiedNode"
                && node.entry_type == "RippleState"
                && ["HighLimit", "LowLimit"].iter().any(|limit| {
                    node.fields.get(*limit).and_then(|limit| limit.get("issuer")).and_then(Value::as_str)
                        == Some(owner)
                })
        })
    };

    Some(match status {
        None if trust_line_moved() => OfferStatus::Filled,
        None => OfferStatus::Killed,
        Some(OfferStatus::Created) if trust_line_moved() => OfferStatus::PartiallyFilled,
        Some(status) => status,
    })
}

/// Sequences of the tickets the transaction created, in node order.
pub fn ticket_sequences(tx: &Transaction) -> Vec<u32> {
    let Some(meta) = tx.meta() else {
        return Vec::new();
    };
    nodes(meta)
        .filter(|node| node.kind == "CreatedNode" && node.entry_type == "Ticket")
        .filter_map(|node| node.fields.get("TicketSequence")?.as_u64())
        .filter_map(|sequence| u32::try_from(sequence).ok())
        .collect()
}

/// Hook executions reported in the metadata, unwrapped. Without a
/// `HookExecutions` list, emitted transactions created by hooks are
/// returned instead.
pub fn hook_executions(tx: &Transaction) -> Vec<Map<String, Value>> {
    let Some(meta) = tx.meta() else {
        return Vec::new();
    };

    if let Some(executions) = meta.get("HookExecutions").and_then(Value::as_array) {
        return executions
            .iter()
            .filter_map(|execution| execution.get("HookExecution")?.as_object().cloned())
            .collect();
    }

    nodes(meta)
        .filter(|node| node.kind == "CreatedNode" && node.entry_type == "EmittedTxn")
        .filter_map(|node| node.fields.get("EmittedTxn")?.as_object().cloned())
        .collect()
}

/// Account of the AMM the transaction created or modified.
pub fn amm_account_id(tx: &Transaction) -> Option<String> {
    let node = nodes(tx.meta()?).find(|node| node.entry_type == "AMM")?;
    if node.kind == "DeletedNode" {
        return None;
    }
    text(node.fields, "Account").map(str::to_string)
}

/// Encode a concise transaction id from a ledger position.
///
/// `None` when any part exceeds its width.
pub fn encode_ctid(ledger_index: u32, transaction_index: u32, network_id: u32) -> Option<String> {
    if ledger_index > CTID_MAX_LEDGER || transaction_index > 0xFFFF || network_id > 0xFFFF {
        return None;
    }
    let value = ((CTID_PREFIX + u64::from(ledger_index)) << 32)
        | (u64::from(transaction_index) << 16)
        | u64::from(network_id);
    Some(format!("{value:016X}"))
}

/// Concise transaction id: the delivered `ctid`, or one derived from
/// `ledger_index`, the metadata's `TransactionIndex` and `NetworkID`
/// (`0` when absent).
pub fn ctid(tx: &Transaction) -> Option<String> {
    let record = tx.entity().record();
    if let Some(ctid) = text(record, "ctid") {
        return Some(ctid.to_string());
    }

    let position = |value: Option<&Value>| value.and_then(Value::as_u64).and_then(|raw| u32::try_from(raw).ok());
    let ledger_index = position(record.get("ledger_index"))?;
    let transaction_index = position(tx.meta()?.get("TransactionIndex"))?;
    let network_id = match record.get("NetworkID") {
        None => 0,
        network => position(network)?,
    };
    encode_ctid(ledger_index, transaction_index, network_id)
}

/// Every account touched by the transaction's balance changes, sorted.
pub fn affected_accounts(tx: &Transaction) -> Vec<String> {
    let Some(meta) = tx.meta() else {
        return Vec::new();
    };
    deltas(meta)
        .into_iter()
        .map(|delta| delta.address)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
