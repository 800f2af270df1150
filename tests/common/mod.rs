//! Common test utilities
//!
//! Wire-format fixtures shared by the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};

pub const ALICE: &str = "rPEPPER7kfTD9w2To4CQk6UCfuHM9c6GDY";
pub const BOB: &str = "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B";
pub const GATEWAY: &str = "rhub8VRN55s94qWKDv6jmDy1pUykJzF3wq";

pub const TX_HASH: &str = "E08D6E9754025BA2534A78707605E0601F03ACE063687A0CA1BDDACFCD1698C7";

/// API v2 envelope: `tx_json` + `meta`, envelope fields outside the transaction.
pub fn payment_envelope() -> Value {
    json!({
        "hash": TX_HASH,
        "ledger_index": 90000000,
        "date": 700000000,
        "validated": true,
        "tx_json": {
            "TransactionType": "Payment",
            "Account": ALICE,
            "Destination": BOB,
            "DestinationTag": 42,
            "DeliverMax": "1500000",
            "Fee": "12",
            "Flags": 0x8002_0000u32,
            "Sequence": 7,
            "Memos": [
                { "Memo": { "MemoData": "5852502054697020426F74", "MemoType": "746970" } }
            ]
        },
        "meta": {
            "TransactionResult": "tesSUCCESS",
            "delivered_amount": "1500000",
            "AffectedNodes": [
                {
                    "ModifiedNode": {
                        "LedgerEntryType": "AccountRoot",
                        "FinalFields": { "Account": ALICE, "Balance": "98499988", "OwnerCount": 1 },
                        "PreviousFields": { "Balance": "100000000" }
                    }
                },
                {
                    "ModifiedNode": {
                        "LedgerEntryType": "AccountRoot",
                        "FinalFields": { "Account": BOB, "Balance": "21500000", "OwnerCount": 0 },
                        "PreviousFields": { "Balance": "20000000" }
                    }
                }
            ]
        }
    })
}

/// Legacy envelope: `tx` + `metaData`, issued-currency trust line creation.
pub fn trust_set_legacy() -> Value {
    json!({
        "tx": {
            "TransactionType": "TrustSet",
            "Account": ALICE,
            "Fee": "10",
            "Flags": 0x0002_0000,
            "LimitAmount": { "currency": "USD", "issuer": GATEWAY, "value": "1000" },
            "Sequence": 8,
            "hash": TX_HASH
        },
        "metaData": {
            "TransactionResult": "tesSUCCESS",
            "AffectedNodes": [
                {
                    "ModifiedNode": {
                        "LedgerEntryType": "AccountRoot",
                        "FinalFields": { "Account": ALICE, "Balance": "98499978", "OwnerCount": 2 },
                        "PreviousFields": { "Balance": "98499988", "OwnerCount": 1 }
                    }
                }
            ]
        }
    })
}

/// Trust line between ALICE (low) and GATEWAY (high).
pub fn ripple_state(balance: &str, flags: u32) -> Value {
    json!({
        "LedgerEntryType": "RippleState",
        "Balance": { "currency": "USD", "issuer": "rrrrrrrrrrrrrrrrrrrrBZbvji", "value": balance },
        "Flags": flags,
        "HighLimit": { "currency": "USD", "issuer": GATEWAY, "value": "0" },
        "LowLimit": { "currency": "USD", "issuer": ALICE, "value": "1000" },
        "PreviousTxnID": TX_HASH,
        "PreviousTxnLgrSeq": 90000000,
        "index": "9CA88CDEDFF9252B3DE183CE35B038F57282BC9503CDFA1923EF9A95DF0D6F7B"
    })
}

pub fn account_root() -> Value {
    json!({
        "LedgerEntryType": "AccountRoot",
        "Account": ALICE,
        "Balance": "98499978",
        "Domain": "6578616D706C652E636F6D",
        "Flags": 0x0010_0000,
        "OwnerCount": 2,
        "Sequence": 9,
        "TransferRate": 1_002_000_000u32,
        "PreviousTxnID": TX_HASH,
        "PreviousTxnLgrSeq": 90000000,
        "index": "13F1A95D7AAB7108D5CE7EEAF504B2894B8C674E6D68499076441C4837282BF8"
    })
}
