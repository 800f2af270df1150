//! Dispatch Integration Tests
//!
//! Raw wire payloads through the factories and the typed accessors.

use ledger_entities::entity::ledger::AccountRoot;
use ledger_entities::entity::transaction::Payment;
use ledger_entities::entity::AccountRef;
use ledger_entities::{
    ledger_object_from_json, pseudo_transaction_from_json, transaction_from_json, CoreResult,
    FieldError, LedgerObject, PseudoTransaction, Transaction,
};
use rust_decimal_macros::dec;
use serde_json::json;

mod common;

use common::{ALICE, BOB, GATEWAY, TX_HASH};

#[test]
fn test_payment_envelope_decodes() -> CoreResult<()> {
    let tx = transaction_from_json(common::payment_envelope())?;

    let Transaction::Payment(payment) = &tx else {
        panic!("expected Payment, got {}", tx.discriminator());
    };

    assert_eq!(tx.hash()?, Some(TX_HASH.to_string()));
    assert_eq!(
        payment.destination()?,
        Some(AccountRef {
            address: BOB.to_string(),
            tag: Some(42)
        })
    );

    let amount = payment.amount()?.expect("DeliverMax");
    assert!(amount.is_native());
    assert_eq!(amount.value, dec!(1.5));
    assert_eq!(payment.delivered_amount()?.map(|a| a.value), Some(dec!(1.5)));

    let entity = payment.entity();
    assert_eq!(entity.get("date")?, Some(json!("2022-03-07T20:26:40Z")));
    assert_eq!(entity.get("Fee")?, Some(json!({ "currency": "XRP", "value": "0.000012" })));
    assert_eq!(
        entity.get("Memos")?,
        Some(json!([{ "MemoData": "XRP Tip Bot", "MemoType": "tip" }]))
    );

    let flags = entity.flags()?;
    assert_eq!(flags.enabled(), vec!["PartialPayment", "FullyCanonicalSig"]);
    assert!(flags.is_set("tfPartialPayment"));
    Ok(())
}

#[test]
fn test_legacy_envelope_decodes() -> CoreResult<()> {
    let tx = transaction_from_json(common::trust_set_legacy())?;

    let Transaction::TrustSet(trust_set) = &tx else {
        panic!("expected TrustSet, got {}", tx.discriminator());
    };

    let limit = trust_set.limit_amount()?.expect("LimitAmount");
    assert_eq!(limit.currency, "USD");
    assert_eq!(limit.issuer.as_deref(), Some(GATEWAY));
    assert_eq!(limit.value, dec!(1000));

    assert!(tx.meta().is_some());
    assert!(trust_set.entity().flags()?.is_set("SetNoRipple"));
    Ok(())
}

#[test]
fn test_unregistered_transaction_keeps_common_fields() -> CoreResult<()> {
    let tx = transaction_from_json(json!({
        "tx_json": {
            "TransactionType": "EscrowFinish",
            "Account": ALICE,
            "Owner": BOB,
            "OfferSequence": 3,
            "Fee": "10",
            "Sequence": 11
        },
        "meta": { "TransactionResult": "tesSUCCESS" }
    }))?;

    assert!(tx.is_fallback());
    assert_eq!(tx.discriminator(), "EscrowFinish");
    assert_eq!(tx.account()?.map(|a| a.address), Some(ALICE.to_string()));
    assert_eq!(tx.entity().sequence()?, Some(11));

    // Kind-specific fields stay on the record but are not declared
    assert!(tx.entity().record().contains_key("Owner"));
    assert!(matches!(
        tx.entity().get("Owner"),
        Err(FieldError::UnknownField { .. })
    ));
    assert!(!tx.entity().to_json().contains_key("Owner"));
    Ok(())
}

#[test]
fn test_account_root_decodes() -> CoreResult<()> {
    let object = ledger_object_from_json(common::account_root())?.expect("registered");
    let LedgerObject::AccountRoot(root) = &object else {
        panic!("expected AccountRoot, got {}", object.discriminator());
    };

    assert_eq!(root.balance()?.map(|b| b.value), Some(dec!(98.499978)));
    assert_eq!(root.domain()?, Some("example.com".to_string()));
    assert_eq!(root.transfer_rate()?, Some(dec!(0.2)));
    assert_eq!(root.owner_count()?, Some(2));
    assert_eq!(root.entity().previous_txn_lgr_seq()?, Some(90000000));

    let flags = root.entity().flags()?;
    assert_eq!(flags.enabled(), vec!["DisableMaster"]);
    Ok(())
}

#[test]
fn test_unregistered_ledger_entry_is_none() -> CoreResult<()> {
    let object = ledger_object_from_json(json!({
        "LedgerEntryType": "FeeSettings",
        "BaseFee": "000000000000000A"
    }))?;
    assert!(object.is_none());
    Ok(())
}

#[test]
fn test_build_payment_and_serialize() -> CoreResult<()> {
    let mut payment = Payment::new();
    let entity = payment.entity_mut();

    entity.set("Account", ALICE)?;
    entity.set("Destination", BOB)?;
    entity.set("Amount", json!({ "currency": "XRP", "value": "2.5" }))?;
    entity.set("Sequence", 12)?;
    entity.set("Memos", json!([{ "MemoData": "XRP Tip Bot" }]))?;
    entity.set_flags(["PartialPayment"])?;
    entity.validate()?;

    let wire = payment.entity().to_json();
    assert_eq!(wire["TransactionType"], json!("Payment"));
    assert_eq!(wire["Amount"], json!("2500000"));
    assert_eq!(wire["Flags"], json!(0x0002_0000));
    assert_eq!(
        wire["Memos"],
        json!([{ "Memo": { "MemoData": "5852502054697020426F74" } }])
    );
    Ok(())
}

#[test]
fn test_readonly_and_required_fields() {
    let mut root = AccountRoot::from_record(
        common::account_root()
            .as_object()
            .cloned()
            .expect("fixture is an object"),
    );
    let entity = root.entity_mut();

    assert_eq!(
        entity.set("index", "00"),
        Err(FieldError::ReadOnly("index"))
    );
    assert_eq!(
        entity.set("Account", serde_json::Value::Null),
        Err(FieldError::MissingRequired("Account"))
    );

    // Clearing an optional field removes it
    assert_eq!(entity.set("Domain", ""), Ok(()));
    assert!(!entity.record().contains_key("Domain"));
}

#[test]
fn test_account_set_flag_index_through_envelope() -> CoreResult<()> {
    let tx = transaction_from_json(json!({
        "hash": TX_HASH,
        "tx": {
            "TransactionType": "AccountSet",
            "Account": ALICE,
            "Fee": "12",
            "Sequence": 20,
            "ClearFlag": 4
        },
        "meta": { "TransactionResult": "tesSUCCESS" }
    }))?;

    let Transaction::AccountSet(account_set) = &tx else {
        panic!("expected AccountSet, got {}", tx.discriminator());
    };
    assert_eq!(account_set.clear_flag()?.as_deref(), Some("asfDisableMaster"));
    assert_eq!(tx.hash()?.as_deref(), Some(TX_HASH));
    Ok(())
}

#[test]
fn test_sign_in_pseudo_transaction() -> CoreResult<()> {
    let tx = pseudo_transaction_from_json(
        json!({ "Account": BOB, "Memos": [{ "Memo": { "MemoType": "6C6F67696E" } }] }),
        "SignIn",
    )?;

    assert!(matches!(tx, PseudoTransaction::SignIn(_)));
    assert_eq!(tx.account()?.map(|a| a.address), Some(BOB.to_string()));
    assert_eq!(
        tx.entity().get("Memos")?,
        Some(json!([{ "MemoType": "login" }]))
    );
    assert!(tx.entity().flags()?.is_empty());
    Ok(())
}
