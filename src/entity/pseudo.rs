//! Pseudo-transaction kinds
//!
//! Transactions that are signed to prove control of an account but are
//! never submitted to a ledger. They share the dispatch fallback policy of
//! genuine transactions: an unregistered type decodes as
//! [`FallbackTransaction`].

use std::collections::HashMap;
use std::sync::LazyLock;

use super::base::{AccountRef, Entity};
use super::fields::{builtin, field, PSEUDO_COMMON};
use super::transaction::FallbackTransaction;
use crate::codec::{self, Amount};
use crate::flags::EntityKind;
use crate::schema::wire::{AMOUNT, HASH256};
use crate::schema::{FieldError, FieldSchema, SchemaTable, WireRecord};

const SIGN_IN_FIELDS: &[FieldSchema] = &[];

const PAYMENT_CHANNEL_AUTHORIZE_FIELDS: &[FieldSchema] = &[
    field("Channel", HASH256).required(),
    field("Amount", AMOUNT).required().with_codec(codec::AMOUNT),
];

macro_rules! pseudo_transaction_kinds {
    ($($(#[$doc:meta])* $kind:ident = $discriminator:literal => $fields:expr;)+) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone)]
            pub struct $kind {
                entity: Entity,
            }

            impl $kind {
                pub const TYPE: &'static str = $discriminator;

                pub fn schema() -> &'static SchemaTable {
                    static SCHEMA: LazyLock<SchemaTable> =
                        LazyLock::new(|| builtin($discriminator, &[PSEUDO_COMMON, $fields]));
                    &SCHEMA
                }

                pub fn from_record(record: WireRecord) -> Self {
                    Self {
                        entity: Entity::new(EntityKind::Transaction, Self::TYPE, record, Self::schema()),
                    }
                }

                pub fn new() -> Self {
                    Self::from_record(WireRecord::new())
                }

                pub fn entity(&self) -> &Entity {
                    &self.entity
                }

                pub fn entity_mut(&mut self) -> &mut Entity {
                    &mut self.entity
                }
            }

            impl Default for $kind {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl From<$kind> for PseudoTransaction {
                fn from(tx: $kind) -> Self {
                    PseudoTransaction::$kind(tx)
                }
            }
        )+

        /// A decoded pseudo transaction, or the generic fallback.
        #[derive(Debug, Clone)]
        pub enum PseudoTransaction {
            $($kind($kind),)+
            Fallback(FallbackTransaction),
        }

        impl PseudoTransaction {
            pub fn entity(&self) -> &Entity {
                match self {
                    $(PseudoTransaction::$kind(tx) => &tx.entity,)+
                    PseudoTransaction::Fallback(tx) => tx.entity(),
                }
            }

            pub fn entity_mut(&mut self) -> &mut Entity {
                match self {
                    $(PseudoTransaction::$kind(tx) => &mut tx.entity,)+
                    PseudoTransaction::Fallback(tx) => tx.entity_mut(),
                }
            }
        }

        pub(crate) type PseudoTransactionConstructor = fn(WireRecord) -> PseudoTransaction;

        pub(crate) fn pseudo_transaction_constructors() -> HashMap<&'static str, PseudoTransactionConstructor> {
            let mut constructors: HashMap<&'static str, PseudoTransactionConstructor> = HashMap::new();
            $(
                constructors.insert($kind::TYPE, |record| {
                    PseudoTransaction::$kind($kind::from_record(record))
                });
            )+
            constructors
        }
    };
}

pseudo_transaction_kinds! {
    /// Proof of account ownership for off-ledger services
    SignIn = "SignIn" => SIGN_IN_FIELDS;
    /// Off-ledger claim against a payment channel
    PaymentChannelAuthorize = "PaymentChannelAuthorize" => PAYMENT_CHANNEL_AUTHORIZE_FIELDS;
}

impl PseudoTransaction {
    pub fn discriminator(&self) -> &str {
        self.entity().discriminator()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PseudoTransaction::Fallback(_))
    }

    pub fn account(&self) -> Result<Option<AccountRef>, FieldError> {
        self.entity().account()
    }
}

impl PaymentChannelAuthorize {
    pub fn channel(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Channel")
    }

    pub fn amount(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Amount")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};

    const ALICE: &str = "rPEPPER7kfTD9w2To4CQk6UCfuHM9c6GDY";

    fn record(value: Value) -> WireRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_pseudo_schemas_resolve() {
        for (discriminator, constructor) in pseudo_transaction_constructors() {
            let tx = constructor(WireRecord::new());
            assert_eq!(tx.discriminator(), discriminator);
            assert!(!tx.is_fallback());
            assert!(tx.entity().schema().len() >= PSEUDO_COMMON.len());
        }
    }

    #[test]
    fn test_sign_in_without_flags_or_fee() {
        let sign_in = SignIn::from_record(record(json!({
            "Account": ALICE,
            "SourceTag": 3,
            "Memos": [{ "Memo": { "MemoData": "6869" } }]
        })));

        assert_eq!(
            sign_in.entity().account().unwrap(),
            Some(AccountRef { address: ALICE.to_string(), tag: Some(3) })
        );
        assert_eq!(sign_in.entity().raw_flags().unwrap(), 0);
        assert!(sign_in.entity().flags().unwrap().is_empty());
        assert!(matches!(
            sign_in.entity().get("Fee"),
            Err(FieldError::UnknownField { .. })
        ));
        assert!(sign_in.entity().validate().is_ok());
    }

    #[test]
    fn test_payment_channel_authorize() {
        let authorize = PaymentChannelAuthorize::from_record(record(json!({
            "Channel": "5DB01B7FFED6B67E6B0414DED11E051D2EE2B7619CE0EAA6286D67A3A4D5BDB3",
            "Amount": "1000000"
        })));

        assert_eq!(authorize.amount().unwrap(), Some(Amount::native(dec!(1))));
        assert_eq!(authorize.entity().record()["TransactionType"], json!("PaymentChannelAuthorize"));
        assert!(authorize.channel().unwrap().is_some());
    }
}
