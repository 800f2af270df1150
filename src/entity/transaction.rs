//! Transaction kinds
//!
//! One flat struct per registered transaction type, each owning an
//! [`Entity`] bound to its schema and the metadata it was delivered with.
//! [`Transaction`] is the tagged union the dispatcher returns.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::base::{AccountRef, Entity};
use super::fields::{builtin, field, TRANSACTION_COMMON};
use crate::codec::{self, Amount};
use crate::flags::EntityKind;
use crate::schema::wire::{
    ACCOUNT_ID, AMOUNT, BLOB, HASH128, HASH256, STARRAY, UINT16, UINT32, UINT8,
};
use crate::schema::{FieldError, FieldSchema, SchemaTable, WireRecord};

/// Signer slot of a multi-signing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignerEntry {
    pub account: String,
    pub signer_weight: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_locator: Option<String>,
}

// =========================================================================
// Field lists
// =========================================================================

const PAYMENT_FIELDS: &[FieldSchema] = &[
    field("Destination", ACCOUNT_ID).required(),
    field("DestinationTag", UINT32),
    field("Amount", AMOUNT).with_codec(codec::AMOUNT),
    field("DeliverMax", AMOUNT).with_codec(codec::AMOUNT),
    field("SendMax", AMOUNT).with_codec(codec::AMOUNT),
    field("DeliverMin", AMOUNT).with_codec(codec::AMOUNT),
    field("Paths", STARRAY),
    field("InvoiceID", HASH256),
    field("CredentialIDs", STARRAY),
];

const TRUST_SET_FIELDS: &[FieldSchema] = &[
    field("LimitAmount", AMOUNT).required().with_codec(codec::AMOUNT),
    field("QualityIn", UINT32),
    field("QualityOut", UINT32),
];

const ACCOUNT_SET_FIELDS: &[FieldSchema] = &[
    field("SetFlag", UINT32).with_codec(codec::FLAG_INDEX),
    field("ClearFlag", UINT32).with_codec(codec::FLAG_INDEX),
    field("Domain", BLOB).with_codec(codec::HEX_TEXT),
    field("EmailHash", HASH128),
    field("MessageKey", BLOB),
    field("TransferRate", UINT32).with_codec(codec::TRANSFER_RATE),
    field("TickSize", UINT8),
    field("NFTokenMinter", ACCOUNT_ID),
    field("WalletLocator", HASH256),
    field("WalletSize", UINT32),
];

const OFFER_CREATE_FIELDS: &[FieldSchema] = &[
    field("TakerGets", AMOUNT).required().with_codec(codec::AMOUNT),
    field("TakerPays", AMOUNT).required().with_codec(codec::AMOUNT),
    field("Expiration", UINT32).with_codec(codec::RIPPLE_TIME),
    field("OfferSequence", UINT32),
];

const OFFER_CANCEL_FIELDS: &[FieldSchema] = &[field("OfferSequence", UINT32).required()];

const NFTOKEN_MINT_FIELDS: &[FieldSchema] = &[
    field("NFTokenTaxon", UINT32).required(),
    field("Issuer", ACCOUNT_ID),
    field("TransferFee", UINT16).with_codec(codec::TRANSFER_FEE),
    field("URI", BLOB).with_codec(codec::HEX_TEXT),
];

const NFTOKEN_CREATE_OFFER_FIELDS: &[FieldSchema] = &[
    field("NFTokenID", HASH256).required(),
    field("Amount", AMOUNT).required().with_codec(codec::AMOUNT),
    field("Owner", ACCOUNT_ID),
    field("Destination", ACCOUNT_ID),
    field("Expiration", UINT32).with_codec(codec::RIPPLE_TIME),
];

const SIGNER_LIST_SET_FIELDS: &[FieldSchema] = &[
    field("SignerQuorum", UINT32).required(),
    field("SignerEntries", STARRAY).with_codec(codec::SIGNER_ENTRIES),
];

const DEPOSIT_PREAUTH_FIELDS: &[FieldSchema] = &[
    field("Authorize", ACCOUNT_ID),
    field("Unauthorize", ACCOUNT_ID),
    field("AuthorizeCredentials", STARRAY).with_codec(codec::CREDENTIALS),
    field("UnauthorizeCredentials", STARRAY).with_codec(codec::CREDENTIALS),
];

const CREDENTIAL_CREATE_FIELDS: &[FieldSchema] = &[
    field("Subject", ACCOUNT_ID).required(),
    field("CredentialType", BLOB).required().with_codec(codec::HEX_TEXT),
    field("Expiration", UINT32).with_codec(codec::RIPPLE_TIME),
    field("URI", BLOB).with_codec(codec::HEX_TEXT),
];

const URI_TOKEN_MINT_FIELDS: &[FieldSchema] = &[
    field("URI", BLOB).required().with_codec(codec::HEX_TEXT),
    field("Digest", HASH256),
    field("Amount", AMOUNT).with_codec(codec::AMOUNT),
    field("Destination", ACCOUNT_ID),
];

const CHECK_CREATE_FIELDS: &[FieldSchema] = &[
    field("Destination", ACCOUNT_ID).required(),
    field("DestinationTag", UINT32),
    field("SendMax", AMOUNT).required().with_codec(codec::AMOUNT),
    field("Expiration", UINT32).with_codec(codec::RIPPLE_TIME),
    field("InvoiceID", HASH256),
];

const CHECK_CASH_FIELDS: &[FieldSchema] = &[
    field("CheckID", HASH256).required(),
    field("Amount", AMOUNT).with_codec(codec::AMOUNT),
    field("DeliverMin", AMOUNT).with_codec(codec::AMOUNT),
];

const CHECK_CANCEL_FIELDS: &[FieldSchema] = &[field("CheckID", HASH256).required()];

const ESCROW_CREATE_FIELDS: &[FieldSchema] = &[
    field("Amount", AMOUNT).required().with_codec(codec::AMOUNT),
    field("Destination", ACCOUNT_ID).required(),
    field("DestinationTag", UINT32),
    field("Condition", BLOB),
    field("CancelAfter", UINT32).with_codec(codec::RIPPLE_TIME),
    field("FinishAfter", UINT32).with_codec(codec::RIPPLE_TIME),
];

const NFTOKEN_ACCEPT_OFFER_FIELDS: &[FieldSchema] = &[
    field("NFTokenSellOffer", HASH256),
    field("NFTokenBuyOffer", HASH256),
    field("NFTokenBrokerFee", AMOUNT).with_codec(codec::AMOUNT),
];

const DELEGATE_SET_FIELDS: &[FieldSchema] = &[
    field("Authorize", ACCOUNT_ID).required(),
    field("Permissions", STARRAY).with_codec(codec::PERMISSIONS),
];

const ACCOUNT_DELETE_FIELDS: &[FieldSchema] = &[
    field("Destination", ACCOUNT_ID).required(),
    field("DestinationTag", UINT32),
    field("CredentialIDs", STARRAY),
];

const PAYMENT_CHANNEL_CREATE_FIELDS: &[FieldSchema] = &[
    field("Amount", AMOUNT).required().with_codec(codec::AMOUNT),
    field("Destination", ACCOUNT_ID).required(),
    field("DestinationTag", UINT32),
    field("SettleDelay", UINT32).required(),
    field("PublicKey", BLOB).required(),
    field("CancelAfter", UINT32).with_codec(codec::RIPPLE_TIME),
];

const PAYMENT_CHANNEL_CLAIM_FIELDS: &[FieldSchema] = &[
    field("Channel", HASH256).required(),
    field("Balance", AMOUNT).with_codec(codec::AMOUNT),
    field("Amount", AMOUNT).with_codec(codec::AMOUNT),
    field("Signature", BLOB),
    field("PublicKey", BLOB),
    field("CredentialIDs", STARRAY),
];

const SET_REGULAR_KEY_FIELDS: &[FieldSchema] = &[field("RegularKey", ACCOUNT_ID)];

/// Granular delegation permissions. Values below `65536` name a
/// transaction type instead.
const GRANULAR_PERMISSIONS: &[(u32, &str)] = &[
    (65537, "TrustlineAuthorize"),
    (65538, "TrustlineFreeze"),
    (65539, "TrustlineUnfreeze"),
    (65540, "AccountDomainSet"),
    (65541, "AccountEmailHashSet"),
    (65542, "AccountMessageKeySet"),
    (65543, "AccountTransferRateSet"),
    (65544, "AccountTickSizeSet"),
    (65545, "PaymentMint"),
    (65546, "PaymentBurn"),
    (65547, "MPTokenIssuanceLock"),
    (65548, "MPTokenIssuanceUnlock"),
];

// =========================================================================
// Kinds
// =========================================================================

macro_rules! transaction_kinds {
    ($($(#[$doc:meta])* $kind:ident = $discriminator:literal => $fields:expr;)+) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone)]
            pub struct $kind {
                entity: Entity,
                meta: Option<WireRecord>,
            }

            impl $kind {
                pub const TYPE: &'static str = $discriminator;

                pub fn schema() -> &'static SchemaTable {
                    static SCHEMA: LazyLock<SchemaTable> =
                        LazyLock::new(|| builtin($discriminator, &[TRANSACTION_COMMON, $fields]));
                    &SCHEMA
                }

                pub fn from_record(record: WireRecord, meta: Option<WireRecord>) -> Self {
                    Self {
                        entity: Entity::new(EntityKind::Transaction, Self::TYPE, record, Self::schema()),
                        meta,
                    }
                }

                /// Empty transaction of this kind, ready to be filled through setters.
                pub fn new() -> Self {
                    Self::from_record(WireRecord::new(), None)
                }

                pub fn entity(&self) -> &Entity {
                    &self.entity
                }

                pub fn entity_mut(&mut self) -> &mut Entity {
                    &mut self.entity
                }

                pub fn meta(&self) -> Option<&WireRecord> {
                    self.meta.as_ref()
                }
            }

            impl Default for $kind {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl From<$kind> for Transaction {
                fn from(tx: $kind) -> Self {
                    Transaction::$kind(tx)
                }
            }
        )+

        /// A decoded transaction: one registered kind, or the generic fallback
        /// for discriminators this crate does not know.
        #[derive(Debug, Clone)]
        pub enum Transaction {
            $($kind($kind),)+
            Fallback(FallbackTransaction),
        }

        impl Transaction {
            pub fn entity(&self) -> &Entity {
                match self {
                    $(Transaction::$kind(tx) => &tx.entity,)+
                    Transaction::Fallback(tx) => &tx.entity,
                }
            }

            pub fn entity_mut(&mut self) -> &mut Entity {
                match self {
                    $(Transaction::$kind(tx) => &mut tx.entity,)+
                    Transaction::Fallback(tx) => &mut tx.entity,
                }
            }

            pub fn meta(&self) -> Option<&WireRecord> {
                match self {
                    $(Transaction::$kind(tx) => tx.meta.as_ref(),)+
                    Transaction::Fallback(tx) => tx.meta.as_ref(),
                }
            }
        }

        pub(crate) type TransactionConstructor = fn(WireRecord, Option<WireRecord>) -> Transaction;

        /// Discriminator → constructor for every registered kind.
        pub(crate) fn transaction_constructors() -> HashMap<&'static str, TransactionConstructor> {
            let mut constructors: HashMap<&'static str, TransactionConstructor> = HashMap::new();
            $(
                constructors.insert($kind::TYPE, |record, meta| {
                    Transaction::$kind($kind::from_record(record, meta))
                });
            )+
            constructors
        }
    };
}

transaction_kinds! {
    Payment = "Payment" => PAYMENT_FIELDS;
    TrustSet = "TrustSet" => TRUST_SET_FIELDS;
    AccountSet = "AccountSet" => ACCOUNT_SET_FIELDS;
    OfferCreate = "OfferCreate" => OFFER_CREATE_FIELDS;
    OfferCancel = "OfferCancel" => OFFER_CANCEL_FIELDS;
    NFTokenMint = "NFTokenMint" => NFTOKEN_MINT_FIELDS;
    NFTokenCreateOffer = "NFTokenCreateOffer" => NFTOKEN_CREATE_OFFER_FIELDS;
    SignerListSet = "SignerListSet" => SIGNER_LIST_SET_FIELDS;
    /// Deposit authorization for an account or a set of credentials
    DepositPreauth = "DepositPreauth" => DEPOSIT_PREAUTH_FIELDS;
    CredentialCreate = "CredentialCreate" => CREDENTIAL_CREATE_FIELDS;
    URITokenMint = "URITokenMint" => URI_TOKEN_MINT_FIELDS;
    CheckCreate = "CheckCreate" => CHECK_CREATE_FIELDS;
    CheckCash = "CheckCash" => CHECK_CASH_FIELDS;
    CheckCancel = "CheckCancel" => CHECK_CANCEL_FIELDS;
    EscrowCreate = "EscrowCreate" => ESCROW_CREATE_FIELDS;
    NFTokenAcceptOffer = "NFTokenAcceptOffer" => NFTOKEN_ACCEPT_OFFER_FIELDS;
    /// Delegation of transaction permissions to another account
    DelegateSet = "DelegateSet" => DELEGATE_SET_FIELDS;
    AccountDelete = "AccountDelete" => ACCOUNT_DELETE_FIELDS;
    PaymentChannelCreate = "PaymentChannelCreate" => PAYMENT_CHANNEL_CREATE_FIELDS;
    PaymentChannelClaim = "PaymentChannelClaim" => PAYMENT_CHANNEL_CLAIM_FIELDS;
    SetRegularKey = "SetRegularKey" => SET_REGULAR_KEY_FIELDS;
}

impl Transaction {
    pub fn discriminator(&self) -> &str {
        self.entity().discriminator()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Transaction::Fallback(_))
    }

    pub fn hash(&self) -> Result<Option<String>, FieldError> {
        self.entity().get_as("hash")
    }

    pub fn account(&self) -> Result<Option<AccountRef>, FieldError> {
        self.entity().account()
    }
}

/// Transaction of a kind with no registered schema.
///
/// Only the common transaction fields are addressable; the rest of the
/// record is carried untouched.
#[derive(Debug, Clone)]
pub struct FallbackTransaction {
    entity: Entity,
    meta: Option<WireRecord>,
}

impl FallbackTransaction {
    pub fn schema() -> &'static SchemaTable {
        static SCHEMA: LazyLock<SchemaTable> =
            LazyLock::new(|| builtin("Transaction", &[TRANSACTION_COMMON]));
        &SCHEMA
    }

    pub fn from_record(discriminator: &str, record: WireRecord, meta: Option<WireRecord>) -> Self {
        Self {
            entity: Entity::new(EntityKind::Transaction, discriminator, record, Self::schema()),
            meta,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn meta(&self) -> Option<&WireRecord> {
        self.meta.as_ref()
    }
}

// =========================================================================
// Typed accessors
// =========================================================================

impl Payment {
    /// `Destination` + `DestinationTag`
    pub fn destination(&self) -> Result<Option<AccountRef>, FieldError> {
        self.entity.composite("Destination", "DestinationTag")
    }

    /// Requested amount. API v2 records carry it as `DeliverMax`.
    pub fn amount(&self) -> Result<Option<Amount>, FieldError> {
        match self.entity.get_as("Amount")? {
            Some(amount) => Ok(Some(amount)),
            None => self.entity.get_as("DeliverMax"),
        }
    }

    /// Amount actually delivered, from the metadata.
    ///
    /// `None` without metadata, or when the ledger reports it as unavailable
    /// (payments validated before the field existed).
    pub fn delivered_amount(&self) -> Result<Option<Amount>, FieldError> {
        let Some(meta) = &self.meta else {
            return Ok(None);
        };
        let delivered = meta
            .get("delivered_amount")
            .or_else(|| meta.get("DeliveredAmount"))
            .filter(|value| value.as_str() != Some("unavailable"));
        let Some(delivered) = delivered else {
            return Ok(None);
        };

        let codec_error = |source| FieldError::Codec {
            field: "delivered_amount",
            source,
        };
        let decoded = codec::AMOUNT
            .decode(self.entity.record(), delivered.clone())
            .map_err(codec_error)?;
        serde_json::from_value(decoded)
            .map(Some)
            .map_err(|_| codec_error(codec::CodecError::shape("amount")))
    }
}

impl TrustSet {
    pub fn limit_amount(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("LimitAmount")
    }
}

impl AccountSet {
    pub fn domain(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Domain")
    }

    /// Transfer rate as a percentage
    pub fn transfer_rate(&self) -> Result<Option<Decimal>, FieldError> {
        self.entity.get_as("TransferRate")
    }
}

impl AccountSet {
    /// Account flag enabled by this transaction, by name
    pub fn set_flag(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("SetFlag")
    }

    /// Account flag disabled by this transaction, by name
    pub fn clear_flag(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("ClearFlag")
    }
}

impl OfferCreate {
    pub fn taker_gets(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("TakerGets")
    }

    pub fn taker_pays(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("TakerPays")
    }

    pub fn expiration(&self) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.entity.get_as("Expiration")
    }

    /// Offer replaced by this one, if any
    pub fn offer_sequence(&self) -> Result<Option<u32>, FieldError> {
        self.entity.get_as("OfferSequence")
    }
}

impl OfferCancel {
    pub fn offer_sequence(&self) -> Result<Option<u32>, FieldError> {
        self.entity.get_as("OfferSequence")
    }
}

impl NFTokenMint {
    /// Transfer fee as a percentage
    pub fn transfer_fee(&self) -> Result<Option<Decimal>, FieldError> {
        self.entity.get_as("TransferFee")
    }

    pub fn uri(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("URI")
    }
}

impl NFTokenCreateOffer {
    pub fn amount(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Amount")
    }

    pub fn is_sell_offer(&self) -> Result<bool, FieldError> {
        Ok(self.entity.flags()?.is_set("SellNFToken"))
    }
}

impl SignerListSet {
    pub fn signer_entries(&self) -> Result<Vec<SignerEntry>, FieldError> {
        Ok(self.entity.get_as("SignerEntries")?.unwrap_or_default())
    }
}

impl DepositPreauth {
    pub fn authorize(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Authorize")
    }

    pub fn authorize_credentials(&self) -> Result<Vec<Value>, FieldError> {
        Ok(self.entity.get_as("AuthorizeCredentials")?.unwrap_or_default())
    }
}

impl CredentialCreate {
    pub fn subject(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Subject")
    }

    pub fn credential_type(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("CredentialType")
    }
}

impl URITokenMint {
    pub fn uri(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("URI")
    }
}

impl CheckCreate {
    pub fn destination(&self) -> Result<Option<AccountRef>, FieldError> {
        self.entity.composite("Destination", "DestinationTag")
    }

    pub fn send_max(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("SendMax")
    }

    pub fn expiration(&self) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.entity.get_as("Expiration")
    }

    pub fn invoice_id(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("InvoiceID")
    }
}

impl CheckCash {
    pub fn check_id(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("CheckID")
    }

    pub fn amount(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Amount")
    }

    pub fn deliver_min(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("DeliverMin")
    }

    /// The cashed check, rebuilt from its deleted ledger node
    pub fn check(&self) -> Option<CheckCreate> {
        let nodes = self.meta.as_ref()?.get("AffectedNodes")?.as_array()?;
        nodes.iter().find_map(|node| {
            let deleted = node.get("DeletedNode")?;
            if deleted.get("LedgerEntryType").and_then(Value::as_str) != Some("Check") {
                return None;
            }
            let fields = deleted.get("FinalFields")?.as_object()?;
            Some(CheckCreate::from_record(fields.clone(), None))
        })
    }

    /// Whether the cashed check had expired by `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> Result<bool, FieldError> {
        let Some(check) = self.check() else {
            return Ok(false);
        };
        Ok(check.expiration()?.is_some_and(|expiration| expiration < now))
    }
}

impl CheckCancel {
    pub fn check_id(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("CheckID")
    }
}

impl EscrowCreate {
    pub fn amount(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Amount")
    }

    pub fn destination(&self) -> Result<Option<AccountRef>, FieldError> {
        self.entity.composite("Destination", "DestinationTag")
    }

    pub fn condition(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Condition")
    }

    pub fn cancel_after(&self) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.entity.get_as("CancelAfter")
    }

    pub fn finish_after(&self) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.entity.get_as("FinishAfter")
    }
}

impl NFTokenAcceptOffer {
    pub fn sell_offer(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("NFTokenSellOffer")
    }

    pub fn buy_offer(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("NFTokenBuyOffer")
    }

    /// The accepted offer, sell side first
    pub fn offer_id(&self) -> Result<Option<String>, FieldError> {
        match self.sell_offer()? {
            Some(offer) => Ok(Some(offer)),
            None => self.buy_offer(),
        }
    }

    pub fn broker_fee(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("NFTokenBrokerFee")
    }
}

impl DelegateSet {
    pub fn authorize(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Authorize")
    }

    pub fn permissions(&self) -> Result<Vec<Value>, FieldError> {
        Ok(self.entity.get_as("Permissions")?.unwrap_or_default())
    }

    /// Granular permission names; other values are kept as their number.
    pub fn permission_names(&self) -> Result<Vec<String>, FieldError> {
        Ok(self
            .permissions()?
            .iter()
            .filter_map(|permission| permission.get("PermissionValue"))
            .map(|value| {
                let code = value.as_u64().and_then(|code| u32::try_from(code).ok());
                GRANULAR_PERMISSIONS
                    .iter()
                    .find(|(known, _)| Some(*known) == code)
                    .map(|(_, name)| name.to_string())
                    .unwrap_or_else(|| match value {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
            })
            .collect())
    }
}

impl AccountDelete {
    pub fn destination(&self) -> Result<Option<AccountRef>, FieldError> {
        self.entity.composite("Destination", "DestinationTag")
    }
}

impl PaymentChannelCreate {
    pub fn amount(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Amount")
    }

    pub fn destination(&self) -> Result<Option<AccountRef>, FieldError> {
        self.entity.composite("Destination", "DestinationTag")
    }

    /// Seconds the source must wait before closing a funded channel
    pub fn settle_delay(&self) -> Result<Option<u32>, FieldError> {
        self.entity.get_as("SettleDelay")
    }

    pub fn public_key(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("PublicKey")
    }

    pub fn cancel_after(&self) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.entity.get_as("CancelAfter")
    }
}

impl PaymentChannelClaim {
    pub fn channel(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Channel")
    }

    pub fn balance(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Balance")
    }

    pub fn amount(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Amount")
    }

    pub fn is_close_requested(&self) -> Result<bool, FieldError> {
        Ok(self.entity.flags()?.is_set("Close"))
    }
}

impl SetRegularKey {
    /// `None` removes the regular key
    pub fn regular_key(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("RegularKey")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AccountPatch;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const ALICE: &str = "rPEPPER7kfTD9w2To4CQk6UCfuHM9c6GDY";
    const BOB: &str = "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B";

    fn record(value: Value) -> WireRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_builtin_schemas_resolve() {
        for (discriminator, constructor) in transaction_constructors() {
            let tx = constructor(WireRecord::new(), None);
            assert_eq!(tx.discriminator(), discriminator);
            assert!(tx.entity().schema().len() > TRANSACTION_COMMON.len());
        }
        assert_eq!(FallbackTransaction::schema().len(), TRANSACTION_COMMON.len());
    }

    #[test]
    fn test_discriminator_is_stamped_and_readonly() {
        let mut payment = Payment::new();
        assert_eq!(payment.entity().record()["TransactionType"], json!("Payment"));

        let err = payment.entity_mut().set("TransactionType", "TrustSet").unwrap_err();
        assert_eq!(err, FieldError::ReadOnly("TransactionType"));
        assert_eq!(payment.entity().discriminator(), "Payment");
    }

    #[test]
    fn test_payment_accessors() {
        let payment = Payment::from_record(
            record(json!({
                "Account": ALICE,
                "Destination": BOB,
                "DestinationTag": 42,
                "Amount": "2500000",
                "Fee": "12",
                "Sequence": 7,
                "SourceTag": 99
            })),
            Some(record(json!({ "delivered_amount": "2000000", "TransactionResult": "tesSUCCESS" }))),
        );

        assert_eq!(
            payment.entity().account().unwrap(),
            Some(AccountRef { address: ALICE.to_string(), tag: Some(99) })
        );
        assert_eq!(
            payment.destination().unwrap(),
            Some(AccountRef { address: BOB.to_string(), tag: Some(42) })
        );
        assert_eq!(payment.amount().unwrap(), Some(Amount::native(dec!(2.5))));
        assert_eq!(payment.delivered_amount().unwrap(), Some(Amount::native(dec!(2))));
        assert_eq!(
            payment.entity().get("Fee").unwrap(),
            Some(json!({ "currency": "XRP", "value": "0.000012" }))
        );
        assert_eq!(payment.entity().sequence().unwrap(), Some(7));
    }

    #[test]
    fn test_payment_amount_falls_back_to_deliver_max() {
        let payment = Payment::from_record(
            record(json!({ "Account": ALICE, "Destination": BOB, "DeliverMax": "1000000", "Sequence": 1 })),
            Some(record(json!({ "delivered_amount": "unavailable" }))),
        );
        assert_eq!(payment.amount().unwrap(), Some(Amount::native(dec!(1))));
        assert_eq!(payment.delivered_amount().unwrap(), None);
    }

    #[test]
    fn test_account_partial_updates() {
        let mut payment = Payment::from_record(
            record(json!({ "Account": ALICE, "SourceTag": 1, "Sequence": 1 })),
            None,
        );

        payment.entity_mut().set_account(AccountPatch::tag(Some(5))).unwrap();
        assert_eq!(
            payment.entity().account().unwrap(),
            Some(AccountRef { address: ALICE.to_string(), tag: Some(5) })
        );

        payment.entity_mut().set_account(AccountPatch::address(BOB)).unwrap();
        assert_eq!(
            payment.entity().account().unwrap(),
            Some(AccountRef { address: BOB.to_string(), tag: Some(5) })
        );

        payment.entity_mut().set_account(AccountPatch::tag(None)).unwrap();
        assert_eq!(
            payment.entity().account().unwrap(),
            Some(AccountRef { address: BOB.to_string(), tag: None })
        );

        let err = payment
            .entity_mut()
            .set_account(AccountPatch::address(""))
            .unwrap_err();
        assert_eq!(err, FieldError::MissingRequired("Account"));
    }

    #[test]
    fn test_account_absent() {
        assert_eq!(Payment::new().entity().account().unwrap(), None);
    }

    #[test]
    fn test_offer_create_flags_and_fields() {
        let offer = OfferCreate::from_record(
            record(json!({
                "Account": ALICE,
                "Flags": 393216,
                "Sequence": 3,
                "TakerGets": "1000000",
                "TakerPays": { "currency": "USD", "issuer": BOB, "value": "1.2" },
                "Expiration": 700000000,
                "OfferSequence": 2
            })),
            None,
        );

        let flags = offer.entity().flags().unwrap();
        assert!(flags.is_set("FillOrKill"));
        assert!(flags.is_set("ImmediateOrCancel"));
        assert_eq!(offer.offer_sequence().unwrap(), Some(2));
        assert_eq!(
            offer.taker_pays().unwrap().map(|amount| amount.value),
            Some(dec!(1.2))
        );
        assert_eq!(
            offer.expiration().unwrap().map(|at| at.to_rfc3339()),
            Some("2022-03-07T20:26:40+00:00".to_string())
        );
    }

    #[test]
    fn test_set_flags_by_name() {
        let mut offer = OfferCreate::new();
        offer
            .entity_mut()
            .set_flags(["tfImmediateOrCancel", "FillOrKill"])
            .unwrap();
        assert_eq!(offer.entity().raw_flags().unwrap(), 393216);

        let err = offer.entity_mut().set_flags(["Bogus"]).unwrap_err();
        assert!(err.is_codec_error());
    }

    #[test]
    fn test_nftoken_mint_transfer_fee() {
        let mut mint = NFTokenMint::from_record(
            record(json!({ "Account": ALICE, "Sequence": 1, "NFTokenTaxon": 0, "TransferFee": 314 })),
            None,
        );
        assert_eq!(mint.transfer_fee().unwrap(), Some(dec!(0.314)));

        mint.entity_mut().set("TransferFee", "50").unwrap();
        assert_eq!(mint.entity().record()["TransferFee"], json!(50000));

        let err = mint.entity_mut().set("TransferFee", "51").unwrap_err();
        assert!(err.is_codec_error());
    }

    #[test]
    fn test_validate_reports_first_missing_required_field() {
        let payment = Payment::from_record(record(json!({ "Account": ALICE, "Destination": BOB })), None);
        assert_eq!(
            payment.entity().validate().unwrap_err(),
            FieldError::MissingRequired("Sequence")
        );
    }

    #[test]
    fn test_to_json_drops_undeclared_keys() {
        let payment = Payment::from_record(
            record(json!({ "Account": ALICE, "Destination": BOB, "Sequence": 1, "inLedger": 5 })),
            None,
        );
        let json = payment.entity().to_json();
        assert!(json.contains_key("Destination"));
        assert!(!json.contains_key("inLedger"));
        assert_eq!(payment.entity().record()["inLedger"], json!(5));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let trust = TrustSet::new();
        assert!(matches!(
            trust.entity().get("TakerGets"),
            Err(FieldError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_signer_list_entries() {
        let list = SignerListSet::from_record(
            record(json!({
                "Account": ALICE,
                "Sequence": 1,
                "SignerQuorum": 2,
                "SignerEntries": [
                    { "SignerEntry": { "Account": BOB, "SignerWeight": 1 } },
                    { "SignerEntry": { "Account": ALICE, "SignerWeight": 2 } }
                ]
            })),
            None,
        );
        let entries = list.signer_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].account, BOB);
        assert_eq!(entries[1].signer_weight, 2);
    }

    #[test]
    fn test_account_set_flag_indices() {
        let mut account_set = AccountSet::from_record(
            record(json!({ "Account": ALICE, "Sequence": 1, "SetFlag": 4, "WalletSize": 0 })),
            None,
        );
        assert_eq!(account_set.set_flag().unwrap().as_deref(), Some("asfDisableMaster"));
        assert_eq!(account_set.clear_flag().unwrap(), None);

        account_set.entity_mut().set("ClearFlag", "asfDefaultRipple").unwrap();
        assert_eq!(account_set.entity().record()["ClearFlag"], json!(8));

        let err = account_set.entity_mut().set("SetFlag", "asfBogus").unwrap_err();
        assert!(err.is_codec_error());

        account_set.entity_mut().set("EmailHash", "F".repeat(32)).unwrap();
        assert!(account_set.entity_mut().set("EmailHash", "F".repeat(64)).is_err());
    }

    #[test]
    fn test_check_cash_reads_deleted_check() {
        let cash = CheckCash::from_record(
            record(json!({
                "Account": BOB,
                "Sequence": 4,
                "CheckID": "C".repeat(64),
                "Amount": { "currency": "USD", "issuer": ALICE, "value": "10" }
            })),
            Some(record(json!({
                "AffectedNodes": [
                    { "ModifiedNode": { "LedgerEntryType": "AccountRoot", "FinalFields": {} } },
                    { "DeletedNode": {
                        "LedgerEntryType": "Check",
                        "FinalFields": {
                            "Account": ALICE,
                            "Destination": BOB,
                            "SendMax": "100",
                            "Expiration": 700000000
                        }
                    } }
                ]
            }))),
        );

        assert_eq!(cash.check_id().unwrap(), Some("C".repeat(64)));
        assert_eq!(cash.amount().unwrap().map(|amount| amount.value), Some(dec!(10)));

        let check = cash.check().unwrap();
        assert_eq!(
            check.destination().unwrap(),
            Some(AccountRef { address: BOB.to_string(), tag: None })
        );
        let later = DateTime::parse_from_rfc3339("2023-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let earlier = DateTime::parse_from_rfc3339("2022-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        assert!(cash.is_expired(later).unwrap());
        assert!(!cash.is_expired(earlier).unwrap());

        assert!(CheckCash::new().check().is_none());
    }

    #[test]
    fn test_escrow_and_channel_accessors() {
        let escrow = EscrowCreate::from_record(
            record(json!({
                "Account": ALICE,
                "Sequence": 1,
                "Amount": "10000",
                "Destination": BOB,
                "DestinationTag": 23480,
                "CancelAfter": 533257958,
                "FinishAfter": 533171558,
                "Condition": "A0258020"
            })),
            None,
        );
        assert_eq!(escrow.amount().unwrap(), Some(Amount::native(dec!(0.01))));
        assert_eq!(escrow.destination().unwrap().and_then(|dest| dest.tag), Some(23480));
        assert!(escrow.cancel_after().unwrap() > escrow.finish_after().unwrap());

        let create = PaymentChannelCreate::from_record(
            record(json!({
                "Account": ALICE,
                "Sequence": 2,
                "Amount": "10000",
                "Destination": BOB,
                "SettleDelay": 86400,
                "PublicKey": "32D2471DB72B27E3310F355BB33E339BF26F8392D5A93D3BC0FC3B566612DA0F0A"
            })),
            None,
        );
        assert_eq!(create.settle_delay().unwrap(), Some(86400));
        assert!(create.public_key().unwrap().is_some());

        let claim = PaymentChannelClaim::from_record(
            record(json!({
                "Account": BOB,
                "Sequence": 3,
                "Flags": 0x0002_0000,
                "Channel": "C1AE6DDDEEC05CF2978C0BAD6FE302948E9533691DC749DCDD3B9E5992CA6198",
                "Balance": "1000000"
            })),
            None,
        );
        assert!(claim.is_close_requested().unwrap());
        assert_eq!(claim.balance().unwrap(), Some(Amount::native(dec!(1))));
    }

    #[test]
    fn test_nftoken_accept_offer_prefers_sell_side() {
        let accept = NFTokenAcceptOffer::from_record(
            record(json!({
                "Account": ALICE,
                "Sequence": 1,
                "NFTokenSellOffer": "A".repeat(64),
                "NFTokenBuyOffer": "B".repeat(64),
                "NFTokenBrokerFee": "100"
            })),
            None,
        );
        assert_eq!(accept.offer_id().unwrap(), Some("A".repeat(64)));
        assert_eq!(accept.broker_fee().unwrap(), Some(Amount::native(dec!(0.0001))));
    }

    #[test]
    fn test_delegate_set_permission_names() {
        let delegate = DelegateSet::from_record(
            record(json!({
                "Account": ALICE,
                "Sequence": 1,
                "Authorize": BOB,
                "Permissions": [
                    { "Permission": { "PermissionValue": 65537 } },
                    { "Permission": { "PermissionValue": 65548 } },
                    { "Permission": { "PermissionValue": 1 } }
                ]
            })),
            None,
        );
        assert_eq!(delegate.authorize().unwrap().as_deref(), Some(BOB));
        assert_eq!(
            delegate.permission_names().unwrap(),
            vec!["TrustlineAuthorize", "MPTokenIssuanceUnlock", "1"]
        );
    }

    #[test]
    fn test_account_delete_and_regular_key() {
        let delete = AccountDelete::from_record(
            record(json!({ "Account": ALICE, "Sequence": 1, "Destination": BOB, "DestinationTag": 13 })),
            None,
        );
        assert_eq!(
            delete.destination().unwrap(),
            Some(AccountRef { address: BOB.to_string(), tag: Some(13) })
        );

        let set_key = SetRegularKey::from_record(
            record(json!({ "Account": ALICE, "Sequence": 1, "RegularKey": BOB })),
            None,
        );
        assert_eq!(set_key.regular_key().unwrap().as_deref(), Some(BOB));

        let cancel = CheckCancel::from_record(
            record(json!({ "Account": ALICE, "Sequence": 1, "CheckID": "E".repeat(64) })),
            None,
        );
        assert_eq!(cancel.check_id().unwrap(), Some("E".repeat(64)));
        let create = CheckCreate::from_record(
            record(json!({ "Account": ALICE, "Sequence": 1, "Destination": BOB, "SendMax": "1" })),
            None,
        );
        assert_eq!(create.send_max().unwrap(), Some(Amount::native(dec!(0.000001))));
    }

    #[test]
    fn test_memos_decode_through_entity() {
        let payment = Payment::from_record(
            record(json!({
                "Account": ALICE,
                "Sequence": 1,
                "Memos": [{ "Memo": { "MemoData": "6869" } }]
            })),
            None,
        );
        assert_eq!(
            payment.entity().get("Memos").unwrap(),
            Some(json!([{ "MemoData": "hi" }]))
        );
    }
}
