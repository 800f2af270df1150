//! Ledger-object kinds
//!
//! Same layout as the transaction kinds, without metadata and without a
//! fallback: an unregistered ledger entry type is not decoded at all.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::base::{AccountRef, Entity};
use super::fields::{builtin, field, LEDGER_ENTRY_COMMON};
use super::transaction::SignerEntry;
use crate::codec::{self, Amount};
use crate::flags::EntityKind;
use crate::schema::wire::{
    ACCOUNT_ID, AMOUNT, BLOB, CURRENCY, HASH128, HASH256, STARRAY, UINT32, UINT64, UINT8, VECTOR256,
};
use crate::schema::{FieldError, FieldSchema, SchemaTable, WireRecord};

// =========================================================================
// Field lists
// =========================================================================

const ACCOUNT_ROOT_FIELDS: &[FieldSchema] = &[
    field("Account", ACCOUNT_ID).required(),
    field("Balance", AMOUNT).with_codec(codec::AMOUNT),
    field("Sequence", UINT32).required(),
    field("OwnerCount", UINT32),
    field("Domain", BLOB).with_codec(codec::HEX_TEXT),
    field("EmailHash", HASH128),
    field("MessageKey", BLOB),
    field("RegularKey", ACCOUNT_ID),
    field("TransferRate", UINT32).with_codec(codec::TRANSFER_RATE),
    field("TickSize", UINT8),
    field("NFTokenMinter", ACCOUNT_ID),
    field("MintedNFTokens", UINT32),
    field("BurnedNFTokens", UINT32),
    field("FirstNFTokenSequence", UINT32),
    field("TicketCount", UINT32),
    field("AccountTxnID", HASH256),
    field("WalletLocator", HASH256),
];

const RIPPLE_STATE_FIELDS: &[FieldSchema] = &[
    field("Balance", AMOUNT).required().with_codec(codec::AMOUNT),
    field("HighLimit", AMOUNT).required().with_codec(codec::AMOUNT),
    field("LowLimit", AMOUNT).required().with_codec(codec::AMOUNT),
    field("HighNode", UINT64),
    field("LowNode", UINT64),
    field("HighQualityIn", UINT32),
    field("HighQualityOut", UINT32),
    field("LowQualityIn", UINT32),
    field("LowQualityOut", UINT32),
];

const OFFER_FIELDS: &[FieldSchema] = &[
    field("Account", ACCOUNT_ID).required(),
    field("Sequence", UINT32).required(),
    field("TakerGets", AMOUNT).required().with_codec(codec::AMOUNT),
    field("TakerPays", AMOUNT).required().with_codec(codec::AMOUNT),
    field("BookDirectory", HASH256),
    field("BookNode", UINT64),
    field("OwnerNode", UINT64),
    field("Expiration", UINT32).with_codec(codec::RIPPLE_TIME),
];

const SIGNER_LIST_FIELDS: &[FieldSchema] = &[
    field("SignerQuorum", UINT32).required(),
    field("SignerEntries", STARRAY).required().with_codec(codec::SIGNER_ENTRIES),
    field("SignerListID", UINT32),
    field("OwnerNode", UINT64),
];

const NFTOKEN_OFFER_FIELDS: &[FieldSchema] = &[
    field("Owner", ACCOUNT_ID).required(),
    field("NFTokenID", HASH256).required(),
    field("Amount", AMOUNT).required().with_codec(codec::AMOUNT),
    field("Destination", ACCOUNT_ID),
    field("Expiration", UINT32).with_codec(codec::RIPPLE_TIME),
    field("OwnerNode", UINT64),
    field("NFTokenOfferNode", UINT64),
];

const URI_TOKEN_FIELDS: &[FieldSchema] = &[
    field("Owner", ACCOUNT_ID).required(),
    field("Issuer", ACCOUNT_ID).required(),
    field("URI", BLOB).required().with_codec(codec::HEX_TEXT),
    field("Digest", HASH256),
    field("Amount", AMOUNT).with_codec(codec::AMOUNT),
    field("Destination", ACCOUNT_ID),
    field("OwnerNode", UINT64),
];

const CHECK_FIELDS: &[FieldSchema] = &[
    field("Account", ACCOUNT_ID).required(),
    field("Destination", ACCOUNT_ID).required(),
    field("SendMax", AMOUNT).required().with_codec(codec::AMOUNT),
    field("Sequence", UINT32).required(),
    field("DestinationTag", UINT32),
    field("SourceTag", UINT32),
    field("Expiration", UINT32).with_codec(codec::RIPPLE_TIME),
    field("InvoiceID", HASH256),
    field("OwnerNode", UINT64),
    field("DestinationNode", UINT64),
];

const CREDENTIAL_FIELDS: &[FieldSchema] = &[
    field("Subject", ACCOUNT_ID).required(),
    field("Issuer", ACCOUNT_ID).required(),
    field("CredentialType", BLOB).required().with_codec(codec::HEX_TEXT),
    field("Expiration", UINT32).with_codec(codec::RIPPLE_TIME),
    field("URI", BLOB).with_codec(codec::HEX_TEXT),
    field("IssuerNode", UINT64),
    field("SubjectNode", UINT64),
];

const DEPOSIT_PREAUTH_FIELDS: &[FieldSchema] = &[
    field("Account", ACCOUNT_ID).required(),
    field("Authorize", ACCOUNT_ID),
    field("AuthorizeCredentials", STARRAY).with_codec(codec::CREDENTIALS),
    field("OwnerNode", UINT64),
];

const TICKET_FIELDS: &[FieldSchema] = &[
    field("Account", ACCOUNT_ID).required(),
    field("TicketSequence", UINT32).required(),
    field("OwnerNode", UINT64),
];

/// Owner directories and order-book / NFT-offer directories share one layout.
const DIRECTORY_NODE_FIELDS: &[FieldSchema] = &[
    field("RootIndex", HASH256).required(),
    field("Indexes", VECTOR256).required(),
    field("Owner", ACCOUNT_ID),
    field("IndexNext", UINT64),
    field("IndexPrevious", UINT64),
    field("NFTokenID", HASH256),
    field("TakerPaysCurrency", CURRENCY),
    field("TakerPaysIssuer", HASH128),
    field("TakerGetsCurrency", CURRENCY),
    field("TakerGetsIssuer", HASH128),
    field("ExchangeRate", UINT64),
];

// =========================================================================
// Kinds
// =========================================================================

macro_rules! ledger_object_kinds {
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
                        LazyLock::new(|| builtin($discriminator, &[LEDGER_ENTRY_COMMON, $fields]));
                    &SCHEMA
                }

                pub fn from_record(record: WireRecord) -> Self {
                    Self {
                        entity: Entity::new(EntityKind::LedgerEntry, Self::TYPE, record, Self::schema()),
                    }
                }

                pub fn entity(&self) -> &Entity {
                    &self.entity
                }

                pub fn entity_mut(&mut self) -> &mut Entity {
                    &mut self.entity
                }
            }

            impl From<$kind> for LedgerObject {
                fn from(object: $kind) -> Self {
                    LedgerObject::$kind(object)
                }
            }
        )+

        /// A decoded ledger entry of a registered kind.
        #[derive(Debug, Clone)]
        pub enum LedgerObject {
            $($kind($kind),)+
        }

        impl LedgerObject {
            pub fn entity(&self) -> &Entity {
                match self {
                    $(LedgerObject::$kind(object) => &object.entity,)+
                }
            }

            pub fn entity_mut(&mut self) -> &mut Entity {
                match self {
                    $(LedgerObject::$kind(object) => &mut object.entity,)+
                }
            }
        }

        pub(crate) type LedgerObjectConstructor = fn(WireRecord) -> LedgerObject;

        /// Discriminator → constructor for every registered kind.
        pub(crate) fn ledger_object_constructors() -> HashMap<&'static str, LedgerObjectConstructor> {
            let mut constructors: HashMap<&'static str, LedgerObjectConstructor> = HashMap::new();
            $(
                constructors.insert($kind::TYPE, |record| LedgerObject::$kind($kind::from_record(record)));
            )+
            constructors
        }
    };
}

ledger_object_kinds! {
    AccountRoot = "AccountRoot" => ACCOUNT_ROOT_FIELDS;
    /// Bilateral trust line between a low and a high account
    RippleState = "RippleState" => RIPPLE_STATE_FIELDS;
    Offer = "Offer" => OFFER_FIELDS;
    SignerList = "SignerList" => SIGNER_LIST_FIELDS;
    NFTokenOffer = "NFTokenOffer" => NFTOKEN_OFFER_FIELDS;
    URIToken = "URIToken" => URI_TOKEN_FIELDS;
    Check = "Check" => CHECK_FIELDS;
    Credential = "Credential" => CREDENTIAL_FIELDS;
    /// `DepositPreauth` ledger entry (distinct from the transaction)
    DepositPreauthEntry = "DepositPreauth" => DEPOSIT_PREAUTH_FIELDS;
    Ticket = "Ticket" => TICKET_FIELDS;
    /// Page of an owner, order-book or NFT-offer directory
    DirectoryNode = "DirectoryNode" => DIRECTORY_NODE_FIELDS;
}

impl LedgerObject {
    pub fn discriminator(&self) -> &str {
        self.entity().discriminator()
    }

    /// Ledger index (object id) of this entry
    pub fn index(&self) -> Result<Option<String>, FieldError> {
        self.entity().get_as("index")
    }
}

// =========================================================================
// Typed accessors
// =========================================================================

impl AccountRoot {
    pub fn balance(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Balance")
    }

    pub fn owner_count(&self) -> Result<Option<u32>, FieldError> {
        self.entity.get_as("OwnerCount")
    }

    pub fn domain(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Domain")
    }

    pub fn transfer_rate(&self) -> Result<Option<Decimal>, FieldError> {
        self.entity.get_as("TransferRate")
    }
}

impl RippleState {
    /// Shared balance, signed from the low account's side
    pub fn balance(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Balance")
    }

    pub fn high_limit(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("HighLimit")
    }

    pub fn low_limit(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("LowLimit")
    }
}

impl Offer {
    pub fn taker_gets(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("TakerGets")
    }

    pub fn taker_pays(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("TakerPays")
    }

    pub fn expiration(&self) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.entity.get_as("Expiration")
    }
}

impl SignerList {
    pub fn signer_quorum(&self) -> Result<Option<u32>, FieldError> {
        self.entity.get_as("SignerQuorum")
    }

    pub fn signer_entries(&self) -> Result<Vec<SignerEntry>, FieldError> {
        Ok(self.entity.get_as("SignerEntries")?.unwrap_or_default())
    }
}

impl NFTokenOffer {
    pub fn owner(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Owner")
    }

    pub fn amount(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("Amount")
    }

    pub fn is_sell_offer(&self) -> Result<bool, FieldError> {
        Ok(self.entity.flags()?.is_set("SellNFToken"))
    }
}

impl URIToken {
    pub fn owner(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Owner")
    }

    pub fn uri(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("URI")
    }
}

impl Check {
    /// `Destination` + `DestinationTag`
    pub fn destination(&self) -> Result<Option<AccountRef>, FieldError> {
        self.entity.composite("Destination", "DestinationTag")
    }

    pub fn send_max(&self) -> Result<Option<Amount>, FieldError> {
        self.entity.get_as("SendMax")
    }
}

impl Credential {
    pub fn credential_type(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("CredentialType")
    }

    pub fn is_accepted(&self) -> Result<bool, FieldError> {
        Ok(self.entity.flags()?.is_set("Accepted"))
    }
}

impl DepositPreauthEntry {
    pub fn authorize(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Authorize")
    }
}

impl Ticket {
    pub fn ticket_sequence(&self) -> Result<Option<u32>, FieldError> {
        self.entity.get_as("TicketSequence")
    }
}

impl DirectoryNode {
    pub fn root_index(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("RootIndex")
    }

    /// Object ids listed on this page
    pub fn indexes(&self) -> Result<Vec<String>, FieldError> {
        Ok(self.entity.get_as("Indexes")?.unwrap_or_default())
    }

    pub fn owner(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("Owner")
    }

    pub fn nftoken_id(&self) -> Result<Option<String>, FieldError> {
        self.entity.get_as("NFTokenID")
    }

    /// Whether this page lists NFT buy offers
    pub fn is_nftoken_buy_offers(&self) -> Result<bool, FieldError> {
        Ok(self.entity.flags()?.is_set("NFTokenBuyOffers"))
    }
}
