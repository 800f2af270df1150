//! Flag Tables
//!
//! Bit constants for every flagged transaction and ledger entry kind.
//! These are wire-protocol values: copy them, never derive them.

use std::collections::HashMap;
use std::sync::LazyLock;

/// One named bit (or bit group) inside a 32-bit `Flags` field.
pub type FlagBit = (&'static str, u32);

/// Applies to every transaction kind that has a registered table.
pub const UNIVERSAL: &[FlagBit] = &[("FullyCanonicalSig", 0x8000_0000)];

// =========================================================================
// Ledger entries
// =========================================================================

pub const ACCOUNT_ROOT: &[FlagBit] = &[
    ("PasswordSpent", 0x0001_0000),
    ("RequireDestTag", 0x0002_0000),
    ("RequireAuth", 0x0004_0000),
    ("DisallowXRP", 0x0008_0000),
    ("DisableMaster", 0x0010_0000),
    ("NoFreeze", 0x0020_0000),
    ("GlobalFreeze", 0x0040_0000),
    ("DefaultRipple", 0x0080_0000),
    ("DepositAuth", 0x0100_0000),
    ("AMM", 0x0200_0000),
    ("DisallowIncomingNFTokenOffer", 0x0400_0000),
    ("DisallowIncomingCheck", 0x0800_0000),
    ("DisallowIncomingPayChan", 0x1000_0000),
    ("DisallowIncomingTrustline", 0x2000_0000),
    ("AllowTrustLineClawback", 0x8000_0000),
];

pub const RIPPLE_STATE: &[FlagBit] = &[
    ("LowReserve", 0x0001_0000),
    ("HighReserve", 0x0002_0000),
    ("LowAuth", 0x0004_0000),
    ("HighAuth", 0x0008_0000),
    ("LowNoRipple", 0x0010_0000),
    ("HighNoRipple", 0x0020_0000),
    ("LowFreeze", 0x0040_0000),
    ("HighFreeze", 0x0080_0000),
    ("AMMNode", 0x0100_0000),
    ("LowDeepFreeze", 0x0200_0000),
    ("HighDeepFreeze", 0x0400_0000),
];

pub const SIGNER_LIST: &[FlagBit] = &[("OneOwnerCount", 0x0001_0000)];

pub const NFTOKEN_OFFER: &[FlagBit] = &[("SellNFToken", 0x0000_0001)];

pub const OFFER: &[FlagBit] = &[
    ("Passive", 0x0001_0000),
    ("Sell", 0x0002_0000),
    ("Hybrid", 0x0004_0000),
];

pub const URI_TOKEN: &[FlagBit] = &[("Burnable", 0x0000_0001)];

pub const DIRECTORY_NODE: &[FlagBit] = &[
    ("NFTokenBuyOffers", 0x0000_0001),
    ("NFTokenSellOffers", 0x0000_0002),
];

pub const CREDENTIAL: &[FlagBit] = &[("Accepted", 0x0001_0000)];

// =========================================================================
// Transactions (universal bits are appended at registration)
// =========================================================================

pub const PAYMENT: &[FlagBit] = &[
    ("NoRippleDirect", 0x0001_0000),
    ("PartialPayment", 0x0002_0000),
    ("LimitQuality", 0x0004_0000),
];

pub const TRUST_SET: &[FlagBit] = &[
    ("SetfAuth", 0x0001_0000),
    ("SetNoRipple", 0x0002_0000),
    ("ClearNoRipple", 0x0004_0000),
    ("SetFreeze", 0x0010_0000),
    ("ClearFreeze", 0x0020_0000),
    ("SetDeepFreeze", 0x0040_0000),
    ("ClearDeepFreeze", 0x0080_0000),
];

pub const ACCOUNT_SET: &[FlagBit] = &[
    ("RequireDestTag", 0x0001_0000),
    ("OptionalDestTag", 0x0002_0000),
    ("RequireAuth", 0x0004_0000),
    ("OptionalAuth", 0x0008_0000),
    ("DisallowXRP", 0x0010_0000),
    ("AllowXRP", 0x0020_0000),
];

pub const OFFER_CREATE: &[FlagBit] = &[
    ("Passive", 0x0001_0000),
    ("ImmediateOrCancel", 0x0002_0000),
    ("FillOrKill", 0x0004_0000),
    ("Sell", 0x0008_0000),
];

pub const NFTOKEN_MINT: &[FlagBit] = &[
    ("Burnable", 0x0000_0001),
    ("OnlyXRP", 0x0000_0002),
    ("TrustLine", 0x0000_0004),
    ("Transferable", 0x0000_0008),
    ("Mutable", 0x0000_0010),
];

pub const NFTOKEN_CREATE_OFFER: &[FlagBit] = &[("SellNFToken", 0x0000_0001)];

pub const PAYMENT_CHANNEL_CLAIM: &[FlagBit] = &[
    ("Renew", 0x0001_0000),
    ("Close", 0x0002_0000),
];

pub const URI_TOKEN_MINT: &[FlagBit] = &[("Burnable", 0x0000_0001)];

// =========================================================================
// Index-valued flags (`SetFlag` / `ClearFlag`)
// =========================================================================

pub const ACCOUNT_SET_FLAG: &[FlagBit] = &[
    ("asfRequireDest", 1),
    ("asfRequireAuth", 2),
    ("asfDisallowXRP", 3),
    ("asfDisableMaster", 4),
    ("asfAccountTxnID", 5),
    ("asfNoFreeze", 6),
    ("asfGlobalFreeze", 7),
    ("asfDefaultRipple", 8),
    ("asfDepositAuth", 9),
    ("asfAuthorizedNFTokenMinter", 10),
    ("asfDisallowIncomingNFTokenOffer", 12),
    ("asfDisallowIncomingCheck", 13),
    ("asfDisallowIncomingPayChan", 14),
    ("asfDisallowIncomingTrustline", 15),
    ("asfAllowTrustLineClawback", 16),
];

/// Index table for a transaction kind whose flags travel as an index.
pub(crate) fn index_table(discriminator: &str) -> Option<&'static [FlagBit]> {
    match discriminator {
        "AccountSet" => Some(ACCOUNT_SET_FLAG),
        _ => None,
    }
}

const NONE: &[FlagBit] = &[];

/// Transaction kinds whose only flags are the universal ones.
const UNIVERSAL_ONLY: &[&str] = &[
    "AccountDelete",
    "CheckCancel",
    "CheckCash",
    "CheckCreate",
    "CredentialCreate",
    "DelegateSet",
    "DepositPreauth",
    "EscrowCreate",
    "NFTokenAcceptOffer",
    "OfferCancel",
    "PaymentChannelCreate",
    "SetRegularKey",
    "SignerListSet",
];

pub(crate) static LEDGER_ENTRY_TABLES: LazyLock<HashMap<&'static str, &'static [FlagBit]>> =
    LazyLock::new(|| {
        HashMap::from([
            ("AccountRoot", ACCOUNT_ROOT),
            ("RippleState", RIPPLE_STATE),
            ("SignerList", SIGNER_LIST),
            ("NFTokenOffer", NFTOKEN_OFFER),
            ("Offer", OFFER),
            ("URIToken", URI_TOKEN),
            ("DirectoryNode", DIRECTORY_NODE),
            ("Credential", CREDENTIAL),
        ])
    });

pub(crate) static TRANSACTION_TABLES: LazyLock<HashMap<&'static str, Vec<FlagBit>>> =
    LazyLock::new(|| {
        let specific: [(&'static str, &'static [FlagBit]); 8] = [
            ("Payment", PAYMENT),
            ("TrustSet", TRUST_SET),
            ("AccountSet", ACCOUNT_SET),
            ("OfferCreate", OFFER_CREATE),
            ("NFTokenMint", NFTOKEN_MINT),
            ("NFTokenCreateOffer", NFTOKEN_CREATE_OFFER),
            ("PaymentChannelClaim", PAYMENT_CHANNEL_CLAIM),
            ("URITokenMint", URI_TOKEN_MINT),
        ];

        specific
            .into_iter()
            .chain(UNIVERSAL_ONLY.iter().map(|kind| (*kind, NONE)))
            .map(|(kind, bits)| (kind, bits.iter().chain(UNIVERSAL).copied().collect()))
            .collect()
    });
