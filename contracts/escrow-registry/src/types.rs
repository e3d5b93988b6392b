use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{near, AccountId};

/// A custodied balance: either the native coin or a NEP-141 fungible token.
/// Amounts are principal only — upfront fees are taken before construction
/// and never recorded here.
#[near(serializers = [borsh])]
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Native { amount: u128 },
    Ft { token: AccountId, amount: u128 },
}

impl Asset {
    pub fn amount(&self) -> u128 {
        match self {
            Asset::Native { amount } | Asset::Ft { amount, .. } => *amount,
        }
    }

    /// A transfer leg moving `amount` of this asset class to `to`.
    pub fn leg_to(&self, to: &AccountId, amount: u128) -> TransferLeg {
        match self {
            Asset::Native { .. } => TransferLeg::Native {
                to: to.clone(),
                amount,
            },
            Asset::Ft { token, .. } => TransferLeg::Ft {
                token: token.clone(),
                to: to.clone(),
                amount,
            },
        }
    }
}

/// Escrow lifecycle. `Open` is initial; the two terminal states are mutually
/// exclusive and nothing transitions out of them.
#[near(serializers = [borsh, json])]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscrowState {
    Open,
    Released,
    Refunded,
}

/// A single unit of work for the asset-transfer collaborator. Legs are only
/// issued after every validation has passed and the record has reached its
/// terminal state.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferLeg {
    Native {
        to: AccountId,
        amount: u128,
    },
    Ft {
        token: AccountId,
        to: AccountId,
        amount: u128,
    },
}

impl TransferLeg {
    pub fn amount(&self) -> u128 {
        match self {
            TransferLeg::Native { amount, .. } | TransferLeg::Ft { amount, .. } => *amount,
        }
    }
}

/// The ordered transfer legs of a settlement, produced by the record's fee
/// arithmetic and executed by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementPlan {
    pub legs: Vec<TransferLeg>,
}

/// Read-only snapshot of the registry configuration a record needs to settle.
/// Keeps settlement arithmetic independent of the registry's storage layout.
#[derive(Debug, Clone)]
pub struct FeeView {
    pub commission_rate_percent: u8,
    pub processing_fee_percent: u8,
    pub commission_wallet: AccountId,
    pub commission_token_wallet: AccountId,
}

/// Capability token minted when a record is created and invalidated at
/// settlement. A record whose grant is gone can never settle again.
#[near(serializers = [borsh])]
#[derive(Debug, Clone)]
pub struct SettlementGrant {
    pub recipient: AccountId,
    pub index: u32,
    pub issued_at_ms: u64,
}

/// Returned by `deposit`: the new record's identity and its stable index in
/// the recipient's list.
#[near(serializers = [json])]
#[derive(Debug, Clone)]
pub struct DepositReceipt {
    pub record_id: u64,
    pub index: u32,
}

/// JSON-friendly projection of a stored asset.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct AssetView {
    /// `None` for the native coin.
    pub token: Option<AccountId>,
    pub amount: U128,
}

impl From<&Asset> for AssetView {
    fn from(asset: &Asset) -> Self {
        match asset {
            Asset::Native { amount } => AssetView {
                token: None,
                amount: U128(*amount),
            },
            Asset::Ft { token, amount } => AssetView {
                token: Some(token.clone()),
                amount: U128(*amount),
            },
        }
    }
}

/// JSON-friendly projection of an escrow record for view queries.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "near_sdk::serde")]
pub struct RecordView {
    pub record_id: u64,
    pub depositor: AccountId,
    pub recipient: AccountId,
    pub primary: AssetView,
    pub additional: Vec<AssetView>,
    pub created_at_ms: u64,
    pub state: EscrowState,
}
