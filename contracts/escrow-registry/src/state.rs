//! Registry storage: fee configuration, the recipient-indexed record lists,
//! settlement grants, the admin set, and token deposit credits.

use crate::constants::{MAX_COMMISSION_RATE_PERCENT, MAX_DEV_FEE_BPS, MAX_PROCESSING_FEE_PERCENT};
use crate::errors::EscrowError;
use crate::record::EscrowRecord;
use crate::types::{FeeView, SettlementGrant};
use near_sdk::store::{IterableSet, LookupMap, Vector};
use near_sdk::{env, near, AccountId, BorshStorageKey};

#[near]
#[derive(BorshStorageKey)]
pub enum StorageKey {
    Admins,
    SupportedTokens,
    CommissionOverrides,
    Records,
    RecordsInner { account_id_hash: Vec<u8> },
    LiveEscrows,
    Credits,
}

/// Hash an account ID for use in nested storage key prefixes.
pub(crate) fn hash_account_id(account_id: &AccountId) -> Vec<u8> {
    env::sha256(account_id.as_bytes())
}

#[near(serializers = [borsh])]
pub struct RegistryState {
    /// From Cargo.toml.
    pub version: String,
    /// Super-administrator: manages the admin set and fee wallets.
    pub owner: AccountId,
    pub admins: IterableSet<AccountId>,
    /// Destination for primary-asset fees (dev fee, commission, processing fee).
    pub commission_wallet: AccountId,
    /// Destination for additional-asset fees.
    pub commission_token_wallet: AccountId,
    /// Upfront fee taken at deposit time, in basis points.
    pub dev_fee_bps: u16,
    /// Fallback commission rate at release, whole percent.
    pub default_commission_rate: u8,
    /// Processing fee at refund, whole percent.
    pub default_processing_fee_percent: u8,
    /// Per-recipient commission override. Absent means "use the default";
    /// a stored zero is never kept (setting zero clears the entry), so a
    /// genuine zero-percent override is unrepresentable by convention.
    pub commission_overrides: LookupMap<AccountId, u8>,
    /// Fungible tokens eligible as a *primary* asset. Additional assets
    /// bypass this list.
    pub supported_tokens: IterableSet<AccountId>,
    /// Append-only record lists per recipient; indices are stable and never
    /// reused, even after a record settles.
    pub records: LookupMap<AccountId, Vector<EscrowRecord>>,
    /// Settlement capability per record id, minted at deposit and removed
    /// exactly once at settlement.
    pub live_escrows: LookupMap<u64, SettlementGrant>,
    /// Token balances credited via `ft_on_transfer`, keyed by
    /// (depositor, token), consumed by token deposit legs.
    pub credits: LookupMap<(AccountId, AccountId), u128>,
    pub next_record_id: u64,
    /// Bumped by every configuration update.
    pub config_version: u64,
}

impl RegistryState {
    pub fn new(
        owner: AccountId,
        commission_wallet: AccountId,
        commission_token_wallet: AccountId,
        dev_fee_bps: u16,
        default_commission_rate: u8,
        default_processing_fee_percent: u8,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            owner,
            admins: IterableSet::new(StorageKey::Admins),
            commission_wallet,
            commission_token_wallet,
            dev_fee_bps,
            default_commission_rate,
            default_processing_fee_percent,
            commission_overrides: LookupMap::new(StorageKey::CommissionOverrides),
            supported_tokens: IterableSet::new(StorageKey::SupportedTokens),
            records: LookupMap::new(StorageKey::Records),
            live_escrows: LookupMap::new(StorageKey::LiveEscrows),
            credits: LookupMap::new(StorageKey::Credits),
            next_record_id: 0,
            config_version: 0,
        }
    }

    // ── Roles ────────────────────────────────────────────────────────────────

    pub fn is_admin(&self, account_id: &AccountId) -> bool {
        self.owner == *account_id || self.admins.contains(account_id)
    }

    pub fn require_admin(&self) -> Result<AccountId, EscrowError> {
        let caller = env::predecessor_account_id();
        if !self.is_admin(&caller) {
            return Err(EscrowError::admin_only());
        }
        Ok(caller)
    }

    pub fn require_owner(&self) -> Result<AccountId, EscrowError> {
        let caller = env::predecessor_account_id();
        if caller != self.owner {
            return Err(EscrowError::owner_only());
        }
        Ok(caller)
    }

    // ── Fee configuration ────────────────────────────────────────────────────

    /// Override-aware commission rate for a recipient.
    pub fn commission_rate_for(&self, recipient: &AccountId) -> u8 {
        self.commission_overrides
            .get(recipient)
            .copied()
            .filter(|rate| *rate != 0)
            .unwrap_or(self.default_commission_rate)
    }

    /// Snapshot of the configuration a settlement needs.
    pub fn fee_view_for(&self, recipient: &AccountId) -> FeeView {
        FeeView {
            commission_rate_percent: self.commission_rate_for(recipient),
            processing_fee_percent: self.default_processing_fee_percent,
            commission_wallet: self.commission_wallet.clone(),
            commission_token_wallet: self.commission_token_wallet.clone(),
        }
    }

    pub fn bump_config_version(&mut self) -> u64 {
        self.config_version += 1;
        self.config_version
    }

    pub fn validate_rates(
        dev_fee_bps: u16,
        commission_rate: u8,
        processing_fee: u8,
    ) -> Result<(), EscrowError> {
        if dev_fee_bps > MAX_DEV_FEE_BPS {
            return Err(EscrowError::InvalidInput(format!(
                "Dev fee cannot exceed {} bps",
                MAX_DEV_FEE_BPS
            )));
        }
        if commission_rate > MAX_COMMISSION_RATE_PERCENT {
            return Err(EscrowError::InvalidInput(format!(
                "Commission rate cannot exceed {}%",
                MAX_COMMISSION_RATE_PERCENT
            )));
        }
        if processing_fee > MAX_PROCESSING_FEE_PERCENT {
            return Err(EscrowError::InvalidInput(format!(
                "Processing fee cannot exceed {}%",
                MAX_PROCESSING_FEE_PERCENT
            )));
        }
        Ok(())
    }

    // ── Record index ─────────────────────────────────────────────────────────

    pub fn record_count(&self, recipient: &AccountId) -> u32 {
        self.records.get(recipient).map_or(0, |list| list.len())
    }

    /// Append a record to the recipient's list, creating the list on first
    /// use, and return the new record's stable index.
    pub fn append_record(&mut self, recipient: &AccountId, record: EscrowRecord) -> u32 {
        if self.records.get(recipient).is_none() {
            self.records.insert(
                recipient.clone(),
                Vector::new(StorageKey::RecordsInner {
                    account_id_hash: hash_account_id(recipient),
                }),
            );
        }
        let list = self
            .records
            .get_mut(recipient)
            .expect("Record list should exist");
        let index = list.len();
        list.push(record);
        index
    }

    // ── Token deposit credits ────────────────────────────────────────────────

    pub fn credit_of(&self, account_id: &AccountId, token: &AccountId) -> u128 {
        self.credits
            .get(&(account_id.clone(), token.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn add_credit(&mut self, account_id: &AccountId, token: &AccountId, amount: u128) {
        let key = (account_id.clone(), token.clone());
        let balance = self.credits.get(&key).copied().unwrap_or(0);
        self.credits.insert(key, balance.saturating_add(amount));
    }

    /// Consume `amount` of credit, checking before deducting so a failed
    /// take leaves the balance untouched.
    pub fn take_credit(
        &mut self,
        account_id: &AccountId,
        token: &AccountId,
        amount: u128,
    ) -> Result<(), EscrowError> {
        let key = (account_id.clone(), token.clone());
        let balance = self.credits.get(&key).copied().unwrap_or(0);
        if balance < amount {
            return Err(EscrowError::TransferFailed(format!(
                "Insufficient {} credit: have {}, need {}",
                token, balance, amount
            )));
        }
        if balance == amount {
            self.credits.remove(&key);
        } else {
            self.credits.insert(key, balance - amount);
        }
        Ok(())
    }
}
