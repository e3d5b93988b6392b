//! Escrow registry: custodies third-party funds per deposit until an
//! administrator releases them to the recipient (minus commission) or
//! refunds them to the depositor (minus a processing fee).
//!
//! Records are stored values inside this contract; each one owns its own
//! custody bookkeeping and runs a strict Open → Released/Refunded state
//! machine. Token funds arrive via the NEP-141 `ft_transfer_call` receiver
//! and are held as withdrawable credit until a deposit consumes them.

use crate::errors::EscrowError;
use crate::state::RegistryState;
use crate::types::{DepositReceipt, RecordView};
use near_sdk::json_types::U128;
use near_sdk::{
    env, ext_contract, near, require, AccountId, PanicOnDefault, Promise, PromiseOrValue,
    PromiseResult,
};

mod admin;
pub mod constants;
mod errors;
mod escrow;
mod events;
mod record;
mod state;
pub mod types;

pub use constants::*;

#[ext_contract(ext_ft)]
pub trait FungibleToken {
    fn ft_transfer(&mut self, receiver_id: AccountId, amount: U128, memo: Option<String>);
}

#[ext_contract(ext_self)]
pub trait SelfCallback {
    fn resolve_ft_leg(&mut self, token: AccountId, receiver: AccountId, amount: U128);
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct EscrowRegistry {
    state: RegistryState,
}

#[near]
impl EscrowRegistry {
    #[init]
    pub fn new(
        owner: AccountId,
        commission_wallet: AccountId,
        commission_token_wallet: AccountId,
        dev_fee_bps: u16,
        default_commission_rate: u8,
        default_processing_fee_percent: u8,
    ) -> Self {
        require!(
            RegistryState::validate_rates(
                dev_fee_bps,
                default_commission_rate,
                default_processing_fee_percent
            )
            .is_ok(),
            "Initial rates out of bounds"
        );
        Self {
            state: RegistryState::new(
                owner,
                commission_wallet,
                commission_token_wallet,
                dev_fee_bps,
                default_commission_rate,
                default_processing_fee_percent,
            ),
        }
    }

    // ── Deposits ─────────────────────────────────────────────────────────────

    /// Open a new escrow for `recipient`. `primary_token` `None` means the
    /// native coin, funded by the attached deposit (principal + dev fee);
    /// token primaries and additional assets consume `ft_on_transfer` credit.
    /// Additional entries with a `None` token or zero amount are skipped.
    #[payable]
    #[handle_result]
    pub fn deposit(
        &mut self,
        recipient: AccountId,
        primary_token: Option<AccountId>,
        primary_amount: U128,
        additional_tokens: Vec<Option<AccountId>>,
        additional_amounts: Vec<U128>,
    ) -> Result<DepositReceipt, EscrowError> {
        escrow::deposit(
            &mut self.state,
            recipient,
            primary_token,
            primary_amount,
            additional_tokens,
            additional_amounts,
        )
    }

    /// NEP-141 receiver: credits the transferred amount to the sender's
    /// withdrawable deposit balance for the calling token contract.
    pub fn ft_on_transfer(
        &mut self,
        sender_id: AccountId,
        amount: U128,
        msg: String,
    ) -> PromiseOrValue<U128> {
        PromiseOrValue::Value(escrow::credit_token_deposit(
            &mut self.state,
            sender_id,
            amount,
            msg,
        ))
    }

    /// Outcome callback for an `ft_transfer` leg. Failed legs keep their
    /// amount as withdrawable credit for the intended receiver.
    #[private]
    pub fn resolve_ft_leg(&mut self, token: AccountId, receiver: AccountId, amount: U128) {
        let transferred = matches!(env::promise_result(0), PromiseResult::Successful(_));
        escrow::resolve_ft_leg(&mut self.state, token, receiver, amount, transferred);
    }

    #[handle_result]
    pub fn withdraw_credit(
        &mut self,
        token: AccountId,
        amount: U128,
    ) -> Result<Promise, EscrowError> {
        escrow::withdraw_credit(&mut self.state, token, amount)
    }

    // ── Settlement (administrator only) ──────────────────────────────────────

    #[handle_result]
    pub fn release_funds(&mut self, recipient: AccountId, index: u32) -> Result<(), EscrowError> {
        escrow::release_funds(&mut self.state, recipient, index)
    }

    #[handle_result]
    pub fn process_refund(&mut self, recipient: AccountId, index: u32) -> Result<(), EscrowError> {
        escrow::process_refund(&mut self.state, recipient, index)
    }

    // ── Configuration (administrator only) ───────────────────────────────────

    #[handle_result]
    pub fn update_dev_fee(&mut self, dev_fee_bps: u16) -> Result<(), EscrowError> {
        admin::update_dev_fee(&mut self.state, dev_fee_bps)
    }

    #[handle_result]
    pub fn set_default_commission_rate(&mut self, percent: u8) -> Result<(), EscrowError> {
        admin::set_default_commission_rate(&mut self.state, percent)
    }

    #[handle_result]
    pub fn set_default_processing_fee_percent(&mut self, percent: u8) -> Result<(), EscrowError> {
        admin::set_default_processing_fee_percent(&mut self.state, percent)
    }

    #[handle_result]
    pub fn update_recipient_commission_rate(
        &mut self,
        recipient: AccountId,
        percent: u8,
    ) -> Result<(), EscrowError> {
        admin::update_recipient_commission_rate(&mut self.state, recipient, percent)
    }

    #[handle_result]
    pub fn add_supported_token(&mut self, token: AccountId) -> Result<(), EscrowError> {
        admin::add_supported_token(&mut self.state, token)
    }

    #[handle_result]
    pub fn remove_supported_token(&mut self, token: AccountId) -> Result<(), EscrowError> {
        admin::remove_supported_token(&mut self.state, token)
    }

    // ── Ownership (owner only) ───────────────────────────────────────────────

    #[handle_result]
    pub fn set_fee_wallets(
        &mut self,
        commission_wallet: AccountId,
        commission_token_wallet: AccountId,
    ) -> Result<(), EscrowError> {
        admin::set_fee_wallets(&mut self.state, commission_wallet, commission_token_wallet)
    }

    #[handle_result]
    pub fn grant_admin(&mut self, account_id: AccountId) -> Result<(), EscrowError> {
        admin::grant_admin(&mut self.state, account_id)
    }

    #[handle_result]
    pub fn revoke_admin(&mut self, account_id: AccountId) -> Result<(), EscrowError> {
        admin::revoke_admin(&mut self.state, account_id)
    }

    // ── Views ────────────────────────────────────────────────────────────────

    pub fn get_record(&self, recipient: AccountId, index: u32) -> Option<RecordView> {
        self.state
            .records
            .get(&recipient)
            .and_then(|list| list.get(index))
            .map(|record| record.to_view())
    }

    pub fn get_recipient_record_count(&self, recipient: AccountId) -> u32 {
        self.state.record_count(&recipient)
    }

    pub fn get_default_commission_rate(&self) -> u8 {
        self.state.default_commission_rate
    }

    pub fn get_default_processing_fee_percent(&self) -> u8 {
        self.state.default_processing_fee_percent
    }

    /// Override-aware commission rate that a release for `recipient` would
    /// use right now.
    pub fn get_commission_rate(&self, recipient: AccountId) -> u8 {
        self.state.commission_rate_for(&recipient)
    }

    pub fn get_dev_fee_bps(&self) -> u16 {
        self.state.dev_fee_bps
    }

    pub fn get_supported_tokens(&self) -> Vec<AccountId> {
        self.state.supported_tokens.iter().cloned().collect()
    }

    pub fn is_admin(&self, account_id: AccountId) -> bool {
        self.state.is_admin(&account_id)
    }

    pub fn get_credit(&self, account_id: AccountId, token: AccountId) -> U128 {
        U128(self.state.credit_of(&account_id, &token))
    }

    pub fn get_config_version(&self) -> u64 {
        self.state.config_version
    }

    pub fn get_fee_wallets(&self) -> (AccountId, AccountId) {
        (
            self.state.commission_wallet.clone(),
            self.state.commission_token_wallet.clone(),
        )
    }

    pub fn get_owner(&self) -> AccountId {
        self.state.owner.clone()
    }

    pub fn get_version(&self) -> String {
        self.state.version.clone()
    }
}
