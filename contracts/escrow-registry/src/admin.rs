//! Administrator-gated configuration and the owner-gated admin set.
//! Every successful update bumps `config_version` and emits its event.

use crate::constants::{MAX_COMMISSION_RATE_PERCENT, MAX_DEV_FEE_BPS, MAX_PROCESSING_FEE_PERCENT};
use crate::errors::EscrowError;
use crate::events::EscrowEvent;
use crate::state::RegistryState;
use near_sdk::AccountId;

pub fn update_dev_fee(state: &mut RegistryState, dev_fee_bps: u16) -> Result<(), EscrowError> {
    state.require_admin()?;
    if dev_fee_bps > MAX_DEV_FEE_BPS {
        return Err(EscrowError::InvalidInput(format!(
            "Dev fee cannot exceed {} bps",
            MAX_DEV_FEE_BPS
        )));
    }
    state.dev_fee_bps = dev_fee_bps;
    let config_version = state.bump_config_version();
    EscrowEvent::DevFeeUpdated {
        dev_fee_bps,
        config_version,
    }
    .emit();
    Ok(())
}

pub fn set_default_commission_rate(
    state: &mut RegistryState,
    percent: u8,
) -> Result<(), EscrowError> {
    state.require_admin()?;
    if percent > MAX_COMMISSION_RATE_PERCENT {
        return Err(EscrowError::InvalidInput(format!(
            "Commission rate cannot exceed {}%",
            MAX_COMMISSION_RATE_PERCENT
        )));
    }
    state.default_commission_rate = percent;
    let config_version = state.bump_config_version();
    EscrowEvent::DefaultCommissionRateUpdated {
        percent,
        config_version,
    }
    .emit();
    Ok(())
}

pub fn set_default_processing_fee_percent(
    state: &mut RegistryState,
    percent: u8,
) -> Result<(), EscrowError> {
    state.require_admin()?;
    if percent > MAX_PROCESSING_FEE_PERCENT {
        return Err(EscrowError::InvalidInput(format!(
            "Processing fee cannot exceed {}%",
            MAX_PROCESSING_FEE_PERCENT
        )));
    }
    state.default_processing_fee_percent = percent;
    let config_version = state.bump_config_version();
    EscrowEvent::DefaultProcessingFeeUpdated {
        percent,
        config_version,
    }
    .emit();
    Ok(())
}

/// Zero clears the override and falls back to the default rate. A genuine
/// zero-percent override is unrepresentable by this convention.
pub fn update_recipient_commission_rate(
    state: &mut RegistryState,
    recipient: AccountId,
    percent: u8,
) -> Result<(), EscrowError> {
    state.require_admin()?;
    if percent > MAX_COMMISSION_RATE_PERCENT {
        return Err(EscrowError::InvalidInput(format!(
            "Commission rate cannot exceed {}%",
            MAX_COMMISSION_RATE_PERCENT
        )));
    }
    if percent == 0 {
        state.commission_overrides.remove(&recipient);
    } else {
        state.commission_overrides.insert(recipient.clone(), percent);
    }
    let config_version = state.bump_config_version();
    EscrowEvent::RecipientCommissionUpdated {
        recipient,
        percent,
        config_version,
    }
    .emit();
    Ok(())
}

pub fn set_fee_wallets(
    state: &mut RegistryState,
    commission_wallet: AccountId,
    commission_token_wallet: AccountId,
) -> Result<(), EscrowError> {
    state.require_owner()?;
    state.commission_wallet = commission_wallet.clone();
    state.commission_token_wallet = commission_token_wallet.clone();
    let config_version = state.bump_config_version();
    EscrowEvent::FeeWalletsUpdated {
        commission_wallet,
        commission_token_wallet,
        config_version,
    }
    .emit();
    Ok(())
}

pub fn add_supported_token(state: &mut RegistryState, token: AccountId) -> Result<(), EscrowError> {
    state.require_admin()?;
    if !state.supported_tokens.insert(token.clone()) {
        return Err(EscrowError::InvalidInput(format!(
            "Token {} is already supported",
            token
        )));
    }
    EscrowEvent::TokenAdded { token }.emit();
    Ok(())
}

pub fn remove_supported_token(
    state: &mut RegistryState,
    token: AccountId,
) -> Result<(), EscrowError> {
    state.require_admin()?;
    if !state.supported_tokens.remove(&token) {
        return Err(EscrowError::NotFound(format!(
            "Token {} is not supported",
            token
        )));
    }
    EscrowEvent::TokenRemoved { token }.emit();
    Ok(())
}

pub fn grant_admin(state: &mut RegistryState, account_id: AccountId) -> Result<(), EscrowError> {
    state.require_owner()?;
    if account_id == state.owner || !state.admins.insert(account_id.clone()) {
        return Err(EscrowError::InvalidInput(format!(
            "{} is already an administrator",
            account_id
        )));
    }
    EscrowEvent::AdminGranted { account_id }.emit();
    Ok(())
}

pub fn revoke_admin(state: &mut RegistryState, account_id: AccountId) -> Result<(), EscrowError> {
    state.require_owner()?;
    if !state.admins.remove(&account_id) {
        return Err(EscrowError::NotFound(format!(
            "{} is not an administrator",
            account_id
        )));
    }
    EscrowEvent::AdminRevoked { account_id }.emit();
    Ok(())
}
