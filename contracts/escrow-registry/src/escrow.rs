//! Deposit, release, and refund flows.
//!
//! Every flow validates and mutates bookkeeping first, then issues transfer
//! legs as promises last. A returned `Err` panics via `#[handle_result]` and
//! the runtime rolls back the whole receipt, so no partial effect survives a
//! failed leg of the intake.

use crate::constants::{GAS_FT_TRANSFER, GAS_RESOLVE_TRANSFER, ONE_YOCTO};
use crate::errors::EscrowError;
use crate::events::EscrowEvent;
use crate::{ext_ft, ext_self};
use crate::record::{basis_points_of, EscrowRecord};
use crate::state::RegistryState;
use crate::types::{Asset, DepositReceipt, SettlementGrant, TransferLeg};
use near_sdk::json_types::U128;
use near_sdk::{env, log, AccountId, NearToken, Promise};

pub fn deposit(
    state: &mut RegistryState,
    recipient: AccountId,
    primary_token: Option<AccountId>,
    primary_amount: U128,
    additional_tokens: Vec<Option<AccountId>>,
    additional_amounts: Vec<U128>,
) -> Result<DepositReceipt, EscrowError> {
    let depositor = env::predecessor_account_id();

    if additional_tokens.len() != additional_amounts.len() {
        return Err(EscrowError::InvalidInput(format!(
            "Additional asset arrays differ in length: {} tokens, {} amounts",
            additional_tokens.len(),
            additional_amounts.len()
        )));
    }
    if primary_amount.0 == 0 {
        return Err(EscrowError::InvalidInput(
            "Primary amount must be positive".into(),
        ));
    }
    if let Some(token) = &primary_token {
        if !state.supported_tokens.contains(token) {
            return Err(EscrowError::InvalidInput(format!(
                "Token {} is not supported as a primary asset",
                token
            )));
        }
    }

    let service_fee = basis_points_of(primary_amount.0, state.dev_fee_bps)?;
    let funded = primary_amount
        .0
        .checked_add(service_fee)
        .ok_or_else(EscrowError::amount_overflow)?;
    let commission_wallet = state.commission_wallet.clone();
    let commission_token_wallet = state.commission_token_wallet.clone();
    let attached = env::attached_deposit().as_yoctonear();

    let mut legs: Vec<TransferLeg> = Vec::new();

    let primary = match &primary_token {
        None => {
            // The dev fee rides on top of the principal: the attached value
            // must fund both, and the record keeps the full principal.
            if attached != funded {
                return Err(EscrowError::InsufficientDeposit(format!(
                    "Native deposit requires {} attached (principal {} + service fee {}), got {}",
                    funded, primary_amount.0, service_fee, attached
                )));
            }
            if service_fee > 0 {
                legs.push(TransferLeg::Native {
                    to: commission_wallet.clone(),
                    amount: service_fee,
                });
            }
            Asset::Native {
                amount: primary_amount.0,
            }
        }
        Some(token) => {
            if attached != 0 {
                return Err(EscrowError::InvalidInput(
                    "Attached deposit is only valid for native deposits".into(),
                ));
            }
            state.take_credit(&depositor, token, funded)?;
            if service_fee > 0 {
                legs.push(TransferLeg::Ft {
                    token: token.clone(),
                    to: commission_wallet.clone(),
                    amount: service_fee,
                });
            }
            Asset::Ft {
                token: token.clone(),
                amount: primary_amount.0,
            }
        }
    };

    // Additional legs are net of fee: the fee comes out of the entry's
    // amount and only the remainder enters custody.
    let mut additional: Vec<Asset> = Vec::new();
    for (entry, amount) in additional_tokens.into_iter().zip(additional_amounts) {
        let token = match entry {
            Some(token) if amount.0 > 0 => token,
            // Empty or zero entries are a silent skip, not an error.
            _ => continue,
        };
        let fee = basis_points_of(amount.0, state.dev_fee_bps)?;
        state.take_credit(&depositor, &token, amount.0)?;
        if fee > 0 {
            legs.push(TransferLeg::Ft {
                token: token.clone(),
                to: commission_token_wallet.clone(),
                amount: fee,
            });
        }
        additional.push(Asset::Ft {
            token,
            amount: amount.0 - fee,
        });
    }

    let record_id = state.next_record_id;
    state.next_record_id += 1;
    let additional_count = additional.len() as u32;

    let record = EscrowRecord::new(
        record_id,
        depositor.clone(),
        recipient.clone(),
        primary,
        additional,
        env::block_timestamp_ms(),
    );
    let index = state.append_record(&recipient, record);
    state.live_escrows.insert(
        record_id,
        SettlementGrant {
            recipient: recipient.clone(),
            index,
            issued_at_ms: env::block_timestamp_ms(),
        },
    );

    execute_legs(legs);

    EscrowEvent::EscrowCreated {
        record_id,
        depositor,
        recipient,
        index,
        primary_amount,
        service_fee: U128(service_fee),
        additional_count,
    }
    .emit();

    Ok(DepositReceipt { record_id, index })
}

enum SettleKind {
    Release,
    Refund,
}

pub fn release_funds(
    state: &mut RegistryState,
    recipient: AccountId,
    index: u32,
) -> Result<(), EscrowError> {
    settle(state, recipient, index, SettleKind::Release)
}

pub fn process_refund(
    state: &mut RegistryState,
    recipient: AccountId,
    index: u32,
) -> Result<(), EscrowError> {
    settle(state, recipient, index, SettleKind::Refund)
}

fn settle(
    state: &mut RegistryState,
    recipient: AccountId,
    index: u32,
    kind: SettleKind,
) -> Result<(), EscrowError> {
    state.require_admin()?;
    let fees = state.fee_view_for(&recipient);

    let records = state
        .records
        .get_mut(&recipient)
        .ok_or_else(|| EscrowError::NotFound(format!("No records for recipient {}", recipient)))?;
    let total = records.len();
    let record = records.get_mut(index).ok_or_else(|| {
        EscrowError::InvalidInput(format!(
            "Index {} out of bounds for {} record(s)",
            index, total
        ))
    })?;

    // The record flips to its terminal state inside release/refund, before
    // any transfer leg is issued.
    let plan = match kind {
        SettleKind::Release => record.release(&fees)?,
        SettleKind::Refund => record.refund(&fees)?,
    };
    let record_id = record.id;
    let depositor = record.depositor.clone();

    // Invalidate the settlement grant; a record settles at most once and can
    // never re-trigger registry bookkeeping afterwards.
    if state.live_escrows.remove(&record_id).is_none() {
        return Err(EscrowError::InvalidState(
            "Settlement grant already revoked".into(),
        ));
    }

    execute_legs(plan.legs);

    match kind {
        SettleKind::Release => EscrowEvent::FundsReleased {
            record_id,
            recipient,
            index,
            commission_rate: fees.commission_rate_percent,
        }
        .emit(),
        SettleKind::Refund => EscrowEvent::RefundProcessed {
            record_id,
            depositor,
            recipient,
            index,
            processing_fee_percent: fees.processing_fee_percent,
        }
        .emit(),
    }
    Ok(())
}

/// Credit an incoming NEP-141 transfer to the sender's deposit balance.
/// The token contract is the predecessor by NEP-141 convention.
pub fn credit_token_deposit(
    state: &mut RegistryState,
    sender_id: AccountId,
    amount: U128,
    msg: String,
) -> U128 {
    let token = env::predecessor_account_id();
    state.add_credit(&sender_id, &token, amount.0);
    log!(
        "Credited {} of {} to {} (msg: {:?})",
        amount.0,
        token,
        sender_id,
        msg
    );
    EscrowEvent::CreditDeposited {
        account_id: sender_id,
        token,
        amount,
    }
    .emit();
    // Nothing to refund: the full amount is credited.
    U128(0)
}

/// Return unused token credit to the caller.
pub fn withdraw_credit(
    state: &mut RegistryState,
    token: AccountId,
    amount: U128,
) -> Result<Promise, EscrowError> {
    if amount.0 == 0 {
        return Err(EscrowError::InvalidInput(
            "Withdraw amount must be positive".into(),
        ));
    }
    let caller = env::predecessor_account_id();
    state.take_credit(&caller, &token, amount.0)?;

    EscrowEvent::CreditWithdrawn {
        account_id: caller.clone(),
        token: token.clone(),
        amount,
    }
    .emit();

    Ok(ft_transfer_with_resolve(token, caller, amount.0))
}

/// Settle the outcome of an `ft_transfer` leg. A failed leg keeps its
/// amount in the registry as withdrawable credit for the intended
/// receiver, so settled records never strand tokens.
pub fn resolve_ft_leg(
    state: &mut RegistryState,
    token: AccountId,
    receiver: AccountId,
    amount: U128,
    transferred: bool,
) {
    if transferred {
        return;
    }
    state.add_credit(&receiver, &token, amount.0);
    log!(
        "ft_transfer of {} {} to {} failed; retained as withdrawable credit",
        amount.0,
        token,
        receiver
    );
    EscrowEvent::FtTransferRetained {
        receiver,
        token,
        amount,
    }
    .emit();
}

/// Hand the legs to the asset-transfer collaborator: native legs as direct
/// balance transfers, token legs as `ft_transfer` calls with an outcome
/// callback.
fn execute_legs(legs: Vec<TransferLeg>) {
    for leg in legs {
        match leg {
            TransferLeg::Native { to, amount } => {
                Promise::new(to).transfer(NearToken::from_yoctonear(amount));
            }
            TransferLeg::Ft { token, to, amount } => {
                ft_transfer_with_resolve(token, to, amount);
            }
        }
    }
}

fn ft_transfer_with_resolve(token: AccountId, receiver: AccountId, amount: u128) -> Promise {
    ext_ft::ext(token.clone())
        .with_attached_deposit(ONE_YOCTO)
        .with_static_gas(GAS_FT_TRANSFER)
        .ft_transfer(receiver.clone(), U128(amount), None)
        .then(
            ext_self::ext(env::current_account_id())
                .with_static_gas(GAS_RESOLVE_TRANSFER)
                .resolve_ft_leg(token, receiver, U128(amount)),
        )
}
