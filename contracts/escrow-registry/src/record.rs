//! The per-deposit custody record: lifecycle state machine and the fee
//! arithmetic that turns a settlement into an ordered list of transfer legs.

use crate::errors::EscrowError;
use crate::types::{Asset, EscrowState, FeeView, RecordView, SettlementPlan, TransferLeg};
use near_sdk::{near, AccountId};

#[near(serializers = [borsh])]
#[derive(Debug, Clone)]
pub struct EscrowRecord {
    pub id: u64,
    pub depositor: AccountId,
    pub recipient: AccountId,
    pub primary: Asset,
    /// Distinct fungible-token balances bundled with the deposit. Order is
    /// insertion order and only matters for settlement iteration.
    pub additional: Vec<Asset>,
    pub created_at_ms: u64,
    pub state: EscrowState,
}

impl EscrowRecord {
    pub fn new(
        id: u64,
        depositor: AccountId,
        recipient: AccountId,
        primary: Asset,
        additional: Vec<Asset>,
        created_at_ms: u64,
    ) -> Self {
        Self {
            id,
            depositor,
            recipient,
            primary,
            additional,
            created_at_ms,
            state: EscrowState::Open,
        }
    }

    /// Release the full custody to the recipient minus the commission.
    ///
    /// The state flips to `Released` before any leg exists, so a re-entrant
    /// call during a transfer observes the terminal state and is rejected.
    pub fn release(&mut self, fees: &FeeView) -> Result<SettlementPlan, EscrowError> {
        self.guard_open()?;
        self.state = EscrowState::Released;

        let beneficiary = self.recipient.clone();
        self.settle_asset_split(fees, fees.commission_rate_percent, &beneficiary)
    }

    /// Return the full custody to the depositor minus the processing fee.
    pub fn refund(&mut self, fees: &FeeView) -> Result<SettlementPlan, EscrowError> {
        self.guard_open()?;
        self.state = EscrowState::Refunded;

        let beneficiary = self.depositor.clone();
        self.settle_asset_split(fees, fees.processing_fee_percent, &beneficiary)
    }

    fn guard_open(&self) -> Result<(), EscrowError> {
        if self.state != EscrowState::Open {
            return Err(EscrowError::already_settled());
        }
        Ok(())
    }

    /// Split every asset into a beneficiary leg and a fee leg, primary first,
    /// then each additional asset in insertion order. Primary-asset fees go
    /// to the commission wallet, additional-asset fees to the token
    /// commission wallet. `payout + fee == amount` holds per asset.
    fn settle_asset_split(
        &self,
        fees: &FeeView,
        rate_percent: u8,
        beneficiary: &AccountId,
    ) -> Result<SettlementPlan, EscrowError> {
        let mut legs = Vec::new();

        let primary_fee = percentage_of(self.primary.amount(), rate_percent)?;
        push_split(
            &mut legs,
            &self.primary,
            beneficiary,
            &fees.commission_wallet,
            primary_fee,
        );

        for asset in &self.additional {
            let fee = percentage_of(asset.amount(), rate_percent)?;
            push_split(
                &mut legs,
                asset,
                beneficiary,
                &fees.commission_token_wallet,
                fee,
            );
        }
        Ok(SettlementPlan { legs })
    }

    pub fn to_view(&self) -> RecordView {
        RecordView {
            record_id: self.id,
            depositor: self.depositor.clone(),
            recipient: self.recipient.clone(),
            primary: (&self.primary).into(),
            additional: self.additional.iter().map(Into::into).collect(),
            created_at_ms: self.created_at_ms,
            state: self.state,
        }
    }
}

fn push_split(
    legs: &mut Vec<TransferLeg>,
    asset: &Asset,
    beneficiary: &AccountId,
    fee_wallet: &AccountId,
    fee: u128,
) {
    let payout = asset.amount() - fee;
    if payout > 0 {
        legs.push(asset.leg_to(beneficiary, payout));
    }
    if fee > 0 {
        legs.push(asset.leg_to(fee_wallet, fee));
    }
}

/// `amount * percent / 100`, overflow-checked. Whole-percent rates only;
/// both commission and processing fees use this divisor.
pub fn percentage_of(amount: u128, percent: u8) -> Result<u128, EscrowError> {
    amount
        .checked_mul(percent as u128)
        .map(|v| v / 100)
        .ok_or_else(EscrowError::amount_overflow)
}

/// `amount * bps / 10,000`, overflow-checked.
pub fn basis_points_of(amount: u128, bps: u16) -> Result<u128, EscrowError> {
    amount
        .checked_mul(bps as u128)
        .map(|v| v / crate::constants::BASIS_POINTS as u128)
        .ok_or_else(EscrowError::amount_overflow)
}
