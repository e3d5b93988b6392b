//! Registry-wide constants.

use near_sdk::{Gas, NearToken};

/// Basis points denominator (10,000 = 100%).
pub const BASIS_POINTS: u16 = 10_000;

/// Upper bound for the upfront dev fee taken at deposit time (500 = 5%).
pub const MAX_DEV_FEE_BPS: u16 = 500;

/// Ceiling for the release-time commission rate, in whole percent.
pub const MAX_COMMISSION_RATE_PERCENT: u8 = 15;

/// Ceiling for the refund-time processing fee, in whole percent.
pub const MAX_PROCESSING_FEE_PERCENT: u8 = 15;

/// Gas reserved for each outbound `ft_transfer` leg.
pub const GAS_FT_TRANSFER: Gas = Gas::from_tgas(30);

/// Gas reserved for the transfer-outcome callback on each token leg.
pub const GAS_RESOLVE_TRANSFER: Gas = Gas::from_tgas(10);

/// NEP-141 transfers require exactly 1 yoctoNEAR attached.
pub const ONE_YOCTO: NearToken = NearToken::from_yoctonear(1);
