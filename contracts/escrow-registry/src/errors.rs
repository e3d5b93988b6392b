//! Typed error handling for the escrow registry.
//!
//! Uses `#[derive(near_sdk::FunctionError)]` so that `#[handle_result]`
//! methods returning `Err(EscrowError::Xxx)` panic with the Display
//! message — same on-wire behaviour as raw panics, but with structured,
//! testable variants.

use near_sdk_macros::NearSchema;

#[derive(NearSchema, near_sdk::FunctionError)]
#[abi(borsh, json)]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum EscrowError {
    /// Caller lacks the required role (administrator or owner).
    Unauthorized(String),
    /// Invalid parameters: zero amounts, mismatched arrays, bad rates,
    /// unsupported tokens, out-of-range indices.
    InvalidInput(String),
    /// Requested record, token, or admin entry does not exist.
    NotFound(String),
    /// Operation invalid for the record's lifecycle state.
    InvalidState(String),
    /// Attached native deposit does not cover the required amount.
    InsufficientDeposit(String),
    /// An asset-transfer leg cannot be funded.
    TransferFailed(String),
}

impl std::fmt::Display for EscrowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Self::InsufficientDeposit(msg) => write!(f, "Insufficient deposit: {}", msg),
            Self::TransferFailed(msg) => write!(f, "Transfer failed: {}", msg),
        }
    }
}

// ── Factory helpers for common errors ────────────────────────────────────────

impl EscrowError {
    pub fn admin_only() -> Self {
        Self::Unauthorized("Only an administrator can perform this action".into())
    }
    pub fn owner_only() -> Self {
        Self::Unauthorized("Only the owner can perform this action".into())
    }
    pub fn already_settled() -> Self {
        Self::InvalidState("Escrow already released or refunded".into())
    }
    pub fn amount_overflow() -> Self {
        Self::InvalidInput("Amount arithmetic overflow".into())
    }
}
