use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

#[near(event_json(standard = "nep297"))]
pub enum EscrowEvent {
    #[event_version("1.0.0")]
    EscrowCreated {
        record_id: u64,
        depositor: AccountId,
        recipient: AccountId,
        index: u32,
        primary_amount: U128,
        service_fee: U128,
        additional_count: u32,
    },
    #[event_version("1.0.0")]
    FundsReleased {
        record_id: u64,
        recipient: AccountId,
        index: u32,
        commission_rate: u8,
    },
    #[event_version("1.0.0")]
    RefundProcessed {
        record_id: u64,
        depositor: AccountId,
        recipient: AccountId,
        index: u32,
        processing_fee_percent: u8,
    },
    #[event_version("1.0.0")]
    DevFeeUpdated { dev_fee_bps: u16, config_version: u64 },
    #[event_version("1.0.0")]
    DefaultCommissionRateUpdated { percent: u8, config_version: u64 },
    #[event_version("1.0.0")]
    DefaultProcessingFeeUpdated { percent: u8, config_version: u64 },
    #[event_version("1.0.0")]
    RecipientCommissionUpdated {
        recipient: AccountId,
        percent: u8,
        config_version: u64,
    },
    #[event_version("1.0.0")]
    FeeWalletsUpdated {
        commission_wallet: AccountId,
        commission_token_wallet: AccountId,
        config_version: u64,
    },
    #[event_version("1.0.0")]
    TokenAdded { token: AccountId },
    #[event_version("1.0.0")]
    TokenRemoved { token: AccountId },
    #[event_version("1.0.0")]
    AdminGranted { account_id: AccountId },
    #[event_version("1.0.0")]
    AdminRevoked { account_id: AccountId },
    #[event_version("1.0.0")]
    CreditDeposited {
        account_id: AccountId,
        token: AccountId,
        amount: U128,
    },
    #[event_version("1.0.0")]
    FtTransferRetained {
        receiver: AccountId,
        token: AccountId,
        amount: U128,
    },
    #[event_version("1.0.0")]
    CreditWithdrawn {
        account_id: AccountId,
        token: AccountId,
        amount: U128,
    },
}
