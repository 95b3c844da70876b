use cosmwasm_std::{OverflowError, StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Paused")]
    Paused {},

    #[error("NotPaused")]
    NotPaused {},

    #[error("SaleNotOpen")]
    SaleNotOpen {},

    #[error("InvalidFunds: {msg}")]
    InvalidFunds { msg: String },

    #[error("InvalidPeriod: {msg}")]
    InvalidPeriod { msg: String },

    #[error("PurchaseTooSmall: minimum contribution is {min}")]
    PurchaseTooSmall { min: Uint128 },

    #[error("WhitelistRequired: contributions of {threshold} and above require whitelisting")]
    WhitelistRequired { threshold: Uint128 },

    #[error("NotEnoughTokens")]
    NotEnoughTokens {},

    #[error("CapExceeded: cap is {cap}")]
    CapExceeded { cap: Uint128 },

    #[error("InvalidFeePercent")]
    InvalidFeePercent {},

    #[error("AlreadyPaid")]
    AlreadyPaid {},

    #[error("AlreadyCanceled")]
    AlreadyCanceled {},

    #[error("NotCanceled")]
    NotCanceled {},

    #[error("NotPaid")]
    NotPaid {},

    #[error("NothingCollected")]
    NothingCollected {},

    #[error("NoDeposit")]
    NoDeposit {},

    #[error("ContractDisabled")]
    ContractDisabled {},

    #[error("InvalidParameter: {msg}")]
    InvalidParameter { msg: String },

    #[error("Semver: {0}")]
    Semver(String),

    #[error("Cannot migrate from {previous_contract}")]
    CannotMigrate { previous_contract: String },
}

pub fn from_semver(err: semver::Error) -> ContractError {
    ContractError::Semver(format!("Semver: {err}"))
}
