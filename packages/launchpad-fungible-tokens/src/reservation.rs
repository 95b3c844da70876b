use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use launchpad_std::error::ContractError;

/// Splits an amount into `(fee, net)` where the fee is `amount * fee_percent
/// / 100` rounded down. `fee + net == amount` exactly.
pub fn fee_split(amount: Uint128, fee_percent: u64) -> Result<(Uint128, Uint128), ContractError> {
    let fee = amount.multiply_ratio(fee_percent as u128, 100u128);
    let net = amount.checked_sub(fee)?;
    Ok((fee, net))
}

#[cw_serde]
pub struct InstantiateMsg {
    /// Address of the sale the reservation buys from on payout
    pub sale: String,
    /// Maximum total native amount accepted
    pub cap: Uint128,
    /// Percentage of proceeds routed to the manager on payout, 0-100
    pub fee_percent: u64,
    /// Address receiving the fee
    pub manager: String,
    pub owner: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Deposits the attached native funds. With no funds attached this is
    /// the indirect claim path: once paid, it claims the sender's tokens.
    Deposit {},
    /// Halts deposits without touching configuration
    Pause {},
    Unpause {},
    /// Cancels the reservation, enabling refunds. Only legal while paused.
    Cancel {},
    /// Settles the reservation: buys tokens from the sale with the net
    /// amount and routes the fee to the manager. Enables claims.
    Pay {},
    /// Refunds the sender's recorded deposit. Only legal once canceled.
    Withdraw {},
    /// Releases the tokens purchased for a depositor. Only legal once paid.
    ClaimTokens { address: Option<String> },
    /// Sweeps any residual native and token balance to the owner and
    /// permanently disables the contract.
    Destroy {},
    UpdateOwner { address: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(StateResponse)]
    State {},
    /// Whether deposits are currently accepted
    #[returns(IsOpenResponse)]
    IsOpen {},
    #[returns(CapReachedResponse)]
    CapReached {},
    /// The recorded deposit for an address
    #[returns(DepositResponse)]
    Deposit { address: String },
    /// The token being distributed, as configured on the sale
    #[returns(TokenAddressResponse)]
    TokenAddress {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub owner: String,
    pub sale: String,
    pub cap: Uint128,
    pub fee_percent: u64,
    pub manager: String,
    pub denom: String,
    pub token_address: String,
}

#[cw_serde]
pub struct StateResponse {
    pub total_collected: Uint128,
    pub paused: bool,
    pub canceled: bool,
    pub paid: bool,
    pub destroyed: bool,
    /// The claim rate captured when the reservation was paid
    pub rate: Option<Uint128>,
}

#[cw_serde]
pub struct IsOpenResponse {
    pub is_open: bool,
}

#[cw_serde]
pub struct CapReachedResponse {
    pub cap_reached: bool,
}

#[cw_serde]
pub struct DepositResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct TokenAddressResponse {
    /// The address of the token being distributed
    pub address: String,
}

#[cw_serde]
pub struct MigrateMsg {}
