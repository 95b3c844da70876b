use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use launchpad_std::common::Milliseconds;

#[cw_serde]
pub struct InstantiateMsg {
    /// Address receiving the native proceeds of every purchase
    pub wallet: String,
    /// Address of the CW20 token being sold
    pub token_address: String,
    /// Account whose allowance toward this contract backs the sale supply
    pub token_source: String,
    /// The native denom accepted for purchases
    pub denom: String,
    /// Minimum contribution for a single purchase
    pub min_contribution: Uint128,
    /// Contributions at or above this amount require whitelisting
    pub whitelist_threshold: Uint128,
    pub owner: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Appends a sale period
    AddPeriod {
        start_time: Milliseconds,
        end_time: Milliseconds,
        rate: Uint128,
    },
    /// Removes all sale periods, closing the sale immediately
    ClearPeriods {},
    /// Adds an address to the whitelist with an optional override rate
    /// (a zero rate means "use the active period's rate")
    AddAddress { address: String, rate: Uint128 },
    /// Adds a batch of addresses to the whitelist, all with the same rate
    AddAddresses {
        addresses: Vec<String>,
        rate: Uint128,
    },
    /// Removes an address from the whitelist along with its override rate
    RemoveAddress { address: String },
    /// Halts purchases without touching configuration
    Pause {},
    Unpause {},
    /// Purchases tokens with attached native funds
    Purchase {},
    UpdateOwner { address: String },
}

/// A time window during which purchases are accepted at a fixed default rate.
/// Bounds are inclusive.
#[cw_serde]
pub struct Period {
    pub start_time: Milliseconds,
    pub end_time: Milliseconds,
    /// Tokens granted per unit of native currency
    pub rate: Uint128,
}

impl Period {
    pub fn contains(&self, time: Milliseconds) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    pub fn overlaps(&self, other: &Period) -> bool {
        self.start_time <= other.end_time && other.start_time <= self.end_time
    }
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    /// Whether purchases are currently possible
    #[returns(IsOpenResponse)]
    IsOpen {},
    /// The effective purchase rate the given address would get right now.
    /// Resolved from the whitelist override and the active period only;
    /// pause state is not considered.
    #[returns(RateResponse)]
    Rate { address: String },
    /// The ordered period list
    #[returns(PeriodsResponse)]
    Periods {},
    #[returns(IncludesAddressResponse)]
    IncludesAddress { address: String },
    /// Live read of the token source's remaining allowance
    #[returns(RemainingTokensResponse)]
    RemainingTokens {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub owner: String,
    pub wallet: String,
    pub token_address: String,
    pub token_source: String,
    pub denom: String,
    pub min_contribution: Uint128,
    pub whitelist_threshold: Uint128,
    pub paused: bool,
}

#[cw_serde]
pub struct IsOpenResponse {
    pub is_open: bool,
}

#[cw_serde]
pub struct RateResponse {
    /// The effective rate, or None when no period is active
    pub rate: Option<Uint128>,
}

#[cw_serde]
pub struct PeriodsResponse {
    pub periods: Vec<Period>,
}

#[cw_serde]
pub struct IncludesAddressResponse {
    /// Whether the address is whitelisted
    pub included: bool,
}

#[cw_serde]
pub struct RemainingTokensResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct MigrateMsg {}
