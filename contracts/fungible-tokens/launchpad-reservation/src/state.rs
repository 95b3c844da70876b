use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    pub sale: Addr,
    pub cap: Uint128,
    /// 0-100
    pub fee_percent: u64,
    pub manager: Addr,
    /// Cached from the sale at instantiation; immutable there.
    pub denom: String,
    pub token_address: Addr,
}

#[cw_serde]
#[derive(Default)]
pub struct State {
    pub total_collected: Uint128,
    pub paused: bool,
    pub canceled: bool,
    pub paid: bool,
    pub destroyed: bool,
    /// Claim rate captured when the reservation was paid.
    pub rate: Option<Uint128>,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const STATE: Item<State> = Item::new("state");
pub const DEPOSITS: Map<&Addr, Uint128> = Map::new("deposits");
