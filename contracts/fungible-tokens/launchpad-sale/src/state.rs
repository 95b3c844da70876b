use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

use launchpad_fungible_tokens::sale::Period;
use launchpad_std::common::Milliseconds;

#[cw_serde]
pub struct Config {
    pub wallet: Addr,
    pub token_address: Addr,
    pub token_source: Addr,
    pub denom: String,
    pub min_contribution: Uint128,
    pub whitelist_threshold: Uint128,
}

pub const CONFIG: Item<Config> = Item::new("config");
/// Sale periods in insertion order.
pub const PERIODS: Item<Vec<Period>> = Item::new("periods");
/// Whitelisted addresses and their override rates. A zero rate means "use the
/// active period's rate".
pub const WHITELIST: Map<&Addr, Uint128> = Map::new("whitelist");
pub const PAUSED: Item<bool> = Item::new("paused");

/// Rate of the first stored period containing the given time. When windows
/// overlap the first-added period wins.
pub fn active_rate(storage: &dyn Storage, time: Milliseconds) -> StdResult<Option<Uint128>> {
    let periods = PERIODS.load(storage)?;
    Ok(periods.iter().find(|p| p.contains(time)).map(|p| p.rate))
}

/// The rate the given address would purchase at right now: its non-zero
/// whitelist override if present, otherwise the active period's rate. None
/// when no period is active.
pub fn effective_rate(
    storage: &dyn Storage,
    address: &Addr,
    time: Milliseconds,
) -> StdResult<Option<Uint128>> {
    let Some(period_rate) = active_rate(storage, time)? else {
        return Ok(None);
    };
    let override_rate = WHITELIST.may_load(storage, address)?;
    Ok(Some(match override_rate {
        Some(rate) if !rate.is_zero() => rate,
        _ => period_rate,
    }))
}
