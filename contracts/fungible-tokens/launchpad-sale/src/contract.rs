use cosmwasm_std::{
    attr, ensure, entry_point, to_json_binary, wasm_execute, BankMsg, Binary, Deps, DepsMut, Env,
    MessageInfo, Response, StdError, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::{AllowanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_utils::{nonpayable, one_coin};
use semver::Version;

use launchpad_fungible_tokens::sale::{
    ConfigResponse, ExecuteMsg, IncludesAddressResponse, InstantiateMsg, IsOpenResponse,
    MigrateMsg, Period, PeriodsResponse, QueryMsg, RateResponse, RemainingTokensResponse,
};
use launchpad_std::{
    common::Milliseconds,
    error::{from_semver, ContractError},
    ownership,
};

use crate::state::{active_rate, effective_rate, Config, CONFIG, PAUSED, PERIODS, WHITELIST};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:launchpad-sale";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const MAX_ADDRESSES_SIZE: usize = 100;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    ensure!(
        !msg.min_contribution.is_zero(),
        ContractError::InvalidParameter {
            msg: "min_contribution cannot be zero".to_string()
        }
    );
    ensure!(
        msg.whitelist_threshold > msg.min_contribution,
        ContractError::InvalidParameter {
            msg: "whitelist_threshold must exceed min_contribution".to_string()
        }
    );

    let config = Config {
        wallet: deps.api.addr_validate(&msg.wallet)?,
        token_address: deps.api.addr_validate(&msg.token_address)?,
        token_source: deps.api.addr_validate(&msg.token_source)?,
        denom: msg.denom,
        min_contribution: msg.min_contribution,
        whitelist_threshold: msg.whitelist_threshold,
    };
    CONFIG.save(deps.storage, &config)?;
    PERIODS.save(deps.storage, &vec![])?;
    PAUSED.save(deps.storage, &false)?;

    let owner = ownership::initialize_owner(deps.storage, deps.api, msg.owner, &info.sender)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "instantiate"),
        attr("type", "sale"),
        attr("owner", owner),
    ]))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AddPeriod {
            start_time,
            end_time,
            rate,
        } => execute_add_period(deps, info, start_time, end_time, rate),
        ExecuteMsg::ClearPeriods {} => execute_clear_periods(deps, info),
        ExecuteMsg::AddAddress { address, rate } => execute_add_address(deps, info, address, rate),
        ExecuteMsg::AddAddresses { addresses, rate } => {
            execute_add_addresses(deps, info, addresses, rate)
        }
        ExecuteMsg::RemoveAddress { address } => execute_remove_address(deps, info, address),
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::Purchase {} => execute_purchase(deps, env, info),
        ExecuteMsg::UpdateOwner { address } => ownership::execute_update_owner(deps, info, address),
    }
}

fn execute_add_period(
    deps: DepsMut,
    info: MessageInfo,
    start_time: Milliseconds,
    end_time: Milliseconds,
    rate: Uint128,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    ensure!(
        !rate.is_zero(),
        ContractError::InvalidPeriod {
            msg: "rate cannot be zero".to_string()
        }
    );
    ensure!(
        start_time <= end_time,
        ContractError::InvalidPeriod {
            msg: "window ends before it starts".to_string()
        }
    );

    let period = Period {
        start_time,
        end_time,
        rate,
    };

    let mut periods = PERIODS.load(deps.storage)?;
    let overlaps = periods.iter().any(|p| p.overlaps(&period));
    periods.push(period);
    PERIODS.save(deps.storage, &periods)?;

    let mut resp = Response::new().add_attributes(vec![
        attr("action", "add_period"),
        attr("start_time", start_time),
        attr("end_time", end_time),
        attr("rate", rate),
    ]);
    // Overlapping windows are an administrator error; surface them without
    // changing the first-added-wins resolution.
    if overlaps {
        resp = resp.add_attribute("overlaps_existing", "true");
    }

    Ok(resp)
}

fn execute_clear_periods(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    PERIODS.save(deps.storage, &vec![])?;

    Ok(Response::new().add_attributes(vec![attr("action", "clear_periods")]))
}

fn execute_add_address(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
    rate: Uint128,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    let address = deps.api.addr_validate(&address)?;
    WHITELIST.save(deps.storage, &address, &rate)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "add_address"),
        attr("address", address),
        attr("rate", rate),
    ]))
}

fn execute_add_addresses(
    deps: DepsMut,
    info: MessageInfo,
    addresses: Vec<String>,
    rate: Uint128,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    ensure!(
        !addresses.is_empty(),
        ContractError::Std(StdError::generic_err("addresses cannot be empty"))
    );
    ensure!(
        addresses.len() <= MAX_ADDRESSES_SIZE,
        ContractError::Std(StdError::generic_err(format!(
            "addresses length cannot be more than {MAX_ADDRESSES_SIZE}"
        )))
    );

    for address in addresses.iter() {
        let address = deps.api.addr_validate(address)?;
        WHITELIST.save(deps.storage, &address, &rate)?;
    }

    Ok(Response::new().add_attributes(vec![
        attr("action", "add_addresses"),
        attr("count", addresses.len().to_string()),
        attr("rate", rate),
    ]))
}

fn execute_remove_address(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    let address = deps.api.addr_validate(&address)?;
    // Dropping the entry also drops any override rate recorded for it.
    WHITELIST.remove(deps.storage, &address);

    Ok(Response::new().add_attributes(vec![
        attr("action", "remove_address"),
        attr("address", address),
    ]))
}

fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    ensure!(!PAUSED.load(deps.storage)?, ContractError::Paused {});
    PAUSED.save(deps.storage, &true)?;

    Ok(Response::new().add_attributes(vec![attr("action", "pause")]))
}

fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    ensure!(PAUSED.load(deps.storage)?, ContractError::NotPaused {});
    PAUSED.save(deps.storage, &false)?;

    Ok(Response::new().add_attributes(vec![attr("action", "unpause")]))
}

fn execute_purchase(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    ensure!(!PAUSED.load(deps.storage)?, ContractError::Paused {});

    let now = Milliseconds::from_block_time(&env.block);
    let Some(period_rate) = active_rate(deps.storage, now)? else {
        return Err(ContractError::SaleNotOpen {});
    };

    let config = CONFIG.load(deps.storage)?;
    let payment = one_coin(&info)?;
    ensure!(
        payment.denom == config.denom,
        ContractError::InvalidFunds {
            msg: format!("Only {} accepted", config.denom)
        }
    );
    ensure!(
        payment.amount >= config.min_contribution,
        ContractError::PurchaseTooSmall {
            min: config.min_contribution
        }
    );

    let override_rate = WHITELIST.may_load(deps.storage, &info.sender)?;
    if override_rate.is_none() {
        ensure!(
            payment.amount < config.whitelist_threshold,
            ContractError::WhitelistRequired {
                threshold: config.whitelist_threshold
            }
        );
    }
    let rate = match override_rate {
        Some(rate) if !rate.is_zero() => rate,
        _ => period_rate,
    };

    let tokens = payment.amount.checked_mul(rate)?;
    let remaining = remaining_tokens(deps.as_ref(), &env)?;
    ensure!(remaining >= tokens, ContractError::NotEnoughTokens {});

    // Move the purchased tokens out of the token source and forward the
    // payment to the proceeds wallet. Either transfer failing reverts the
    // whole purchase.
    let transfer_msg = wasm_execute(
        config.token_address,
        &Cw20ExecuteMsg::TransferFrom {
            owner: config.token_source.to_string(),
            recipient: info.sender.to_string(),
            amount: tokens,
        },
        vec![],
    )?;
    let forward_msg = BankMsg::Send {
        to_address: config.wallet.to_string(),
        amount: vec![payment.clone()],
    };

    Ok(Response::new()
        .add_message(transfer_msg)
        .add_message(forward_msg)
        .add_attributes(vec![
            attr("action", "purchase"),
            attr("purchaser", info.sender),
            attr("amount", payment.amount),
            attr("rate", rate),
            attr("tokens", tokens),
        ]))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let version: Version = CONTRACT_VERSION.parse().map_err(from_semver)?;

    let stored = get_contract_version(deps.storage)?;
    let storage_version: Version = stored.version.parse().map_err(from_semver)?;

    ensure!(
        stored.contract == CONTRACT_NAME,
        ContractError::CannotMigrate {
            previous_contract: stored.contract,
        }
    );
    ensure!(
        storage_version < version,
        ContractError::CannotMigrate {
            previous_contract: stored.version,
        }
    );

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::default())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => Ok(to_json_binary(&query_config(deps)?)?),
        QueryMsg::IsOpen {} => Ok(to_json_binary(&query_is_open(deps, env)?)?),
        QueryMsg::Rate { address } => Ok(to_json_binary(&query_rate(deps, env, address)?)?),
        QueryMsg::Periods {} => Ok(to_json_binary(&query_periods(deps)?)?),
        QueryMsg::IncludesAddress { address } => {
            Ok(to_json_binary(&query_includes_address(deps, address)?)?)
        }
        QueryMsg::RemainingTokens {} => Ok(to_json_binary(&RemainingTokensResponse {
            amount: remaining_tokens(deps, &env)?,
        })?),
    }
}

fn query_config(deps: Deps) -> Result<ConfigResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        owner: ownership::query_owner(deps.storage)?.to_string(),
        wallet: config.wallet.to_string(),
        token_address: config.token_address.to_string(),
        token_source: config.token_source.to_string(),
        denom: config.denom,
        min_contribution: config.min_contribution,
        whitelist_threshold: config.whitelist_threshold,
        paused: PAUSED.load(deps.storage)?,
    })
}

fn query_is_open(deps: Deps, env: Env) -> Result<IsOpenResponse, ContractError> {
    let paused = PAUSED.load(deps.storage)?;
    let now = Milliseconds::from_block_time(&env.block);
    Ok(IsOpenResponse {
        is_open: !paused && active_rate(deps.storage, now)?.is_some(),
    })
}

fn query_rate(deps: Deps, env: Env, address: String) -> Result<RateResponse, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    let now = Milliseconds::from_block_time(&env.block);
    Ok(RateResponse {
        rate: effective_rate(deps.storage, &address, now)?,
    })
}

fn query_periods(deps: Deps) -> Result<PeriodsResponse, ContractError> {
    Ok(PeriodsResponse {
        periods: PERIODS.load(deps.storage)?,
    })
}

fn query_includes_address(
    deps: Deps,
    address: String,
) -> Result<IncludesAddressResponse, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    Ok(IncludesAddressResponse {
        included: WHITELIST.has(deps.storage, &address),
    })
}

/// The live remaining supply: how much the token source has approved this
/// contract to move. Never cached.
fn remaining_tokens(deps: Deps, env: &Env) -> Result<Uint128, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let resp: AllowanceResponse = deps.querier.query_wasm_smart(
        config.token_address,
        &Cw20QueryMsg::Allowance {
            owner: config.token_source.to_string(),
            spender: env.contract.address.to_string(),
        },
    )?;
    Ok(resp.allowance)
}
