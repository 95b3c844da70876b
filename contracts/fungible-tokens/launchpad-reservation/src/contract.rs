use cosmwasm_std::{
    attr, coins, ensure, entry_point, to_json_binary, wasm_execute, Addr, BankMsg, Binary, Deps,
    DepsMut, Env, MessageInfo, Response,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_utils::{nonpayable, one_coin};
use semver::Version;

use launchpad_fungible_tokens::reservation::{
    fee_split, CapReachedResponse, ConfigResponse, DepositResponse, ExecuteMsg, InstantiateMsg,
    IsOpenResponse, MigrateMsg, QueryMsg, StateResponse, TokenAddressResponse,
};
use launchpad_fungible_tokens::sale::{
    ConfigResponse as SaleConfigResponse, ExecuteMsg as SaleExecuteMsg,
    QueryMsg as SaleQueryMsg, RateResponse,
};
use launchpad_std::{
    error::{from_semver, ContractError},
    ownership,
};

use crate::state::{Config, State, CONFIG, DEPOSITS, STATE};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:launchpad-reservation";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    ensure!(
        !msg.cap.is_zero(),
        ContractError::InvalidParameter {
            msg: "cap cannot be zero".to_string()
        }
    );
    ensure!(msg.fee_percent <= 100, ContractError::InvalidFeePercent {});

    let sale = deps.api.addr_validate(&msg.sale)?;
    // The denom and token are fixed on the sale; cache them here.
    let sale_config: SaleConfigResponse = deps
        .querier
        .query_wasm_smart(sale.clone(), &SaleQueryMsg::Config {})?;

    let config = Config {
        sale,
        cap: msg.cap,
        fee_percent: msg.fee_percent,
        manager: deps.api.addr_validate(&msg.manager)?,
        denom: sale_config.denom,
        token_address: deps.api.addr_validate(&sale_config.token_address)?,
    };
    CONFIG.save(deps.storage, &config)?;
    STATE.save(deps.storage, &State::default())?;

    let owner = ownership::initialize_owner(deps.storage, deps.api, msg.owner, &info.sender)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "instantiate"),
        attr("type", "reservation"),
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
    ensure!(
        !STATE.load(deps.storage)?.destroyed,
        ContractError::ContractDisabled {}
    );

    match msg {
        ExecuteMsg::Deposit {} => execute_deposit(deps, info),
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::Cancel {} => execute_cancel(deps, info),
        ExecuteMsg::Pay {} => execute_pay(deps, env, info),
        ExecuteMsg::Withdraw {} => execute_withdraw(deps, info),
        ExecuteMsg::ClaimTokens { address } => execute_claim_tokens(deps, info, address),
        ExecuteMsg::Destroy {} => execute_destroy(deps, env, info),
        ExecuteMsg::UpdateOwner { address } => ownership::execute_update_owner(deps, info, address),
    }
}

fn execute_deposit(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut state = STATE.load(deps.storage)?;

    // A zero-value call is the indirect claim path.
    if info.funds.is_empty() {
        ensure!(state.paid, ContractError::NotPaid {});
        return claim_for(deps, &state, info.sender);
    }

    ensure!(!state.paused, ContractError::Paused {});
    ensure!(!state.canceled, ContractError::AlreadyCanceled {});
    ensure!(!state.paid, ContractError::AlreadyPaid {});

    let config = CONFIG.load(deps.storage)?;
    let payment = one_coin(&info)?;
    ensure!(
        payment.denom == config.denom,
        ContractError::InvalidFunds {
            msg: format!("Only {} accepted", config.denom)
        }
    );

    // A deposit pushing the running total over the cap is rejected in full.
    state.total_collected = state.total_collected.checked_add(payment.amount)?;
    ensure!(
        state.total_collected <= config.cap,
        ContractError::CapExceeded { cap: config.cap }
    );

    DEPOSITS.update(deps.storage, &info.sender, |deposit| {
        deposit
            .unwrap_or_default()
            .checked_add(payment.amount)
            .map_err(ContractError::Overflow)
    })?;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "deposit"),
        attr("depositor", info.sender),
        attr("amount", payment.amount),
        attr("total_collected", state.total_collected),
    ]))
}

fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    let mut state = STATE.load(deps.storage)?;
    ensure!(!state.paused, ContractError::Paused {});
    state.paused = true;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new().add_attributes(vec![attr("action", "pause")]))
}

fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    let mut state = STATE.load(deps.storage)?;
    ensure!(state.paused, ContractError::NotPaused {});
    state.paused = false;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new().add_attributes(vec![attr("action", "unpause")]))
}

fn execute_cancel(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    let mut state = STATE.load(deps.storage)?;
    ensure!(!state.canceled, ContractError::AlreadyCanceled {});
    ensure!(!state.paid, ContractError::AlreadyPaid {});
    // Canceling mid-flow would race a just-accepted deposit; deposits must be
    // halted first.
    ensure!(state.paused, ContractError::NotPaused {});
    state.canceled = true;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new().add_attributes(vec![attr("action", "cancel")]))
}

fn execute_pay(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    let mut state = STATE.load(deps.storage)?;
    ensure!(!state.canceled, ContractError::AlreadyCanceled {});
    ensure!(!state.paid, ContractError::AlreadyPaid {});
    ensure!(
        !state.total_collected.is_zero(),
        ContractError::NothingCollected {}
    );

    let config = CONFIG.load(deps.storage)?;
    let (fee, net) = fee_split(state.total_collected, config.fee_percent)?;

    // The rate the sale grants this contract right now is the rate the bulk
    // purchase below settles at; capture it for claims.
    let RateResponse { rate } = deps.querier.query_wasm_smart(
        config.sale.clone(),
        &SaleQueryMsg::Rate {
            address: env.contract.address.to_string(),
        },
    )?;
    let rate = rate.ok_or(ContractError::SaleNotOpen {})?;

    state.paid = true;
    state.rate = Some(rate);
    STATE.save(deps.storage, &state)?;

    // Buy tokens from the sale with the net amount; the sale forwards it to
    // its wallet and sends the tokens here.
    let purchase_msg = wasm_execute(
        config.sale,
        &SaleExecuteMsg::Purchase {},
        coins(net.u128(), config.denom.clone()),
    )?;
    let mut resp = Response::new()
        .add_message(purchase_msg)
        .add_attributes(vec![
            attr("action", "pay"),
            attr("total_collected", state.total_collected),
            attr("net_amount", net),
            attr("fee", fee),
            attr("rate", rate),
        ]);
    if !fee.is_zero() {
        resp = resp.add_message(BankMsg::Send {
            to_address: config.manager.to_string(),
            amount: coins(fee.u128(), config.denom),
        });
    }

    Ok(resp)
}

fn execute_withdraw(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let state = STATE.load(deps.storage)?;
    ensure!(state.canceled, ContractError::NotCanceled {});

    let deposit = DEPOSITS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    ensure!(!deposit.is_zero(), ContractError::NoDeposit {});

    let config = CONFIG.load(deps.storage)?;
    // Zero the record before the refund so a repeated withdraw rejects.
    DEPOSITS.remove(deps.storage, &info.sender);

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: coins(deposit.u128(), config.denom),
        })
        .add_attributes(vec![
            attr("action", "withdraw"),
            attr("depositor", info.sender),
            attr("amount", deposit),
        ]))
}

fn execute_claim_tokens(
    deps: DepsMut,
    info: MessageInfo,
    address: Option<String>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let state = STATE.load(deps.storage)?;
    ensure!(state.paid, ContractError::NotPaid {});

    let depositor = match address {
        Some(address) => deps.api.addr_validate(&address)?,
        None => info.sender,
    };
    claim_for(deps, &state, depositor)
}

/// Releases the tokens purchased for a depositor: their net (post-fee)
/// contribution times the rate captured at payout. Requires `paid`.
fn claim_for(deps: DepsMut, state: &State, depositor: Addr) -> Result<Response, ContractError> {
    let deposit = DEPOSITS
        .may_load(deps.storage, &depositor)?
        .unwrap_or_default();
    ensure!(!deposit.is_zero(), ContractError::NoDeposit {});

    let config = CONFIG.load(deps.storage)?;
    let (_, net) = fee_split(deposit, config.fee_percent)?;
    let rate = state.rate.ok_or(ContractError::NotPaid {})?;
    let tokens = net.checked_mul(rate)?;

    // Zero the record before the transfer so a repeated claim rejects.
    DEPOSITS.remove(deps.storage, &depositor);

    let transfer_msg = wasm_execute(
        config.token_address,
        &Cw20ExecuteMsg::Transfer {
            recipient: depositor.to_string(),
            amount: tokens,
        },
        vec![],
    )?;

    Ok(Response::new()
        .add_message(transfer_msg)
        .add_attributes(vec![
            attr("action", "claim_tokens"),
            attr("depositor", depositor),
            attr("tokens", tokens),
        ]))
}

fn execute_destroy(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    ownership::assert_owner(deps.storage, &info.sender)?;

    let mut state = STATE.load(deps.storage)?;
    state.destroyed = true;
    STATE.save(deps.storage, &state)?;

    let config = CONFIG.load(deps.storage)?;
    let owner = ownership::query_owner(deps.storage)?;

    let mut resp = Response::new().add_attributes(vec![
        attr("action", "destroy"),
        attr("recipient", owner.clone()),
    ]);

    let native = deps
        .querier
        .query_balance(env.contract.address.clone(), config.denom)?;
    if !native.amount.is_zero() {
        resp = resp.add_message(BankMsg::Send {
            to_address: owner.to_string(),
            amount: vec![native],
        });
    }

    let token_balance: BalanceResponse = deps.querier.query_wasm_smart(
        config.token_address.clone(),
        &Cw20QueryMsg::Balance {
            address: env.contract.address.to_string(),
        },
    )?;
    if !token_balance.balance.is_zero() {
        resp = resp.add_message(wasm_execute(
            config.token_address,
            &Cw20ExecuteMsg::Transfer {
                recipient: owner.to_string(),
                amount: token_balance.balance,
            },
            vec![],
        )?);
    }

    Ok(resp)
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
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => Ok(to_json_binary(&query_config(deps)?)?),
        QueryMsg::State {} => Ok(to_json_binary(&query_state(deps)?)?),
        QueryMsg::IsOpen {} => Ok(to_json_binary(&query_is_open(deps)?)?),
        QueryMsg::CapReached {} => Ok(to_json_binary(&query_cap_reached(deps)?)?),
        QueryMsg::Deposit { address } => Ok(to_json_binary(&query_deposit(deps, address)?)?),
        QueryMsg::TokenAddress {} => Ok(to_json_binary(&query_token_address(deps)?)?),
    }
}

fn query_config(deps: Deps) -> Result<ConfigResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        owner: ownership::query_owner(deps.storage)?.to_string(),
        sale: config.sale.to_string(),
        cap: config.cap,
        fee_percent: config.fee_percent,
        manager: config.manager.to_string(),
        denom: config.denom,
        token_address: config.token_address.to_string(),
    })
}

fn query_state(deps: Deps) -> Result<StateResponse, ContractError> {
    let state = STATE.load(deps.storage)?;
    Ok(StateResponse {
        total_collected: state.total_collected,
        paused: state.paused,
        canceled: state.canceled,
        paid: state.paid,
        destroyed: state.destroyed,
        rate: state.rate,
    })
}

fn query_is_open(deps: Deps) -> Result<IsOpenResponse, ContractError> {
    let state = STATE.load(deps.storage)?;
    Ok(IsOpenResponse {
        is_open: !state.paused && !state.canceled && !state.paid && !state.destroyed,
    })
}

fn query_cap_reached(deps: Deps) -> Result<CapReachedResponse, ContractError> {
    let state = STATE.load(deps.storage)?;
    let config = CONFIG.load(deps.storage)?;
    Ok(CapReachedResponse {
        cap_reached: state.total_collected >= config.cap,
    })
}

fn query_deposit(deps: Deps, address: String) -> Result<DepositResponse, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    Ok(DepositResponse {
        amount: DEPOSITS
            .may_load(deps.storage, &address)?
            .unwrap_or_default(),
    })
}

fn query_token_address(deps: Deps) -> Result<TokenAddressResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(TokenAddressResponse {
        address: config.token_address.to_string(),
    })
}
