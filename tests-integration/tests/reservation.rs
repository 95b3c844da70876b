use cosmwasm_std::{coins, Addr, Empty, Timestamp, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_multi_test::{App, BankSudo, Contract, ContractWrapper, Executor, SudoMsg};

use launchpad_fungible_tokens::reservation::{
    CapReachedResponse, ExecuteMsg, InstantiateMsg, QueryMsg,
};
use launchpad_fungible_tokens::sale::{
    ExecuteMsg as SaleExecuteMsg, InstantiateMsg as SaleInstantiateMsg,
};
use launchpad_std::{common::Milliseconds, error::ContractError};

const DENOM: &str = "uusd";

const TOTAL_SUPPLY: u128 = 60_000_000_000;
const SALE_SUPPLY: u128 = 30_000_000_000;

const MIN_CONTRIBUTION: u128 = 50_000;
const WHITELIST_THRESHOLD: u128 = 5_000_000;
const PERIOD_RATE: u128 = 100;

// One "ether" of the native denom at six decimals.
const ETHER: u128 = 1_000_000;

const CAP: u128 = 20 * ETHER;
const FEE_PERCENT: u64 = 5;
const RESERVATION_RATE: u128 = 200;

const START: u64 = 2_000_000;
const END: u64 = 3_000_000;
const OPEN: u64 = 2_500_000;

fn cw20_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    ))
}

fn sale_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        launchpad_sale::contract::execute,
        launchpad_sale::contract::instantiate,
        launchpad_sale::contract::query,
    ))
}

fn reservation_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        launchpad_reservation::contract::execute,
        launchpad_reservation::contract::instantiate,
        launchpad_reservation::contract::query,
    ))
}

struct Suite {
    app: App,
    token: Addr,
    reservation: Addr,
    owner: Addr,
    wallet: Addr,
    manager: Addr,
}

fn setup() -> Suite {
    let mut app = App::default();
    let owner = app.api().addr_make("owner");
    let wallet = app.api().addr_make("wallet");
    let manager = app.api().addr_make("manager");

    app.update_block(|block| block.time = Timestamp::from_seconds(OPEN));

    let cw20_code = app.store_code(cw20_contract());
    let sale_code = app.store_code(sale_contract());
    let reservation_code = app.store_code(reservation_contract());

    let token = app
        .instantiate_contract(
            cw20_code,
            owner.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: "Launch Token".to_string(),
                symbol: "LAUNCH".to_string(),
                decimals: 6,
                initial_balances: vec![Cw20Coin {
                    address: owner.to_string(),
                    amount: Uint128::new(TOTAL_SUPPLY),
                }],
                mint: None,
                marketing: None,
            },
            &[],
            "token",
            None,
        )
        .unwrap();

    let sale = app
        .instantiate_contract(
            sale_code,
            owner.clone(),
            &SaleInstantiateMsg {
                wallet: wallet.to_string(),
                token_address: token.to_string(),
                token_source: owner.to_string(),
                denom: DENOM.to_string(),
                min_contribution: Uint128::new(MIN_CONTRIBUTION),
                whitelist_threshold: Uint128::new(WHITELIST_THRESHOLD),
                owner: None,
            },
            &[],
            "sale",
            None,
        )
        .unwrap();

    app.execute_contract(
        owner.clone(),
        token.clone(),
        &Cw20ExecuteMsg::IncreaseAllowance {
            spender: sale.to_string(),
            amount: Uint128::new(SALE_SUPPLY),
            expires: None,
        },
        &[],
    )
    .unwrap();

    app.execute_contract(
        owner.clone(),
        sale.clone(),
        &SaleExecuteMsg::AddPeriod {
            start_time: Milliseconds::from_seconds(START),
            end_time: Milliseconds::from_seconds(END),
            rate: Uint128::new(PERIOD_RATE),
        },
        &[],
    )
    .unwrap();

    let reservation = app
        .instantiate_contract(
            reservation_code,
            owner.clone(),
            &InstantiateMsg {
                sale: sale.to_string(),
                cap: Uint128::new(CAP),
                fee_percent: FEE_PERCENT,
                manager: manager.to_string(),
                owner: None,
            },
            &[],
            "reservation",
            None,
        )
        .unwrap();

    // The reservation buys in bulk at its own whitelisted rate.
    app.execute_contract(
        owner.clone(),
        sale.clone(),
        &SaleExecuteMsg::AddAddress {
            address: reservation.to_string(),
            rate: Uint128::new(RESERVATION_RATE),
        },
        &[],
    )
    .unwrap();

    Suite {
        app,
        token,
        reservation,
        owner,
        wallet,
        manager,
    }
}

fn fund(app: &mut App, addr: &Addr, amount: u128) {
    app.sudo(SudoMsg::Bank(BankSudo::Mint {
        to_address: addr.to_string(),
        amount: coins(amount, DENOM),
    }))
    .unwrap();
}

fn deposit(app: &mut App, reservation: &Addr, depositor: &Addr, amount: u128) {
    app.execute_contract(
        depositor.clone(),
        reservation.clone(),
        &ExecuteMsg::Deposit {},
        &coins(amount, DENOM),
    )
    .unwrap();
}

fn token_balance(app: &App, token: &Addr, addr: &Addr) -> u128 {
    let resp: BalanceResponse = app
        .wrap()
        .query_wasm_smart(
            token,
            &Cw20QueryMsg::Balance {
                address: addr.to_string(),
            },
        )
        .unwrap();
    resp.balance.u128()
}

fn native_balance(app: &App, addr: &Addr) -> u128 {
    app.wrap().query_balance(addr, DENOM).unwrap().amount.u128()
}

#[test]
fn full_payout_scenario() {
    let Suite {
        mut app,
        token,
        reservation,
        owner,
        wallet,
        manager,
    } = setup();

    let contributor_a = app.api().addr_make("contributor_a");
    let contributor_b = app.api().addr_make("contributor_b");
    let contributor_c = app.api().addr_make("contributor_c");
    fund(&mut app, &contributor_a, ETHER);
    fund(&mut app, &contributor_b, 19 * ETHER);
    fund(&mut app, &contributor_c, ETHER);

    deposit(&mut app, &reservation, &contributor_a, ETHER);
    deposit(&mut app, &reservation, &contributor_b, 19 * ETHER);

    let cap_reached: CapReachedResponse = app
        .wrap()
        .query_wasm_smart(&reservation, &QueryMsg::CapReached {})
        .unwrap();
    assert!(cap_reached.cap_reached);

    // Even the smallest further deposit is rejected.
    let err: ContractError = app
        .execute_contract(
            contributor_c.clone(),
            reservation.clone(),
            &ExecuteMsg::Deposit {},
            &coins(1, DENOM),
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(
        err,
        ContractError::CapExceeded {
            cap: Uint128::new(CAP)
        }
    );

    app.execute_contract(
        owner.clone(),
        reservation.clone(),
        &ExecuteMsg::Pay {},
        &[],
    )
    .unwrap();

    // 95% went through the sale to its wallet, 5% to the manager, and the
    // reservation holds no native funds.
    assert_eq!(native_balance(&app, &wallet), 19 * ETHER);
    assert_eq!(native_balance(&app, &manager), ETHER);
    assert_eq!(native_balance(&app, &reservation), 0);
    // The bulk purchase settled at the reservation's whitelisted rate.
    assert_eq!(
        token_balance(&app, &token, &reservation),
        19 * ETHER * RESERVATION_RATE
    );

    // Direct claim for A: 200 * 0.95 ether.
    app.execute_contract(
        contributor_a.clone(),
        reservation.clone(),
        &ExecuteMsg::ClaimTokens { address: None },
        &[],
    )
    .unwrap();
    assert_eq!(token_balance(&app, &token, &contributor_a), 190 * ETHER);

    // Indirect claim for B via a zero-value call.
    app.execute_contract(
        contributor_b.clone(),
        reservation.clone(),
        &ExecuteMsg::Deposit {},
        &[],
    )
    .unwrap();
    assert_eq!(token_balance(&app, &token, &contributor_b), 3610 * ETHER);

    // Every purchased token was handed out.
    assert_eq!(token_balance(&app, &token, &reservation), 0);

    // A second claim rejects without double-crediting.
    let err: ContractError = app
        .execute_contract(
            contributor_a.clone(),
            reservation.clone(),
            &ExecuteMsg::ClaimTokens { address: None },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::NoDeposit {});
    assert_eq!(token_balance(&app, &token, &contributor_a), 190 * ETHER);
}

#[test]
fn cancel_and_refund_scenario() {
    let Suite {
        mut app,
        reservation,
        owner,
        ..
    } = setup();

    let contributor = app.api().addr_make("contributor");
    fund(&mut app, &contributor, 2 * ETHER);
    deposit(&mut app, &reservation, &contributor, 2 * ETHER);
    assert_eq!(native_balance(&app, &contributor), 0);

    // Cancel is only reachable through pause.
    let err: ContractError = app
        .execute_contract(
            owner.clone(),
            reservation.clone(),
            &ExecuteMsg::Cancel {},
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::NotPaused {});

    app.execute_contract(
        owner.clone(),
        reservation.clone(),
        &ExecuteMsg::Pause {},
        &[],
    )
    .unwrap();
    app.execute_contract(
        owner.clone(),
        reservation.clone(),
        &ExecuteMsg::Cancel {},
        &[],
    )
    .unwrap();

    // The depositor gets back exactly what they put in.
    app.execute_contract(
        contributor.clone(),
        reservation.clone(),
        &ExecuteMsg::Withdraw {},
        &[],
    )
    .unwrap();
    assert_eq!(native_balance(&app, &contributor), 2 * ETHER);

    let err: ContractError = app
        .execute_contract(
            contributor.clone(),
            reservation.clone(),
            &ExecuteMsg::Withdraw {},
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::NoDeposit {});

    // A canceled reservation can never be paid.
    let err: ContractError = app
        .execute_contract(owner.clone(), reservation.clone(), &ExecuteMsg::Pay {}, &[])
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::AlreadyCanceled {});
}

#[test]
fn pay_rejected_when_sale_closed() {
    let Suite {
        mut app,
        reservation,
        owner,
        ..
    } = setup();

    let contributor = app.api().addr_make("contributor");
    fund(&mut app, &contributor, ETHER);
    deposit(&mut app, &reservation, &contributor, ETHER);

    // The sale's periods have all ended by the time of the payout attempt.
    app.update_block(|block| block.time = Timestamp::from_seconds(END + 1));

    let err: ContractError = app
        .execute_contract(owner.clone(), reservation.clone(), &ExecuteMsg::Pay {}, &[])
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::SaleNotOpen {});
}

#[test]
fn destroy_sweeps_everything_to_the_owner() {
    let Suite {
        mut app,
        token,
        reservation,
        owner,
        ..
    } = setup();

    let contributor_a = app.api().addr_make("contributor_a");
    let contributor_b = app.api().addr_make("contributor_b");
    fund(&mut app, &contributor_a, ETHER);
    fund(&mut app, &contributor_b, ETHER);
    deposit(&mut app, &reservation, &contributor_a, ETHER);
    deposit(&mut app, &reservation, &contributor_b, ETHER);

    app.execute_contract(
        owner.clone(),
        reservation.clone(),
        &ExecuteMsg::Pay {},
        &[],
    )
    .unwrap();

    // Only A claims; B's share stays with the reservation.
    app.execute_contract(
        contributor_a.clone(),
        reservation.clone(),
        &ExecuteMsg::ClaimTokens { address: None },
        &[],
    )
    .unwrap();

    let owner_tokens_before = token_balance(&app, &token, &owner);
    let unclaimed = token_balance(&app, &token, &reservation);
    assert!(unclaimed > 0);

    app.execute_contract(
        owner.clone(),
        reservation.clone(),
        &ExecuteMsg::Destroy {},
        &[],
    )
    .unwrap();

    assert_eq!(token_balance(&app, &token, &reservation), 0);
    assert_eq!(
        token_balance(&app, &token, &owner),
        owner_tokens_before + unclaimed
    );

    // The contract is dead.
    let err: ContractError = app
        .execute_contract(
            contributor_b.clone(),
            reservation.clone(),
            &ExecuteMsg::ClaimTokens { address: None },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::ContractDisabled {});
}
