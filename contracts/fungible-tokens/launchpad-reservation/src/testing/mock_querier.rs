use cosmwasm_std::{
    from_json,
    testing::{MockApi, MockQuerier, MockStorage, MOCK_CONTRACT_ADDR},
    to_json_binary, Coin, ContractResult, OwnedDeps, Querier, QuerierResult, QueryRequest,
    SystemError, SystemResult, Uint128, WasmQuery,
};
use cw20::{BalanceResponse, Cw20QueryMsg};

use launchpad_fungible_tokens::sale::{
    ConfigResponse as SaleConfigResponse, QueryMsg as SaleQueryMsg, RateResponse,
};
use launchpad_std::testing::mock_querier::{
    mock_cw20_contract, mock_sale_contract, mock_token_source, mock_wallet,
};

pub const MOCK_DENOM: &str = "uusd";

/// Answers the sale queries the reservation makes (`Config` at instantiation,
/// `Rate` at pay time) and cw20 balance queries, from adjustable fixtures.
pub fn mock_dependencies_custom(
    contract_balance: &[Coin],
) -> OwnedDeps<MockStorage, MockApi, WasmMockQuerier> {
    let custom_querier: WasmMockQuerier =
        WasmMockQuerier::new(MockQuerier::new(&[(MOCK_CONTRACT_ADDR, contract_balance)]));
    OwnedDeps {
        storage: MockStorage::default(),
        api: MockApi::default(),
        querier: custom_querier,
        custom_query_type: std::marker::PhantomData,
    }
}

pub struct WasmMockQuerier {
    pub base: MockQuerier,
    /// The rate the sale reports for any address, None when closed.
    pub sale_rate: Option<Uint128>,
    /// The reservation's cw20 balance.
    pub token_balance: Uint128,
}

impl Querier for WasmMockQuerier {
    fn raw_query(&self, bin_request: &[u8]) -> QuerierResult {
        let request: QueryRequest<cosmwasm_std::Empty> = match from_json(bin_request) {
            Ok(v) => v,
            Err(e) => {
                return SystemResult::Err(SystemError::InvalidRequest {
                    error: format!("Parsing query request: {e}"),
                    request: bin_request.into(),
                })
            }
        };
        self.handle_query(&request)
    }
}

impl WasmMockQuerier {
    pub fn new(base: MockQuerier) -> Self {
        WasmMockQuerier {
            base,
            sale_rate: None,
            token_balance: Uint128::zero(),
        }
    }

    pub fn handle_query(&self, request: &QueryRequest<cosmwasm_std::Empty>) -> QuerierResult {
        match request {
            QueryRequest::Wasm(WasmQuery::Smart { contract_addr, msg })
                if contract_addr == mock_sale_contract().as_str() =>
            {
                self.handle_sale_query(msg)
            }
            QueryRequest::Wasm(WasmQuery::Smart { contract_addr, msg })
                if contract_addr == mock_cw20_contract().as_str() =>
            {
                self.handle_cw20_query(msg)
            }
            _ => self.base.handle_query(request),
        }
    }

    fn handle_sale_query(&self, msg: &cosmwasm_std::Binary) -> QuerierResult {
        match from_json(msg) {
            Ok(SaleQueryMsg::Config {}) => {
                let response = SaleConfigResponse {
                    owner: mock_token_source().to_string(),
                    wallet: mock_wallet().to_string(),
                    token_address: mock_cw20_contract().to_string(),
                    token_source: mock_token_source().to_string(),
                    denom: MOCK_DENOM.to_string(),
                    min_contribution: Uint128::new(50_000),
                    whitelist_threshold: Uint128::new(5_000_000),
                    paused: false,
                };
                SystemResult::Ok(ContractResult::Ok(to_json_binary(&response).unwrap()))
            }
            Ok(SaleQueryMsg::Rate { .. }) => {
                let response = RateResponse {
                    rate: self.sale_rate,
                };
                SystemResult::Ok(ContractResult::Ok(to_json_binary(&response).unwrap()))
            }
            _ => SystemResult::Err(SystemError::InvalidRequest {
                error: "Unsupported sale query".to_string(),
                request: msg.clone(),
            }),
        }
    }

    fn handle_cw20_query(&self, msg: &cosmwasm_std::Binary) -> QuerierResult {
        match from_json(msg) {
            Ok(Cw20QueryMsg::Balance { .. }) => {
                let response = BalanceResponse {
                    balance: self.token_balance,
                };
                SystemResult::Ok(ContractResult::Ok(to_json_binary(&response).unwrap()))
            }
            _ => SystemResult::Err(SystemError::InvalidRequest {
                error: "Unsupported cw20 query".to_string(),
                request: msg.clone(),
            }),
        }
    }
}
