use cosmwasm_std::{
    from_json,
    testing::{MockApi, MockQuerier, MockStorage, MOCK_CONTRACT_ADDR},
    to_json_binary, Addr, Coin, ContractResult, OwnedDeps, Querier, QuerierResult, QueryRequest,
    SystemError, SystemResult, Uint128, WasmQuery,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20QueryMsg, Expiration};

/// Mock CW20 ledger contract address
pub const MOCK_CW20_CONTRACT: &str = "cw20_contract";
/// Mock token source whose allowance backs the sale supply
pub const MOCK_TOKEN_SOURCE: &str = "token_source";
/// Mock wallet receiving native proceeds
pub const MOCK_WALLET: &str = "wallet";
/// Mock sale contract address
pub const MOCK_SALE_CONTRACT: &str = "sale_contract";

pub fn mock_cw20_contract() -> Addr {
    MockApi::default().addr_make(MOCK_CW20_CONTRACT)
}

pub fn mock_token_source() -> Addr {
    MockApi::default().addr_make(MOCK_TOKEN_SOURCE)
}

pub fn mock_wallet() -> Addr {
    MockApi::default().addr_make(MOCK_WALLET)
}

pub fn mock_sale_contract() -> Addr {
    MockApi::default().addr_make(MOCK_SALE_CONTRACT)
}

/// Alternative to `cosmwasm_std::testing::mock_dependencies` that answers cw20
/// `Allowance`/`Balance` queries for [`MOCK_CW20_CONTRACT`] from adjustable fixtures.
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
    /// Allowance reported for (token source, spender) pairs.
    pub allowance: Uint128,
    /// Balance reported for any cw20 balance query.
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
            allowance: Uint128::zero(),
            token_balance: Uint128::zero(),
        }
    }

    pub fn handle_query(&self, request: &QueryRequest<cosmwasm_std::Empty>) -> QuerierResult {
        match request {
            QueryRequest::Wasm(WasmQuery::Smart { contract_addr, msg })
                if contract_addr == mock_cw20_contract().as_str() =>
            {
                self.handle_cw20_query(msg)
            }
            _ => self.base.handle_query(request),
        }
    }

    fn handle_cw20_query(&self, msg: &cosmwasm_std::Binary) -> QuerierResult {
        match from_json(msg) {
            Ok(Cw20QueryMsg::Allowance { .. }) => {
                let response = AllowanceResponse {
                    allowance: self.allowance,
                    expires: Expiration::Never {},
                };
                SystemResult::Ok(ContractResult::Ok(to_json_binary(&response).unwrap()))
            }
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
