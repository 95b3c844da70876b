use crate::error::ContractError;
use cosmwasm_std::{attr, ensure, Addr, Api, DepsMut, MessageInfo, Response, Storage};
use cw_storage_plus::Item;

pub const OWNER: Item<Addr> = Item::new("owner");

/// Saves the initial contract owner, defaulting to the instantiation sender.
pub fn initialize_owner(
    storage: &mut dyn Storage,
    api: &dyn Api,
    owner: Option<String>,
    sender: &Addr,
) -> Result<Addr, ContractError> {
    let owner = match owner {
        Some(owner) => api.addr_validate(&owner)?,
        None => sender.clone(),
    };
    OWNER.save(storage, &owner)?;
    Ok(owner)
}

pub fn is_contract_owner(storage: &dyn Storage, addr: &Addr) -> Result<bool, ContractError> {
    let owner = OWNER.load(storage)?;
    Ok(addr == owner)
}

/// Guard clause for owner-gated operations.
pub fn assert_owner(storage: &dyn Storage, addr: &Addr) -> Result<(), ContractError> {
    ensure!(
        is_contract_owner(storage, addr)?,
        ContractError::Unauthorized {}
    );
    Ok(())
}

/// Transfers ownership to a new address. **Only executable by the current contract owner.**
pub fn execute_update_owner(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    let new_owner = deps.api.addr_validate(&address)?;
    OWNER.save(deps.storage, &new_owner)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "update_owner"),
        attr("value", new_owner),
    ]))
}

pub fn query_owner(storage: &dyn Storage) -> Result<Addr, ContractError> {
    Ok(OWNER.load(storage)?)
}
