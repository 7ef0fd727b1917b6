//! Per-operation caller and pause checks.
//!
//! Role checks compare the named caller first and only then demand its
//! authorization, so a mismatched caller fails with `Unauthorized` before any
//! signature is consulted.

use soroban_sdk::{xdr::ToXdr, Address, Env};

use crate::{errors::StrategyError, storage, types::HarvestGuard};

/// Byte offset of the `ScAddressType` discriminant in an address' XDR
/// encoding (after the 4-byte `ScValType`).
const ADDRESS_TYPE_OFFSET: u32 = 7;
const SC_ADDRESS_TYPE_CONTRACT: u8 = 1;

#[inline]
pub fn require_active(env: &Env) -> Result<(), StrategyError> {
    if storage::is_paused(env) {
        return Err(StrategyError::Paused);
    }
    Ok(())
}

#[inline]
pub fn require_paused(env: &Env) -> Result<(), StrategyError> {
    if !storage::is_paused(env) {
        return Err(StrategyError::NotPaused);
    }
    Ok(())
}

pub fn require_vault(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    let vault = storage::bindings(env)?.vault;
    require_role(&vault, caller)
}

pub fn require_owner(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    let owner = storage::owner(env)?;
    require_role(&owner, caller)
}

pub fn require_strategist(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    let strategist = storage::strategist(env)?;
    require_role(&strategist, caller)
}

/// Anti-bot check for `harvest`.
pub fn require_harvester(
    env: &Env,
    guard: HarvestGuard,
    caller: &Address,
) -> Result<(), StrategyError> {
    if guard == HarvestGuard::ExternalAccount && is_contract(env, caller) {
        return Err(StrategyError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

fn require_role(holder: &Address, caller: &Address) -> Result<(), StrategyError> {
    if holder != caller {
        return Err(StrategyError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

pub fn is_contract(env: &Env, address: &Address) -> bool {
    let encoded = address.clone().to_xdr(env);
    encoded.get(ADDRESS_TYPE_OFFSET) == Some(SC_ADDRESS_TYPE_CONTRACT)
}
