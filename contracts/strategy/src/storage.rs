use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::{
    approvals::Grant,
    errors::StrategyError,
    fees::FeeSchedule,
    types::Bindings,
};

const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Storage keys for strategy state.
///
/// Everything lives in instance storage: the state is small, contract-wide,
/// and read by nearly every entry point.
#[contracttype]
pub enum DataKey {
    /// Immutable bindings resolved at initialisation
    Bindings,
    /// Owner address; pause, unpause, panic, fee and ownership changes
    Owner,
    /// Strategist address; receives the strategist fee, rotates itself
    Strategist,
    /// Current fee schedule
    Fees,
    /// Pause flag; gates deposit and harvest
    Paused,
    /// (token, spender) pairs the strategy grants allowances to
    Grants,
    /// Precomputed swap path for (source, destination)
    Route(Address, Address),
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Bindings)
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn bindings(env: &Env) -> Result<Bindings, StrategyError> {
    env.storage()
        .instance()
        .get(&DataKey::Bindings)
        .ok_or(StrategyError::NotInitialized)
}

pub fn set_bindings(env: &Env, bindings: &Bindings) {
    env.storage().instance().set(&DataKey::Bindings, bindings);
}

pub fn owner(env: &Env) -> Result<Address, StrategyError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(StrategyError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn strategist(env: &Env) -> Result<Address, StrategyError> {
    env.storage()
        .instance()
        .get(&DataKey::Strategist)
        .ok_or(StrategyError::NotInitialized)
}

pub fn set_strategist(env: &Env, strategist: &Address) {
    env.storage().instance().set(&DataKey::Strategist, strategist);
}

pub fn fees(env: &Env) -> Result<FeeSchedule, StrategyError> {
    env.storage()
        .instance()
        .get(&DataKey::Fees)
        .ok_or(StrategyError::NotInitialized)
}

pub fn set_fees(env: &Env, fees: &FeeSchedule) {
    env.storage().instance().set(&DataKey::Fees, fees);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

pub fn grants(env: &Env) -> Vec<Grant> {
    env.storage()
        .instance()
        .get(&DataKey::Grants)
        .unwrap_or(Vec::new(env))
}

pub fn set_grants(env: &Env, grants: &Vec<Grant>) {
    env.storage().instance().set(&DataKey::Grants, grants);
}

pub fn route(env: &Env, from: &Address, to: &Address) -> Option<Vec<Address>> {
    env.storage()
        .instance()
        .get(&DataKey::Route(from.clone(), to.clone()))
}

pub fn set_route(env: &Env, from: &Address, to: &Address, path: &Vec<Address>) {
    env.storage()
        .instance()
        .set(&DataKey::Route(from.clone(), to.clone()), path);
}
