//! Swap paths, computed once at initialisation.

use soroban_sdk::{vec, Address, Env, Vec};

use crate::{
    errors::StrategyError,
    storage,
    types::{Bindings, Position},
};

/// Path from `from` to `to`.
///
/// Empty when both ends are the same asset. Direct when either end is the
/// hub or the destination is a known intermediate. Otherwise one hop through
/// the hub.
pub fn build(
    env: &Env,
    from: &Address,
    to: &Address,
    hub: &Address,
    intermediates: &Vec<Address>,
) -> Vec<Address> {
    if from == to {
        return Vec::new(env);
    }
    if from == hub || to == hub || intermediates.contains(to) {
        return vec![env, from.clone(), to.clone()];
    }
    vec![env, from.clone(), hub.clone(), to.clone()]
}

/// (source, destination) pairs the lifecycle swaps along.
pub fn required(env: &Env, bindings: &Bindings) -> Vec<(Address, Address)> {
    let mut pairs = vec![
        env,
        (bindings.reward.clone(), bindings.hub.clone()),
        (bindings.hub.clone(), bindings.burn_token.clone()),
    ];
    match &bindings.position {
        Position::Single => pairs.push_back((bindings.reward.clone(), bindings.held.clone())),
        Position::Paired(token_0, token_1) => {
            pairs.push_back((bindings.reward.clone(), token_0.clone()));
            pairs.push_back((bindings.reward.clone(), token_1.clone()));
        }
    }
    pairs
}

pub fn install(env: &Env, bindings: &Bindings, intermediates: &Vec<Address>) {
    for (from, to) in required(env, bindings).iter() {
        let path = build(env, &from, &to, &bindings.hub, intermediates);
        storage::set_route(env, &from, &to, &path);
    }
}

pub fn lookup(env: &Env, from: &Address, to: &Address) -> Result<Vec<Address>, StrategyError> {
    storage::route(env, from, to).ok_or(StrategyError::RouteNotFound)
}
