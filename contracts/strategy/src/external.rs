//! Cross-contract interfaces of the strategy's collaborators.
//!
//! Only the clients are used; the collaborators themselves live elsewhere.

#![allow(clippy::too_many_arguments)]

use soroban_sdk::{contractclient, Address, Env, Vec};

use crate::{errors::StrategyError, types::PoolRef};

/// MasterChef-style staking protocol. Principal is pulled from `from` with
/// `transfer_from`, so `from` must have approved the protocol.
#[contractclient(name = "StakingClient")]
pub trait StakingProtocol {
    fn stake(env: Env, from: Address, pool: PoolRef, amount: i128);

    fn unstake(env: Env, from: Address, pool: PoolRef, amount: i128);

    /// Pay pending rewards to `from` without moving principal.
    fn claim(env: Env, from: Address, pool: PoolRef);

    /// Return all principal to `from`, forfeiting pending rewards.
    fn emergency_exit(env: Env, from: Address, pool: PoolRef);

    fn position(env: Env, pool: PoolRef, owner: Address) -> i128;
}

/// AMM router. Inputs are pulled with `transfer_from`; `sender` pays for a
/// swap while `to` receives, so swap proceeds can go straight to a third
/// party.
#[contractclient(name = "RouterClient")]
pub trait ExchangeRouter {
    fn swap_exact_tokens_for_tokens(
        env: Env,
        sender: Address,
        amount_in: i128,
        amount_out_min: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Vec<i128>;

    /// `to` supplies both legs and receives the pair token.
    fn add_liquidity(
        env: Env,
        token_a: Address,
        token_b: Address,
        amount_a_desired: i128,
        amount_b_desired: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
    ) -> (i128, i128, i128);
}

/// Read side of a liquidity-pair token.
#[contractclient(name = "PairClient")]
pub trait PairInspector {
    fn token_0(env: Env) -> Address;

    fn token_1(env: Env) -> Address;
}

/// Unwraps the outcome of a generated `try_*` client call. A failed
/// invocation or an undecodable return value becomes `ExternalCallFailure`.
pub fn settle<T, C, E>(outcome: Result<Result<T, C>, E>) -> Result<T, StrategyError> {
    match outcome {
        Ok(Ok(value)) => Ok(value),
        _ => Err(StrategyError::ExternalCallFailure),
    }
}

/// Legs of `pair`, queried once at initialisation.
pub fn leg_assets(env: &Env, pair: &Address) -> Result<(Address, Address), StrategyError> {
    let client = PairClient::new(env, pair);
    let token_0 = settle(client.try_token_0())?;
    let token_1 = settle(client.try_token_1())?;
    Ok((token_0, token_1))
}
