//! Capital lifecycle: staking, withdrawal, harvesting and the pause
//! transitions that drive the approval manager.
//!
//! Every function runs inside a single contract invocation. Returning an
//! error rolls back all storage writes, token movements and nested calls made
//! before it, so no step here needs its own compensation logic.

use soroban_sdk::{log, token, Address, Env};

use crate::{
    approvals, events,
    external::{settle, RouterClient, StakingClient},
    fees::{self, FeeSplit},
    guard, routes, storage,
    errors::StrategyError,
    types::{Bindings, Position},
};

/// Staleness window handed to the router.
pub const SWAP_DEADLINE_SECS: u64 = 600;
/// Minimum acceptable output of every swap and liquidity leg.
pub const MIN_OUTPUT: i128 = 1;

pub fn balance(env: &Env, asset: &Address) -> i128 {
    token::Client::new(env, asset).balance(&env.current_contract_address())
}

pub fn staked_balance(env: &Env, bindings: &Bindings) -> Result<i128, StrategyError> {
    let staking = StakingClient::new(env, &bindings.staking);
    settle(staking.try_position(&bindings.pool, &env.current_contract_address()))
}

// ============================================================================
// DEPOSIT / WITHDRAW
// ============================================================================

pub fn deposit(env: &Env) -> Result<(), StrategyError> {
    guard::require_active(env)?;
    let bindings = storage::bindings(env)?;
    approvals::renew_lapsed(env);
    stake_idle(env, &bindings)
}

/// Stakes the whole held balance; no external call when there is none.
fn stake_idle(env: &Env, bindings: &Bindings) -> Result<(), StrategyError> {
    let amount = balance(env, &bindings.held);
    if amount <= 0 {
        return Ok(());
    }
    let staking = StakingClient::new(env, &bindings.staking);
    settle(staking.try_stake(&env.current_contract_address(), &bindings.pool, &amount))?;
    events::deposited(env, amount);
    Ok(())
}

/// Returns up to `amount` of principal to the vault, unstaking only the
/// shortfall between the request and the idle balance.
pub fn withdraw(
    env: &Env,
    caller: &Address,
    origin: &Address,
    amount: i128,
) -> Result<(), StrategyError> {
    guard::require_vault(env, caller)?;
    if amount <= 0 {
        return Err(StrategyError::InvalidAmount);
    }

    let bindings = storage::bindings(env)?;
    let this = env.current_contract_address();
    let held = token::Client::new(env, &bindings.held);

    let mut available = held.balance(&this);
    if available < amount {
        let shortfall = (amount - available).min(staked_balance(env, &bindings)?);
        if shortfall > 0 {
            let staking = StakingClient::new(env, &bindings.staking);
            settle(staking.try_unstake(&this, &bindings.pool, &shortfall))?;
            log!(env, "unstaked withdrawal shortfall", shortfall);
            available = held.balance(&this);
        }
    }

    let sent = amount.min(available);
    let fee = if withdrawal_fee_waived(env, &bindings, origin)? {
        0
    } else {
        storage::fees(env)?.withdrawal_fee_on(sent)
    };
    let payout = sent - fee;
    if payout > 0 {
        held.transfer(&this, &bindings.vault, &payout);
    }

    events::withdrawn(env, bindings.vault, payout, fee);
    Ok(())
}

/// The owner's own withdrawals skip the fee when the variant allows it. The
/// owner must sign, so the vault cannot claim the waiver on its own.
fn withdrawal_fee_waived(
    env: &Env,
    bindings: &Bindings,
    origin: &Address,
) -> Result<bool, StrategyError> {
    if !bindings.owner_withdrawal_fee_waived || *origin != storage::owner(env)? {
        return Ok(false);
    }
    origin.require_auth();
    Ok(true)
}

// ============================================================================
// HARVEST
// ============================================================================

/// Claim, skim fees, reinvest, restake.
pub fn harvest(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    let bindings = storage::bindings(env)?;
    guard::require_harvester(env, bindings.harvest_guard, caller)?;
    guard::require_active(env)?;
    approvals::renew_lapsed(env);

    let before = balance(env, &bindings.reward);
    let staking = StakingClient::new(env, &bindings.staking);
    settle(staking.try_claim(&env.current_contract_address(), &bindings.pool))?;
    let claimed = balance(env, &bindings.reward) - before;

    charge_fees(env, &bindings, caller)?;
    reinvest(env, &bindings)?;
    stake_idle(env, &bindings)?;

    events::harvested(env, caller.clone(), claimed);
    Ok(())
}

/// Skims the reward balance into the hub asset and pays the caller, burn sink
/// and strategist their shares of what the skim bought.
fn charge_fees(
    env: &Env,
    bindings: &Bindings,
    caller: &Address,
) -> Result<FeeSplit, StrategyError> {
    let schedule = storage::fees(env)?;
    let skimmed = fees::skim(balance(env, &bindings.reward), bindings.skim_rate);
    if skimmed <= 0 {
        log!(env, "harvest below skim threshold");
        return Ok(FeeSplit::default());
    }

    // Only the skim's proceeds are split. Any other hub balance, including
    // idle principal when the hub is also the held asset, stays put.
    let this = env.current_contract_address();
    let hub_amount = swap(env, bindings, &bindings.reward, &bindings.hub, skimmed, &this)?;
    let split = schedule.split(hub_amount);

    let hub = token::Client::new(env, &bindings.hub);
    if split.call > 0 {
        hub.transfer(&this, caller, &split.call);
    }
    if split.burn > 0 {
        swap(
            env,
            bindings,
            &bindings.hub,
            &bindings.burn_token,
            split.burn,
            &bindings.burn_sink,
        )?;
    }
    if split.strategist > 0 {
        hub.transfer(&this, &storage::strategist(env)?, &split.strategist);
    }

    log!(env, "harvest fees paid", hub_amount, split.total());
    events::fees_charged(env, &split);
    Ok(split)
}

fn reinvest(env: &Env, bindings: &Bindings) -> Result<(), StrategyError> {
    match &bindings.position {
        Position::Paired(token_0, token_1) => add_liquidity(env, bindings, token_0, token_1),
        Position::Single if bindings.reward == bindings.held => Ok(()),
        Position::Single => {
            let remaining = balance(env, &bindings.reward);
            if remaining > 0 {
                let this = env.current_contract_address();
                swap(env, bindings, &bindings.reward, &bindings.held, remaining, &this)?;
            }
            Ok(())
        }
    }
}

/// Converts half of the remaining reward into each pair leg and adds
/// liquidity with both leg balances.
fn add_liquidity(
    env: &Env,
    bindings: &Bindings,
    token_0: &Address,
    token_1: &Address,
) -> Result<(), StrategyError> {
    let half = balance(env, &bindings.reward) / 2;
    if half <= 0 {
        log!(env, "no reward left to pair");
        return Ok(());
    }

    let this = env.current_contract_address();
    if *token_0 != bindings.reward {
        swap(env, bindings, &bindings.reward, token_0, half, &this)?;
    }
    if *token_1 != bindings.reward {
        swap(env, bindings, &bindings.reward, token_1, half, &this)?;
    }

    let amount_0 = balance(env, token_0);
    let amount_1 = balance(env, token_1);
    let router = RouterClient::new(env, &bindings.router);
    settle(router.try_add_liquidity(
        token_0,
        token_1,
        &amount_0,
        &amount_1,
        &MIN_OUTPUT,
        &MIN_OUTPUT,
        &this,
        &deadline(env),
    ))?;
    Ok(())
}

/// Sells `amount_in` of `from` for `to` along the stored route, delivering to
/// `recipient`. Returns the amount `recipient` received.
fn swap(
    env: &Env,
    bindings: &Bindings,
    from: &Address,
    to: &Address,
    amount_in: i128,
    recipient: &Address,
) -> Result<i128, StrategyError> {
    let this = env.current_contract_address();
    let path = routes::lookup(env, from, to)?;
    if path.is_empty() {
        if *recipient != this {
            token::Client::new(env, from).transfer(&this, recipient, &amount_in);
        }
        return Ok(amount_in);
    }

    let output = token::Client::new(env, to);
    let before = output.balance(recipient);
    let router = RouterClient::new(env, &bindings.router);
    settle(router.try_swap_exact_tokens_for_tokens(
        &this,
        &amount_in,
        &MIN_OUTPUT,
        &path,
        recipient,
        &deadline(env),
    ))?;

    let received = output.balance(recipient) - before;
    if received < MIN_OUTPUT {
        return Err(StrategyError::InsufficientOutput);
    }
    Ok(received)
}

fn deadline(env: &Env) -> u64 {
    env.ledger().timestamp().saturating_add(SWAP_DEADLINE_SECS)
}

// ============================================================================
// PAUSE / PANIC / RETIRE
// ============================================================================

pub fn pause(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    guard::require_owner(env, caller)?;
    guard::require_active(env)?;

    storage::set_paused(env, true);
    approvals::revoke_all(env);
    emergency_exit(env, &storage::bindings(env)?)?;

    events::pause_changed(env, true, caller.clone());
    Ok(())
}

pub fn unpause(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    guard::require_owner(env, caller)?;
    guard::require_paused(env)?;

    storage::set_paused(env, false);
    approvals::reset(env);
    stake_idle(env, &storage::bindings(env)?)?;

    events::pause_changed(env, false, caller.clone());
    Ok(())
}

/// Pulls the whole position out first, then pauses if still active. Unlike
/// `pause` it can be repeated while paused.
pub fn panic(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    guard::require_owner(env, caller)?;

    let recovered = emergency_exit(env, &storage::bindings(env)?)?;
    if !storage::is_paused(env) {
        storage::set_paused(env, true);
        approvals::revoke_all(env);
        events::pause_changed(env, true, caller.clone());
    }

    events::panicked(env, caller.clone(), recovered);
    Ok(())
}

/// Drains staked and idle principal to the vault.
pub fn retire(env: &Env, caller: &Address) -> Result<(), StrategyError> {
    guard::require_vault(env, caller)?;

    let bindings = storage::bindings(env)?;
    emergency_exit(env, &bindings)?;

    let amount = balance(env, &bindings.held);
    if amount > 0 {
        token::Client::new(env, &bindings.held).transfer(
            &env.current_contract_address(),
            &bindings.vault,
            &amount,
        );
    }

    events::retired(env, bindings.vault, amount);
    Ok(())
}

/// Returns the principal recovered; pending rewards are forfeited.
fn emergency_exit(env: &Env, bindings: &Bindings) -> Result<i128, StrategyError> {
    if staked_balance(env, bindings)? <= 0 {
        return Ok(0);
    }
    let before = balance(env, &bindings.held);
    let staking = StakingClient::new(env, &bindings.staking);
    settle(staking.try_emergency_exit(&env.current_contract_address(), &bindings.pool))?;
    Ok(balance(env, &bindings.held) - before)
}
