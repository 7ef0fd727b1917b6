//! # Compounding Strategy Contract
//!
//! A yield strategy that manages one asset on behalf of a vault. The vault
//! hands the strategy its idle principal; the strategy stakes it in a
//! MasterChef-style staking protocol, periodically harvests the reward,
//! skims a fixed fraction of it for fees, and compounds the rest back into the
//! position.
//!
//! ## Variants
//!
//! Every strategy variant shares this control flow and differs only in the
//! bound assets, swap routes and fee constants, all supplied through
//! [`StrategyConfig`] at initialisation:
//!
//! - **Single**: the held asset is staked directly. When the reward asset
//!   differs from the held asset, leftover reward is swapped into the held
//!   asset before restaking.
//! - **Paired**: the held asset is a liquidity-pair token. Leftover reward is
//!   split in half, converted into both pair legs, and added as liquidity.
//!
//! ## Harvest Flow
//!
//! ```text
//! Harvester → [harvest()] → staking.claim()
//!                         → skim reward → swap to hub
//!                               ├─ call fee       → harvester
//!                               ├─ burn fee       → swap to burn token → burn sink
//!                               └─ strategist fee → strategist
//!                         → reinvest remainder → staking.stake()
//!                         → HarvestEvent
//! ```
//!
//! ## Roles
//!
//! - `vault`: the only caller of `withdraw` and `retire_strat`
//! - `owner`: `pause`, `unpause`, `panic`, fee and ownership changes
//! - `strategist`: receives the strategist fee and rotates itself
//! - harvesters: anyone passing the configured [`HarvestGuard`]
//!
//! ## Storage Layout
//!
//! All state lives in instance storage: immutable [`types::Bindings`], owner,
//! strategist, fee schedule, pause flag, tracked allowance grants, and one
//! precomputed route per (source, destination) pair.
//!
//! # Examples
//!
//! ## Vault deposit
//! ```ignore
//! token_client.transfer(&vault, &strategy_address, &amount);
//! strategy_client.deposit();
//! ```
//!
//! ## Vault withdrawal on behalf of `user`
//! ```ignore
//! strategy_client.withdraw(&vault, &user, &amount);
//! ```

#![no_std]

mod approvals;
mod errors;
mod events;
mod external;
mod fees;
mod guard;
mod lifecycle;
mod routes;
mod storage;
mod types;

#[cfg(test)]
mod testutils;

use soroban_sdk::{contract, contractimpl, log, Address, Env, Vec};

pub use approvals::{Allowance, Grant, MAX_ALLOWANCE};
pub use errors::StrategyError;
pub use events::{
    ConfigWarningEvent, DepositEvent, FeesChargedEvent, FeesUpdatedEvent, HarvestEvent,
    InitializedEvent, OwnerUpdatedEvent, PanicEvent, PauseEvent, RetireEvent,
    StrategistUpdatedEvent, WithdrawEvent,
};
pub use external::{ExchangeRouter, PairInspector, StakingProtocol};
pub use fees::{
    FeeSchedule, MAX_FEE, SKIM_DENOMINATOR, SKIM_RATE_REDUCED, SKIM_RATE_STANDARD,
    WITHDRAWAL_MAX,
};
pub use types::{HarvestGuard, PoolRef, Position, PositionKind, StrategyConfig};

use types::Bindings;

/// Compounding yield strategy.
///
/// # Security Model
///
/// - Role checks compare the named caller and then require its signature
/// - `harvest` callers are filtered by the configured [`HarvestGuard`]
/// - Deposits and harvests are rejected while paused; withdrawals and
///   retirement are not, so the vault can always recover principal
/// - Pausing revokes every allowance and pulls the position out of the
///   staking protocol
#[contract]
pub struct CompoundingStrategy;

#[contractimpl]
impl CompoundingStrategy {

    // ==========================================================================
    // INITIALIZATION
    // ==========================================================================

    /// Binds the strategy to its vault, collaborators and fee schedule.
    ///
    /// Looks up the pair legs for paired positions, computes every swap
    /// route, and grants the staking protocol and router maximum allowances.
    ///
    /// # Errors
    /// - `AlreadyInitialized` on a second call
    /// - `InvalidConfig` for fee rates above their caps, a skim rate above
    ///   its cap, or a pair whose legs coincide
    /// - `ExternalCallFailure` if the pair token cannot report its legs
    ///
    /// # Events
    /// `InitializedEvent`, plus `ConfigWarningEvent` when the harvest fee
    /// rates do not sum to `MAX_FEE`.
    pub fn initialize(env: Env, config: StrategyConfig) -> Result<(), StrategyError> {
        if storage::is_initialized(&env) {
            return Err(StrategyError::AlreadyInitialized);
        }
        config.owner.require_auth();

        config.fees.validate()?;
        fees::validate_skim_rate(config.skim_rate)?;

        let position = match config.kind {
            PositionKind::Single => Position::Single,
            PositionKind::Paired => {
                let (token_0, token_1) = external::leg_assets(&env, &config.held)?;
                if token_0 == token_1 {
                    return Err(StrategyError::InvalidConfig);
                }
                Position::Paired(token_0, token_1)
            }
        };

        let bindings = Bindings {
            vault: config.vault.clone(),
            burn_sink: config.burn_sink,
            staking: config.staking,
            router: config.router,
            held: config.held.clone(),
            reward: config.reward,
            hub: config.hub,
            burn_token: config.burn_token,
            pool: config.pool,
            position,
            skim_rate: config.skim_rate,
            harvest_guard: config.harvest_guard,
            owner_withdrawal_fee_waived: config.owner_withdrawal_fee_waived,
        };

        storage::set_bindings(&env, &bindings);
        storage::set_owner(&env, &config.owner);
        storage::set_strategist(&env, &config.strategist);
        storage::set_fees(&env, &config.fees);
        storage::set_paused(&env, false);
        storage::extend_instance(&env);

        routes::install(&env, &bindings, &config.intermediates);
        approvals::track(&env, &bindings);
        approvals::grant_all(&env);

        if !config.fees.reconciles() {
            log!(&env, "harvest fees do not sum to MAX_FEE", config.fees.harvest_total());
            events::config_warning(&env, &config.fees);
        }
        events::initialized(&env, config.vault, config.owner, config.strategist, config.held);
        Ok(())
    }


    // ==========================================================================
    // CORE LIFECYCLE
    // ==========================================================================

    /// Stakes the whole idle held balance. Callable by anyone. Lapsed
    /// allowances are renewed first.
    ///
    /// # Errors
    /// - `Paused` while paused
    /// - `ExternalCallFailure` if the staking protocol rejects the stake
    pub fn deposit(env: Env) -> Result<(), StrategyError> {
        storage::extend_instance(&env);
        lifecycle::deposit(&env)
    }

    /// Sends up to `amount` of the held asset to the vault, less the
    /// withdrawal fee.
    ///
    /// `origin` is the account the vault is withdrawing for. When the owner
    /// fee waiver is enabled and `origin` is the owner (who must sign), the
    /// fee is skipped.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the vault
    /// - `InvalidAmount` for a non-positive `amount`
    pub fn withdraw(
        env: Env,
        caller: Address,
        origin: Address,
        amount: i128,
    ) -> Result<(), StrategyError> {
        storage::extend_instance(&env);
        lifecycle::withdraw(&env, &caller, &origin, amount)
    }

    /// Claims rewards, pays fees, and compounds the remainder.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` fails the harvest guard
    /// - `Paused` while paused
    /// - `InsufficientOutput` if a swap delivers less than one unit
    /// - `ExternalCallFailure` if the staking protocol or router fails
    ///
    /// # Events
    /// `FeesChargedEvent` and `HarvestEvent`
    pub fn harvest(env: Env, caller: Address) -> Result<(), StrategyError> {
        storage::extend_instance(&env);
        lifecycle::harvest(&env, &caller)
    }

    /// Emergency-exits the position and returns everything to the vault.
    /// The instance stays callable with nothing left to manage.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the vault
    /// - `ExternalCallFailure` if the staking protocol rejects the exit
    pub fn retire_strat(env: Env, caller: Address) -> Result<(), StrategyError> {
        storage::extend_instance(&env);
        lifecycle::retire(&env, &caller)
    }


    // ==========================================================================
    // ADMINISTRATIVE - PAUSE CONTROL
    // ==========================================================================

    /// Pauses deposits and harvests, revokes every allowance and pulls the
    /// position out of the staking protocol.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the owner
    /// - `Paused` if already paused
    pub fn pause(env: Env, caller: Address) -> Result<(), StrategyError> {
        storage::extend_instance(&env);
        lifecycle::pause(&env, &caller)
    }

    /// Re-grants every allowance (zero first, then maximum) and restakes idle
    /// principal.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the owner
    /// - `NotPaused` if active
    pub fn unpause(env: Env, caller: Address) -> Result<(), StrategyError> {
        storage::extend_instance(&env);
        lifecycle::unpause(&env, &caller)
    }

    /// Emergency-exits the position, then pauses if not already paused.
    /// Pending rewards are forfeited.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the owner
    ///
    /// # Events
    /// `PanicEvent`, preceded by `PauseEvent` when this call pauses.
    pub fn panic(env: Env, caller: Address) -> Result<(), StrategyError> {
        storage::extend_instance(&env);
        lifecycle::panic(&env, &caller)
    }


    // ==========================================================================
    // ADMINISTRATIVE - ROLES AND FEES
    // ==========================================================================

    /// Rotates the strategist. Only the current strategist may call this;
    /// the owner cannot.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the current strategist
    ///
    /// # Events
    /// `StrategistUpdatedEvent`
    pub fn set_strategist(
        env: Env,
        caller: Address,
        strategist: Address,
    ) -> Result<(), StrategyError> {
        guard::require_strategist(&env, &caller)?;
        storage::set_strategist(&env, &strategist);
        storage::extend_instance(&env);
        events::strategist_updated(&env, caller, strategist);
        Ok(())
    }

    /// Hands pause control and fee administration to `new_owner`.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the owner
    ///
    /// # Events
    /// `OwnerUpdatedEvent`
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), StrategyError> {
        guard::require_owner(&env, &caller)?;
        storage::set_owner(&env, &new_owner);
        storage::extend_instance(&env);
        events::owner_updated(&env, caller, new_owner);
        Ok(())
    }

    /// Replaces the fee schedule, validated as at initialisation.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the owner
    /// - `InvalidConfig` for a rate above its cap
    ///
    /// # Events
    /// `FeesUpdatedEvent`, plus `ConfigWarningEvent` when the harvest fee
    /// rates do not sum to `MAX_FEE`.
    pub fn set_fee_schedule(
        env: Env,
        caller: Address,
        fees: FeeSchedule,
    ) -> Result<(), StrategyError> {
        guard::require_owner(&env, &caller)?;
        fees.validate()?;
        storage::set_fees(&env, &fees);
        storage::extend_instance(&env);
        if !fees.reconciles() {
            events::config_warning(&env, &fees);
        }
        events::fees_updated(&env, fees);
        Ok(())
    }


    // ==========================================================================
    // READ FUNCTIONS
    // ==========================================================================

    /// Idle plus staked principal.
    pub fn balance_of(env: Env) -> Result<i128, StrategyError> {
        let bindings = storage::bindings(&env)?;
        let held = lifecycle::balance(&env, &bindings.held);
        Ok(held + lifecycle::staked_balance(&env, &bindings)?)
    }

    /// Principal held by the strategy and not staked.
    pub fn balance_of_held(env: Env) -> Result<i128, StrategyError> {
        let bindings = storage::bindings(&env)?;
        Ok(lifecycle::balance(&env, &bindings.held))
    }

    /// Principal staked in the staking protocol.
    pub fn balance_of_staked(env: Env) -> Result<i128, StrategyError> {
        let bindings = storage::bindings(&env)?;
        lifecycle::staked_balance(&env, &bindings)
    }

    /// Whether deposits and harvests are currently rejected.
    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    /// The only address allowed to withdraw and retire.
    ///
    /// # Errors
    /// - `NotInitialized` before `initialize`
    pub fn vault(env: Env) -> Result<Address, StrategyError> {
        Ok(storage::bindings(&env)?.vault)
    }

    /// # Errors
    /// - `NotInitialized` before `initialize`
    pub fn owner(env: Env) -> Result<Address, StrategyError> {
        storage::owner(&env)
    }

    /// Recipient of the strategist fee.
    pub fn strategist(env: Env) -> Result<Address, StrategyError> {
        storage::strategist(&env)
    }

    /// Recipient of the burn-fee proceeds.
    pub fn burn_sink(env: Env) -> Result<Address, StrategyError> {
        Ok(storage::bindings(&env)?.burn_sink)
    }

    /// Asset deposited by the vault and staked.
    pub fn held_asset(env: Env) -> Result<Address, StrategyError> {
        Ok(storage::bindings(&env)?.held)
    }

    /// Asset emitted by the staking protocol.
    pub fn reward_asset(env: Env) -> Result<Address, StrategyError> {
        Ok(storage::bindings(&env)?.reward)
    }

    /// Single or paired, with the pair legs resolved at initialisation.
    pub fn position(env: Env) -> Result<Position, StrategyError> {
        Ok(storage::bindings(&env)?.position)
    }

    /// Current harvest and withdrawal fee rates.
    pub fn fee_schedule(env: Env) -> Result<FeeSchedule, StrategyError> {
        storage::fees(&env)
    }

    /// Skim rate over `SKIM_DENOMINATOR`.
    pub fn skim_rate(env: Env) -> Result<u32, StrategyError> {
        Ok(storage::bindings(&env)?.skim_rate)
    }

    /// Caller check applied to `harvest`.
    pub fn harvest_guard(env: Env) -> Result<HarvestGuard, StrategyError> {
        Ok(storage::bindings(&env)?.harvest_guard)
    }

    /// Stored swap path; empty when `from` and `to` are the same asset.
    ///
    /// # Errors
    /// - `RouteNotFound` for a pair the strategy never swaps
    pub fn route(env: Env, from: Address, to: Address) -> Result<Vec<Address>, StrategyError> {
        routes::lookup(&env, &from, &to)
    }

    /// Current allowance of every tracked grant, as the tokens report it.
    /// An expired grant reads as zero until the next deposit or harvest.
    pub fn allowances(env: Env) -> Vec<Allowance> {
        approvals::allowances(&env)
    }
}
