//! Event payloads and their publish helpers.
//!
//! Off-chain harvest bots and indexers key on the single-symbol topic; the
//! payload is a `#[contracttype]` struct.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::fees::{FeeSchedule, FeeSplit, MAX_FEE};

/// Emitted once by `initialize`.
///
/// # Topics
/// - `SymbolShort("init")`
#[contracttype]
pub struct InitializedEvent {
    pub vault: Address,
    pub owner: Address,
    pub strategist: Address,
    pub held: Address,
}

/// Emitted when idle held balance is staked.
///
/// # Topics
/// - `SymbolShort("deposit")`
#[contracttype]
pub struct DepositEvent {
    pub amount: i128,
}

/// Emitted when principal is returned to the vault.
///
/// # Topics
/// - `SymbolShort("withdraw")`
#[contracttype]
pub struct WithdrawEvent {
    pub vault: Address,
    /// Amount transferred to the vault, after the fee
    pub amount: i128,
    /// Withdrawal fee retained by the strategy
    pub fee: i128,
}

/// Emitted on every successful harvest.
///
/// # Topics
/// - `SymbolShort("harvest")`
#[contracttype]
pub struct HarvestEvent {
    pub harvester: Address,
    /// Reward claimed from the staking protocol in this harvest
    pub claimed: i128,
}

/// Hub-asset amounts paid out by one harvest.
///
/// # Topics
/// - `SymbolShort("fees")`
#[contracttype]
pub struct FeesChargedEvent {
    pub call_fee: i128,
    pub burn_fee: i128,
    pub strategist_fee: i128,
}

/// # Topics
/// - `SymbolShort("pause")`
#[contracttype]
pub struct PauseEvent {
    /// True if the strategy is now paused, false if unpaused
    pub paused: bool,
    pub caller: Address,
}

/// # Topics
/// - `SymbolShort("panic")`
#[contracttype]
pub struct PanicEvent {
    pub caller: Address,
    /// Principal returned by the emergency exit
    pub recovered: i128,
}

/// # Topics
/// - `SymbolShort("retired")`
#[contracttype]
pub struct RetireEvent {
    pub vault: Address,
    pub amount: i128,
}

/// # Topics
/// - `SymbolShort("strat_set")`
#[contracttype]
pub struct StrategistUpdatedEvent {
    pub old_strategist: Address,
    pub new_strategist: Address,
}

/// # Topics
/// - `SymbolShort("owner_set")`
#[contracttype]
pub struct OwnerUpdatedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
}

/// # Topics
/// - `SymbolShort("fees_set")`
#[contracttype]
pub struct FeesUpdatedEvent {
    pub fees: FeeSchedule,
}

/// Harvest rates that do not add up to `MAX_FEE`; the difference stays in
/// the strategy as hub asset.
///
/// # Topics
/// - `SymbolShort("cfg_warn")`
#[contracttype]
pub struct ConfigWarningEvent {
    pub harvest_total: u64,
    pub max_fee: u32,
}

pub fn initialized(env: &Env, vault: Address, owner: Address, strategist: Address, held: Address) {
    env.events().publish(
        (symbol_short!("init"),),
        InitializedEvent {
            vault,
            owner,
            strategist,
            held,
        },
    );
}

pub fn deposited(env: &Env, amount: i128) {
    env.events()
        .publish((symbol_short!("deposit"),), DepositEvent { amount });
}

pub fn withdrawn(env: &Env, vault: Address, amount: i128, fee: i128) {
    env.events().publish(
        (symbol_short!("withdraw"),),
        WithdrawEvent { vault, amount, fee },
    );
}

pub fn harvested(env: &Env, harvester: Address, claimed: i128) {
    env.events().publish(
        (symbol_short!("harvest"),),
        HarvestEvent { harvester, claimed },
    );
}

pub fn fees_charged(env: &Env, split: &FeeSplit) {
    env.events().publish(
        (symbol_short!("fees"),),
        FeesChargedEvent {
            call_fee: split.call,
            burn_fee: split.burn,
            strategist_fee: split.strategist,
        },
    );
}

pub fn pause_changed(env: &Env, paused: bool, caller: Address) {
    env.events()
        .publish((symbol_short!("pause"),), PauseEvent { paused, caller });
}

pub fn panicked(env: &Env, caller: Address, recovered: i128) {
    env.events()
        .publish((symbol_short!("panic"),), PanicEvent { caller, recovered });
}

pub fn retired(env: &Env, vault: Address, amount: i128) {
    env.events()
        .publish((symbol_short!("retired"),), RetireEvent { vault, amount });
}

pub fn strategist_updated(env: &Env, old_strategist: Address, new_strategist: Address) {
    env.events().publish(
        (symbol_short!("strat_set"),),
        StrategistUpdatedEvent {
            old_strategist,
            new_strategist,
        },
    );
}

pub fn owner_updated(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("owner_set"),),
        OwnerUpdatedEvent {
            old_owner,
            new_owner,
        },
    );
}

pub fn fees_updated(env: &Env, fees: FeeSchedule) {
    env.events()
        .publish((symbol_short!("fees_set"),), FeesUpdatedEvent { fees });
}

pub fn config_warning(env: &Env, fees: &FeeSchedule) {
    env.events().publish(
        (symbol_short!("cfg_warn"),),
        ConfigWarningEvent {
            harvest_total: fees.harvest_total(),
            max_fee: MAX_FEE,
        },
    );
}
