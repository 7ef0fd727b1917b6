use soroban_sdk::{contracttype, Address, Vec};

use crate::fees::FeeSchedule;

/// Locates the strategy's position inside the staking protocol.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PoolRef {
    /// Single-asset staking, no pool index
    Single,
    /// Numeric pool index in a multi-pool staking protocol
    Index(u32),
}

/// Shape of the held asset, chosen at initialisation.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PositionKind {
    /// The held asset is staked as-is
    Single,
    /// The held asset is a liquidity-pair token
    Paired,
}

/// Resolved position, stored after the pair legs have been looked up.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Position {
    Single,
    /// Pair legs as reported by the pair inspector (token_0, token_1)
    Paired(Address, Address),
}

/// Caller check applied to `harvest`.
///
/// The two modes are not equivalent: `ExternalAccount` rejects every contract
/// address, including custom-account contracts that can sign for themselves,
/// while `Signer` accepts any address that authorizes the invocation.
///
/// Both modes inspect only the `caller` argument. A contract may still invoke
/// `harvest` with an account as `caller` when that account signed the
/// sub-invocation, so neither mode stops a harvest routed through a contract.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HarvestGuard {
    ExternalAccount,
    Signer,
}

/// Initialisation payload. Everything except owner, strategist and the fee
/// schedule is immutable once stored.
#[contracttype]
#[derive(Clone, Debug)]
pub struct StrategyConfig {
    pub vault: Address,
    pub owner: Address,
    pub strategist: Address,
    /// Recipient of the burn-fee proceeds; a plain address
    pub burn_sink: Address,
    pub staking: Address,
    pub router: Address,
    /// Asset deposited by the vault and staked
    pub held: Address,
    /// Asset emitted by the staking protocol
    pub reward: Address,
    /// Routing hub every fee conversion passes through
    pub hub: Address,
    /// Asset bought with the burn fee
    pub burn_token: Address,
    /// Assets with a direct market against the reward asset
    pub intermediates: Vec<Address>,
    pub pool: PoolRef,
    pub kind: PositionKind,
    pub fees: FeeSchedule,
    /// Share of harvested reward skimmed for fees, over `SKIM_DENOMINATOR`
    pub skim_rate: u32,
    pub harvest_guard: HarvestGuard,
    pub owner_withdrawal_fee_waived: bool,
}

/// Immutable bindings resolved from `StrategyConfig` at initialisation.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Bindings {
    pub vault: Address,
    pub burn_sink: Address,
    pub staking: Address,
    pub router: Address,
    pub held: Address,
    pub reward: Address,
    pub hub: Address,
    pub burn_token: Address,
    pub pool: PoolRef,
    pub position: Position,
    pub skim_rate: u32,
    pub harvest_guard: HarvestGuard,
    pub owner_withdrawal_fee_waived: bool,
}
