//! Mock collaborators and fixtures for the strategy tests.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error,
    testutils::{Address as _, Events as _, Ledger as _},
    token,
    xdr::{AccountId, PublicKey, ScAddress, ScVal, Uint256},
    vec, Address, Env, IntoVal, Symbol, TryFromVal, Val, Vec,
};

use crate::{
    CompoundingStrategy, CompoundingStrategyClient, FeeSchedule, HarvestGuard, PoolRef,
    PositionKind, StrategyConfig, SKIM_RATE_REDUCED, SKIM_RATE_STANDARD,
};

/// Entry TTL for every contract the fixture registers, long enough to
/// outlive an allowance.
const FIXTURE_ENTRY_TTL: u32 = 4_000_000;

/// A classic (non-contract) account address.
pub fn account(env: &Env, seed: u8) -> Address {
    let id = ScAddress::Account(AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(
        [seed; 32],
    ))));
    Address::try_from_val(env, &ScVal::Address(id)).unwrap()
}

/// Payload of the most recent event published under `topic`.
pub fn last_event(env: &Env, topic: Symbol) -> Option<Val> {
    let topics: Vec<Val> = (topic,).into_val(env);
    env.events()
        .all()
        .iter()
        .filter(|(_, event_topics, _)| *event_topics == topics)
        .map(|(_, _, data)| data)
        .last()
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum MockError {
    Offline = 1,
    InsufficientBalance = 2,
    InsufficientAllowance = 3,
    AllowanceNotZeroed = 4,
}

// ============================================================================
// TOKEN
// ============================================================================

#[contracttype]
enum TokenKey {
    Balance(Address),
    Allowance(Address, Address),
    Legs,
}

/// Token implementing the subset of the standard interface the strategy
/// uses. Like some real tokens, it refuses to move an allowance from one
/// non-zero value to another. Allowances read as zero once their expiration
/// ledger has passed. Doubles as a pair token when legs are set.
#[contract]
pub struct MockToken;

#[contractimpl]
impl MockToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .instance()
            .set(&TokenKey::Balance(to), &(balance + amount));
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .instance()
            .get(&TokenKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        let (amount, expiration_ledger): (i128, u32) = env
            .storage()
            .instance()
            .get(&TokenKey::Allowance(from, spender))
            .unwrap_or((0, 0));
        if expiration_ledger < env.ledger().sequence() {
            return 0;
        }
        amount
    }

    pub fn approve(env: Env, from: Address, spender: Address, amount: i128, expiration_ledger: u32) {
        from.require_auth();
        let current = Self::allowance(env.clone(), from.clone(), spender.clone());
        if current != 0 && amount != 0 {
            panic_with_error!(&env, MockError::AllowanceNotZeroed);
        }
        env.storage()
            .instance()
            .set(&TokenKey::Allowance(from, spender), &(amount, expiration_ledger));
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        Self::move_balance(&env, from, to, amount);
    }

    pub fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: i128) {
        spender.require_auth();
        let allowance = Self::allowance(env.clone(), from.clone(), spender.clone());
        if allowance < amount {
            panic_with_error!(&env, MockError::InsufficientAllowance);
        }
        if allowance != i128::MAX {
            let key = TokenKey::Allowance(from.clone(), spender);
            let (_, expiration_ledger): (i128, u32) = env.storage().instance().get(&key).unwrap();
            env.storage()
                .instance()
                .set(&key, &(allowance - amount, expiration_ledger));
        }
        Self::move_balance(&env, from, to, amount);
    }

    pub fn set_legs(env: Env, token_0: Address, token_1: Address) {
        env.storage()
            .instance()
            .set(&TokenKey::Legs, &(token_0, token_1));
    }

    pub fn token_0(env: Env) -> Address {
        let (token_0, _): (Address, Address) = env.storage().instance().get(&TokenKey::Legs).unwrap();
        token_0
    }

    pub fn token_1(env: Env) -> Address {
        let (_, token_1): (Address, Address) = env.storage().instance().get(&TokenKey::Legs).unwrap();
        token_1
    }

    fn move_balance(env: &Env, from: Address, to: Address, amount: i128) {
        let from_balance = Self::balance(env.clone(), from.clone());
        if from_balance < amount {
            panic_with_error!(env, MockError::InsufficientBalance);
        }
        env.storage()
            .instance()
            .set(&TokenKey::Balance(from), &(from_balance - amount));
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .instance()
            .set(&TokenKey::Balance(to), &(to_balance + amount));
    }
}

// ============================================================================
// STAKING PROTOCOL
// ============================================================================

#[contracttype]
enum StakingKey {
    Held,
    Reward,
    Pending,
    Offline,
    Position(Address),
}

/// Staking protocol paying a preset reward on the next claim.
#[contract]
pub struct MockStaking;

#[contractimpl]
impl MockStaking {
    pub fn init(env: Env, held: Address, reward: Address) {
        env.storage().instance().set(&StakingKey::Held, &held);
        env.storage().instance().set(&StakingKey::Reward, &reward);
    }

    pub fn set_pending(env: Env, amount: i128) {
        env.storage().instance().set(&StakingKey::Pending, &amount);
    }

    pub fn pending(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&StakingKey::Pending)
            .unwrap_or(0)
    }

    pub fn set_offline(env: Env, offline: bool) {
        env.storage().instance().set(&StakingKey::Offline, &offline);
    }

    pub fn stake(env: Env, from: Address, _pool: PoolRef, amount: i128) {
        Self::require_online(&env);
        from.require_auth();
        let this = env.current_contract_address();
        token::Client::new(&env, &Self::held(&env)).transfer_from(&this, &from, &this, &amount);
        let position = Self::position_of(&env, &from);
        Self::set_position(&env, &from, position + amount);
    }

    pub fn unstake(env: Env, from: Address, _pool: PoolRef, amount: i128) {
        Self::require_online(&env);
        from.require_auth();
        let position = Self::position_of(&env, &from);
        if position < amount {
            panic_with_error!(&env, MockError::InsufficientBalance);
        }
        Self::set_position(&env, &from, position - amount);
        token::Client::new(&env, &Self::held(&env)).transfer(
            &env.current_contract_address(),
            &from,
            &amount,
        );
    }

    pub fn claim(env: Env, from: Address, _pool: PoolRef) {
        Self::require_online(&env);
        from.require_auth();
        let pending = Self::pending(env.clone());
        if pending > 0 {
            let reward: Address = env.storage().instance().get(&StakingKey::Reward).unwrap();
            MockTokenClient::new(&env, &reward).mint(&from, &pending);
            env.storage().instance().set(&StakingKey::Pending, &0_i128);
        }
    }

    pub fn emergency_exit(env: Env, from: Address, _pool: PoolRef) {
        from.require_auth();
        let position = Self::position_of(&env, &from);
        Self::set_position(&env, &from, 0);
        env.storage().instance().set(&StakingKey::Pending, &0_i128);
        token::Client::new(&env, &Self::held(&env)).transfer(
            &env.current_contract_address(),
            &from,
            &position,
        );
    }

    pub fn position(env: Env, _pool: PoolRef, owner: Address) -> i128 {
        Self::position_of(&env, &owner)
    }

    fn require_online(env: &Env) {
        if env.storage().instance().get(&StakingKey::Offline).unwrap_or(false) {
            panic_with_error!(env, MockError::Offline);
        }
    }

    fn held(env: &Env) -> Address {
        env.storage().instance().get(&StakingKey::Held).unwrap()
    }

    fn position_of(env: &Env, owner: &Address) -> i128 {
        env.storage()
            .instance()
            .get(&StakingKey::Position(owner.clone()))
            .unwrap_or(0)
    }

    fn set_position(env: &Env, owner: &Address, amount: i128) {
        env.storage()
            .instance()
            .set(&StakingKey::Position(owner.clone()), &amount);
    }
}

// ============================================================================
// ROUTER
// ============================================================================

#[contracttype]
enum RouterKey {
    Rate,
    Offline,
    PairToken,
}

/// Router paying a fixed rate per hop and minting outputs. Does not enforce
/// `amount_out_min`, so the strategy's own floor check is what trips.
#[contract]
pub struct MockRouter;

#[contractimpl]
impl MockRouter {
    pub fn set_rate(env: Env, numerator: i128, denominator: i128) {
        env.storage()
            .instance()
            .set(&RouterKey::Rate, &(numerator, denominator));
    }

    pub fn set_router_offline(env: Env, offline: bool) {
        env.storage().instance().set(&RouterKey::Offline, &offline);
    }

    pub fn set_pair_token(env: Env, pair: Address) {
        env.storage().instance().set(&RouterKey::PairToken, &pair);
    }

    pub fn swap_exact_tokens_for_tokens(
        env: Env,
        sender: Address,
        amount_in: i128,
        _amount_out_min: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Vec<i128> {
        Self::require_online(&env);
        assert!(deadline >= env.ledger().timestamp(), "expired");

        let this = env.current_contract_address();
        token::Client::new(&env, &path.get(0).unwrap()).transfer_from(&this, &sender, &this, &amount_in);

        let (numerator, denominator): (i128, i128) = env
            .storage()
            .instance()
            .get(&RouterKey::Rate)
            .unwrap_or((1, 1));
        let mut amounts = vec![&env, amount_in];
        let mut out = amount_in;
        for _ in 1..path.len() {
            out = out * numerator / denominator;
            amounts.push_back(out);
        }
        MockTokenClient::new(&env, &path.last().unwrap()).mint(&to, &out);
        amounts
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity(
        env: Env,
        token_a: Address,
        token_b: Address,
        amount_a_desired: i128,
        amount_b_desired: i128,
        _amount_a_min: i128,
        _amount_b_min: i128,
        to: Address,
        _deadline: u64,
    ) -> (i128, i128, i128) {
        Self::require_online(&env);
        let this = env.current_contract_address();
        token::Client::new(&env, &token_a).transfer_from(&this, &to, &this, &amount_a_desired);
        token::Client::new(&env, &token_b).transfer_from(&this, &to, &this, &amount_b_desired);

        let liquidity = amount_a_desired.min(amount_b_desired);
        let pair: Address = env.storage().instance().get(&RouterKey::PairToken).unwrap();
        MockTokenClient::new(&env, &pair).mint(&to, &liquidity);
        (amount_a_desired, amount_b_desired, liquidity)
    }

    fn require_online(env: &Env) {
        if env.storage().instance().get(&RouterKey::Offline).unwrap_or(false) {
            panic_with_error!(env, MockError::Offline);
        }
    }
}

// ============================================================================
// FIXTURE
// ============================================================================

/// What the fixture's strategy stakes.
#[derive(Clone, Copy)]
pub enum Staked {
    /// The reward asset itself.
    Reward,
    /// A separate asset that leftover reward is sold into.
    Other,
    /// A pair token whose legs are the hub and `leg_1`.
    HubPair,
    /// A pair token whose legs are the reward and `leg_1`.
    RewardPair,
}

/// A strategy wired to mock collaborators. The router pays two units of
/// output per unit of input on every hop.
pub struct Setup<'a> {
    pub env: Env,
    pub strategy: CompoundingStrategyClient<'a>,
    pub staking: MockStakingClient<'a>,
    pub router: MockRouterClient<'a>,
    pub held: Address,
    pub reward: Address,
    pub hub: Address,
    pub burn_token: Address,
    pub leg_1: Address,
    pub vault: Address,
    pub owner: Address,
    pub strategist: Address,
    pub burn_sink: Address,
    pub harvester: Address,
}

impl<'a> Setup<'a> {
    /// Stakes the reward asset directly.
    pub fn single() -> Self {
        Self::build(Staked::Reward, |_| {})
    }

    /// Stakes a hub/`leg_1` pair token.
    pub fn paired() -> Self {
        Self::build(Staked::HubPair, |_| {})
    }

    pub fn build(staked: Staked, tweak: impl FnOnce(&mut StrategyConfig)) -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().with_mut(|ledger| {
            ledger.min_persistent_entry_ttl = FIXTURE_ENTRY_TTL;
            ledger.max_entry_ttl = FIXTURE_ENTRY_TTL * 2;
        });

        let reward = env.register_contract(None, MockToken);
        let hub = env.register_contract(None, MockToken);
        let burn_token = env.register_contract(None, MockToken);
        let leg_1 = env.register_contract(None, MockToken);
        let (kind, held, pool, skim_rate) = match staked {
            Staked::Reward => (
                PositionKind::Single,
                reward.clone(),
                PoolRef::Single,
                SKIM_RATE_REDUCED,
            ),
            Staked::Other => (
                PositionKind::Single,
                env.register_contract(None, MockToken),
                PoolRef::Index(1),
                SKIM_RATE_REDUCED,
            ),
            Staked::HubPair => (
                PositionKind::Paired,
                pair_token(&env, &hub, &leg_1),
                PoolRef::Index(3),
                SKIM_RATE_STANDARD,
            ),
            Staked::RewardPair => (
                PositionKind::Paired,
                pair_token(&env, &reward, &leg_1),
                PoolRef::Index(3),
                SKIM_RATE_STANDARD,
            ),
        };

        let staking_id = env.register_contract(None, MockStaking);
        let staking = MockStakingClient::new(&env, &staking_id);
        staking.init(&held, &reward);

        let router_id = env.register_contract(None, MockRouter);
        let router = MockRouterClient::new(&env, &router_id);
        router.set_rate(&2, &1);
        router.set_pair_token(&held);

        let vault = Address::generate(&env);
        let owner = Address::generate(&env);
        let strategist = Address::generate(&env);
        let burn_sink = Address::generate(&env);
        let harvester = account(&env, 1);

        let mut config = StrategyConfig {
            vault: vault.clone(),
            owner: owner.clone(),
            strategist: strategist.clone(),
            burn_sink: burn_sink.clone(),
            staking: staking_id,
            router: router_id,
            held: held.clone(),
            reward: reward.clone(),
            hub: hub.clone(),
            burn_token: burn_token.clone(),
            intermediates: Vec::new(&env),
            pool,
            kind,
            fees: FeeSchedule::standard(),
            skim_rate,
            harvest_guard: HarvestGuard::ExternalAccount,
            owner_withdrawal_fee_waived: false,
        };
        tweak(&mut config);

        let strategy_id = env.register_contract(None, CompoundingStrategy);
        let strategy = CompoundingStrategyClient::new(&env, &strategy_id);
        strategy.initialize(&config);

        Setup {
            env,
            strategy,
            staking,
            router,
            held,
            reward,
            hub,
            burn_token,
            leg_1,
            vault,
            owner,
            strategist,
            burn_sink,
            harvester,
        }
    }

    pub fn token(&self, asset: &Address) -> MockTokenClient<'a> {
        MockTokenClient::new(&self.env, asset)
    }

    pub fn balance(&self, asset: &Address, id: &Address) -> i128 {
        self.token(asset).balance(id)
    }

    /// Moves the ledger forward by `ledgers`.
    pub fn advance(&self, ledgers: u32) {
        self.env.ledger().with_mut(|ledger| {
            ledger.sequence_number += ledgers;
        });
    }

    /// Vault-side deposit: hand over `amount` of principal and stake it.
    pub fn fund(&self, amount: i128) {
        self.token(&self.held).mint(&self.strategy.address, &amount);
        self.strategy.deposit();
    }
}

fn pair_token(env: &Env, token_0: &Address, token_1: &Address) -> Address {
    let pair = env.register_contract(None, MockToken);
    MockTokenClient::new(env, &pair).set_legs(token_0, token_1);
    pair
}
