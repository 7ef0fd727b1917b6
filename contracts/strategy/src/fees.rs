//! Fee schedule and fixed-point fee arithmetic.
//!
//! Harvest fees are parts of [`MAX_FEE`] applied to the hub-asset balance
//! obtained by converting the skim. The skim itself is an independent rate
//! over [`SKIM_DENOMINATOR`] applied to the reward balance, and the
//! withdrawal fee is parts of [`WITHDRAWAL_MAX`] applied to withdrawn
//! principal. All divisions round down.

use soroban_sdk::contracttype;

use crate::errors::StrategyError;

/// Denominator of the call, strategist and burn rates.
pub const MAX_FEE: u32 = 1_000;
/// Denominator of the withdrawal rate.
pub const WITHDRAWAL_MAX: u32 = 10_000;
/// Highest accepted withdrawal rate (1%).
pub const WITHDRAWAL_FEE_CAP: u32 = 100;
/// Denominator of the skim rate.
pub const SKIM_DENOMINATOR: u32 = 1_000;
/// Highest accepted skim rate (10%).
pub const SKIM_RATE_CAP: u32 = 100;
/// 3.5% skim used by the LP-farming variants.
pub const SKIM_RATE_STANDARD: u32 = 35;
/// 2.5% skim used by the single-asset variants.
pub const SKIM_RATE_REDUCED: u32 = 25;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeeSchedule {
    /// Paid to the harvest caller, over `MAX_FEE`
    pub call_fee: u32,
    /// Paid to the strategist, over `MAX_FEE`
    pub strategist_fee: u32,
    /// Converted to the burn token and sent to the burn sink, over `MAX_FEE`
    pub burn_fee: u32,
    /// Retained from withdrawals, over `WITHDRAWAL_MAX`
    pub withdrawal_fee: u32,
}

/// Amounts of hub asset owed to each stakeholder for one harvest.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FeeSplit {
    pub call: i128,
    pub burn: i128,
    pub strategist: i128,
}

impl FeeSplit {
    pub fn total(&self) -> i128 {
        self.call + self.burn + self.strategist
    }
}

impl FeeSchedule {
    /// 20% caller, 20% strategist, 60% burn, 0.1% withdrawal.
    pub const fn standard() -> Self {
        Self {
            call_fee: 200,
            strategist_fee: 200,
            burn_fee: 600,
            withdrawal_fee: 10,
        }
    }

    pub fn harvest_total(&self) -> u64 {
        self.call_fee as u64 + self.strategist_fee as u64 + self.burn_fee as u64
    }

    /// True when the harvest rates distribute the whole hub balance.
    pub fn reconciles(&self) -> bool {
        self.harvest_total() == MAX_FEE as u64
    }

    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.harvest_total() > MAX_FEE as u64 || self.withdrawal_fee > WITHDRAWAL_FEE_CAP {
            return Err(StrategyError::InvalidConfig);
        }
        Ok(())
    }

    /// Each share is computed independently against `MAX_FEE`; rounding dust
    /// is left to the caller.
    pub fn split(&self, hub_amount: i128) -> FeeSplit {
        FeeSplit {
            call: fraction(hub_amount, self.call_fee, MAX_FEE),
            burn: fraction(hub_amount, self.burn_fee, MAX_FEE),
            strategist: fraction(hub_amount, self.strategist_fee, MAX_FEE),
        }
    }

    pub fn withdrawal_fee_on(&self, amount: i128) -> i128 {
        fraction(amount, self.withdrawal_fee, WITHDRAWAL_MAX)
    }
}

pub fn validate_skim_rate(rate: u32) -> Result<(), StrategyError> {
    if rate > SKIM_RATE_CAP {
        return Err(StrategyError::InvalidConfig);
    }
    Ok(())
}

/// Portion of the reward balance withheld for fee distribution.
pub fn skim(reward_balance: i128, rate: u32) -> i128 {
    fraction(reward_balance, rate, SKIM_DENOMINATOR)
}

fn fraction(amount: i128, numerator: u32, denominator: u32) -> i128 {
    if amount <= 0 {
        return 0;
    }
    amount * numerator as i128 / denominator as i128
}
