use soroban_sdk::contracterror;

/// Errors returned by every strategy entry point.
///
/// Returning any of these aborts the invocation; storage writes and nested
/// contract calls made before the failure are rolled back by the host.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum StrategyError {
    /// `initialize` was called on a configured instance
    AlreadyInitialized = 1,
    /// An entry point ran before `initialize`
    NotInitialized = 2,
    /// The caller does not hold the role the operation requires
    Unauthorized = 3,
    /// Deposit or harvest while paused, or pause while already paused
    Paused = 4,
    /// Unpause while active
    NotPaused = 5,
    /// A swap delivered less than the minimum-output floor
    InsufficientOutput = 6,
    /// The staking protocol or exchange router failed
    ExternalCallFailure = 7,
    /// Fee caps, skim rate or position shape rejected
    InvalidConfig = 8,
    /// Non-positive withdrawal amount
    InvalidAmount = 9,
    /// No stored route for a required (source, destination) pair
    RouteNotFound = 10,
}
