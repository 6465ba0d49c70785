//! Error Types for the parUSD Protocol
//!
//! Every failure surfaces as a distinct, named condition so callers can
//! branch deterministically. Each variant carries the values that made
//! the operation fail and maps to a stable error code for logging.

use crate::types::{Address, AssetId};

/// Result type alias for parUSD operations
pub type ParUsdResult<T> = Result<T, ParUsdError>;

/// Main error enum for all parUSD protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParUsdError {
    // ============ Validation Errors ============
    /// Zero amount not allowed
    ZeroAmount,

    /// Zero address provided where a real account is required
    ZeroAddress { param: &'static str },

    /// Asset is not listed in the collateral reserve
    UnsupportedAsset { asset: AssetId },

    /// Amount below the configured minimum
    BelowMinimum { amount: u128, minimum: u128 },

    /// Fee rate exceeds the protocol ceiling
    FeeTooHigh { bps: u64, max_bps: u64 },

    /// Computed fee would consume the entire amount
    FeeExceedsAmount { amount: u128, fee: u128 },

    /// Cooldown duration exceeds the protocol ceiling
    CooldownTooLong { duration: u64, maximum: u64 },

    /// Invalid input parameter
    InvalidParameter { param: &'static str, reason: &'static str },

    // ============ Authorization Errors ============
    /// Caller lacks the required capability
    MissingCapability { account: Address },

    /// Account is barred from transfer/mint/redeem operations
    AccountRestricted { account: Address },

    /// Account failed the credential gate
    CredentialCheckFailed { account: Address },

    /// Caller is not the expected privileged address
    UnauthorizedCaller { expected: Address, actual: Address },

    /// Restriction may not target an admin-capability holder
    CannotRestrictAdmin { account: Address },

    // ============ State Errors ============
    /// No active redemption request for the account
    NoActiveRequest { account: Address },

    /// Account already has an active redemption request
    RequestAlreadyExists { account: Address },

    /// Cooldown window has not elapsed yet
    CooldownNotElapsed { now: u64, ends_at: u64 },

    /// Reserve lacks the collateral to satisfy the redemption
    InsufficientLiquidity { available: u128, required: u128 },

    /// Per-block minted-volume cap would be exceeded
    MintLimitExceeded { requested: u128, remaining: u128 },

    /// Per-block redeemed-volume cap would be exceeded
    RedeemLimitExceeded { requested: u128, remaining: u128 },

    /// Protocol is paused
    ProtocolPaused,

    /// Entry point belongs to the other redemption protocol
    WrongRedemptionMode,

    /// Mutating entry point re-entered during execution
    ReentrantCall,

    /// Insufficient balance for operation
    InsufficientBalance { available: u128, requested: u128 },

    /// Asset is already listed in the reserve
    AssetAlreadyListed { asset: AssetId },

    /// Asset cannot be delisted while it backs deposits
    AssetHasBalance { asset: AssetId, balance: u128 },

    /// Rescue may not touch a backing asset or the stable unit
    CannotRescueBackingAsset { asset: AssetId },

    /// Delegation handshake is not in the Pending state
    DelegationNotPending { owner: Address, delegate: Address },

    /// Invalid state transition
    InvalidStateTransition,

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Division by zero
    DivisionByZero,
}

impl ParUsdError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "E001_ZERO_AMOUNT",
            Self::ZeroAddress { .. } => "E002_ZERO_ADDRESS",
            Self::UnsupportedAsset { .. } => "E003_UNSUPPORTED_ASSET",
            Self::BelowMinimum { .. } => "E004_BELOW_MINIMUM",
            Self::FeeTooHigh { .. } => "E005_FEE_TOO_HIGH",
            Self::FeeExceedsAmount { .. } => "E006_FEE_EXCEEDS_AMOUNT",
            Self::CooldownTooLong { .. } => "E007_COOLDOWN_TOO_LONG",
            Self::InvalidParameter { .. } => "E008_INVALID_PARAM",
            Self::MissingCapability { .. } => "E020_MISSING_CAPABILITY",
            Self::AccountRestricted { .. } => "E021_ACCOUNT_RESTRICTED",
            Self::CredentialCheckFailed { .. } => "E022_CREDENTIAL_FAILED",
            Self::UnauthorizedCaller { .. } => "E023_UNAUTHORIZED_CALLER",
            Self::CannotRestrictAdmin { .. } => "E024_CANNOT_RESTRICT_ADMIN",
            Self::NoActiveRequest { .. } => "E040_NO_ACTIVE_REQUEST",
            Self::RequestAlreadyExists { .. } => "E041_REQUEST_EXISTS",
            Self::CooldownNotElapsed { .. } => "E042_COOLDOWN_NOT_ELAPSED",
            Self::InsufficientLiquidity { .. } => "E043_INSUFFICIENT_LIQUIDITY",
            Self::MintLimitExceeded { .. } => "E044_MINT_LIMIT",
            Self::RedeemLimitExceeded { .. } => "E045_REDEEM_LIMIT",
            Self::ProtocolPaused => "E046_PAUSED",
            Self::WrongRedemptionMode => "E047_WRONG_REDEMPTION_MODE",
            Self::ReentrantCall => "E048_REENTRANT_CALL",
            Self::InsufficientBalance { .. } => "E049_INSUFFICIENT_BALANCE",
            Self::AssetAlreadyListed { .. } => "E050_ASSET_LISTED",
            Self::AssetHasBalance { .. } => "E051_ASSET_HAS_BALANCE",
            Self::CannotRescueBackingAsset { .. } => "E052_RESCUE_BACKING_ASSET",
            Self::DelegationNotPending { .. } => "E053_DELEGATION_NOT_PENDING",
            Self::InvalidStateTransition => "E054_INVALID_STATE",
            Self::Overflow => "E080_OVERFLOW",
            Self::DivisionByZero => "E082_DIV_ZERO",
        }
    }

    /// Returns true if this error is recoverable (caller can fix it and retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::BelowMinimum { .. } => true,        // Increase amount
            Self::InsufficientBalance { .. } => true, // Get more funds
            Self::InsufficientLiquidity { .. } => true, // Queue or wait
            Self::MintLimitExceeded { .. } => true,   // Retry next block
            Self::RedeemLimitExceeded { .. } => true, // Retry next block
            Self::CooldownNotElapsed { .. } => true,  // Wait for expiry
            _ => false,
        }
    }
}
