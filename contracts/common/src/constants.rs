//! Protocol Constants
//!
//! All magic numbers and configuration values for the parUSD protocol.
//! Runtime-adjustable parameters (fees, caps, minimums, cooldown) start
//! from these defaults and are mutated through the vault's admin surface.
//!
//! # Network Configuration
//!
//! Use feature flags to compile for different networks:
//! - `mainnet` - Production values (higher minimums, tighter caps)
//! - Default (no feature) - Testnet values (lower minimums for testing)
//!
//! ```toml
//! # For mainnet deployment:
//! parusd-common = { path = "...", features = ["mainnet"] }
//! ```

/// Token Metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "parUSD";
    /// Token symbol
    pub const SYMBOL: &str = "parUSD";
    /// Decimal places (internal precision all collateral is normalized to)
    pub const DECIMALS: u8 = 18;
    /// One unit with decimals (1 parUSD = 10^18 base units)
    pub const ONE: u128 = 1_000_000_000_000_000_000;
}

/// Fee Configuration (in basis points, 100 = 1%)
pub mod fees {
    /// Maximum fee the admin surface accepts for either direction (10%)
    pub const MAX_FEE_BPS: u64 = 1_000;

    /// Default minting fee (0.1%)
    pub const DEFAULT_MINT_FEE_BPS: u64 = 10;

    /// Default redemption fee (0.1%)
    pub const DEFAULT_REDEEM_FEE_BPS: u64 = 10;

    /// Basis points denominator
    pub const BPS_DENOMINATOR: u64 = 10_000;
}

/// Amount and Volume Limits
///
/// Values differ between mainnet and testnet to allow easier testing.
pub mod limits {
    use super::token::ONE;

    /// Minimum net amount a collateral mint must produce
    /// - Mainnet: 100 parUSD (keeps dust mints off the books)
    /// - Testnet: 1 parUSD
    #[cfg(feature = "mainnet")]
    pub const MIN_MINT_AMOUNT: u128 = 100 * ONE;
    #[cfg(not(feature = "mainnet"))]
    pub const MIN_MINT_AMOUNT: u128 = ONE;

    /// Minimum amount a redemption may be opened or updated to
    #[cfg(feature = "mainnet")]
    pub const MIN_REDEEM_AMOUNT: u128 = 100 * ONE;
    #[cfg(not(feature = "mainnet"))]
    pub const MIN_REDEEM_AMOUNT: u128 = ONE;

    /// Default per-block minted-volume cap
    /// - Mainnet: 1M parUSD per block
    /// - Testnet: 100k parUSD per block
    #[cfg(feature = "mainnet")]
    pub const MAX_MINT_PER_BLOCK: u128 = 1_000_000 * ONE;
    #[cfg(not(feature = "mainnet"))]
    pub const MAX_MINT_PER_BLOCK: u128 = 100_000 * ONE;

    /// Default per-block redeemed-volume cap
    #[cfg(feature = "mainnet")]
    pub const MAX_REDEEM_PER_BLOCK: u128 = 1_000_000 * ONE;
    #[cfg(not(feature = "mainnet"))]
    pub const MAX_REDEEM_PER_BLOCK: u128 = 100_000 * ONE;

    /// Helper to check if running in mainnet mode
    #[cfg(feature = "mainnet")]
    pub const IS_MAINNET: bool = true;
    #[cfg(not(feature = "mainnet"))]
    pub const IS_MAINNET: bool = false;
}

/// Cooldown Redemption Configuration
pub mod cooldown {
    /// Default cooldown before a locked redemption may be claimed (7 days)
    pub const DEFAULT_COOLDOWN_SECS: u64 = 7 * 24 * 60 * 60;

    /// Hard ceiling on the configurable cooldown duration (90 days)
    pub const MAX_COOLDOWN_SECS: u64 = 90 * 24 * 60 * 60;
}

/// Collateral Reserve Configuration
pub mod reserve {
    /// Internal precision every collateral amount is normalized to
    pub const INTERNAL_DECIMALS: u8 = 18;

    /// Maximum number of listed collateral assets
    pub const MAX_ASSETS: usize = 32;

    /// Maximum declared precision a listed asset may carry
    pub const MAX_ASSET_DECIMALS: u8 = 30;
}
