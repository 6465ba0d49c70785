//! Core Types for the parUSD Protocol
//!
//! Fundamental data structures shared across the protocol contracts.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// Type alias for collateral asset identifiers
pub type AssetId = [u8; 32];

/// Derive a deterministic address from a domain tag and a seed address.
///
/// Used for protocol-owned accounts that have no keyholder, such as the
/// redemption escrow.
pub fn derive_address(tag: &[u8], seed: &Address) -> Address {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(tag);
    hasher.update(seed);
    let result = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&result);
    id
}

// ============ Redemption Types ============

/// Which redemption protocol the vault runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum RedemptionMode {
    /// Redeem instantly when liquidity allows, otherwise queue for an
    /// operator to complete
    #[default]
    InstantOrQueued,
    /// Lock for a fixed cooldown, then self-service claim
    Cooldown,
}

/// Per-account redemption record
///
/// At most one active request exists per account. Created on request,
/// amount-mutated in place by updates, destroyed on completion or
/// cancellation. The locked stable units sit in the escrow account for
/// the lifetime of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RedemptionRequest {
    /// Account that opened the request
    pub owner: Address,
    /// Collateral asset the redemption pays out in
    pub asset: AssetId,
    /// Locked stable-unit amount (internal 18-decimal units)
    pub amount: u128,
    /// Block height when the request was opened
    pub requested_at: u64,
    /// Unix time the cooldown expires; None for liquidity-queued requests
    pub cooldown_end: Option<u64>,
}

impl RedemptionRequest {
    /// Create a liquidity-queued request (no cooldown timer)
    pub fn queued(owner: Address, asset: AssetId, amount: u128, block_height: u64) -> Self {
        Self {
            owner,
            asset,
            amount,
            requested_at: block_height,
            cooldown_end: None,
        }
    }

    /// Create a cooldown request claimable after `cooldown_end`
    pub fn with_cooldown(
        owner: Address,
        asset: AssetId,
        amount: u128,
        block_height: u64,
        cooldown_end: u64,
    ) -> Self {
        Self {
            owner,
            asset,
            amount,
            requested_at: block_height,
            cooldown_end: Some(cooldown_end),
        }
    }

    /// Check whether the request is claimable at the given time
    ///
    /// Liquidity-queued requests carry no timer; their completion is an
    /// operator decision, so they are never self-claimable.
    pub fn is_claimable(&self, now: u64) -> bool {
        match self.cooldown_end {
            Some(ends_at) => now >= ends_at,
            None => false,
        }
    }
}

// ============ Fee Types ============

/// Fee parameters for one direction (mint or redeem)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct FeeConfig {
    /// Percentage fee in basis points
    pub fee_bps: u64,
    /// Minimum fee floor in internal 18-decimal units
    pub min_fee: u128,
}

impl FeeConfig {
    /// Create a new fee config
    pub fn new(fee_bps: u64, min_fee: u128) -> Self {
        Self { fee_bps, min_fee }
    }

    /// Zero-fee config (used while no treasury is set)
    pub fn zero() -> Self {
        Self { fee_bps: 0, min_fee: 0 }
    }
}
