//! Protocol Events for parUSD
//!
//! Events are accumulated during execution and can be indexed off-chain
//! for building UIs, analytics, and notifications. Every state-mutating
//! operation emits events describing its outcome; escrow movements are
//! reported alongside the operation that caused them.

use crate::types::{Address, AssetId};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Supply Events (0x01 - 0x0F)
    MintExecuted = 0x01,
    UnbackedMint = 0x02,
    Burned = 0x03,

    // Redemption Events (0x10 - 0x1F)
    RedemptionExecuted = 0x10,
    RedemptionQueued = 0x11,
    RedemptionRequestUpdated = 0x12,
    RedemptionCancelled = 0x13,
    RedemptionCompleted = 0x14,
    EscrowReleased = 0x15,

    // Reserve Events (0x20 - 0x2F)
    AssetListed = 0x20,
    AssetDelisted = 0x21,

    // Admin Events (0x30 - 0x4F)
    BlockLimitsUpdated = 0x30,
    MintFeeUpdated = 0x31,
    RedeemFeeUpdated = 0x32,
    TreasuryUpdated = 0x33,
    MinimumsUpdated = 0x34,
    CooldownUpdated = 0x35,
    CredentialPolicyUpdated = 0x36,
    WhitelistUpdated = 0x37,
    RestrictionAdded = 0x38,
    RestrictionRemoved = 0x39,
    Paused = 0x3A,
    Unpaused = 0x3B,
    TokensRescued = 0x3C,
    BalanceRedistributed = 0x3D,

    // Delegation Events (0x50 - 0x5F)
    DelegationInitiated = 0x50,
    DelegationAccepted = 0x51,
    DelegationRejected = 0x52,
}

/// Main event enum containing all protocol events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum ParUsdEvent {
    // ============ Supply Events ============

    /// Emitted when collateral is deposited and stable units are minted
    MintExecuted {
        caller: Address,
        beneficiary: Address,
        asset: AssetId,
        collateral_amount: u128,
        minted: u128,
        fee: u128,
        block_height: u64,
    },

    /// Emitted on a privileged unbacked mint
    UnbackedMint {
        to: Address,
        amount: u128,
        block_height: u64,
    },

    /// Emitted when a holder burns their own stable units
    Burned {
        account: Address,
        amount: u128,
        block_height: u64,
    },

    // ============ Redemption Events ============

    /// Emitted when a redemption executes instantly
    RedemptionExecuted {
        account: Address,
        asset: AssetId,
        amount: u128,
        collateral_paid: u128,
        fee: u128,
        block_height: u64,
    },

    /// Emitted when a redemption is queued pending liquidity or cooldown
    RedemptionQueued {
        account: Address,
        asset: AssetId,
        amount: u128,
        cooldown_end: Option<u64>,
        block_height: u64,
    },

    /// Emitted when a pending request's amount changes
    RedemptionRequestUpdated {
        account: Address,
        old_amount: u128,
        new_amount: u128,
        block_height: u64,
    },

    /// Emitted when a pending request is cancelled
    RedemptionCancelled {
        account: Address,
        amount: u128,
        block_height: u64,
    },

    /// Emitted when a pending request completes and pays out
    RedemptionCompleted {
        account: Address,
        asset: AssetId,
        amount: u128,
        collateral_paid: u128,
        fee: u128,
        block_height: u64,
    },

    /// Emitted when escrowed funds move out of the escrow account
    EscrowReleased {
        to: Address,
        amount: u128,
        block_height: u64,
    },

    // ============ Reserve Events ============

    /// Emitted when a collateral asset is listed
    AssetListed {
        asset: AssetId,
        decimals: u8,
        block_height: u64,
    },

    /// Emitted when a collateral asset is delisted
    AssetDelisted {
        asset: AssetId,
        block_height: u64,
    },

    // ============ Admin Events ============

    /// Emitted when per-block volume caps change
    BlockLimitsUpdated {
        max_mint_per_block: u128,
        max_redeem_per_block: u128,
        block_height: u64,
    },

    /// Emitted when the minting fee schedule changes
    MintFeeUpdated {
        fee_bps: u64,
        min_fee: u128,
        block_height: u64,
    },

    /// Emitted when the redemption fee schedule changes
    RedeemFeeUpdated {
        fee_bps: u64,
        min_fee: u128,
        block_height: u64,
    },

    /// Emitted when the fee treasury changes
    TreasuryUpdated {
        treasury: Option<Address>,
        block_height: u64,
    },

    /// Emitted when minimum mint/redeem amounts change
    MinimumsUpdated {
        min_mint_amount: u128,
        min_redeem_amount: u128,
        block_height: u64,
    },

    /// Emitted when the cooldown duration changes
    CooldownUpdated {
        duration_secs: u64,
        block_height: u64,
    },

    /// Emitted when the credential gate policy toggles
    CredentialPolicyUpdated {
        enabled: bool,
        block_height: u64,
    },

    /// Emitted when the credential whitelist changes
    WhitelistUpdated {
        account: Address,
        added: bool,
        block_height: u64,
    },

    /// Emitted when an account is restricted
    RestrictionAdded {
        account: Address,
        block_height: u64,
    },

    /// Emitted when an account's restriction is lifted
    RestrictionRemoved {
        account: Address,
        block_height: u64,
    },

    /// Emitted when mint/redeem entry points are paused
    Paused {
        by: Address,
        block_height: u64,
    },

    /// Emitted when mint/redeem entry points resume
    Unpaused {
        by: Address,
        block_height: u64,
    },

    /// Emitted when unrelated tokens are rescued from the vault
    TokensRescued {
        asset: AssetId,
        to: Address,
        amount: u128,
        block_height: u64,
    },

    /// Emitted when a restricted account's balance is redistributed
    BalanceRedistributed {
        from: Address,
        to: Option<Address>,
        amount: u128,
        block_height: u64,
    },

    // ============ Delegation Events ============

    /// Emitted when an owner proposes a delegated signer
    DelegationInitiated {
        owner: Address,
        delegate: Address,
        block_height: u64,
    },

    /// Emitted when a delegate confirms the handshake
    DelegationAccepted {
        owner: Address,
        delegate: Address,
        block_height: u64,
    },

    /// Emitted when either party rejects the handshake
    DelegationRejected {
        owner: Address,
        delegate: Address,
        block_height: u64,
    },
}

impl ParUsdEvent {
    /// Get the event type for indexing
    pub fn event_type(&self) -> EventType {
        match self {
            Self::MintExecuted { .. } => EventType::MintExecuted,
            Self::UnbackedMint { .. } => EventType::UnbackedMint,
            Self::Burned { .. } => EventType::Burned,
            Self::RedemptionExecuted { .. } => EventType::RedemptionExecuted,
            Self::RedemptionQueued { .. } => EventType::RedemptionQueued,
            Self::RedemptionRequestUpdated { .. } => EventType::RedemptionRequestUpdated,
            Self::RedemptionCancelled { .. } => EventType::RedemptionCancelled,
            Self::RedemptionCompleted { .. } => EventType::RedemptionCompleted,
            Self::EscrowReleased { .. } => EventType::EscrowReleased,
            Self::AssetListed { .. } => EventType::AssetListed,
            Self::AssetDelisted { .. } => EventType::AssetDelisted,
            Self::BlockLimitsUpdated { .. } => EventType::BlockLimitsUpdated,
            Self::MintFeeUpdated { .. } => EventType::MintFeeUpdated,
            Self::RedeemFeeUpdated { .. } => EventType::RedeemFeeUpdated,
            Self::TreasuryUpdated { .. } => EventType::TreasuryUpdated,
            Self::MinimumsUpdated { .. } => EventType::MinimumsUpdated,
            Self::CooldownUpdated { .. } => EventType::CooldownUpdated,
            Self::CredentialPolicyUpdated { .. } => EventType::CredentialPolicyUpdated,
            Self::WhitelistUpdated { .. } => EventType::WhitelistUpdated,
            Self::RestrictionAdded { .. } => EventType::RestrictionAdded,
            Self::RestrictionRemoved { .. } => EventType::RestrictionRemoved,
            Self::Paused { .. } => EventType::Paused,
            Self::Unpaused { .. } => EventType::Unpaused,
            Self::TokensRescued { .. } => EventType::TokensRescued,
            Self::BalanceRedistributed { .. } => EventType::BalanceRedistributed,
            Self::DelegationInitiated { .. } => EventType::DelegationInitiated,
            Self::DelegationAccepted { .. } => EventType::DelegationAccepted,
            Self::DelegationRejected { .. } => EventType::DelegationRejected,
        }
    }

    /// Get the block height the event was emitted at
    pub fn block_height(&self) -> u64 {
        match self {
            Self::MintExecuted { block_height, .. }
            | Self::UnbackedMint { block_height, .. }
            | Self::Burned { block_height, .. }
            | Self::RedemptionExecuted { block_height, .. }
            | Self::RedemptionQueued { block_height, .. }
            | Self::RedemptionRequestUpdated { block_height, .. }
            | Self::RedemptionCancelled { block_height, .. }
            | Self::RedemptionCompleted { block_height, .. }
            | Self::EscrowReleased { block_height, .. }
            | Self::AssetListed { block_height, .. }
            | Self::AssetDelisted { block_height, .. }
            | Self::BlockLimitsUpdated { block_height, .. }
            | Self::MintFeeUpdated { block_height, .. }
            | Self::RedeemFeeUpdated { block_height, .. }
            | Self::TreasuryUpdated { block_height, .. }
            | Self::MinimumsUpdated { block_height, .. }
            | Self::CooldownUpdated { block_height, .. }
            | Self::CredentialPolicyUpdated { block_height, .. }
            | Self::WhitelistUpdated { block_height, .. }
            | Self::RestrictionAdded { block_height, .. }
            | Self::RestrictionRemoved { block_height, .. }
            | Self::Paused { block_height, .. }
            | Self::Unpaused { block_height, .. }
            | Self::TokensRescued { block_height, .. }
            | Self::BalanceRedistributed { block_height, .. }
            | Self::DelegationInitiated { block_height, .. }
            | Self::DelegationAccepted { block_height, .. }
            | Self::DelegationRejected { block_height, .. } => *block_height,
        }
    }

    /// Serialize the event for storage or transport
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize an event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Accumulated event log for a call sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EventLog {
    events: Vec<ParUsdEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: ParUsdEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[ParUsdEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<ParUsdEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&ParUsdEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let event = ParUsdEvent::RedemptionQueued {
            account: [1u8; 32],
            asset: [2u8; 32],
            amount: 500,
            cooldown_end: None,
            block_height: 100,
        };

        assert_eq!(event.event_type(), EventType::RedemptionQueued);
        assert_eq!(event.block_height(), 100);
    }

    #[test]
    fn test_event_serialization() {
        let event = ParUsdEvent::MintExecuted {
            caller: [1u8; 32],
            beneficiary: [2u8; 32],
            asset: [3u8; 32],
            collateral_amount: 1_000_000,
            minted: 999_000_000_000_000_000,
            fee: 1_000_000_000_000_000,
            block_height: 200,
        };

        let bytes = event.to_bytes();
        let restored = ParUsdEvent::from_bytes(&bytes).unwrap();

        assert_eq!(event, restored);
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();

        log.emit(ParUsdEvent::Paused {
            by: [1u8; 32],
            block_height: 100,
        });
        log.emit(ParUsdEvent::Unpaused {
            by: [1u8; 32],
            block_height: 101,
        });

        assert_eq!(log.len(), 2);
        assert!(log.has_events());

        let paused = log.filter_by_type(EventType::Paused);
        assert_eq!(paused.len(), 1);

        log.clear();
        assert!(log.is_empty());
    }
}
