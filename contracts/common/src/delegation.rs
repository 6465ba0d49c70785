//! Delegated Signer Handshake
//!
//! Two-sided opt-in between an account owner and a delegate signer.
//! The owner proposes, the delegate confirms, and either party can
//! reject. A delegation only counts once both sides have acted:
//!
//! ```text
//! (none) --owner initiate--> Pending --delegate confirm--> Accepted
//!    Pending | Accepted --either party reject--> Rejected
//! ```

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::errors::{ParUsdError, ParUsdResult};
use crate::types::Address;
use crate::Vec;

// ============================================================================
// Types
// ============================================================================

/// Handshake state for one (owner, delegate) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum DelegationStatus {
    /// No delegation, or a terminated one
    #[default]
    Rejected,
    /// Owner has proposed; awaiting the delegate's confirmation
    Pending,
    /// Both sides have agreed
    Accepted,
}

/// One (owner, delegate) handshake record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct DelegationRecord {
    /// Account delegating signing authority
    pub owner: Address,
    /// Proposed delegate signer
    pub delegate: Address,
    /// Current handshake state
    pub status: DelegationStatus,
    /// Block of the last transition
    pub updated_at: u64,
}

/// All delegation records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct DelegationSet {
    records: Vec<DelegationRecord>,
}

impl DelegationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, owner: &Address, delegate: &Address) -> Option<&DelegationRecord> {
        self.records
            .iter()
            .find(|r| &r.owner == owner && &r.delegate == delegate)
    }

    fn find_mut(&mut self, owner: &Address, delegate: &Address) -> Option<&mut DelegationRecord> {
        self.records
            .iter_mut()
            .find(|r| &r.owner == owner && &r.delegate == delegate)
    }

    /// Current status for the pair
    pub fn status(&self, owner: &Address, delegate: &Address) -> DelegationStatus {
        self.find(owner, delegate)
            .map(|r| r.status)
            .unwrap_or(DelegationStatus::Rejected)
    }

    /// Whether the pair has a fully confirmed delegation
    pub fn is_accepted(&self, owner: &Address, delegate: &Address) -> bool {
        self.status(owner, delegate) == DelegationStatus::Accepted
    }

    /// Owner proposes `delegate`; the pair moves to Pending
    pub fn initiate(
        &mut self,
        owner: &Address,
        delegate: Address,
        block_height: u64,
    ) -> ParUsdResult<()> {
        if owner == &delegate {
            return Err(ParUsdError::InvalidParameter {
                param: "delegate",
                reason: "cannot delegate to self",
            });
        }

        if let Some(record) = self.find_mut(owner, &delegate) {
            // Re-initiating resets a rejected pair; a live handshake
            // must be rejected first.
            if record.status != DelegationStatus::Rejected {
                return Err(ParUsdError::InvalidStateTransition);
            }
            record.status = DelegationStatus::Pending;
            record.updated_at = block_height;
            return Ok(());
        }

        self.records.push(DelegationRecord {
            owner: *owner,
            delegate,
            status: DelegationStatus::Pending,
            updated_at: block_height,
        });
        Ok(())
    }

    /// Delegate confirms a pending handshake; the pair moves to Accepted
    pub fn confirm(
        &mut self,
        delegate: &Address,
        owner: &Address,
        block_height: u64,
    ) -> ParUsdResult<()> {
        let record = self
            .find_mut(owner, delegate)
            .filter(|r| r.status == DelegationStatus::Pending)
            .ok_or(ParUsdError::DelegationNotPending {
                owner: *owner,
                delegate: *delegate,
            })?;

        record.status = DelegationStatus::Accepted;
        record.updated_at = block_height;
        Ok(())
    }

    /// Either party terminates the handshake; the pair moves to Rejected
    pub fn reject(
        &mut self,
        caller: &Address,
        owner: &Address,
        delegate: &Address,
        block_height: u64,
    ) -> ParUsdResult<()> {
        if caller != owner && caller != delegate {
            return Err(ParUsdError::UnauthorizedCaller {
                expected: *owner,
                actual: *caller,
            });
        }

        let record = self
            .find_mut(owner, delegate)
            .filter(|r| r.status != DelegationStatus::Rejected)
            .ok_or(ParUsdError::DelegationNotPending {
                owner: *owner,
                delegate: *delegate,
            })?;

        record.status = DelegationStatus::Rejected;
        record.updated_at = block_height;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
