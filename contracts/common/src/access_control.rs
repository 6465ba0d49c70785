//! Access Control Module
//!
//! Capability-based authorization for the parUSD protocol, plus the
//! account restriction list and the credential gate seam.
//!
//! ## Key Features
//!
//! - **Capabilities**: named permissions checked through an injected
//!   registry trait so the vault is testable with mock authorization
//! - **Restriction List**: accounts barred from transfer/mint/redeem
//! - **Credential Gate**: external verified-status predicate consumed as
//!   a boolean trait

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeSet;
#[cfg(feature = "std")]
use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::errors::{ParUsdError, ParUsdResult};
use crate::types::Address;
use crate::Vec;

// ============================================================================
// Types
// ============================================================================

/// Protocol capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum Capability {
    /// Full configuration authority
    Admin,
    /// May mint unbacked stable units (protocol-controlled supply)
    Minter,
    /// May complete queued redemptions (the "solver")
    RedemptionOperator,
    /// May pause/unpause and hit the emergency volume shutoff
    EmergencyOperator,
}

/// A capability granted to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RoleGrant {
    /// Account holding the capability
    pub account: Address,
    /// Granted capability
    pub capability: Capability,
    /// Account that granted it
    pub granted_by: Address,
    /// Block when granted
    pub granted_at: u64,
}

// ============================================================================
// Interfaces
// ============================================================================

/// Authorization predicate the vault consumes
pub trait CapabilityRegistry {
    /// Does `account` hold `capability`?
    fn has_role(&self, capability: Capability, account: &Address) -> bool;
}

/// Off-chain-verified credential predicate the vault consumes
pub trait CredentialGate {
    /// Does `account` hold valid credentials?
    fn has_valid_credentials(&self, account: &Address) -> bool;
}

/// Gate implementation that accepts every account.
///
/// Used when no credential service is wired up; the vault's own policy
/// toggle and whitelist layer on top of whatever gate is injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl CredentialGate for OpenGate {
    fn has_valid_credentials(&self, _account: &Address) -> bool {
        true
    }
}

// ============================================================================
// Role Registry
// ============================================================================

/// Concrete capability registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RoleRegistry {
    /// Active grants
    pub grants: Vec<RoleGrant>,
}

impl RoleRegistry {
    /// Create a registry with `admin` holding the Admin capability
    pub fn new(admin: Address, block_height: u64) -> Self {
        Self {
            grants: crate::Vec::from([RoleGrant {
                account: admin,
                capability: Capability::Admin,
                granted_by: admin,
                granted_at: block_height,
            }]),
        }
    }

    /// Grant a capability; caller must hold Admin
    pub fn grant_role(
        &mut self,
        caller: &Address,
        capability: Capability,
        account: Address,
        block_height: u64,
    ) -> ParUsdResult<()> {
        if !self.has_role(Capability::Admin, caller) {
            return Err(ParUsdError::MissingCapability { account: *caller });
        }
        if self.has_role(capability, &account) {
            return Ok(()); // Idempotent
        }

        self.grants.push(RoleGrant {
            account,
            capability,
            granted_by: *caller,
            granted_at: block_height,
        });
        Ok(())
    }

    /// Revoke a capability; caller must hold Admin
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        capability: Capability,
        account: &Address,
    ) -> ParUsdResult<()> {
        if !self.has_role(Capability::Admin, caller) {
            return Err(ParUsdError::MissingCapability { account: *caller });
        }

        self.grants
            .retain(|g| !(g.capability == capability && &g.account == account));
        Ok(())
    }
}

impl CapabilityRegistry for RoleRegistry {
    fn has_role(&self, capability: Capability, account: &Address) -> bool {
        self.grants
            .iter()
            .any(|g| g.capability == capability && &g.account == account)
    }
}

/// Require a capability, surfacing the standard error
pub fn require_role(
    registry: &dyn CapabilityRegistry,
    capability: Capability,
    account: &Address,
) -> ParUsdResult<()> {
    if !registry.has_role(capability, account) {
        return Err(ParUsdError::MissingCapability { account: *account });
    }
    Ok(())
}

// ============================================================================
// Restriction List
// ============================================================================

/// Accounts barred from transfer/mint/redeem operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RestrictionList {
    restricted: BTreeSet<Address>,
}

impl RestrictionList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an account is restricted
    pub fn is_restricted(&self, account: &Address) -> bool {
        self.restricted.contains(account)
    }

    /// Add an account; returns whether it was newly added
    pub fn add(&mut self, account: Address) -> bool {
        self.restricted.insert(account)
    }

    /// Remove an account; returns whether it was present
    pub fn remove(&mut self, account: &Address) -> bool {
        self.restricted.remove(account)
    }

    /// Error unless the account is unrestricted
    pub fn require_unrestricted(&self, account: &Address) -> ParUsdResult<()> {
        if self.is_restricted(account) {
            return Err(ParUsdError::AccountRestricted { account: *account });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
