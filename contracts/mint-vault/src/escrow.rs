//! Redemption Escrow
//!
//! A minimal custodial ledger for stable units locked pending
//! redemption. Funds sit in the token ledger under a derived escrow
//! account that no keyholder controls; the only way out is `release`,
//! callable by the vault's configured address. This segregates locked
//! redemption funds from the vault's own operating balance, so a user
//! cannot reclaim escrowed funds through an ordinary transfer.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use parusd_common::{
    access_control::RestrictionList,
    errors::{ParUsdError, ParUsdResult},
    types::{derive_address, Address},
};
use parusd_token::StableTokenState;

/// Escrow accounting for locked redemption funds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EscrowState {
    /// Derived account the locked funds sit under
    pub account: Address,
    /// The only address allowed to move funds out
    pub vault: Address,
    /// Total stable units currently locked
    pub total_locked: u128,
}

impl EscrowState {
    /// Create the escrow for a vault; the escrow account is derived
    /// deterministically from the vault address
    pub fn new(vault: Address) -> Self {
        Self {
            account: derive_address(b"parusd/redemption-escrow", &vault),
            vault,
            total_locked: 0,
        }
    }

    /// Lock `amount` from `from` into the escrow account
    pub fn lock(
        &mut self,
        token: &mut StableTokenState,
        restrictions: &RestrictionList,
        from: &Address,
        amount: u128,
    ) -> ParUsdResult<()> {
        token.transfer(restrictions, from, &self.account, amount)?;
        self.total_locked = self
            .total_locked
            .checked_add(amount)
            .ok_or(ParUsdError::Overflow)?;
        Ok(())
    }

    /// Release `amount` from escrow to `to`; vault only.
    ///
    /// Restriction rules apply to the recipient, so an account that was
    /// restricted after locking cannot pull its funds back out.
    pub fn release(
        &mut self,
        caller: &Address,
        token: &mut StableTokenState,
        restrictions: &RestrictionList,
        to: &Address,
        amount: u128,
    ) -> ParUsdResult<()> {
        if caller != &self.vault {
            return Err(ParUsdError::UnauthorizedCaller {
                expected: self.vault,
                actual: *caller,
            });
        }
        if self.total_locked < amount {
            return Err(ParUsdError::InsufficientBalance {
                available: self.total_locked,
                requested: amount,
            });
        }

        token.transfer(restrictions, &self.account, to, amount)?;
        self.total_locked -= amount;
        Ok(())
    }
}
