//! parUSD Token Contract
//!
//! Account ledger for the parUSD stable unit. Only the configured mint
//! vault may mint or burn; transfers respect the protocol restriction
//! list. The admin-only redistribution path exists so a restricted
//! account's frozen balance can be recovered without lifting the
//! restriction.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use parusd_common::{
    access_control::RestrictionList,
    constants::token,
    errors::{ParUsdError, ParUsdResult},
    types::Address,
    validation::{require_nonzero_address, require_nonzero_amount},
};

// ============ Token State ============

/// parUSD ledger state
///
/// `vault` is the only address allowed to mint and burn; it is fixed at
/// construction so the supply authority cannot drift away from the
/// contract that owns the backing reserve units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StableTokenState {
    /// Authorized mint/burn authority (the mint vault)
    pub vault: Address,
    /// Balances per account (internal 18-decimal units)
    pub balances: BTreeMap<Address, u128>,
    /// Current total supply
    pub total_supply: u128,
    /// Cumulative minted
    pub total_minted: u128,
    /// Cumulative burned
    pub total_burned: u128,
}

// NOTE: Default intentionally not implemented; the ledger must be
// created with a real vault address as its supply authority.

impl StableTokenState {
    /// Create a new ledger with `vault` as the supply authority
    pub fn new(vault: Address) -> Self {
        Self {
            vault,
            balances: BTreeMap::new(),
            total_supply: 0,
            total_minted: 0,
            total_burned: 0,
        }
    }

    /// Get token name
    pub fn name() -> &'static str {
        token::NAME
    }

    /// Get token symbol
    pub fn symbol() -> &'static str {
        token::SYMBOL
    }

    /// Get token decimals
    pub fn decimals() -> u8 {
        token::DECIMALS
    }

    /// Balance of an account
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Cumulative minted minus cumulative burned
    pub fn circulating(&self) -> u128 {
        self.total_minted.saturating_sub(self.total_burned)
    }

    fn require_vault(&self, caller: &Address) -> ParUsdResult<()> {
        if caller != &self.vault {
            return Err(ParUsdError::UnauthorizedCaller {
                expected: self.vault,
                actual: *caller,
            });
        }
        Ok(())
    }

    fn credit(&mut self, account: &Address, amount: u128) -> ParUsdResult<()> {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(ParUsdError::Overflow)?;
        Ok(())
    }

    fn debit(&mut self, account: &Address, amount: u128) -> ParUsdResult<()> {
        let balance = self.balances.entry(*account).or_insert(0);
        if *balance < amount {
            return Err(ParUsdError::InsufficientBalance {
                available: *balance,
                requested: amount,
            });
        }
        *balance -= amount;
        Ok(())
    }

    // ============ Transfers ============

    /// Move `amount` from `from` to `to`, enforcing the restriction list
    /// on both parties
    pub fn transfer(
        &mut self,
        restrictions: &RestrictionList,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> ParUsdResult<()> {
        require_nonzero_amount(amount)?;
        require_nonzero_address(to, "to")?;
        if from == to {
            return Err(ParUsdError::InvalidParameter {
                param: "to",
                reason: "cannot transfer to self",
            });
        }

        restrictions.require_unrestricted(from)?;
        restrictions.require_unrestricted(to)?;

        self.debit(from, amount)?;
        self.credit(to, amount)?;
        Ok(())
    }

    // ============ Supply Operations ============

    /// Mint stable units to `to`; vault only
    pub fn mint(&mut self, caller: &Address, to: &Address, amount: u128) -> ParUsdResult<()> {
        self.require_vault(caller)?;
        require_nonzero_amount(amount)?;
        require_nonzero_address(to, "to")?;

        self.credit(to, amount)?;
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(ParUsdError::Overflow)?;
        self.total_minted = self.total_minted.saturating_add(amount);
        Ok(())
    }

    /// Burn stable units from `from`; vault only
    pub fn burn(&mut self, caller: &Address, from: &Address, amount: u128) -> ParUsdResult<()> {
        self.require_vault(caller)?;
        require_nonzero_amount(amount)?;

        self.debit(from, amount)?;
        self.total_supply = self.total_supply.saturating_sub(amount);
        self.total_burned = self.total_burned.saturating_add(amount);
        Ok(())
    }

    /// Move a restricted account's frozen balance, bypassing the
    /// restriction block; vault only (reached through the vault's admin
    /// surface). `to = None` burns the amount instead.
    pub fn redistribute(
        &mut self,
        caller: &Address,
        from: &Address,
        to: Option<&Address>,
        amount: u128,
    ) -> ParUsdResult<()> {
        self.require_vault(caller)?;
        require_nonzero_amount(amount)?;

        self.debit(from, amount)?;
        match to {
            Some(recipient) => {
                require_nonzero_address(recipient, "to")?;
                self.credit(recipient, amount)?;
            }
            None => {
                self.total_supply = self.total_supply.saturating_sub(amount);
                self.total_burned = self.total_burned.saturating_add(amount);
            }
        }
        Ok(())
    }
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;
    use parusd_common::constants::token::ONE;

    fn vault() -> Address {
        [1u8; 32]
    }

    fn user1() -> Address {
        [2u8; 32]
    }

    fn user2() -> Address {
        [3u8; 32]
    }

    fn funded_ledger() -> StableTokenState {
        let mut state = StableTokenState::new(vault());
        state.mint(&vault(), &user1(), 1_000 * ONE).unwrap();
        state
    }

    #[test]
    fn test_metadata() {
        assert_eq!(StableTokenState::name(), "parUSD");
        assert_eq!(StableTokenState::symbol(), "parUSD");
        assert_eq!(StableTokenState::decimals(), 18);
    }

    #[test]
    fn test_mint_requires_vault() {
        let mut state = StableTokenState::new(vault());
        let result = state.mint(&user1(), &user1(), ONE);
        assert!(matches!(result, Err(ParUsdError::UnauthorizedCaller { .. })));
    }

    #[test]
    fn test_mint_and_supply() {
        let state = funded_ledger();
        assert_eq!(state.balance_of(&user1()), 1_000 * ONE);
        assert_eq!(state.total_supply, 1_000 * ONE);
        assert_eq!(state.circulating(), 1_000 * ONE);
    }

    #[test]
    fn test_transfer() {
        let mut state = funded_ledger();
        let restrictions = RestrictionList::new();

        state
            .transfer(&restrictions, &user1(), &user2(), 300 * ONE)
            .unwrap();

        assert_eq!(state.balance_of(&user1()), 700 * ONE);
        assert_eq!(state.balance_of(&user2()), 300 * ONE);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut state = funded_ledger();
        let restrictions = RestrictionList::new();

        let result = state.transfer(&restrictions, &user2(), &user1(), ONE);
        assert!(matches!(result, Err(ParUsdError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_transfer_to_self_rejected() {
        let mut state = funded_ledger();
        let restrictions = RestrictionList::new();

        let result = state.transfer(&restrictions, &user1(), &user1(), ONE);
        assert!(matches!(result, Err(ParUsdError::InvalidParameter { .. })));
    }

    #[test]
    fn test_restricted_sender_blocked() {
        let mut state = funded_ledger();
        let mut restrictions = RestrictionList::new();
        restrictions.add(user1());

        let result = state.transfer(&restrictions, &user1(), &user2(), ONE);
        assert!(matches!(result, Err(ParUsdError::AccountRestricted { .. })));
    }

    #[test]
    fn test_restricted_recipient_blocked() {
        let mut state = funded_ledger();
        let mut restrictions = RestrictionList::new();
        restrictions.add(user2());

        let result = state.transfer(&restrictions, &user1(), &user2(), ONE);
        assert!(matches!(result, Err(ParUsdError::AccountRestricted { .. })));
    }

    #[test]
    fn test_burn() {
        let mut state = funded_ledger();

        state.burn(&vault(), &user1(), 400 * ONE).unwrap();

        assert_eq!(state.balance_of(&user1()), 600 * ONE);
        assert_eq!(state.total_supply, 600 * ONE);
        assert_eq!(state.total_burned, 400 * ONE);
    }

    #[test]
    fn test_burn_insufficient() {
        let mut state = funded_ledger();
        let result = state.burn(&vault(), &user1(), 2_000 * ONE);
        assert!(matches!(result, Err(ParUsdError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_redistribute_to_recipient_bypasses_restriction() {
        let mut state = funded_ledger();

        // Freeze user1; an ordinary transfer is blocked, redistribution is not
        let mut restrictions = RestrictionList::new();
        restrictions.add(user1());
        assert!(state
            .transfer(&restrictions, &user1(), &user2(), ONE)
            .is_err());

        state
            .redistribute(&vault(), &user1(), Some(&user2()), 1_000 * ONE)
            .unwrap();

        assert_eq!(state.balance_of(&user1()), 0);
        assert_eq!(state.balance_of(&user2()), 1_000 * ONE);
        assert_eq!(state.total_supply, 1_000 * ONE);
    }

    #[test]
    fn test_redistribute_to_burn_sink() {
        let mut state = funded_ledger();

        state
            .redistribute(&vault(), &user1(), None, 1_000 * ONE)
            .unwrap();

        assert_eq!(state.balance_of(&user1()), 0);
        assert_eq!(state.total_supply, 0);
        assert_eq!(state.total_burned, 1_000 * ONE);
    }

    #[test]
    fn test_redistribute_requires_vault() {
        let mut state = funded_ledger();
        let result = state.redistribute(&user2(), &user1(), None, ONE);
        assert!(matches!(result, Err(ParUsdError::UnauthorizedCaller { .. })));
    }
}
