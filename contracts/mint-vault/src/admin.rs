//! Admin / Configuration Surface
//!
//! Capability-gated setters for every runtime parameter, the pause
//! circuit breaker, token rescue, and the recovery path for restricted
//! accounts' frozen balances. Setters validate bounds before mutating
//! and emit an event per change.

use parusd_common::{
    access_control::{require_role, Capability, CapabilityRegistry},
    check,
    constants::{cooldown, fees},
    errors::{ParUsdError, ParUsdResult},
    events::ParUsdEvent,
    reserve::CollateralReserve,
    types::{Address, AssetId},
    validation::{require_nonzero_address, require_nonzero_amount},
};
use parusd_token::StableTokenState;

use crate::state::VaultState;

fn require_admin(roles: &dyn CapabilityRegistry, caller: &Address) -> ParUsdResult<()> {
    require_role(roles, Capability::Admin, caller)
}

/// Emergency controls accept the EmergencyOperator as well as Admin
fn require_emergency_operator(
    roles: &dyn CapabilityRegistry,
    caller: &Address,
) -> ParUsdResult<()> {
    if roles.has_role(Capability::EmergencyOperator, caller)
        || roles.has_role(Capability::Admin, caller)
    {
        return Ok(());
    }
    Err(ParUsdError::MissingCapability { account: *caller })
}

// ============================================================================
// Volume Caps
// ============================================================================

/// Set the per-block mint/redeem volume caps
pub fn set_block_limits(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    max_mint_per_block: u128,
    max_redeem_per_block: u128,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;

    vault.config.max_mint_per_block = max_mint_per_block;
    vault.config.max_redeem_per_block = max_redeem_per_block;

    vault.events.emit(ParUsdEvent::BlockLimitsUpdated {
        max_mint_per_block,
        max_redeem_per_block,
        block_height,
    });
    Ok(())
}

/// Emergency shortcut: zero both caps, stopping all minting and
/// redemption without engaging the pause
pub fn disable_mint_redeem(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    block_height: u64,
) -> ParUsdResult<()> {
    require_emergency_operator(roles, caller)?;

    vault.config.max_mint_per_block = 0;
    vault.config.max_redeem_per_block = 0;

    vault.events.emit(ParUsdEvent::BlockLimitsUpdated {
        max_mint_per_block: 0,
        max_redeem_per_block: 0,
        block_height,
    });
    Ok(())
}

// ============================================================================
// Fees & Treasury
// ============================================================================

/// Set the minting fee schedule
pub fn set_mint_fee(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    fee_bps: u64,
    min_fee: u128,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;
    check!(
        fee_bps <= fees::MAX_FEE_BPS,
        ParUsdError::FeeTooHigh {
            bps: fee_bps,
            max_bps: fees::MAX_FEE_BPS,
        }
    );

    vault.config.mint_fee.fee_bps = fee_bps;
    vault.config.mint_fee.min_fee = min_fee;

    vault.events.emit(ParUsdEvent::MintFeeUpdated {
        fee_bps,
        min_fee,
        block_height,
    });
    Ok(())
}

/// Set the redemption fee schedule
pub fn set_redeem_fee(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    fee_bps: u64,
    min_fee: u128,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;
    check!(
        fee_bps <= fees::MAX_FEE_BPS,
        ParUsdError::FeeTooHigh {
            bps: fee_bps,
            max_bps: fees::MAX_FEE_BPS,
        }
    );

    vault.config.redeem_fee.fee_bps = fee_bps;
    vault.config.redeem_fee.min_fee = min_fee;

    vault.events.emit(ParUsdEvent::RedeemFeeUpdated {
        fee_bps,
        min_fee,
        block_height,
    });
    Ok(())
}

/// Set or clear the fee treasury; fees are zero while unset
pub fn set_treasury(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    treasury: Option<Address>,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;
    if let Some(account) = &treasury {
        require_nonzero_address(account, "treasury")?;
    }

    vault.config.treasury = treasury;

    vault.events.emit(ParUsdEvent::TreasuryUpdated {
        treasury,
        block_height,
    });
    Ok(())
}

// ============================================================================
// Amount Minimums & Cooldown
// ============================================================================

/// Set the minimum mint and redeem amounts
pub fn set_minimum_amounts(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    min_mint_amount: u128,
    min_redeem_amount: u128,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;

    vault.config.min_mint_amount = min_mint_amount;
    vault.config.min_redeem_amount = min_redeem_amount;

    vault.events.emit(ParUsdEvent::MinimumsUpdated {
        min_mint_amount,
        min_redeem_amount,
        block_height,
    });
    Ok(())
}

/// Set the cooldown duration, capped at the protocol maximum
pub fn set_cooldown_duration(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    duration_secs: u64,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;
    check!(
        duration_secs <= cooldown::MAX_COOLDOWN_SECS,
        ParUsdError::CooldownTooLong {
            duration: duration_secs,
            maximum: cooldown::MAX_COOLDOWN_SECS,
        }
    );

    vault.config.cooldown_secs = duration_secs;

    vault.events.emit(ParUsdEvent::CooldownUpdated {
        duration_secs,
        block_height,
    });
    Ok(())
}

// ============================================================================
// Credential Policy
// ============================================================================

/// Toggle whether the credential gate is consulted
pub fn set_credential_policy(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    enabled: bool,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;

    vault.config.gate_enabled = enabled;

    vault.events.emit(ParUsdEvent::CredentialPolicyUpdated {
        enabled,
        block_height,
    });
    Ok(())
}

/// Add an account to the credential-gate bypass list
pub fn add_to_whitelist(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    account: Address,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;
    require_nonzero_address(&account, "account")?;

    vault.whitelist.insert(account);

    vault.events.emit(ParUsdEvent::WhitelistUpdated {
        account,
        added: true,
        block_height,
    });
    Ok(())
}

/// Remove an account from the credential-gate bypass list
pub fn remove_from_whitelist(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    account: &Address,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;

    vault.whitelist.remove(account);

    vault.events.emit(ParUsdEvent::WhitelistUpdated {
        account: *account,
        added: false,
        block_height,
    });
    Ok(())
}

// ============================================================================
// Restriction List
// ============================================================================

/// Restrict an account from transfer/mint/redeem. Admin-capability
/// holders cannot be targeted.
pub fn restrict_account(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    account: Address,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;
    require_nonzero_address(&account, "account")?;
    if roles.has_role(Capability::Admin, &account) {
        return Err(ParUsdError::CannotRestrictAdmin { account });
    }

    vault.restrictions.add(account);

    vault.events.emit(ParUsdEvent::RestrictionAdded {
        account,
        block_height,
    });
    Ok(())
}

/// Lift an account's restriction
pub fn unrestrict_account(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    account: &Address,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;

    vault.restrictions.remove(account);

    vault.events.emit(ParUsdEvent::RestrictionRemoved {
        account: *account,
        block_height,
    });
    Ok(())
}

// ============================================================================
// Pause
// ============================================================================

/// Engage the circuit breaker over the mint/redeem entry points.
/// Cancellation, self-service burn, and views stay available.
pub fn pause(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    block_height: u64,
) -> ParUsdResult<()> {
    require_emergency_operator(roles, caller)?;

    vault.config.paused = true;

    vault.events.emit(ParUsdEvent::Paused {
        by: *caller,
        block_height,
    });
    Ok(())
}

/// Release the circuit breaker
pub fn unpause(
    vault: &mut VaultState,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    block_height: u64,
) -> ParUsdResult<()> {
    require_emergency_operator(roles, caller)?;

    vault.config.paused = false;

    vault.events.emit(ParUsdEvent::Unpaused {
        by: *caller,
        block_height,
    });
    Ok(())
}

// ============================================================================
// Recovery Paths
// ============================================================================

/// Rescue unrelated tokens accidentally held by the vault. Backing
/// assets (anything the reserve supports) cannot be rescued.
pub fn rescue_tokens(
    vault: &mut VaultState,
    reserve: &dyn CollateralReserve,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    asset: AssetId,
    to: Address,
    amount: u128,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;
    require_nonzero_address(&to, "to")?;
    require_nonzero_amount(amount)?;
    if reserve.is_supported_asset(&asset) {
        return Err(ParUsdError::CannotRescueBackingAsset { asset });
    }

    vault.events.emit(ParUsdEvent::TokensRescued {
        asset,
        to,
        amount,
        block_height,
    });
    Ok(())
}

/// Move a restricted account's entire frozen balance to a recipient, or
/// burn it (`to = None`). Burning also burns the matching reserve units
/// so the 1:1 backing relationship is preserved.
pub fn redistribute_restricted_balance(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    from: &Address,
    to: Option<Address>,
    block_height: u64,
) -> ParUsdResult<()> {
    vault.begin_entry()?;
    let result = execute_redistribution(vault, token, reserve, roles, caller, from, to, block_height);
    vault.end_entry();
    result
}

#[allow(clippy::too_many_arguments)]
fn execute_redistribution(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    roles: &dyn CapabilityRegistry,
    caller: &Address,
    from: &Address,
    to: Option<Address>,
    block_height: u64,
) -> ParUsdResult<()> {
    require_admin(roles, caller)?;
    if !vault.restrictions.is_restricted(from) {
        return Err(ParUsdError::InvalidParameter {
            param: "from",
            reason: "account is not restricted",
        });
    }

    let amount = token.balance_of(from);
    require_nonzero_amount(amount)?;

    match to {
        Some(recipient) => {
            require_nonzero_address(&recipient, "to")?;
            vault.restrictions.require_unrestricted(&recipient)?;
            token.redistribute(&vault.address, from, Some(&recipient), amount)?;
        }
        None => {
            // Burn sink: shrink both sides to keep supply == vault units
            let units = reserve.unit_balance(&vault.address);
            if units < amount {
                return Err(ParUsdError::InsufficientBalance {
                    available: units,
                    requested: amount,
                });
            }
            token.redistribute(&vault.address, from, None, amount)?;
            reserve.burn(&vault.address, amount)?;
        }
    }

    vault.events.emit(ParUsdEvent::BalanceRedistributed {
        from: *from,
        to,
        amount,
        block_height,
    });
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parusd_common::access_control::RoleRegistry;
    use parusd_common::constants::token::ONE;
    use parusd_common::reserve::ReserveLedger;
    use parusd_common::types::RedemptionMode;

    fn vault_address() -> Address {
        [1u8; 32]
    }

    fn admin() -> Address {
        [2u8; 32]
    }

    fn user1() -> Address {
        [3u8; 32]
    }

    fn user2() -> Address {
        [4u8; 32]
    }

    fn usdc() -> AssetId {
        [10u8; 32]
    }

    fn setup() -> (VaultState, RoleRegistry) {
        let vault = VaultState::new(vault_address(), RedemptionMode::InstantOrQueued);
        let roles = RoleRegistry::new(admin(), 100);
        (vault, roles)
    }

    #[test]
    fn test_setters_require_admin() {
        let (mut vault, roles) = setup();

        let result = set_block_limits(&mut vault, &roles, &user1(), ONE, ONE, 100);
        assert!(matches!(result, Err(ParUsdError::MissingCapability { .. })));

        set_block_limits(&mut vault, &roles, &admin(), 5 * ONE, 6 * ONE, 100).unwrap();
        assert_eq!(vault.config.max_mint_per_block, 5 * ONE);
        assert_eq!(vault.config.max_redeem_per_block, 6 * ONE);
    }

    #[test]
    fn test_disable_mint_redeem_zeroes_caps() {
        let (mut vault, mut roles) = setup();
        roles
            .grant_role(&admin(), Capability::EmergencyOperator, user1(), 100)
            .unwrap();

        disable_mint_redeem(&mut vault, &roles, &user1(), 101).unwrap();

        assert_eq!(vault.config.max_mint_per_block, 0);
        assert_eq!(vault.config.max_redeem_per_block, 0);
        assert!(!vault.config.paused);
    }

    #[test]
    fn test_fee_above_cap_rejected() {
        let (mut vault, roles) = setup();

        let result = set_mint_fee(&mut vault, &roles, &admin(), 1_001, 0, 100);
        assert!(matches!(result, Err(ParUsdError::FeeTooHigh { .. })));

        let result = set_redeem_fee(&mut vault, &roles, &admin(), 2_000, 0, 100);
        assert!(matches!(result, Err(ParUsdError::FeeTooHigh { .. })));

        // The cap itself is accepted
        set_mint_fee(&mut vault, &roles, &admin(), 1_000, ONE, 100).unwrap();
        assert_eq!(vault.config.mint_fee.fee_bps, 1_000);
        assert_eq!(vault.config.mint_fee.min_fee, ONE);
    }

    #[test]
    fn test_set_treasury() {
        let (mut vault, roles) = setup();

        set_treasury(&mut vault, &roles, &admin(), Some([9u8; 32]), 100).unwrap();
        assert_eq!(vault.config.treasury, Some([9u8; 32]));

        let result = set_treasury(&mut vault, &roles, &admin(), Some([0u8; 32]), 100);
        assert!(matches!(result, Err(ParUsdError::ZeroAddress { .. })));

        set_treasury(&mut vault, &roles, &admin(), None, 101).unwrap();
        assert_eq!(vault.config.treasury, None);
    }

    #[test]
    fn test_set_minimums_and_cooldown() {
        let (mut vault, roles) = setup();

        set_minimum_amounts(&mut vault, &roles, &admin(), 10 * ONE, 20 * ONE, 100).unwrap();
        assert_eq!(vault.config.min_mint_amount, 10 * ONE);
        assert_eq!(vault.config.min_redeem_amount, 20 * ONE);

        set_cooldown_duration(&mut vault, &roles, &admin(), 3_600, 100).unwrap();
        assert_eq!(vault.config.cooldown_secs, 3_600);

        let result = set_cooldown_duration(
            &mut vault,
            &roles,
            &admin(),
            cooldown::MAX_COOLDOWN_SECS + 1,
            100,
        );
        assert!(matches!(result, Err(ParUsdError::CooldownTooLong { .. })));
    }

    #[test]
    fn test_credential_policy_and_whitelist() {
        let (mut vault, roles) = setup();

        set_credential_policy(&mut vault, &roles, &admin(), false, 100).unwrap();
        assert!(!vault.config.gate_enabled);

        add_to_whitelist(&mut vault, &roles, &admin(), user1(), 100).unwrap();
        assert!(vault.whitelist.contains(&user1()));

        remove_from_whitelist(&mut vault, &roles, &admin(), &user1(), 101).unwrap();
        assert!(!vault.whitelist.contains(&user1()));
    }

    #[test]
    fn test_restriction_cannot_target_admin() {
        let (mut vault, roles) = setup();

        let result = restrict_account(&mut vault, &roles, &admin(), admin(), 100);
        assert!(matches!(result, Err(ParUsdError::CannotRestrictAdmin { .. })));

        restrict_account(&mut vault, &roles, &admin(), user1(), 100).unwrap();
        assert!(vault.restrictions.is_restricted(&user1()));

        unrestrict_account(&mut vault, &roles, &admin(), &user1(), 101).unwrap();
        assert!(!vault.restrictions.is_restricted(&user1()));
    }

    #[test]
    fn test_pause_unpause() {
        let (mut vault, mut roles) = setup();
        roles
            .grant_role(&admin(), Capability::EmergencyOperator, user1(), 100)
            .unwrap();

        // Non-operator cannot pause
        let result = pause(&mut vault, &roles, &user2(), 100);
        assert!(matches!(result, Err(ParUsdError::MissingCapability { .. })));

        pause(&mut vault, &roles, &user1(), 100).unwrap();
        assert!(vault.config.paused);

        unpause(&mut vault, &roles, &admin(), 101).unwrap();
        assert!(!vault.config.paused);
    }

    #[test]
    fn test_rescue_excludes_backing_assets() {
        let (mut vault, roles) = setup();
        let mut reserve = ReserveLedger::new(admin());
        reserve.list_asset(&admin(), usdc(), 6).unwrap();

        let result = rescue_tokens(&mut vault, &reserve, &roles, &admin(), usdc(), user1(), 100, 100);
        assert!(matches!(result, Err(ParUsdError::CannotRescueBackingAsset { .. })));

        // An unlisted token can be rescued
        rescue_tokens(
            &mut vault,
            &reserve,
            &roles,
            &admin(),
            [77u8; 32],
            user1(),
            100,
            100,
        )
        .unwrap();
    }

    #[test]
    fn test_redistribute_to_recipient() {
        let (mut vault, roles) = setup();
        let mut token = StableTokenState::new(vault_address());
        let mut reserve = ReserveLedger::new(admin());
        token.mint(&vault_address(), &user1(), 100 * ONE).unwrap();
        reserve
            .mint_without_collateral(&vault_address(), 100 * ONE)
            .unwrap();

        // Only restricted accounts can be drained
        let result = redistribute_restricted_balance(
            &mut vault,
            &mut token,
            &mut reserve,
            &roles,
            &admin(),
            &user1(),
            Some(user2()),
            100,
        );
        assert!(matches!(result, Err(ParUsdError::InvalidParameter { .. })));

        vault.restrictions.add(user1());
        redistribute_restricted_balance(
            &mut vault,
            &mut token,
            &mut reserve,
            &roles,
            &admin(),
            &user1(),
            Some(user2()),
            100,
        )
        .unwrap();

        assert_eq!(token.balance_of(&user1()), 0);
        assert_eq!(token.balance_of(&user2()), 100 * ONE);
        assert_eq!(token.total_supply, 100 * ONE);
    }

    #[test]
    fn test_redistribute_to_burn_sink_shrinks_both_sides() {
        let (mut vault, roles) = setup();
        let mut token = StableTokenState::new(vault_address());
        let mut reserve = ReserveLedger::new(admin());
        token.mint(&vault_address(), &user1(), 100 * ONE).unwrap();
        reserve
            .mint_without_collateral(&vault_address(), 100 * ONE)
            .unwrap();
        vault.restrictions.add(user1());

        redistribute_restricted_balance(
            &mut vault,
            &mut token,
            &mut reserve,
            &roles,
            &admin(),
            &user1(),
            None,
            100,
        )
        .unwrap();

        assert_eq!(token.total_supply, 0);
        assert_eq!(reserve.unit_balance(&vault_address()), 0);
    }
}
