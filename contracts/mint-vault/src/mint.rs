//! Minting Operations
//!
//! Collateral-backed minting, the privileged unbacked mint, and the
//! public self-service burn. A collateral mint normalizes the deposit to
//! internal precision, routes the fee to the treasury in collateral
//! terms, deposits the remainder into the reserve, and mints the same
//! post-fee amount of stable units to the beneficiary — keeping stable
//! supply and vault-held reserve units 1:1.

use parusd_common::{
    access_control::{require_role, Capability, CapabilityRegistry, CredentialGate},
    errors::{ParUsdError, ParUsdResult},
    events::ParUsdEvent,
    math::{denormalize, net_after_fee, normalize},
    reserve::CollateralReserve,
    types::{Address, AssetId},
    validation::{require_nonzero_address, require_nonzero_amount},
};
use parusd_token::StableTokenState;

use crate::state::VaultState;

// ============================================================================
// Requests
// ============================================================================

/// Collateral mint request
#[derive(Debug, Clone)]
pub struct CollateralMintRequest {
    /// Initiating account (must pass the credential gate)
    pub caller: Address,
    /// Collateral asset being deposited
    pub asset: AssetId,
    /// Deposit in raw asset units
    pub collateral_amount: u128,
    /// Recipient of the minted stable units
    pub beneficiary: Address,
    /// Block height
    pub block_height: u64,
}

/// Privileged unbacked mint request
#[derive(Debug, Clone)]
pub struct UnbackedMintRequest {
    /// Caller; must hold the Minter capability
    pub caller: Address,
    /// Recipient of the minted stable units
    pub to: Address,
    /// Amount in internal units
    pub amount: u128,
    /// Block height
    pub block_height: u64,
}

/// Self-service burn request
#[derive(Debug, Clone)]
pub struct BurnRequest {
    /// Holder burning their own stable units
    pub caller: Address,
    /// Amount in internal units
    pub amount: u128,
    /// Block height
    pub block_height: u64,
}

/// Outcome of a collateral mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintOutcome {
    /// Net stable units minted to the beneficiary
    pub minted: u128,
    /// Fee in internal units, paid to the treasury in collateral terms
    pub fee: u128,
}

// ============================================================================
// Entry Points
// ============================================================================

/// Deposit collateral and mint stable units to the beneficiary.
/// Returns the net minted amount.
pub fn mint_with_collateral(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    gate: &dyn CredentialGate,
    request: &CollateralMintRequest,
) -> ParUsdResult<MintOutcome> {
    vault.begin_entry()?;
    let result = execute_collateral_mint(vault, token, reserve, gate, request);
    vault.end_entry();
    result
}

fn execute_collateral_mint(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    gate: &dyn CredentialGate,
    request: &CollateralMintRequest,
) -> ParUsdResult<MintOutcome> {
    vault.require_not_paused()?;
    require_nonzero_amount(request.collateral_amount)?;
    require_nonzero_address(&request.beneficiary, "beneficiary")?;
    vault.restrictions.require_unrestricted(&request.caller)?;
    vault.restrictions.require_unrestricted(&request.beneficiary)?;
    // Only the initiator is credential-checked; minting *to* an
    // unverified party is permitted.
    vault.require_credentials(gate, &request.caller)?;

    let decimals = reserve.asset_decimals(&request.asset)?;
    let gross = normalize(request.collateral_amount, decimals)?;

    // Fee is charged in collateral terms, so snap it down to a
    // raw-representable amount; the deposit then splits exactly into
    // treasury fee + reserve remainder.
    let schedule = vault.mint_fee_schedule();
    let (_, fee_quote) = net_after_fee(gross, &schedule)?;
    let fee_raw = denormalize(fee_quote, decimals)?;
    let fee = normalize(fee_raw, decimals)?;
    let net = gross - fee;
    let net_raw = request.collateral_amount - fee_raw;

    if net < vault.config.min_mint_amount {
        return Err(ParUsdError::BelowMinimum {
            amount: net,
            minimum: vault.config.min_mint_amount,
        });
    }
    if !vault
        .mint_window
        .allows(net, vault.config.max_mint_per_block, request.block_height)
    {
        return Err(ParUsdError::MintLimitExceeded {
            requested: net,
            remaining: vault.mint_capacity(request.block_height),
        });
    }

    vault.mint_window.record(net, request.block_height);
    vault.accrue_treasury_fee(&request.asset, fee_raw)?;
    let minted = reserve.mint(&request.asset, net_raw, &vault.address)?;
    token.mint(&vault.address, &request.beneficiary, minted)?;

    vault.events.emit(ParUsdEvent::MintExecuted {
        caller: request.caller,
        beneficiary: request.beneficiary,
        asset: request.asset,
        collateral_amount: request.collateral_amount,
        minted,
        fee,
        block_height: request.block_height,
    });

    Ok(MintOutcome { minted, fee })
}

/// Mint stable units without collateral; mints matching unbacked reserve
/// units so the 1:1 relationship holds by construction. Minter
/// capability required; rate limits and fees do not apply.
pub fn mint_unbacked(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    roles: &dyn CapabilityRegistry,
    request: &UnbackedMintRequest,
) -> ParUsdResult<()> {
    vault.begin_entry()?;
    let result = execute_unbacked_mint(vault, token, reserve, roles, request);
    vault.end_entry();
    result
}

fn execute_unbacked_mint(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    roles: &dyn CapabilityRegistry,
    request: &UnbackedMintRequest,
) -> ParUsdResult<()> {
    vault.require_not_paused()?;
    require_role(roles, Capability::Minter, &request.caller)?;
    require_nonzero_amount(request.amount)?;
    require_nonzero_address(&request.to, "to")?;
    vault.restrictions.require_unrestricted(&request.to)?;

    reserve.mint_without_collateral(&vault.address, request.amount)?;
    token.mint(&vault.address, &request.to, request.amount)?;

    vault.events.emit(ParUsdEvent::UnbackedMint {
        to: request.to,
        amount: request.amount,
        block_height: request.block_height,
    });

    Ok(())
}

/// Burn the caller's own stable units; the vault burns the matching
/// reserve units, leaving backing collateral in the reserve and raising
/// the effective backing ratio of remaining holders. Available during a
/// pause.
pub fn burn(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    request: &BurnRequest,
) -> ParUsdResult<()> {
    vault.begin_entry()?;
    let result = execute_burn(vault, token, reserve, request);
    vault.end_entry();
    result
}

fn execute_burn(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    request: &BurnRequest,
) -> ParUsdResult<()> {
    require_nonzero_amount(request.amount)?;
    vault.restrictions.require_unrestricted(&request.caller)?;

    // Validate both sides before mutating either ledger
    let balance = token.balance_of(&request.caller);
    if balance < request.amount {
        return Err(ParUsdError::InsufficientBalance {
            available: balance,
            requested: request.amount,
        });
    }
    let units = reserve.unit_balance(&vault.address);
    if units < request.amount {
        return Err(ParUsdError::InsufficientBalance {
            available: units,
            requested: request.amount,
        });
    }

    token.burn(&vault.address, &request.caller, request.amount)?;
    reserve.burn(&vault.address, request.amount)?;

    vault.events.emit(ParUsdEvent::Burned {
        account: request.caller,
        amount: request.amount,
        block_height: request.block_height,
    });

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parusd_common::access_control::{OpenGate, RoleRegistry};
    use parusd_common::constants::token::ONE;
    use parusd_common::reserve::ReserveLedger;
    use parusd_common::types::RedemptionMode;
    use std::collections::BTreeSet;

    const USDC_DECIMALS: u8 = 6;
    const ONE_USDC: u128 = 1_000_000;

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

    fn treasury() -> Address {
        [5u8; 32]
    }

    fn usdc() -> AssetId {
        [10u8; 32]
    }

    struct AllowList(BTreeSet<Address>);

    impl CredentialGate for AllowList {
        fn has_valid_credentials(&self, account: &Address) -> bool {
            self.0.contains(account)
        }
    }

    fn setup() -> (VaultState, StableTokenState, ReserveLedger, RoleRegistry) {
        let vault = VaultState::new(vault_address(), RedemptionMode::InstantOrQueued);
        let token = StableTokenState::new(vault_address());
        let mut reserve = ReserveLedger::new(admin());
        reserve.list_asset(&admin(), usdc(), USDC_DECIMALS).unwrap();
        let roles = RoleRegistry::new(admin(), 100);
        (vault, token, reserve, roles)
    }

    fn mint_request(collateral: u128) -> CollateralMintRequest {
        CollateralMintRequest {
            caller: user1(),
            asset: usdc(),
            collateral_amount: collateral,
            beneficiary: user1(),
            block_height: 100,
        }
    }

    #[test]
    fn test_mint_normalizes_six_decimal_deposit() {
        let (mut vault, mut token, mut reserve, _) = setup();

        // 1,000,000 raw units (= 1.0 token), no treasury so no fee
        let outcome =
            mint_with_collateral(&mut vault, &mut token, &mut reserve, &OpenGate, &mint_request(ONE_USDC))
                .unwrap();

        assert_eq!(outcome.minted, ONE);
        assert_eq!(outcome.fee, 0);
        assert_eq!(token.balance_of(&user1()), ONE);
        assert_eq!(reserve.unit_balance(&vault_address()), ONE);
        assert_eq!(token.total_supply, reserve.unit_balance(&vault_address()));
    }

    #[test]
    fn test_mint_charges_percentage_fee() {
        let (mut vault, mut token, mut reserve, _) = setup();
        vault.config.treasury = Some(treasury());
        vault.config.mint_fee.fee_bps = 50; // 0.5%

        let outcome = mint_with_collateral(
            &mut vault,
            &mut token,
            &mut reserve,
            &OpenGate,
            &mint_request(1_000 * ONE_USDC),
        )
        .unwrap();

        assert_eq!(outcome.fee, 5 * ONE);
        assert_eq!(outcome.minted, 995 * ONE);
        // Fee accrues in raw collateral units
        assert_eq!(vault.treasury_accrued(&usdc()), 5 * ONE_USDC);
        // Reserve received only the post-fee remainder
        assert_eq!(reserve.collateral_balance(&usdc()), 995 * ONE_USDC);
        assert_eq!(token.total_supply, reserve.unit_balance(&vault_address()));
    }

    #[test]
    fn test_mint_fee_floor_dominates() {
        let (mut vault, mut token, mut reserve, _) = setup();
        vault.config.treasury = Some(treasury());
        vault.config.mint_fee.fee_bps = 10; // 0.1% of 100 = 0.1
        vault.config.mint_fee.min_fee = 2 * ONE;

        let outcome = mint_with_collateral(
            &mut vault,
            &mut token,
            &mut reserve,
            &OpenGate,
            &mint_request(100 * ONE_USDC),
        )
        .unwrap();

        assert_eq!(outcome.fee, 2 * ONE);
        assert_eq!(outcome.minted, 98 * ONE);
    }

    #[test]
    fn test_mint_minimum_checked_after_fee() {
        let (mut vault, mut token, mut reserve, _) = setup();
        vault.config.treasury = Some(treasury());
        vault.config.mint_fee.fee_bps = 100; // 1%
        vault.config.min_mint_amount = ONE;

        // Gross of exactly 1.0 nets 0.99, below the minimum
        let result = mint_with_collateral(
            &mut vault,
            &mut token,
            &mut reserve,
            &OpenGate,
            &mint_request(ONE_USDC),
        );
        assert!(matches!(result, Err(ParUsdError::BelowMinimum { .. })));
    }

    #[test]
    fn test_mint_respects_block_cap() {
        let (mut vault, mut token, mut reserve, _) = setup();
        vault.config.max_mint_per_block = 10 * ONE;

        mint_with_collateral(&mut vault, &mut token, &mut reserve, &OpenGate, &mint_request(7 * ONE_USDC))
            .unwrap();

        let result = mint_with_collateral(
            &mut vault,
            &mut token,
            &mut reserve,
            &OpenGate,
            &mint_request(4 * ONE_USDC),
        );
        assert!(matches!(
            result,
            Err(ParUsdError::MintLimitExceeded { remaining, .. }) if remaining == 3 * ONE
        ));

        // Next block opens a fresh window
        let mut next = mint_request(4 * ONE_USDC);
        next.block_height = 101;
        mint_with_collateral(&mut vault, &mut token, &mut reserve, &OpenGate, &next).unwrap();
    }

    #[test]
    fn test_mint_blocked_for_restricted_parties() {
        let (mut vault, mut token, mut reserve, _) = setup();
        vault.restrictions.add(user1());

        let result = mint_with_collateral(
            &mut vault,
            &mut token,
            &mut reserve,
            &OpenGate,
            &mint_request(ONE_USDC),
        );
        assert!(matches!(result, Err(ParUsdError::AccountRestricted { .. })));

        // Restricted beneficiary is also rejected
        vault.restrictions.remove(&user1());
        vault.restrictions.add(user2());
        let mut request = mint_request(ONE_USDC);
        request.beneficiary = user2();
        let result = mint_with_collateral(&mut vault, &mut token, &mut reserve, &OpenGate, &request);
        assert!(matches!(result, Err(ParUsdError::AccountRestricted { .. })));
    }

    #[test]
    fn test_mint_checks_caller_credentials_not_beneficiary() {
        let (mut vault, mut token, mut reserve, _) = setup();
        let gate = AllowList(BTreeSet::from([user1()]));

        // Caller verified, beneficiary not: allowed
        let mut request = mint_request(ONE_USDC);
        request.beneficiary = user2();
        mint_with_collateral(&mut vault, &mut token, &mut reserve, &gate, &request).unwrap();
        assert_eq!(token.balance_of(&user2()), ONE);

        // Unverified caller: rejected
        let mut request = mint_request(ONE_USDC);
        request.caller = user2();
        let result = mint_with_collateral(&mut vault, &mut token, &mut reserve, &gate, &request);
        assert!(matches!(result, Err(ParUsdError::CredentialCheckFailed { .. })));
    }

    #[test]
    fn test_mint_whitelist_bypasses_gate() {
        let (mut vault, mut token, mut reserve, _) = setup();
        let gate = AllowList(BTreeSet::new());
        vault.whitelist.insert(user1());

        mint_with_collateral(&mut vault, &mut token, &mut reserve, &gate, &mint_request(ONE_USDC))
            .unwrap();
    }

    #[test]
    fn test_mint_unsupported_asset() {
        let (mut vault, mut token, mut reserve, _) = setup();
        let mut request = mint_request(ONE_USDC);
        request.asset = [99u8; 32];

        let result = mint_with_collateral(&mut vault, &mut token, &mut reserve, &OpenGate, &request);
        assert!(matches!(result, Err(ParUsdError::UnsupportedAsset { .. })));
    }

    #[test]
    fn test_mint_while_paused() {
        let (mut vault, mut token, mut reserve, _) = setup();
        vault.config.paused = true;

        let result = mint_with_collateral(
            &mut vault,
            &mut token,
            &mut reserve,
            &OpenGate,
            &mint_request(ONE_USDC),
        );
        assert!(matches!(result, Err(ParUsdError::ProtocolPaused)));
    }

    #[test]
    fn test_unbacked_mint_requires_capability() {
        let (mut vault, mut token, mut reserve, mut roles) = setup();

        let request = UnbackedMintRequest {
            caller: user1(),
            to: user2(),
            amount: 100 * ONE,
            block_height: 100,
        };
        let result = mint_unbacked(&mut vault, &mut token, &mut reserve, &roles, &request);
        assert!(matches!(result, Err(ParUsdError::MissingCapability { .. })));

        roles.grant_role(&admin(), Capability::Minter, user1(), 100).unwrap();
        mint_unbacked(&mut vault, &mut token, &mut reserve, &roles, &request).unwrap();

        assert_eq!(token.balance_of(&user2()), 100 * ONE);
        // Both sides minted: the 1:1 relationship holds with no collateral
        assert_eq!(reserve.unit_balance(&vault_address()), 100 * ONE);
        assert_eq!(reserve.collateral_balance(&usdc()), 0);
    }

    #[test]
    fn test_unbacked_mint_bypasses_block_cap() {
        let (mut vault, mut token, mut reserve, mut roles) = setup();
        roles.grant_role(&admin(), Capability::Minter, user1(), 100).unwrap();
        vault.config.max_mint_per_block = 0; // Minting disabled

        let request = UnbackedMintRequest {
            caller: user1(),
            to: user2(),
            amount: 1_000_000 * ONE,
            block_height: 100,
        };
        mint_unbacked(&mut vault, &mut token, &mut reserve, &roles, &request).unwrap();
    }

    #[test]
    fn test_burn_shrinks_both_sides() {
        let (mut vault, mut token, mut reserve, _) = setup();
        mint_with_collateral(
            &mut vault,
            &mut token,
            &mut reserve,
            &OpenGate,
            &mint_request(10 * ONE_USDC),
        )
        .unwrap();

        let request = BurnRequest {
            caller: user1(),
            amount: 4 * ONE,
            block_height: 101,
        };
        burn(&mut vault, &mut token, &mut reserve, &request).unwrap();

        assert_eq!(token.balance_of(&user1()), 6 * ONE);
        assert_eq!(token.total_supply, 6 * ONE);
        assert_eq!(reserve.unit_balance(&vault_address()), 6 * ONE);
        // Collateral stays in the reserve: backing ratio rises
        assert_eq!(reserve.collateral_balance(&usdc()), 10 * ONE_USDC);
    }

    #[test]
    fn test_burn_allowed_during_pause() {
        let (mut vault, mut token, mut reserve, _) = setup();
        mint_with_collateral(
            &mut vault,
            &mut token,
            &mut reserve,
            &OpenGate,
            &mint_request(10 * ONE_USDC),
        )
        .unwrap();
        vault.config.paused = true;

        let request = BurnRequest {
            caller: user1(),
            amount: ONE,
            block_height: 101,
        };
        burn(&mut vault, &mut token, &mut reserve, &request).unwrap();
    }

    #[test]
    fn test_burn_insufficient_balance() {
        let (mut vault, mut token, mut reserve, _) = setup();

        let request = BurnRequest {
            caller: user1(),
            amount: ONE,
            block_height: 100,
        };
        let result = burn(&mut vault, &mut token, &mut reserve, &request);
        assert!(matches!(result, Err(ParUsdError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_burn_blocked_for_restricted_holder() {
        let (mut vault, mut token, mut reserve, _) = setup();
        mint_with_collateral(
            &mut vault,
            &mut token,
            &mut reserve,
            &OpenGate,
            &mint_request(10 * ONE_USDC),
        )
        .unwrap();
        vault.restrictions.add(user1());

        let request = BurnRequest {
            caller: user1(),
            amount: ONE,
            block_height: 101,
        };
        let result = burn(&mut vault, &mut token, &mut reserve, &request);
        assert!(matches!(result, Err(ParUsdError::AccountRestricted { .. })));
    }
}
