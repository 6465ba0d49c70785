//! Fee-Inclusive Quote Functions
//!
//! Read-only quotes for off-chain callers, in the ERC4626 preview
//! style. Every quote accounts for the active fee schedule and decimal
//! truncation so callers see exactly what a transaction would produce
//! before committing:
//!
//! - `preview_deposit`: collateral in → net stable out
//! - `preview_mint`: desired stable out → collateral required
//! - `preview_redeem`: stable in → net collateral out
//! - `preview_withdraw`: desired collateral out → stable required
//!
//! Output quotes reuse the executing paths' exact math; input quotes
//! round up so the quoted input always covers the requested output.

use parusd_common::{
    constants::reserve as reserve_config,
    errors::ParUsdResult,
    math::{denormalize, gross_up_for_fee, net_after_fee, normalize, scale_between_ceil},
    reserve::CollateralReserve,
    types::AssetId,
};

use crate::state::VaultState;

/// Net stable units a collateral deposit would mint
pub fn preview_deposit(
    vault: &VaultState,
    reserve: &dyn CollateralReserve,
    asset: &AssetId,
    collateral_amount: u128,
) -> ParUsdResult<u128> {
    let decimals = reserve.asset_decimals(asset)?;
    let gross = normalize(collateral_amount, decimals)?;

    let schedule = vault.mint_fee_schedule();
    let (_, fee_quote) = net_after_fee(gross, &schedule)?;
    let fee_raw = denormalize(fee_quote, decimals)?;

    // Mirror the mint path: the reserve receives the post-fee remainder
    normalize(collateral_amount - fee_raw, decimals)
}

/// Raw collateral required to mint at least `stable_out` net
pub fn preview_mint(
    vault: &VaultState,
    reserve: &dyn CollateralReserve,
    asset: &AssetId,
    stable_out: u128,
) -> ParUsdResult<u128> {
    let decimals = reserve.asset_decimals(asset)?;
    let schedule = vault.mint_fee_schedule();

    let gross = gross_up_for_fee(stable_out, &schedule)?;
    scale_between_ceil(gross, reserve_config::INTERNAL_DECIMALS, decimals)
}

/// Raw collateral an instant redemption of `amount` would pay out
pub fn preview_redeem(
    vault: &VaultState,
    reserve: &dyn CollateralReserve,
    asset: &AssetId,
    amount: u128,
) -> ParUsdResult<u128> {
    let decimals = reserve.asset_decimals(asset)?;
    let schedule = vault.redeem_fee_schedule();

    let (_, fee) = net_after_fee(amount, &schedule)?;
    let gross_raw = denormalize(amount, decimals)?;
    let fee_raw = denormalize(fee, decimals)?;
    Ok(gross_raw.saturating_sub(fee_raw))
}

/// Stable units to redeem to receive at least `collateral_out` raw
pub fn preview_withdraw(
    vault: &VaultState,
    reserve: &dyn CollateralReserve,
    asset: &AssetId,
    collateral_out: u128,
) -> ParUsdResult<u128> {
    let decimals = reserve.asset_decimals(asset)?;
    let schedule = vault.redeem_fee_schedule();

    let target = scale_between_ceil(collateral_out, decimals, reserve_config::INTERNAL_DECIMALS)?;
    gross_up_for_fee(target, &schedule)
}

// ============================================================================
// Tests
// ============================================================================
