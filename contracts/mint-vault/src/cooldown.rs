//! Redemption — Fixed-Cooldown Protocol
//!
//! The alternative redemption protocol: instead of waiting on liquidity
//! and an operator, every redemption locks into escrow for a fixed
//! cooldown window and is then claimed by the owner. Time, not
//! liquidity, is the gate, so no privileged operator is involved in
//! completion. Cancellation is shared with the instant-or-queued
//! protocol.

use parusd_common::{
    access_control::CredentialGate,
    errors::{ParUsdError, ParUsdResult},
    events::ParUsdEvent,
    reserve::CollateralReserve,
    types::{Address, AssetId, RedemptionMode, RedemptionRequest},
    validation::{require_minimum, require_nonzero_amount},
};
use parusd_token::StableTokenState;

use crate::redeem::{execute_completion, CompletionOutcome};
use crate::state::VaultState;

// ============================================================================
// Requests
// ============================================================================

/// Cooldown redemption request
#[derive(Debug, Clone)]
pub struct CooldownRedeemRequest {
    /// Redeeming account
    pub caller: Address,
    /// Collateral asset to receive at claim time
    pub asset: AssetId,
    /// Stable units to lock (internal units)
    pub amount: u128,
    /// Block height
    pub block_height: u64,
    /// Unix time the lock starts
    pub timestamp: u64,
}

/// Claim of a matured cooldown redemption
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    /// Request owner
    pub caller: Address,
    /// Block height
    pub block_height: u64,
    /// Unix time of the claim
    pub timestamp: u64,
}

// ============================================================================
// Entry Points
// ============================================================================

/// Lock stable units into escrow for the configured cooldown.
/// Returns the unix time the request becomes claimable.
pub fn cooldown_redeem(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    gate: &dyn CredentialGate,
    request: &CooldownRedeemRequest,
) -> ParUsdResult<u64> {
    vault.begin_entry()?;
    let result = execute_cooldown_redeem(vault, token, reserve, gate, request);
    vault.end_entry();
    result
}

fn execute_cooldown_redeem(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    gate: &dyn CredentialGate,
    request: &CooldownRedeemRequest,
) -> ParUsdResult<u64> {
    vault.require_not_paused()?;
    vault.require_mode(RedemptionMode::Cooldown)?;
    require_nonzero_amount(request.amount)?;
    require_minimum(request.amount, vault.config.min_redeem_amount)?;
    vault.restrictions.require_unrestricted(&request.caller)?;
    vault.require_credentials(gate, &request.caller)?;

    // The asset must be listed up front, even though collateral only
    // leaves the reserve at claim time
    reserve.asset_decimals(&request.asset)?;

    if vault.requests.contains_key(&request.caller) {
        return Err(ParUsdError::RequestAlreadyExists {
            account: request.caller,
        });
    }

    let cooldown_end = request
        .timestamp
        .checked_add(vault.config.cooldown_secs)
        .ok_or(ParUsdError::Overflow)?;

    vault
        .escrow
        .lock(token, &vault.restrictions, &request.caller, request.amount)?;
    vault.requests.insert(
        request.caller,
        RedemptionRequest::with_cooldown(
            request.caller,
            request.asset,
            request.amount,
            request.block_height,
            cooldown_end,
        ),
    );

    vault.events.emit(ParUsdEvent::RedemptionQueued {
        account: request.caller,
        asset: request.asset,
        amount: request.amount,
        cooldown_end: Some(cooldown_end),
        block_height: request.block_height,
    });

    Ok(cooldown_end)
}

/// Claim a matured cooldown redemption. Self-service: the owner calls
/// once `now >= cooldown_end`, then the shared burn/redeem/fee/payout
/// sequence runs.
pub fn claim_redemption(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    gate: &dyn CredentialGate,
    request: &ClaimRequest,
) -> ParUsdResult<CompletionOutcome> {
    vault.begin_entry()?;
    let result = execute_claim(vault, token, reserve, gate, request);
    vault.end_entry();
    result
}

fn execute_claim(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    gate: &dyn CredentialGate,
    request: &ClaimRequest,
) -> ParUsdResult<CompletionOutcome> {
    vault.require_not_paused()?;
    vault.require_mode(RedemptionMode::Cooldown)?;

    let pending = vault
        .requests
        .get(&request.caller)
        .ok_or(ParUsdError::NoActiveRequest {
            account: request.caller,
        })?;

    match pending.cooldown_end {
        Some(ends_at) if request.timestamp < ends_at => {
            return Err(ParUsdError::CooldownNotElapsed {
                now: request.timestamp,
                ends_at,
            });
        }
        Some(_) => {}
        // A request without a timer does not belong to this protocol
        None => return Err(ParUsdError::WrongRedemptionMode),
    }

    execute_completion(
        vault,
        token,
        reserve,
        gate,
        &request.caller,
        request.block_height,
    )
}

// ============================================================================
// Tests
// ============================================================================
