//! Redemption — Instant-or-Queued Protocol
//!
//! A redemption request executes synchronously when the reserve holds
//! enough of the requested collateral. When it does not, the caller may
//! queue: the stable units move into escrow and a per-account request is
//! recorded, later completed by a redemption operator (the "solver") or
//! cancelled by the owner. The request map carries no FIFO ordering;
//! completion order is entirely at the operator's discretion.
//!
//! The completion internals here are shared with the cooldown protocol,
//! which differs only in what gates completion (time instead of
//! liquidity and operator action).

use parusd_common::{
    access_control::{require_role, Capability, CapabilityRegistry, CredentialGate},
    errors::{ParUsdError, ParUsdResult},
    events::ParUsdEvent,
    math::{denormalize, net_after_fee},
    reserve::CollateralReserve,
    types::{Address, AssetId, RedemptionMode, RedemptionRequest},
    validation::{require_minimum, require_nonzero_amount},
    Vec,
};
use parusd_token::StableTokenState;

use crate::state::VaultState;

// ============================================================================
// Requests & Outcomes
// ============================================================================

/// Redemption request (instant-or-queued protocol)
#[derive(Debug, Clone)]
pub struct RedeemRequest {
    /// Redeeming account
    pub caller: Address,
    /// Collateral asset to receive
    pub asset: AssetId,
    /// Stable units to redeem (internal units)
    pub amount: u128,
    /// Queue instead of failing when liquidity is short
    pub allow_queue: bool,
    /// Block height
    pub block_height: u64,
}

/// Amount change for a pending request
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Request owner
    pub caller: Address,
    /// New locked amount (internal units)
    pub new_amount: u128,
    /// Block height
    pub block_height: u64,
}

/// Cancellation of a pending request
#[derive(Debug, Clone)]
pub struct CancelRequest {
    /// Request owner
    pub caller: Address,
    /// Block height
    pub block_height: u64,
}

/// Operator completion of one user's pending request
#[derive(Debug, Clone)]
pub struct CompleteRequest {
    /// Caller; must hold the RedemptionOperator capability
    pub caller: Address,
    /// Owner of the request to complete
    pub user: Address,
    /// Block height
    pub block_height: u64,
}

/// Operator completion of a batch of pending requests
#[derive(Debug, Clone)]
pub struct BulkCompleteRequest {
    /// Caller; must hold the RedemptionOperator capability
    pub caller: Address,
    /// Owners of the requests to complete
    pub users: Vec<Address>,
    /// Block height
    pub block_height: u64,
}

/// Outcome of a redeem call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedeemOutcome {
    /// Raw collateral paid out (zero when queued)
    pub collateral_paid: u128,
    /// Fee in internal units (zero when queued)
    pub fee: u128,
    /// Whether the request was queued instead of executed
    pub was_queued: bool,
}

/// Outcome of completing one pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Request owner
    pub account: Address,
    /// Stable units redeemed
    pub amount: u128,
    /// Raw collateral paid out
    pub collateral_paid: u128,
    /// Fee in internal units
    pub fee: u128,
}

/// Per-entry results of a bulk completion.
///
/// Entries are processed independently: one invalid entry is reported
/// and does not block the rest of the batch.
#[derive(Debug, Clone, Default)]
pub struct BulkCompletionReport {
    /// Successfully completed requests
    pub completed: Vec<CompletionOutcome>,
    /// Entries that failed, with the condition that stopped each
    pub failed: Vec<(Address, ParUsdError)>,
}

// ============================================================================
// Entry Points
// ============================================================================

/// Redeem stable units for collateral, instantly when liquidity allows,
/// queued otherwise (if `allow_queue`).
pub fn redeem(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    gate: &dyn CredentialGate,
    request: &RedeemRequest,
) -> ParUsdResult<RedeemOutcome> {
    vault.begin_entry()?;
    let result = execute_redeem(vault, token, reserve, gate, request);
    vault.end_entry();
    result
}

fn execute_redeem(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    gate: &dyn CredentialGate,
    request: &RedeemRequest,
) -> ParUsdResult<RedeemOutcome> {
    vault.require_not_paused()?;
    vault.require_mode(RedemptionMode::InstantOrQueued)?;
    require_nonzero_amount(request.amount)?;
    require_minimum(request.amount, vault.config.min_redeem_amount)?;
    vault.restrictions.require_unrestricted(&request.caller)?;
    vault.require_credentials(gate, &request.caller)?;

    let decimals = reserve.asset_decimals(&request.asset)?;
    let required = denormalize(request.amount, decimals)?;
    let available = reserve.collateral_balance(&request.asset);

    if available >= required {
        let (paid, fee) = execute_payout(
            vault,
            token,
            reserve,
            &request.caller,
            &request.asset,
            request.amount,
            request.block_height,
        )?;

        vault.events.emit(ParUsdEvent::RedemptionExecuted {
            account: request.caller,
            asset: request.asset,
            amount: request.amount,
            collateral_paid: paid,
            fee,
            block_height: request.block_height,
        });

        return Ok(RedeemOutcome {
            collateral_paid: paid,
            fee,
            was_queued: false,
        });
    }

    if !request.allow_queue {
        return Err(ParUsdError::InsufficientLiquidity {
            available,
            required,
        });
    }

    if vault.requests.contains_key(&request.caller) {
        return Err(ParUsdError::RequestAlreadyExists {
            account: request.caller,
        });
    }

    vault.escrow.lock(token, &vault.restrictions, &request.caller, request.amount)?;
    vault.requests.insert(
        request.caller,
        RedemptionRequest::queued(
            request.caller,
            request.asset,
            request.amount,
            request.block_height,
        ),
    );

    vault.events.emit(ParUsdEvent::RedemptionQueued {
        account: request.caller,
        asset: request.asset,
        amount: request.amount,
        cooldown_end: None,
        block_height: request.block_height,
    });

    Ok(RedeemOutcome {
        collateral_paid: 0,
        fee: 0,
        was_queued: true,
    })
}

/// Change the locked amount of a pending request. Increases move the
/// delta into escrow; decreases return it. Never re-checks liquidity or
/// auto-executes: execution stays an explicit completion action.
pub fn update_redemption_request(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    request: &UpdateRequest,
) -> ParUsdResult<()> {
    vault.begin_entry()?;
    let result = execute_update(vault, token, request);
    vault.end_entry();
    result
}

fn execute_update(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    request: &UpdateRequest,
) -> ParUsdResult<()> {
    vault.require_not_paused()?;
    vault.require_mode(RedemptionMode::InstantOrQueued)?;
    require_nonzero_amount(request.new_amount)?;
    require_minimum(request.new_amount, vault.config.min_redeem_amount)?;

    let existing = vault
        .requests
        .get(&request.caller)
        .cloned()
        .ok_or(ParUsdError::NoActiveRequest {
            account: request.caller,
        })?;

    let vault_address = vault.address;
    if request.new_amount > existing.amount {
        let delta = request.new_amount - existing.amount;
        vault
            .escrow
            .lock(token, &vault.restrictions, &request.caller, delta)?;
    } else if request.new_amount < existing.amount {
        let delta = existing.amount - request.new_amount;
        vault.escrow.release(
            &vault_address,
            token,
            &vault.restrictions,
            &request.caller,
            delta,
        )?;
        vault.events.emit(ParUsdEvent::EscrowReleased {
            to: request.caller,
            amount: delta,
            block_height: request.block_height,
        });
    }

    if let Some(record) = vault.requests.get_mut(&request.caller) {
        record.amount = request.new_amount;
    }

    vault.events.emit(ParUsdEvent::RedemptionRequestUpdated {
        account: request.caller,
        old_amount: existing.amount,
        new_amount: request.new_amount,
        block_height: request.block_height,
    });

    Ok(())
}

/// Cancel a pending request, returning the full escrowed amount.
/// Shared by both redemption protocols and available during a pause.
pub fn cancel_redemption(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    request: &CancelRequest,
) -> ParUsdResult<()> {
    vault.begin_entry()?;
    let result = execute_cancel(vault, token, request);
    vault.end_entry();
    result
}

fn execute_cancel(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    request: &CancelRequest,
) -> ParUsdResult<()> {
    let existing = vault
        .requests
        .get(&request.caller)
        .cloned()
        .ok_or(ParUsdError::NoActiveRequest {
            account: request.caller,
        })?;

    let vault_address = vault.address;
    vault.escrow.release(
        &vault_address,
        token,
        &vault.restrictions,
        &request.caller,
        existing.amount,
    )?;
    vault.requests.remove(&request.caller);

    vault.events.emit(ParUsdEvent::EscrowReleased {
        to: request.caller,
        amount: existing.amount,
        block_height: request.block_height,
    });
    vault.events.emit(ParUsdEvent::RedemptionCancelled {
        account: request.caller,
        amount: existing.amount,
        block_height: request.block_height,
    });

    Ok(())
}

/// Complete one user's queued request; RedemptionOperator capability
/// required. The user's restriction and credential status are
/// re-verified at completion time, not just at request time.
pub fn complete_redemption(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    roles: &dyn CapabilityRegistry,
    gate: &dyn CredentialGate,
    request: &CompleteRequest,
) -> ParUsdResult<CompletionOutcome> {
    vault.begin_entry()?;
    let result = execute_operator_completion(vault, token, reserve, roles, gate, request);
    vault.end_entry();
    result
}

fn execute_operator_completion(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    roles: &dyn CapabilityRegistry,
    gate: &dyn CredentialGate,
    request: &CompleteRequest,
) -> ParUsdResult<CompletionOutcome> {
    vault.require_not_paused()?;
    vault.require_mode(RedemptionMode::InstantOrQueued)?;
    require_role(roles, Capability::RedemptionOperator, &request.caller)?;

    execute_completion(vault, token, reserve, gate, &request.user, request.block_height)
}

/// Complete a batch of queued requests. Entries are isolated: each
/// validates and mutates independently, and failures are reported
/// per user without aborting the rest.
pub fn bulk_complete_redemptions(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    roles: &dyn CapabilityRegistry,
    gate: &dyn CredentialGate,
    request: &BulkCompleteRequest,
) -> ParUsdResult<BulkCompletionReport> {
    vault.begin_entry()?;
    let result = execute_bulk_completion(vault, token, reserve, roles, gate, request);
    vault.end_entry();
    result
}

fn execute_bulk_completion(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    roles: &dyn CapabilityRegistry,
    gate: &dyn CredentialGate,
    request: &BulkCompleteRequest,
) -> ParUsdResult<BulkCompletionReport> {
    vault.require_not_paused()?;
    vault.require_mode(RedemptionMode::InstantOrQueued)?;
    require_role(roles, Capability::RedemptionOperator, &request.caller)?;

    let mut report = BulkCompletionReport::default();
    for user in &request.users {
        match execute_completion(vault, token, reserve, gate, user, request.block_height) {
            Ok(outcome) => report.completed.push(outcome),
            Err(err) => report.failed.push((*user, err)),
        }
    }
    Ok(report)
}

// ============================================================================
// Shared Internals
// ============================================================================

/// Burn `amount` from `account`, redeem reserve units for collateral,
/// take the fee from the proceeds, and return (payout, fee).
///
/// All fallible conditions are validated before the first mutation.
fn execute_payout(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    account: &Address,
    asset: &AssetId,
    amount: u128,
    block_height: u64,
) -> ParUsdResult<(u128, u128)> {
    let decimals = reserve.asset_decimals(asset)?;
    let schedule = vault.redeem_fee_schedule();
    let (_, fee) = net_after_fee(amount, &schedule)?;
    let fee_raw = denormalize(fee, decimals)?;

    if !vault
        .redeem_window
        .allows(amount, vault.config.max_redeem_per_block, block_height)
    {
        return Err(ParUsdError::RedeemLimitExceeded {
            requested: amount,
            remaining: vault.redeem_capacity(block_height),
        });
    }

    let balance = token.balance_of(account);
    if balance < amount {
        return Err(ParUsdError::InsufficientBalance {
            available: balance,
            requested: amount,
        });
    }

    let vault_address = vault.address;
    token.burn(&vault_address, account, amount)?;
    vault.redeem_window.record(amount, block_height);
    let gross = reserve.redeem(asset, amount, &vault_address)?;
    let paid = gross.saturating_sub(fee_raw);
    vault.accrue_treasury_fee(asset, fee_raw)?;

    Ok((paid, fee))
}

/// Completion shared by the operator path and the cooldown claim: pull
/// the escrowed amount back into the vault, burn it, redeem reserve
/// units for the requested collateral, deduct the fee, pay the user,
/// and destroy the request.
pub(crate) fn execute_completion(
    vault: &mut VaultState,
    token: &mut StableTokenState,
    reserve: &mut dyn CollateralReserve,
    gate: &dyn CredentialGate,
    user: &Address,
    block_height: u64,
) -> ParUsdResult<CompletionOutcome> {
    let request = vault
        .requests
        .get(user)
        .cloned()
        .ok_or(ParUsdError::NoActiveRequest { account: *user })?;

    // Re-verify the user at completion time, not just at request time
    vault.restrictions.require_unrestricted(user)?;
    vault.require_credentials(gate, user)?;

    let decimals = reserve.asset_decimals(&request.asset)?;
    let required = denormalize(request.amount, decimals)?;
    let available = reserve.collateral_balance(&request.asset);
    if available < required {
        return Err(ParUsdError::InsufficientLiquidity {
            available,
            required,
        });
    }

    let schedule = vault.redeem_fee_schedule();
    let (_, fee) = net_after_fee(request.amount, &schedule)?;
    let fee_raw = denormalize(fee, decimals)?;

    if !vault.redeem_window.allows(
        request.amount,
        vault.config.max_redeem_per_block,
        block_height,
    ) {
        return Err(ParUsdError::RedeemLimitExceeded {
            requested: request.amount,
            remaining: vault.redeem_capacity(block_height),
        });
    }

    let vault_address = vault.address;
    vault.escrow.release(
        &vault_address,
        token,
        &vault.restrictions,
        &vault_address,
        request.amount,
    )?;
    token.burn(&vault_address, &vault_address, request.amount)?;
    vault.redeem_window.record(request.amount, block_height);
    let gross = reserve.redeem(&request.asset, request.amount, &vault_address)?;
    let paid = gross.saturating_sub(fee_raw);
    vault.accrue_treasury_fee(&request.asset, fee_raw)?;
    vault.requests.remove(user);

    vault.events.emit(ParUsdEvent::EscrowReleased {
        to: vault_address,
        amount: request.amount,
        block_height,
    });
    vault.events.emit(ParUsdEvent::RedemptionCompleted {
        account: *user,
        asset: request.asset,
        amount: request.amount,
        collateral_paid: paid,
        fee,
        block_height,
    });

    Ok(CompletionOutcome {
        account: *user,
        amount: request.amount,
        collateral_paid: paid,
        fee,
    })
}

// ============================================================================
// Tests
// ============================================================================
