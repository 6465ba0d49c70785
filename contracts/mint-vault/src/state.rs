//! Vault State
//!
//! Persistent state of the mint vault: runtime configuration, the
//! per-block volume windows, the per-account redemption request map,
//! escrow accounting, accrued treasury fees, and the event log.

use std::collections::{BTreeMap, BTreeSet};

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use parusd_common::{
    access_control::{CredentialGate, RestrictionList},
    constants::{cooldown, fees, limits},
    delegation::DelegationSet,
    errors::{ParUsdError, ParUsdResult},
    events::EventLog,
    rate_limiter::BlockWindow,
    types::{Address, AssetId, FeeConfig, RedemptionMode, RedemptionRequest},
};

use crate::escrow::EscrowState;

// ============================================================================
// Configuration
// ============================================================================

/// Runtime-adjustable vault parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VaultConfig {
    /// Fee schedule for collateral mints
    pub mint_fee: FeeConfig,
    /// Fee schedule for redemptions
    pub redeem_fee: FeeConfig,
    /// Fee recipient; fees are zero while unset
    pub treasury: Option<Address>,
    /// Minimum net amount a collateral mint must produce
    pub min_mint_amount: u128,
    /// Minimum amount a redemption may be opened or updated to
    pub min_redeem_amount: u128,
    /// Per-block minted-volume cap (zero disables minting)
    pub max_mint_per_block: u128,
    /// Per-block redeemed-volume cap (zero disables redemptions)
    pub max_redeem_per_block: u128,
    /// Cooldown duration for the cooldown redemption protocol
    pub cooldown_secs: u64,
    /// Which redemption protocol this vault runs
    pub redemption_mode: RedemptionMode,
    /// Whether the credential gate is consulted at all
    pub gate_enabled: bool,
    /// Circuit breaker over the mint/redeem entry points
    pub paused: bool,
}

impl VaultConfig {
    /// Default configuration for the given redemption mode
    pub fn new(redemption_mode: RedemptionMode) -> Self {
        Self {
            mint_fee: FeeConfig::new(fees::DEFAULT_MINT_FEE_BPS, 0),
            redeem_fee: FeeConfig::new(fees::DEFAULT_REDEEM_FEE_BPS, 0),
            treasury: None,
            min_mint_amount: limits::MIN_MINT_AMOUNT,
            min_redeem_amount: limits::MIN_REDEEM_AMOUNT,
            max_mint_per_block: limits::MAX_MINT_PER_BLOCK,
            max_redeem_per_block: limits::MAX_REDEEM_PER_BLOCK,
            cooldown_secs: cooldown::DEFAULT_COOLDOWN_SECS,
            redemption_mode,
            gate_enabled: true,
            paused: false,
        }
    }
}

// ============================================================================
// State
// ============================================================================

/// Full vault state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VaultState {
    /// The vault's own address (supply authority over token and reserve)
    pub address: Address,
    /// Runtime configuration
    pub config: VaultConfig,
    /// Accounts barred from transfer/mint/redeem
    pub restrictions: RestrictionList,
    /// Credential-gate bypass list (AMM pools and similar contracts)
    pub whitelist: BTreeSet<Address>,
    /// Minted volume for the current block
    pub mint_window: BlockWindow,
    /// Redeemed volume for the current block
    pub redeem_window: BlockWindow,
    /// Active redemption request per account
    pub requests: BTreeMap<Address, RedemptionRequest>,
    /// Escrow holding locked redemption funds
    pub escrow: EscrowState,
    /// Collected fees per asset, in raw collateral units, owed to the treasury
    pub treasury_accruals: BTreeMap<AssetId, u128>,
    /// Delegated signer handshakes
    pub delegations: DelegationSet,
    /// Accumulated events
    pub events: EventLog,
    /// Re-entrancy flag; set for the duration of every mutating entry point
    entered: bool,
}

impl VaultState {
    /// Create a vault at `address` running the given redemption protocol
    pub fn new(address: Address, redemption_mode: RedemptionMode) -> Self {
        Self {
            address,
            config: VaultConfig::new(redemption_mode),
            restrictions: RestrictionList::new(),
            whitelist: BTreeSet::new(),
            mint_window: BlockWindow::new(),
            redeem_window: BlockWindow::new(),
            requests: BTreeMap::new(),
            escrow: EscrowState::new(address),
            treasury_accruals: BTreeMap::new(),
            delegations: DelegationSet::new(),
            events: EventLog::new(),
            entered: false,
        }
    }

    // ============ Re-entrancy Guard ============

    /// Mark a mutating entry point as entered
    pub fn begin_entry(&mut self) -> ParUsdResult<()> {
        if self.entered {
            return Err(ParUsdError::ReentrantCall);
        }
        self.entered = true;
        Ok(())
    }

    /// Clear the entry flag
    pub fn end_entry(&mut self) {
        self.entered = false;
    }

    // ============ Policy Checks ============

    /// Error while the circuit breaker is engaged
    pub fn require_not_paused(&self) -> ParUsdResult<()> {
        if self.config.paused {
            return Err(ParUsdError::ProtocolPaused);
        }
        Ok(())
    }

    /// Error unless the vault runs the given redemption protocol
    pub fn require_mode(&self, mode: RedemptionMode) -> ParUsdResult<()> {
        if self.config.redemption_mode != mode {
            return Err(ParUsdError::WrongRedemptionMode);
        }
        Ok(())
    }

    /// Effective credential answer: true when the gate is disabled or the
    /// account is whitelisted, otherwise whatever the gate says
    pub fn credentials_ok(&self, gate: &dyn CredentialGate, account: &Address) -> bool {
        !self.config.gate_enabled
            || self.whitelist.contains(account)
            || gate.has_valid_credentials(account)
    }

    /// Error unless the account passes the effective credential check
    pub fn require_credentials(
        &self,
        gate: &dyn CredentialGate,
        account: &Address,
    ) -> ParUsdResult<()> {
        if !self.credentials_ok(gate, account) {
            return Err(ParUsdError::CredentialCheckFailed { account: *account });
        }
        Ok(())
    }

    // ============ Fee Schedules ============

    /// Mint fee schedule; zero while no treasury is configured
    pub fn mint_fee_schedule(&self) -> FeeConfig {
        if self.config.treasury.is_some() {
            self.config.mint_fee
        } else {
            FeeConfig::zero()
        }
    }

    /// Redeem fee schedule; zero while no treasury is configured
    pub fn redeem_fee_schedule(&self) -> FeeConfig {
        if self.config.treasury.is_some() {
            self.config.redeem_fee
        } else {
            FeeConfig::zero()
        }
    }

    /// Record a collateral-denominated fee owed to the treasury
    pub fn accrue_treasury_fee(&mut self, asset: &AssetId, amount: u128) -> ParUsdResult<()> {
        if amount == 0 {
            return Ok(());
        }
        let accrued = self.treasury_accruals.entry(*asset).or_insert(0);
        *accrued = accrued.checked_add(amount).ok_or(ParUsdError::Overflow)?;
        Ok(())
    }

    // ============ Views ============

    /// Active redemption request for an account, if any
    pub fn pending_request(&self, account: &Address) -> Option<&RedemptionRequest> {
        self.requests.get(account)
    }

    /// Collateral-denominated fees accrued for an asset
    pub fn treasury_accrued(&self, asset: &AssetId) -> u128 {
        self.treasury_accruals.get(asset).copied().unwrap_or(0)
    }

    /// Mintable volume left in the current block
    pub fn mint_capacity(&self, block_height: u64) -> u128 {
        self.mint_window
            .remaining(self.config.max_mint_per_block, block_height)
    }

    /// Redeemable volume left in the current block
    pub fn redeem_capacity(&self, block_height: u64) -> u128 {
        self.redeem_window
            .remaining(self.config.max_redeem_per_block, block_height)
    }
}

// ============================================================================
// Tests
// ============================================================================
