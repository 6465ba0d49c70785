//! Collateral Reserve Interface
//!
//! The multi-asset reserve backing parUSD. The vault consumes the
//! reserve through the narrow [`CollateralReserve`] trait; the concrete
//! reserve lives outside the vault's trust boundary.
//!
//! [`ReserveLedger`] is the in-memory reference implementation: it lists
//! collateral assets with their declared precisions, normalizes deposits
//! to the 18-decimal internal unit, and tracks reserve units 1:1 against
//! deposited collateral.
//!
//! ## Key Invariants
//!
//! - Reserve units are issued 1:1 against normalized collateral
//! - An asset cannot be delisted while it backs deposits
//! - Only the reserve operator lists or delists assets

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::reserve as reserve_config;
use crate::errors::{ParUsdError, ParUsdResult};
use crate::math::{denormalize, normalize};
use crate::types::{Address, AssetId};
use crate::Vec;

// ============================================================================
// Types
// ============================================================================

/// Configuration for a listed collateral asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AssetConfig {
    /// Asset identifier (token address/script hash)
    pub asset: AssetId,
    /// Declared decimal precision of the raw asset
    pub decimals: u8,
    /// Whether deposits and redemptions are accepted
    pub supported: bool,
    /// Total raw collateral of this asset held by the reserve
    pub total_deposited: u128,
}

impl AssetConfig {
    /// Create a new active asset config
    pub fn new(asset: AssetId, decimals: u8) -> Self {
        Self {
            asset,
            decimals,
            supported: true,
            total_deposited: 0,
        }
    }
}

// ============================================================================
// Interface
// ============================================================================

/// The narrow interface the vault consumes from the reserve.
///
/// Reserve units are 18-decimal internal units issued 1:1 against
/// normalized collateral. Collateral released by [`redeem`] is returned
/// to the caller, which routes it to the final recipient.
///
/// [`redeem`]: CollateralReserve::redeem
pub trait CollateralReserve {
    /// Whether the asset is listed and accepting operations
    fn is_supported_asset(&self, asset: &AssetId) -> bool;

    /// Declared decimal precision of a listed asset
    fn asset_decimals(&self, asset: &AssetId) -> ParUsdResult<u8>;

    /// Raw collateral balance the reserve holds for an asset
    fn collateral_balance(&self, asset: &AssetId) -> u128;

    /// Reserve units a holder owns
    fn unit_balance(&self, holder: &Address) -> u128;

    /// Deposit raw collateral and issue reserve units to `recipient`.
    /// Returns the units issued (the normalized deposit).
    fn mint(&mut self, asset: &AssetId, amount: u128, recipient: &Address) -> ParUsdResult<u128>;

    /// Burn `reserve_units` from `holder` and release the matching raw
    /// collateral. Returns the collateral amount released.
    fn redeem(&mut self, asset: &AssetId, reserve_units: u128, holder: &Address)
        -> ParUsdResult<u128>;

    /// Issue unbacked reserve units (privileged protocol path)
    fn mint_without_collateral(&mut self, recipient: &Address, amount: u128) -> ParUsdResult<()>;

    /// Burn reserve units without releasing collateral
    fn burn(&mut self, holder: &Address, amount: u128) -> ParUsdResult<()>;
}

// ============================================================================
// Reference Implementation
// ============================================================================

/// In-memory reserve ledger implementing [`CollateralReserve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ReserveLedger {
    /// Reserve operator allowed to list/delist assets
    pub operator: Address,
    /// Listed asset configurations
    pub assets: Vec<AssetConfig>,
    /// Reserve units per holder
    pub unit_balances: BTreeMap<Address, u128>,
    /// Total reserve units outstanding
    pub total_units: u128,
}

impl ReserveLedger {
    /// Create an empty ledger controlled by `operator`
    pub fn new(operator: Address) -> Self {
        Self {
            operator,
            assets: Vec::new(),
            unit_balances: BTreeMap::new(),
            total_units: 0,
        }
    }

    fn require_operator(&self, caller: &Address) -> ParUsdResult<()> {
        if caller != &self.operator {
            return Err(ParUsdError::UnauthorizedCaller {
                expected: self.operator,
                actual: *caller,
            });
        }
        Ok(())
    }

    fn config(&self, asset: &AssetId) -> Option<&AssetConfig> {
        self.assets.iter().find(|c| &c.asset == asset)
    }

    fn config_mut(&mut self, asset: &AssetId) -> Option<&mut AssetConfig> {
        self.assets.iter_mut().find(|c| &c.asset == asset)
    }

    fn supported_config(&self, asset: &AssetId) -> ParUsdResult<&AssetConfig> {
        self.config(asset)
            .filter(|c| c.supported)
            .ok_or(ParUsdError::UnsupportedAsset { asset: *asset })
    }

    /// List a new collateral asset
    pub fn list_asset(&mut self, caller: &Address, asset: AssetId, decimals: u8) -> ParUsdResult<()> {
        self.require_operator(caller)?;

        if self.config(&asset).is_some() {
            return Err(ParUsdError::AssetAlreadyListed { asset });
        }
        if self.assets.len() >= reserve_config::MAX_ASSETS {
            return Err(ParUsdError::InvalidParameter {
                param: "asset",
                reason: "asset list is full",
            });
        }
        if decimals > reserve_config::MAX_ASSET_DECIMALS {
            return Err(ParUsdError::InvalidParameter {
                param: "decimals",
                reason: "declared precision too large",
            });
        }

        self.assets.push(AssetConfig::new(asset, decimals));
        Ok(())
    }

    /// Delist a collateral asset. Rejected while the asset backs deposits.
    pub fn delist_asset(&mut self, caller: &Address, asset: &AssetId) -> ParUsdResult<()> {
        self.require_operator(caller)?;

        let config = self
            .config(asset)
            .ok_or(ParUsdError::UnsupportedAsset { asset: *asset })?;
        if config.total_deposited > 0 {
            return Err(ParUsdError::AssetHasBalance {
                asset: *asset,
                balance: config.total_deposited,
            });
        }

        self.assets.retain(|c| &c.asset != asset);
        Ok(())
    }

    fn credit_units(&mut self, holder: &Address, amount: u128) -> ParUsdResult<()> {
        let balance = self.unit_balances.entry(*holder).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(ParUsdError::Overflow)?;
        self.total_units = self
            .total_units
            .checked_add(amount)
            .ok_or(ParUsdError::Overflow)?;
        Ok(())
    }

    fn debit_units(&mut self, holder: &Address, amount: u128) -> ParUsdResult<()> {
        let balance = self.unit_balances.entry(*holder).or_insert(0);
        if *balance < amount {
            return Err(ParUsdError::InsufficientBalance {
                available: *balance,
                requested: amount,
            });
        }
        *balance -= amount;
        self.total_units = self.total_units.saturating_sub(amount);
        Ok(())
    }
}

impl CollateralReserve for ReserveLedger {
    fn is_supported_asset(&self, asset: &AssetId) -> bool {
        self.config(asset).map(|c| c.supported).unwrap_or(false)
    }

    fn asset_decimals(&self, asset: &AssetId) -> ParUsdResult<u8> {
        self.supported_config(asset).map(|c| c.decimals)
    }

    fn collateral_balance(&self, asset: &AssetId) -> u128 {
        self.config(asset).map(|c| c.total_deposited).unwrap_or(0)
    }

    fn unit_balance(&self, holder: &Address) -> u128 {
        self.unit_balances.get(holder).copied().unwrap_or(0)
    }

    fn mint(&mut self, asset: &AssetId, amount: u128, recipient: &Address) -> ParUsdResult<u128> {
        if amount == 0 {
            return Err(ParUsdError::ZeroAmount);
        }

        let decimals = self.supported_config(asset)?.decimals;
        let units = normalize(amount, decimals)?;

        let config = self
            .config_mut(asset)
            .ok_or(ParUsdError::UnsupportedAsset { asset: *asset })?;
        config.total_deposited = config
            .total_deposited
            .checked_add(amount)
            .ok_or(ParUsdError::Overflow)?;

        self.credit_units(recipient, units)?;
        Ok(units)
    }

    fn redeem(
        &mut self,
        asset: &AssetId,
        reserve_units: u128,
        holder: &Address,
    ) -> ParUsdResult<u128> {
        if reserve_units == 0 {
            return Err(ParUsdError::ZeroAmount);
        }

        let config = self.supported_config(asset)?;
        let collateral = denormalize(reserve_units, config.decimals)?;
        if config.total_deposited < collateral {
            return Err(ParUsdError::InsufficientLiquidity {
                available: config.total_deposited,
                required: collateral,
            });
        }

        self.debit_units(holder, reserve_units)?;

        let config = self
            .config_mut(asset)
            .ok_or(ParUsdError::UnsupportedAsset { asset: *asset })?;
        config.total_deposited -= collateral;

        Ok(collateral)
    }

    fn mint_without_collateral(&mut self, recipient: &Address, amount: u128) -> ParUsdResult<()> {
        if amount == 0 {
            return Err(ParUsdError::ZeroAmount);
        }
        self.credit_units(recipient, amount)
    }

    fn burn(&mut self, holder: &Address, amount: u128) -> ParUsdResult<()> {
        if amount == 0 {
            return Err(ParUsdError::ZeroAmount);
        }
        self.debit_units(holder, amount)
    }
}

// ============================================================================
// Tests
// ============================================================================
