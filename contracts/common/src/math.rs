//! Mathematical Utilities for the parUSD Protocol
//!
//! Decimal normalization between heterogeneous collateral precisions and
//! the 18-decimal internal unit, and fee arithmetic reconciling
//! percentage rates against minimum floors. All operations are checked;
//! scale-down conversions truncate.

use crate::constants::{fees, reserve};
use crate::errors::{ParUsdError, ParUsdResult};
use crate::types::FeeConfig;

/// Convert an amount between two decimal precisions.
///
/// Scaling up multiplies (checked); scaling down divides, truncating any
/// sub-precision remainder.
pub fn scale_between(amount: u128, from_decimals: u8, to_decimals: u8) -> ParUsdResult<u128> {
    if from_decimals == to_decimals {
        return Ok(amount);
    }

    if from_decimals > to_decimals {
        let divisor = 10u128
            .checked_pow((from_decimals - to_decimals) as u32)
            .ok_or(ParUsdError::Overflow)?;
        Ok(amount / divisor)
    } else {
        let multiplier = 10u128
            .checked_pow((to_decimals - from_decimals) as u32)
            .ok_or(ParUsdError::Overflow)?;
        amount.checked_mul(multiplier).ok_or(ParUsdError::Overflow)
    }
}

/// Convert between precisions, rounding up on scale-down.
///
/// Used when quoting inputs: the quoted amount must cover the target
/// even after the executing path's truncation.
pub fn scale_between_ceil(amount: u128, from_decimals: u8, to_decimals: u8) -> ParUsdResult<u128> {
    if from_decimals <= to_decimals {
        return scale_between(amount, from_decimals, to_decimals);
    }

    let divisor = 10u128
        .checked_pow((from_decimals - to_decimals) as u32)
        .ok_or(ParUsdError::Overflow)?;
    let quotient = amount / divisor;
    if amount % divisor == 0 {
        Ok(quotient)
    } else {
        quotient.checked_add(1).ok_or(ParUsdError::Overflow)
    }
}

/// Normalize a raw asset amount to internal 18-decimal units
pub fn normalize(amount: u128, asset_decimals: u8) -> ParUsdResult<u128> {
    scale_between(amount, asset_decimals, reserve::INTERNAL_DECIMALS)
}

/// Convert an internal 18-decimal amount back to raw asset units
pub fn denormalize(amount: u128, asset_decimals: u8) -> ParUsdResult<u128> {
    scale_between(amount, reserve::INTERNAL_DECIMALS, asset_decimals)
}

/// Basis-point percentage of an amount
pub fn percentage_of(amount: u128, bps: u64) -> ParUsdResult<u128> {
    amount
        .checked_mul(bps as u128)
        .ok_or(ParUsdError::Overflow)
        .map(|v| v / fees::BPS_DENOMINATOR as u128)
}

/// Fee for an amount under a percentage/floor config: max(amount * bps / 10000, floor)
pub fn fee_with_floor(amount: u128, config: &FeeConfig) -> ParUsdResult<u128> {
    let pct = percentage_of(amount, config.fee_bps)?;
    Ok(pct.max(config.min_fee))
}

/// Split an amount into (net, fee); errors when the fee consumes the
/// whole amount
pub fn net_after_fee(amount: u128, config: &FeeConfig) -> ParUsdResult<(u128, u128)> {
    let fee = fee_with_floor(amount, config)?;
    if fee >= amount {
        return Err(ParUsdError::FeeExceedsAmount { amount, fee });
    }
    Ok((amount - fee, fee))
}

/// Smallest gross amount whose net after fees covers `net`.
///
/// Used by the quote functions to invert the fee schedule: callers that
/// want an exact net output need the fee-inclusive input.
pub fn gross_up_for_fee(net: u128, config: &FeeConfig) -> ParUsdResult<u128> {
    if config.fee_bps == 0 && config.min_fee == 0 {
        return Ok(net);
    }

    let denominator = fees::BPS_DENOMINATOR as u128;
    let keep = denominator - config.fee_bps as u128;
    if keep == 0 {
        return Err(ParUsdError::DivisionByZero);
    }

    // Percentage-dominant candidate: ceil(net * D / (D - bps))
    let scaled = net.checked_mul(denominator).ok_or(ParUsdError::Overflow)?;
    let pct_candidate = scaled / keep + u128::from(scaled % keep != 0);

    // Floor-dominant candidate
    let floor_candidate = net.checked_add(config.min_fee).ok_or(ParUsdError::Overflow)?;

    Ok(pct_candidate.max(floor_candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::token::ONE;

    #[test]
    fn test_normalize_six_decimal_asset() {
        // 1,000,000 raw units of a 6-decimal asset = 1.0 token = 1e18 internal
        let normalized = normalize(1_000_000, 6).unwrap();
        assert_eq!(normalized, ONE);

        let raw = denormalize(normalized, 6).unwrap();
        assert_eq!(raw, 1_000_000);
    }

    #[test]
    fn test_scale_down_truncates() {
        // 24-decimal asset scales down; the sub-internal remainder is lost
        let normalized = normalize(1_234_567, 24).unwrap();
        assert_eq!(normalized, 1);

        // 18 -> 6 truncation
        let raw = denormalize(1_999_999_999_999_999_999, 6).unwrap();
        assert_eq!(raw, 1_999_999);
    }

    #[test]
    fn test_scale_ceil_rounds_up() {
        // Exact division stays exact
        assert_eq!(scale_between_ceil(2_000_000_000_000, 18, 6).unwrap(), 2);
        // A remainder rounds up instead of truncating
        assert_eq!(scale_between_ceil(2_000_000_000_001, 18, 6).unwrap(), 3);
        // Scale-up is exact either way
        assert_eq!(scale_between_ceil(3, 6, 18).unwrap(), 3_000_000_000_000);
    }

    #[test]
    fn test_normalize_identity_at_internal_precision() {
        assert_eq!(normalize(ONE, 18).unwrap(), ONE);
        assert_eq!(denormalize(ONE, 18).unwrap(), ONE);
    }

    #[test]
    fn test_normalize_overflow() {
        let result = normalize(u128::MAX / 2, 0);
        assert!(matches!(result, Err(ParUsdError::Overflow)));
    }

    #[test]
    fn test_percentage_fee() {
        let config = FeeConfig::new(50, 0); // 0.5%
        let fee = fee_with_floor(1_000 * ONE, &config).unwrap();
        assert_eq!(fee, 5 * ONE);
    }

    #[test]
    fn test_fee_floor_dominates() {
        // Percentage fee (0.1% of 100 = 0.1) below the floor of 1
        let config = FeeConfig::new(10, ONE);
        let fee = fee_with_floor(100 * ONE, &config).unwrap();
        assert_eq!(fee, ONE);

        // Larger amount: percentage takes over
        let fee = fee_with_floor(100_000 * ONE, &config).unwrap();
        assert_eq!(fee, 100 * ONE);
    }

    #[test]
    fn test_net_after_fee() {
        let config = FeeConfig::new(100, 0); // 1%
        let (net, fee) = net_after_fee(1_000 * ONE, &config).unwrap();
        assert_eq!(fee, 10 * ONE);
        assert_eq!(net, 990 * ONE);
    }

    #[test]
    fn test_fee_consuming_amount_rejected() {
        let config = FeeConfig::new(10, 5 * ONE);
        let result = net_after_fee(2 * ONE, &config);
        assert!(matches!(result, Err(ParUsdError::FeeExceedsAmount { .. })));
    }

    #[test]
    fn test_gross_up_covers_net() {
        let configs = [
            FeeConfig::new(0, 0),
            FeeConfig::new(10, 0),
            FeeConfig::new(1_000, 0),
            FeeConfig::new(10, ONE),
            FeeConfig::new(0, 3 * ONE),
        ];

        for config in &configs {
            for net in [1u128, 999, ONE, 123_456_789 * ONE] {
                let gross = gross_up_for_fee(net, config).unwrap();
                let (actual_net, _) = net_after_fee(gross, config).unwrap();
                assert!(
                    actual_net >= net,
                    "gross-up must cover the requested net for {config:?}"
                );
            }
        }
    }

    #[test]
    fn test_gross_up_zero_fee_is_identity() {
        assert_eq!(gross_up_for_fee(42, &FeeConfig::zero()).unwrap(), 42);
    }
}
