//! Validation Helpers for the parUSD Protocol
//!
//! Centralized input validation shared by the vault and token contracts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parusd_common::validation::{require_nonzero_address, require_nonzero_amount};
//! use parusd_common::check;
//!
//! check!(amount > 0, ParUsdError::ZeroAmount);
//! require_nonzero_address(&beneficiary, "beneficiary")?;
//! ```

use crate::errors::{ParUsdError, ParUsdResult};
use crate::types::Address;

// ============ Validation Macro ============

/// Check a condition and return an error if it fails.
///
/// Combines the condition check and error return in a single expression
/// for cleaner validation code.
#[macro_export]
macro_rules! check {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}

pub use crate::check;

// ============ Input Helpers ============

/// Reject the all-zero address
pub fn require_nonzero_address(address: &Address, param: &'static str) -> ParUsdResult<()> {
    if address == &[0u8; 32] {
        return Err(ParUsdError::ZeroAddress { param });
    }
    Ok(())
}

/// Reject a zero amount
pub fn require_nonzero_amount(amount: u128) -> ParUsdResult<()> {
    if amount == 0 {
        return Err(ParUsdError::ZeroAmount);
    }
    Ok(())
}

/// Reject an amount below a configured minimum
pub fn require_minimum(amount: u128, minimum: u128) -> ParUsdResult<()> {
    if amount < minimum {
        return Err(ParUsdError::BelowMinimum { amount, minimum });
    }
    Ok(())
}
