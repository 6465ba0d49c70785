//! parUSD Common Library
//!
//! Shared types, constants, and utilities for all parUSD contracts.
//! This crate provides the foundation the mint vault and the token
//! ledger build on:
//!
//! - **Typed Errors**: one error enum with stable codes for deterministic
//!   caller branching
//! - **Decimal Normalization**: bridging heterogeneous collateral
//!   precisions to the 18-decimal internal unit
//! - **Fee Math**: basis-point fees reconciled against minimum floors
//! - **Collateral Reserve Interface**: the narrow trait the vault
//!   consumes, plus an in-memory reference ledger
//! - **Access Control**: capability registry, restriction list, and the
//!   credential gate seam
//! - **Rate Limiting**: per-block-height volume windows
//! - **Delegated Signers**: the owner/delegate handshake extension
//!
//! This crate is `no_std` compatible when built with the `std` feature
//! disabled.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export Vec for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;
#[cfg(feature = "std")]
pub use std::vec::Vec;

pub mod constants;
pub mod errors;
pub mod types;
pub mod math;
pub mod events;
pub mod validation;
pub mod reserve;
pub mod access_control;
pub mod rate_limiter;
pub mod delegation;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use types::*;
pub use math::*;
pub use events::*;
pub use reserve::*;
pub use access_control::*;
pub use rate_limiter::*;
pub use delegation::*;
