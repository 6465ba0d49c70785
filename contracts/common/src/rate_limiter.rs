//! Per-Block Rate Limiting
//!
//! Volume counters keyed to the current block height, one window each
//! for minted and redeemed volume. A window is a single `(height, used)`
//! pair that resets the first time a new height is touched, so the state
//! stays O(1) instead of growing a per-height map forever.
//!
//! A cap of zero disables the operation entirely; the emergency shutoff
//! sets both caps to zero.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

/// Volume counter for the current block height
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct BlockWindow {
    /// Height the counter applies to
    pub height: u64,
    /// Volume consumed at that height
    pub used: u128,
}

impl BlockWindow {
    /// Create a fresh window
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the counter if a new height is being touched
    pub fn roll(&mut self, current_height: u64) {
        if current_height != self.height {
            self.height = current_height;
            self.used = 0;
        }
    }

    /// Volume still available under `cap` at `current_height`
    pub fn remaining(&self, cap: u128, current_height: u64) -> u128 {
        let used = if current_height == self.height { self.used } else { 0 };
        cap.saturating_sub(used)
    }

    /// Whether `amount` fits under `cap` at `current_height`
    pub fn allows(&self, amount: u128, cap: u128, current_height: u64) -> bool {
        amount <= self.remaining(cap, current_height)
    }

    /// Record consumed volume at `current_height`
    ///
    /// Callers check [`allows`] first; recording saturates rather than
    /// wrapping if they did not.
    ///
    /// [`allows`]: BlockWindow::allows
    pub fn record(&mut self, amount: u128, current_height: u64) {
        self.roll(current_height);
        self.used = self.used.saturating_add(amount);
    }
}

// ============================================================================
// Tests
// ============================================================================
