//! parUSD Mint Vault
//!
//! Orchestrates the full mint/redeem lifecycle of the parUSD stable
//! unit against the multi-asset collateral reserve:
//!
//! - **Minting**: collateral deposits normalized to internal precision,
//!   fees routed to the treasury in collateral terms, stable units
//!   minted 1:1 against reserve units
//! - **Redemption, instant-or-queued**: synchronous payout when
//!   liquidity allows, operator-completed escrow queue otherwise
//! - **Redemption, fixed cooldown**: time-gated self-service claims
//! - **Rate Limits**: per-block minted/redeemed volume caps
//! - **Admin Surface**: fees, caps, minimums, cooldown, credential
//!   policy, restriction list, pause, rescue, and frozen-balance
//!   recovery
//! - **Previews**: fee-inclusive quotes for off-chain callers
//!
//! The reserve, capability registry, and credential gate are consumed
//! through the traits in `parusd-common`, so the vault runs against any
//! conforming implementations.

pub mod state;
pub mod escrow;
pub mod mint;
pub mod redeem;
pub mod cooldown;
pub mod admin;
pub mod preview;
pub mod signers;


// Re-exports for convenience
pub use state::{VaultConfig, VaultState};
pub use escrow::EscrowState;
pub use mint::{
    burn, mint_unbacked, mint_with_collateral, BurnRequest, CollateralMintRequest, MintOutcome,
    UnbackedMintRequest,
};
pub use redeem::{
    bulk_complete_redemptions, cancel_redemption, complete_redemption, redeem,
    update_redemption_request, BulkCompleteRequest, BulkCompletionReport, CancelRequest,
    CompleteRequest, CompletionOutcome, RedeemOutcome, RedeemRequest, UpdateRequest,
};
pub use cooldown::{claim_redemption, cooldown_redeem, ClaimRequest, CooldownRedeemRequest};
pub use preview::{preview_deposit, preview_mint, preview_redeem, preview_withdraw};
pub use signers::{
    confirm_delegated_signer, is_delegated_signer, remove_delegated_signer, set_delegated_signer,
};
