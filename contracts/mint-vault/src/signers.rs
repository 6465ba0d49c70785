//! Delegated Signer Entry Points
//!
//! Vault-level surface over the owner/delegate handshake: the owner
//! proposes a delegate, the delegate confirms, either side can remove.
//! Only a confirmed pair counts as an active delegation.

use parusd_common::{
    errors::ParUsdResult,
    events::ParUsdEvent,
    types::Address,
};

use crate::state::VaultState;

/// Propose `delegate` as a signer for the caller's account
pub fn set_delegated_signer(
    vault: &mut VaultState,
    caller: &Address,
    delegate: Address,
    block_height: u64,
) -> ParUsdResult<()> {
    vault.delegations.initiate(caller, delegate, block_height)?;
    vault.events.emit(ParUsdEvent::DelegationInitiated {
        owner: *caller,
        delegate,
        block_height,
    });
    Ok(())
}

/// Confirm a pending proposal naming the caller as delegate for `owner`
pub fn confirm_delegated_signer(
    vault: &mut VaultState,
    caller: &Address,
    owner: &Address,
    block_height: u64,
) -> ParUsdResult<()> {
    vault.delegations.confirm(caller, owner, block_height)?;
    vault.events.emit(ParUsdEvent::DelegationAccepted {
        owner: *owner,
        delegate: *caller,
        block_height,
    });
    Ok(())
}

/// Terminate a delegation; callable by either party
pub fn remove_delegated_signer(
    vault: &mut VaultState,
    caller: &Address,
    owner: &Address,
    delegate: &Address,
    block_height: u64,
) -> ParUsdResult<()> {
    vault.delegations.reject(caller, owner, delegate, block_height)?;
    vault.events.emit(ParUsdEvent::DelegationRejected {
        owner: *owner,
        delegate: *delegate,
        block_height,
    });
    Ok(())
}

/// Whether `delegate` is a confirmed signer for `owner`
pub fn is_delegated_signer(vault: &VaultState, owner: &Address, delegate: &Address) -> bool {
    vault.delegations.is_accepted(owner, delegate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parusd_common::errors::ParUsdError;
    use parusd_common::types::RedemptionMode;

    fn owner() -> Address {
        [1u8; 32]
    }

    fn delegate() -> Address {
        [2u8; 32]
    }

    fn setup() -> VaultState {
        VaultState::new([7u8; 32], RedemptionMode::InstantOrQueued)
    }

    #[test]
    fn test_handshake_through_vault_surface() {
        let mut vault = setup();

        set_delegated_signer(&mut vault, &owner(), delegate(), 100).unwrap();
        assert!(!is_delegated_signer(&vault, &owner(), &delegate()));

        confirm_delegated_signer(&mut vault, &delegate(), &owner(), 101).unwrap();
        assert!(is_delegated_signer(&vault, &owner(), &delegate()));

        remove_delegated_signer(&mut vault, &owner(), &owner(), &delegate(), 102).unwrap();
        assert!(!is_delegated_signer(&vault, &owner(), &delegate()));
    }

    #[test]
    fn test_confirm_requires_pending_proposal() {
        let mut vault = setup();
        let result = confirm_delegated_signer(&mut vault, &delegate(), &owner(), 100);
        assert!(matches!(result, Err(ParUsdError::DelegationNotPending { .. })));
    }
}
