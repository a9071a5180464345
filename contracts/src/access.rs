//! # Ownership
//!
//! A single owner holds the minting privilege. The role moves in one step,
//! only at the current owner's request, and never to the zero address.
//!
//! Renunciation is the one way out of the role and it is **irreversible**:
//! the owner becomes [`Address::ZERO`], and since the zero address is never
//! authorized, no further mint or ownership change can ever succeed.

use tetra_protocol::Address;

use crate::error::TokenError;
use crate::events::TokenEvent;
use crate::token::TetraToken;

impl TetraToken {
    /// Current owner, or the zero address after renunciation.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Returns `true` once ownership has been renounced.
    pub fn is_renounced(&self) -> bool {
        self.owner.is_zero()
    }

    /// Hands the owner role to `new_owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] if the caller is not the owner.
    /// Returns [`TokenError::InvalidRecipient`] if `new_owner` is the zero address.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: &Address,
    ) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        self.set_owner(*new_owner);
        Ok(())
    }

    /// Gives up the owner role permanently. Minting is disabled afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] if the caller is not the owner.
    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        self.set_owner(Address::ZERO);
        Ok(())
    }

    /// Rejects everyone but the current owner. The zero address never passes.
    pub(crate) fn ensure_owner(&self, caller: &Address) -> Result<(), TokenError> {
        if caller.is_zero() || *caller != self.owner {
            return Err(TokenError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    fn set_owner(&mut self, new_owner: Address) {
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        self.events.push(TokenEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
    }
}
