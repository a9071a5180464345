//! # Allowances & Delegated Transfers
//!
//! An owner approves a spender for some amount; the spender can then move
//! or burn up to that amount out of the owner's balance. Every delegated
//! operation is all-or-nothing: the allowance is only consumed if the
//! balance movement succeeds, and the balance only moves if the allowance
//! covers it.

use tetra_protocol::{Address, Amount};

use crate::error::TokenError;
use crate::events::TokenEvent;
use crate::token::TetraToken;

impl TetraToken {
    /// Returns how much `spender` may still take from `owner`, or 0.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Sets the caller's allowance for `spender` to exactly `amount`,
    /// replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidRecipient`] if `spender` is the zero address.
    /// Returns [`TokenError::Unauthorized`] if the caller is the zero address.
    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.check_approval_parties(caller, spender)?;
        self.set_allowance(caller, spender, amount);
        Ok(())
    }

    /// Raises the caller's allowance for `spender` by `added`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ArithmeticOverflow`] if the allowance would overflow.
    pub fn increase_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        added: Amount,
    ) -> Result<(), TokenError> {
        self.check_approval_parties(caller, spender)?;
        let raised = self
            .allowance(caller, spender)
            .checked_add(added)
            .ok_or(TokenError::ArithmeticOverflow)?;
        self.set_allowance(caller, spender, raised);
        Ok(())
    }

    /// Lowers the caller's allowance for `spender` by `subtracted`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InsufficientAllowance`] if the allowance would go below zero.
    pub fn decrease_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        subtracted: Amount,
    ) -> Result<(), TokenError> {
        self.check_approval_parties(caller, spender)?;
        let lowered = self.remaining_after_spend(caller, spender, subtracted)?;
        self.set_allowance(caller, spender, lowered);
        Ok(())
    }

    /// Moves `amount` from `owner` to `to` on the caller's allowance.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InsufficientAllowance`] if the allowance is short.
    /// Otherwise the same errors as [`transfer`](Self::transfer).
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.check_spender(caller)?;
        let remaining = self.remaining_after_spend(owner, caller, amount)?;
        self.move_balance(owner, to, amount)?;
        self.set_allowance(owner, caller, remaining);
        Ok(())
    }

    /// Burns `amount` from `owner`'s balance on the caller's allowance.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InsufficientAllowance`] if the allowance is short.
    /// Returns [`TokenError::InsufficientBalance`] if `owner` holds less than `amount`.
    pub fn burn_from(
        &mut self,
        caller: &Address,
        owner: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.check_spender(caller)?;
        let remaining = self.remaining_after_spend(owner, caller, amount)?;
        self.destroy(owner, amount)?;
        self.set_allowance(owner, caller, remaining);
        Ok(())
    }

    fn check_spender(&self, caller: &Address) -> Result<(), TokenError> {
        if caller.is_zero() {
            return Err(TokenError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    fn check_approval_parties(
        &self,
        caller: &Address,
        spender: &Address,
    ) -> Result<(), TokenError> {
        self.check_spender(caller)?;
        if spender.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        Ok(())
    }

    /// Allowance left after spending `amount`, without writing it.
    fn remaining_after_spend(
        &self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<Amount, TokenError> {
        let allowance = self.allowance(owner, spender);
        allowance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance { allowance, amount })
    }

    fn set_allowance(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
        self.events.push(TokenEvent::Approval {
            owner: *owner,
            spender: *spender,
            value: amount,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetra_protocol::{GenesisAllocation, TokenConfig};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    const OWNER: u8 = 1;
    const SPENDER: u8 = 2;
    const RECIPIENT: u8 = 3;

    /// Owner holds 1000 of a 1000 cap.
    fn token() -> TetraToken {
        let config = TokenConfig::new(1_000, 10)
            .with_decimals(0)
            .with_genesis(GenesisAllocation::FullCap);
        let mut token = TetraToken::deploy(addr(OWNER), &config).unwrap();
        token.take_events();
        token
    }

    #[test]
    fn approve_overwrites() {
        let mut token = token();
        token.approve(&addr(OWNER), &addr(SPENDER), 100).unwrap();
        token.approve(&addr(OWNER), &addr(SPENDER), 30).unwrap();
        assert_eq!(token.allowance(&addr(OWNER), &addr(SPENDER)), 30);
        assert_eq!(token.take_events().len(), 2);
    }

    #[test]
    fn approve_needs_no_balance() {
        let mut token = token();
        token.approve(&addr(9), &addr(SPENDER), 1_000_000).unwrap();
        assert_eq!(token.allowance(&addr(9), &addr(SPENDER)), 1_000_000);
    }

    #[test]
    fn approve_zero_parties_rejected() {
        let mut token = token();
        assert_eq!(
            token.approve(&addr(OWNER), &Address::ZERO, 5),
            Err(TokenError::InvalidRecipient)
        );
        assert!(matches!(
            token.approve(&Address::ZERO, &addr(SPENDER), 5),
            Err(TokenError::Unauthorized { .. })
        ));
        assert!(token.pending_events().is_empty());
    }

    #[test]
    fn unknown_allowance_is_zero() {
        let token = token();
        assert_eq!(token.allowance(&addr(7), &addr(8)), 0);
    }

    #[test]
    fn transfer_from_spends_exactly_amount() {
        let mut token = token();
        token.approve(&addr(OWNER), &addr(SPENDER), 100).unwrap();
        token.take_events();

        token
            .transfer_from(&addr(SPENDER), &addr(OWNER), &addr(RECIPIENT), 60)
            .unwrap();

        assert_eq!(token.allowance(&addr(OWNER), &addr(SPENDER)), 40);
        assert_eq!(token.balance_of(&addr(OWNER)), 940);
        assert_eq!(token.balance_of(&addr(RECIPIENT)), 60);
        assert_eq!(token.balance_of(&addr(SPENDER)), 0);
        assert_eq!(
            token.take_events(),
            vec![
                TokenEvent::Transfer {
                    from: addr(OWNER),
                    to: addr(RECIPIENT),
                    value: 60,
                },
                TokenEvent::Approval {
                    owner: addr(OWNER),
                    spender: addr(SPENDER),
                    value: 40,
                },
            ]
        );
    }

    #[test]
    fn transfer_from_beyond_allowance_rejected() {
        let mut token = token();
        token.approve(&addr(OWNER), &addr(SPENDER), 10).unwrap();
        assert_eq!(
            token.transfer_from(&addr(SPENDER), &addr(OWNER), &addr(RECIPIENT), 11),
            Err(TokenError::InsufficientAllowance {
                allowance: 10,
                amount: 11
            })
        );
        assert_eq!(token.balance_of(&addr(OWNER)), 1_000);
        assert_eq!(token.allowance(&addr(OWNER), &addr(SPENDER)), 10);
    }

    #[test]
    fn failed_balance_move_keeps_allowance() {
        let mut token = token();
        // Allowance is larger than anything addr(5) holds.
        token.approve(&addr(5), &addr(SPENDER), 500).unwrap();
        token.take_events();
        assert_eq!(
            token.transfer_from(&addr(SPENDER), &addr(5), &addr(RECIPIENT), 1),
            Err(TokenError::InsufficientBalance {
                balance: 0,
                amount: 1
            })
        );
        assert_eq!(token.allowance(&addr(5), &addr(SPENDER)), 500);
        assert!(token.pending_events().is_empty());

        token.approve(&addr(OWNER), &addr(SPENDER), 500).unwrap();
        assert_eq!(
            token.transfer_from(&addr(SPENDER), &addr(OWNER), &Address::ZERO, 1),
            Err(TokenError::InvalidRecipient)
        );
        assert_eq!(token.allowance(&addr(OWNER), &addr(SPENDER)), 500);
    }

    #[test]
    fn zero_spender_cannot_spend() {
        let mut token = token();
        assert!(matches!(
            token.transfer_from(&Address::ZERO, &addr(OWNER), &addr(RECIPIENT), 0),
            Err(TokenError::Unauthorized { .. })
        ));
        assert!(token.pending_events().is_empty());
    }

    #[test]
    fn zero_owner_cannot_be_spent_from() {
        let mut token = token();
        assert_eq!(
            token.transfer_from(&addr(SPENDER), &Address::ZERO, &addr(RECIPIENT), 0),
            Err(TokenError::Unauthorized {
                caller: Address::ZERO
            })
        );
        assert_eq!(
            token.burn_from(&addr(SPENDER), &Address::ZERO, 0),
            Err(TokenError::Unauthorized {
                caller: Address::ZERO
            })
        );
        assert!(token.allowances.get(&Address::ZERO).is_none());
        assert!(token.pending_events().is_empty());
        assert_eq!(token.balance_of(&addr(RECIPIENT)), 0);
    }

    #[test]
    fn increase_and_decrease() {
        let mut token = token();
        token.increase_allowance(&addr(OWNER), &addr(SPENDER), 50).unwrap();
        token.increase_allowance(&addr(OWNER), &addr(SPENDER), 25).unwrap();
        assert_eq!(token.allowance(&addr(OWNER), &addr(SPENDER)), 75);

        token.decrease_allowance(&addr(OWNER), &addr(SPENDER), 70).unwrap();
        assert_eq!(token.allowance(&addr(OWNER), &addr(SPENDER)), 5);

        assert_eq!(
            token.decrease_allowance(&addr(OWNER), &addr(SPENDER), 6),
            Err(TokenError::InsufficientAllowance {
                allowance: 5,
                amount: 6
            })
        );
        assert_eq!(token.allowance(&addr(OWNER), &addr(SPENDER)), 5);
    }

    #[test]
    fn increase_overflow_rejected() {
        let mut token = token();
        token.approve(&addr(OWNER), &addr(SPENDER), Amount::MAX).unwrap();
        assert_eq!(
            token.increase_allowance(&addr(OWNER), &addr(SPENDER), 1),
            Err(TokenError::ArithmeticOverflow)
        );
        assert_eq!(token.allowance(&addr(OWNER), &addr(SPENDER)), Amount::MAX);
    }

    #[test]
    fn burn_from_consumes_allowance_and_supply() {
        let mut token = token();
        token.approve(&addr(OWNER), &addr(SPENDER), 300).unwrap();
        token.burn_from(&addr(SPENDER), &addr(OWNER), 200).unwrap();
        assert_eq!(token.total_supply(), 800);
        assert_eq!(token.balance_of(&addr(OWNER)), 800);
        assert_eq!(token.allowance(&addr(OWNER), &addr(SPENDER)), 100);
        assert!(token.is_consistent());

        assert!(matches!(
            token.burn_from(&addr(SPENDER), &addr(OWNER), 101),
            Err(TokenError::InsufficientAllowance { .. })
        ));
        assert_eq!(token.total_supply(), 800);
    }
}
