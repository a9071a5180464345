//! # Ledger Core
//!
//! The [`TetraToken`] ledger: a balance table, a total-supply counter and an
//! immutable cap. Ownership lives in [`super::access`] and delegated spending
//! in [`super::allowance`]; both build on the primitives defined here.
//!
//! ## Invariants
//!
//! - The sum of all balances equals `total_supply`.
//! - `total_supply <= cap`, and `cap` never changes after deployment.
//! - A rejected operation mutates nothing, notification buffer included.
//!   Every operation checks all of its preconditions first and only then
//!   writes, debit before credit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tetra_protocol::{Address, Amount, TokenConfig};

use crate::error::TokenError;
use crate::events::TokenEvent;

/// A capped fungible-token ledger with an owner-gated mint.
///
/// All mutating methods take the authenticated caller as their first
/// argument; establishing who the caller is belongs to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TetraToken {
    /// Display name (e.g., "TetraToken").
    name: String,
    /// Ticker symbol.
    symbol: String,
    /// Decimal places used for display.
    decimals: u8,
    /// Hard supply cap in base units.
    cap: Amount,
    /// Amount minted by [`mint_block_reward`](Self::mint_block_reward).
    block_reward: Amount,
    /// Current total supply in base units.
    total_supply: Amount,
    /// Holder of the minting privilege; zero once renounced.
    pub(crate) owner: Address,
    /// Per-account balances. Entries are zeroed, never removed.
    balances: HashMap<Address, Amount>,
    /// `owner -> (spender -> allowance)`.
    pub(crate) allowances: HashMap<Address, HashMap<Address, Amount>>,
    /// When the ledger was constructed.
    deployed_at: DateTime<Utc>,
    /// Notifications not yet drained by the host.
    #[serde(skip)]
    pub(crate) events: Vec<TokenEvent>,
}

impl TetraToken {
    /// Deploys a new ledger owned by `deployer`.
    ///
    /// The config is validated and scaled into base units. Depending on its
    /// [`GenesisAllocation`](tetra_protocol::GenesisAllocation), the deployer
    /// receives the full cap, a fixed premint, or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfig`] if the config fails validation.
    /// Returns [`TokenError::InvalidRecipient`] if `deployer` is the zero address.
    pub fn deploy(deployer: Address, config: &TokenConfig) -> Result<Self, TokenError> {
        config.validate()?;
        if deployer.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }

        let cap = config.cap_units()?;
        let block_reward = config.block_reward_units()?;
        let genesis = config.genesis_units()?;

        let mut token = Self {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            cap,
            block_reward,
            total_supply: 0,
            owner: deployer,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            deployed_at: Utc::now(),
            events: Vec::new(),
        };
        token.events.push(TokenEvent::OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: deployer,
        });
        if genesis > 0 {
            token.issue(&deployer, genesis)?;
        }
        Ok(token)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Token display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Decimal places.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Current total supply.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// The immutable supply cap.
    pub fn cap(&self) -> Amount {
        self.cap
    }

    /// The immutable per-call reward mint amount.
    pub fn block_reward(&self) -> Amount {
        self.block_reward
    }

    /// Supply that can still be minted before reaching the cap.
    pub fn remaining_mintable(&self) -> Amount {
        self.cap.saturating_sub(self.total_supply)
    }

    /// Deployment timestamp.
    pub fn deployed_at(&self) -> DateTime<Utc> {
        self.deployed_at
    }

    /// Returns the balance of `account`, or 0 for unknown accounts.
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Iterates over every account that has ever held a balance. Zero-amount
    /// movements do not create entries.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, Amount)> + '_ {
        self.balances.iter().map(|(a, b)| (a, *b))
    }

    /// Recomputes the balance sum and checks it against supply and cap.
    pub fn is_consistent(&self) -> bool {
        let sum = self
            .balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b));
        matches!(sum, Some(s) if s == self.total_supply) && self.total_supply <= self.cap
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// Notifications emitted since the last [`take_events`](Self::take_events).
    pub fn pending_events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Drains buffered notifications in emission order.
    pub fn take_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Moves `amount` from the caller to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] if the caller is the zero address.
    /// Returns [`TokenError::InvalidRecipient`] if `to` is the zero address.
    /// Returns [`TokenError::InsufficientBalance`] if the caller holds less than `amount`.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.move_balance(caller, to, amount)
    }

    /// Mints `amount` new tokens to `to`. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] if the caller is not the owner.
    /// Returns [`TokenError::InvalidRecipient`] if `to` is the zero address.
    /// Returns [`TokenError::CapExceeded`] if supply would exceed the cap.
    pub fn mint(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        self.issue(to, amount)
    }

    /// Mints exactly one block reward to `to`. Same rules as [`mint`](Self::mint).
    pub fn mint_block_reward(&mut self, caller: &Address, to: &Address) -> Result<(), TokenError> {
        self.mint(caller, to, self.block_reward)
    }

    /// Destroys `amount` of the caller's own balance, reducing total supply.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] if the caller is the zero address.
    /// Returns [`TokenError::InsufficientBalance`] if the caller holds less than `amount`.
    pub fn burn(&mut self, caller: &Address, amount: Amount) -> Result<(), TokenError> {
        self.destroy(caller, amount)
    }

    // -----------------------------------------------------------------------
    // Primitives
    // -----------------------------------------------------------------------

    /// Debit `from`, credit `to`. Supply is untouched.
    pub(crate) fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        ensure_not_zero_source(from)?;
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        let debited = self.checked_debit(from, amount)?;

        // A self-transfer only has to prove the balance is there.
        if from != to && amount > 0 {
            let credited = self
                .balance_of(to)
                .checked_add(amount)
                .ok_or(TokenError::ArithmeticOverflow)?;
            self.balances.insert(*from, debited);
            self.balances.insert(*to, credited);
        }

        self.events.push(TokenEvent::Transfer {
            from: *from,
            to: *to,
            value: amount,
        });
        Ok(())
    }

    /// Create supply for `to` within the cap. No authorization check.
    pub(crate) fn issue(&mut self, to: &Address, amount: Amount) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .filter(|supply| *supply <= self.cap)
            .ok_or(TokenError::CapExceeded {
                supply: self.total_supply,
                amount,
                cap: self.cap,
            })?;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::ArithmeticOverflow)?;

        self.total_supply = new_supply;
        if amount > 0 {
            self.balances.insert(*to, credited);
        }

        self.events.push(TokenEvent::Transfer {
            from: Address::ZERO,
            to: *to,
            value: amount,
        });
        Ok(())
    }

    /// Remove `amount` from `from` and from total supply.
    pub(crate) fn destroy(&mut self, from: &Address, amount: Amount) -> Result<(), TokenError> {
        ensure_not_zero_source(from)?;
        let debited = self.checked_debit(from, amount)?;
        let new_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(TokenError::ArithmeticOverflow)?;

        if amount > 0 {
            self.balances.insert(*from, debited);
        }
        self.total_supply = new_supply;

        self.events.push(TokenEvent::Transfer {
            from: *from,
            to: Address::ZERO,
            value: amount,
        });
        Ok(())
    }

    /// Balance of `account` after removing `amount`, without writing it.
    pub(crate) fn checked_debit(
        &self,
        account: &Address,
        amount: Amount,
    ) -> Result<Amount, TokenError> {
        let balance = self.balance_of(account);
        balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance { balance, amount })
    }
}

/// The zero address is the mint source and burn sink; it never holds or
/// spends a balance of its own.
fn ensure_not_zero_source(from: &Address) -> Result<(), TokenError> {
    if from.is_zero() {
        return Err(TokenError::Unauthorized { caller: *from });
    }
    Ok(())
}
