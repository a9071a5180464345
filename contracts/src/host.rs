//! # Shared Ledger Host
//!
//! [`SharedToken`] embeds a [`TetraToken`] in a concurrent process. The
//! ledger sits behind a single `parking_lot::Mutex`: balances, allowances,
//! supply and owner are always locked together, so no two mutations
//! interleave and readers never see half of one.
//!
//! Notification records are drained from the ledger while the lock is still
//! held and published on a `tokio::sync::broadcast` channel, so subscribers
//! receive them in exactly the order the mutations were applied. Publishing
//! with nobody subscribed is fine; the records are simply dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use tetra_protocol::config::EVENT_CHANNEL_CAPACITY;
use tetra_protocol::{Address, Amount};
use tokio::sync::broadcast;

use crate::error::TokenError;
use crate::events::TokenEvent;
use crate::token::TetraToken;

/// A cloneable, thread-safe handle to one ledger.
#[derive(Clone)]
pub struct SharedToken {
    ledger: Arc<Mutex<TetraToken>>,
    events: broadcast::Sender<TokenEvent>,
}

impl SharedToken {
    /// Wraps a ledger with the default notification channel capacity.
    ///
    /// Records already buffered in the ledger (e.g. the genesis mint) stay
    /// buffered until [`publish_pending`](Self::publish_pending) or the next
    /// mutation, so subscribers created right after construction see them.
    pub fn new(token: TetraToken) -> Self {
        Self::with_capacity(token, EVENT_CHANNEL_CAPACITY)
    }

    /// Wraps a ledger with a custom notification channel capacity.
    pub fn with_capacity(token: TetraToken, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            ledger: Arc::new(Mutex::new(token)),
            events,
        }
    }

    /// Receives every notification published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TokenEvent> {
        self.events.subscribe()
    }

    /// Publishes whatever the ledger has buffered. Returns the record count.
    pub fn publish_pending(&self) -> usize {
        let mut ledger = self.ledger.lock();
        self.publish(&mut ledger)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Runs `f` against the ledger under the lock.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&TetraToken) -> R) -> R {
        f(&self.ledger.lock())
    }

    /// A full copy of the current ledger state.
    pub fn snapshot(&self) -> TetraToken {
        self.with_ledger(TetraToken::clone)
    }

    /// Current total supply.
    pub fn total_supply(&self) -> Amount {
        self.with_ledger(TetraToken::total_supply)
    }

    /// The immutable cap.
    pub fn cap(&self) -> Amount {
        self.with_ledger(TetraToken::cap)
    }

    /// The immutable block reward.
    pub fn block_reward(&self) -> Amount {
        self.with_ledger(TetraToken::block_reward)
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.with_ledger(TetraToken::owner)
    }

    /// Balance of `account`.
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.with_ledger(|t| t.balance_of(account))
    }

    /// Remaining allowance of `spender` over `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.with_ledger(|t| t.allowance(owner, spender))
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// See [`TetraToken::transfer`].
    pub fn transfer(
        &self,
        caller: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.apply("transfer", caller, |t| t.transfer(caller, to, amount))
    }

    /// See [`TetraToken::approve`].
    pub fn approve(
        &self,
        caller: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.apply("approve", caller, |t| t.approve(caller, spender, amount))
    }

    /// See [`TetraToken::increase_allowance`].
    pub fn increase_allowance(
        &self,
        caller: &Address,
        spender: &Address,
        added: Amount,
    ) -> Result<(), TokenError> {
        self.apply("increase_allowance", caller, |t| {
            t.increase_allowance(caller, spender, added)
        })
    }

    /// See [`TetraToken::decrease_allowance`].
    pub fn decrease_allowance(
        &self,
        caller: &Address,
        spender: &Address,
        subtracted: Amount,
    ) -> Result<(), TokenError> {
        self.apply("decrease_allowance", caller, |t| {
            t.decrease_allowance(caller, spender, subtracted)
        })
    }

    /// See [`TetraToken::transfer_from`].
    pub fn transfer_from(
        &self,
        caller: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.apply("transfer_from", caller, |t| {
            t.transfer_from(caller, owner, to, amount)
        })
    }

    /// See [`TetraToken::mint`].
    pub fn mint(&self, caller: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        self.apply("mint", caller, |t| t.mint(caller, to, amount))
    }

    /// See [`TetraToken::mint_block_reward`].
    pub fn mint_block_reward(&self, caller: &Address, to: &Address) -> Result<(), TokenError> {
        self.apply("mint_block_reward", caller, |t| t.mint_block_reward(caller, to))
    }

    /// See [`TetraToken::burn`].
    pub fn burn(&self, caller: &Address, amount: Amount) -> Result<(), TokenError> {
        self.apply("burn", caller, |t| t.burn(caller, amount))
    }

    /// See [`TetraToken::burn_from`].
    pub fn burn_from(
        &self,
        caller: &Address,
        owner: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.apply("burn_from", caller, |t| t.burn_from(caller, owner, amount))
    }

    /// See [`TetraToken::transfer_ownership`].
    pub fn transfer_ownership(
        &self,
        caller: &Address,
        new_owner: &Address,
    ) -> Result<(), TokenError> {
        self.apply("transfer_ownership", caller, |t| {
            t.transfer_ownership(caller, new_owner)
        })
    }

    /// See [`TetraToken::renounce_ownership`]. Irreversible.
    pub fn renounce_ownership(&self, caller: &Address) -> Result<(), TokenError> {
        self.apply("renounce_ownership", caller, |t| t.renounce_ownership(caller))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn apply<F>(&self, op: &'static str, caller: &Address, f: F) -> Result<(), TokenError>
    where
        F: FnOnce(&mut TetraToken) -> Result<(), TokenError>,
    {
        let mut ledger = self.ledger.lock();
        match f(&mut ledger) {
            Ok(()) => {
                let published = self.publish(&mut ledger);
                tracing::debug!(
                    op,
                    caller = %caller,
                    published,
                    total_supply = %ledger.total_supply(),
                    "ledger operation applied"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(op, caller = %caller, error = %err, "ledger operation rejected");
                Err(err)
            }
        }
    }

    fn publish(&self, ledger: &mut TetraToken) -> usize {
        let events = ledger.take_events();
        let count = events.len();
        for event in events {
            // No receivers is not an error.
            let _ = self.events.send(event);
        }
        count
    }
}

impl std::fmt::Debug for SharedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedToken")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}
