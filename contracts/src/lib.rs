//! # TetraToken Ledger
//!
//! A fungible-token ledger with a hard supply cap and an owner-gated reward
//! mint, exposed through the familiar transfer/allowance interface:
//!
//! - **Ledger Core** ([`token`]): balances, total supply, the immutable cap
//!   and block reward; transfer, mint, reward mint and burn.
//! - **Ownership** ([`access`]): the single minting privilege and how it
//!   moves (or is renounced for good).
//! - **Allowances** ([`allowance`]): approvals and delegated transfers.
//! - **Notifications** ([`events`]): `Transfer` / `Approval` /
//!   `OwnershipTransferred` records for observers.
//! - **Host** ([`host`]): a mutex-guarded handle that serializes calls
//!   from many threads and broadcasts the notification stream.
//!
//! ## Design Principles
//!
//! 1. All monetary operations check for overflow: `checked_add` and
//!    `checked_sub` everywhere, because wrapping arithmetic and money do not
//!    mix.
//! 2. Validate, then mutate. A rejected call leaves no trace: no balance
//!    change, no allowance change, no notification.
//! 3. The caller is an explicit argument. Proving who the caller is belongs
//!    to the host, not to the ledger.
//! 4. Ledger state is serializable (serde) for snapshots and persistence.

pub mod access;
pub mod allowance;
pub mod error;
pub mod events;
pub mod host;
pub mod token;

pub use error::TokenError;
pub use events::TokenEvent;
pub use host::SharedToken;
pub use token::TetraToken;
