//! Error types for the token ledger.
//!
//! Every rejected operation returns a [`TokenError`] and leaves the ledger
//! exactly as it was before the call.

use tetra_protocol::{Address, Amount, ConfigError};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The debited account holds less than the requested amount.
    #[error("insufficient balance: account has {balance}, tried to move {amount}")]
    InsufficientBalance {
        /// Current balance of the account.
        balance: Amount,
        /// Amount the caller tried to move or burn.
        amount: Amount,
    },

    /// The spender's remaining allowance is smaller than the requested amount.
    #[error("insufficient allowance: {allowance} approved, tried to spend {amount}")]
    InsufficientAllowance {
        /// Allowance currently approved.
        allowance: Amount,
        /// Amount the spender tried to use.
        amount: Amount,
    },

    /// Minting would push total supply above the cap.
    #[error("cap exceeded: supply {supply} + {amount} > cap {cap}")]
    CapExceeded {
        /// Total supply before the mint.
        supply: Amount,
        /// Amount the caller tried to mint.
        amount: Amount,
        /// The immutable cap.
        cap: Amount,
    },

    /// The caller does not hold the required privilege.
    #[error("unauthorized: {caller} is not the owner")]
    Unauthorized {
        /// The identity that attempted the call.
        caller: Address,
    },

    /// The null identity was given as recipient, spender or new owner.
    #[error("invalid recipient: the zero address cannot receive tokens or roles")]
    InvalidRecipient,

    /// A checked arithmetic operation overflowed.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// The deployment configuration was rejected.
    #[error("invalid token config: {0}")]
    InvalidConfig(#[from] ConfigError),
}
