//! # Ledger Notifications
//!
//! Records emitted by successful mutations, in the order the mutations took
//! effect. Mints appear as transfers from [`Address::ZERO`] and burns as
//! transfers to it, so an observer can rebuild every balance from the
//! `Transfer` stream alone.

use serde::{Deserialize, Serialize};
use tetra_protocol::{Address, Amount};

/// A notification record produced by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TokenEvent {
    /// Value moved between accounts (or in/out of existence).
    Transfer {
        /// Debited account, or zero for a mint.
        from: Address,
        /// Credited account, or zero for a burn.
        to: Address,
        /// Amount moved, in base units.
        #[serde(with = "amount_string")]
        value: Amount,
    },
    /// An allowance entry was set to a new value.
    Approval {
        /// Account whose balance the allowance draws on.
        owner: Address,
        /// Account allowed to spend.
        spender: Address,
        /// The allowance after the change.
        #[serde(with = "amount_string")]
        value: Amount,
    },
    /// The minting privilege changed hands.
    OwnershipTransferred {
        /// Owner before the change.
        previous_owner: Address,
        /// Owner after the change; zero after renunciation.
        new_owner: Address,
    },
}

impl TokenEvent {
    /// Short name of the record kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenEvent::Transfer { .. } => "Transfer",
            TokenEvent::Approval { .. } => "Approval",
            TokenEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }

    /// Returns `true` for a `Transfer` out of the zero address.
    pub fn is_mint(&self) -> bool {
        matches!(self, TokenEvent::Transfer { from, .. } if from.is_zero())
    }

    /// Returns `true` for a `Transfer` into the zero address.
    pub fn is_burn(&self) -> bool {
        matches!(self, TokenEvent::Transfer { to, .. } if to.is_zero())
    }
}

/// Amounts travel as decimal strings: tagged enums buffer their content,
/// and the buffer has no 128-bit integer slot.
pub(crate) mod amount_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use tetra_protocol::Amount;

    pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
