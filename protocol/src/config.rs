//! # Token Configuration & Constants
//!
//! Every magic number of the ledger lives here. Deployment parameters are
//! grouped into a [`TokenConfig`] that can be loaded from JSON, validated,
//! and scaled into base units before the ledger ever sees them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::{to_base_units, Amount};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Display name of the token.
pub const TOKEN_NAME: &str = "TetraToken";

/// Ticker symbol of the token.
pub const TOKEN_SYMBOL: &str = "TETRA";

/// Decimal places, same as ether. One token is `10^18` base units.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Upper bound on decimals. `10^30` leaves room for caps up to ~3.4e8 tokens
/// at maximum precision; anything finer is not a currency anymore.
pub const MAX_DECIMALS: u8 = 30;

/// Default hard cap, in whole tokens.
pub const DEFAULT_CAP_TOKENS: Amount = 1_000_000_000;

/// Default reward per privileged reward mint, in whole tokens.
pub const DEFAULT_BLOCK_REWARD_TOKENS: Amount = 50;

/// Capacity of the notification broadcast channel. Slow subscribers that
/// fall further behind than this start missing records.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while loading or validating a [`TokenConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The cap must be strictly positive.
    #[error("cap must be greater than zero")]
    ZeroCap,

    /// The block reward must be strictly positive.
    #[error("block reward must be greater than zero")]
    ZeroBlockReward,

    /// The genesis premint is larger than the cap.
    #[error("genesis allocation {genesis} exceeds cap {cap}")]
    GenesisExceedsCap {
        /// Requested premint, whole tokens.
        genesis: Amount,
        /// Configured cap, whole tokens.
        cap: Amount,
    },

    /// Too many decimal places.
    #[error("decimals {got} exceeds maximum of {max}")]
    DecimalsTooLarge {
        /// Configured decimals.
        got: u8,
        /// Allowed maximum.
        max: u8,
    },

    /// A whole-token quantity overflows once scaled to base units.
    #[error("{field} overflows when scaled by 10^{decimals}")]
    ScaleOverflow {
        /// Which field overflowed.
        field: &'static str,
        /// Configured decimals.
        decimals: u8,
    },

    /// The JSON document could not be parsed.
    #[error("invalid config json: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// TokenConfig
// ---------------------------------------------------------------------------

/// How much supply the deployer receives at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenesisAllocation {
    /// Mint the entire cap to the deployer.
    #[default]
    FullCap,
    /// Start from zero supply; everything is minted later.
    None,
    /// Mint a fixed number of whole tokens to the deployer.
    Fixed(Amount),
}

/// Deployment parameters for a token ledger.
///
/// Quantities are in whole tokens; use the `*_units` accessors for base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Decimal places.
    pub decimals: u8,
    /// Hard supply cap, whole tokens.
    pub cap: Amount,
    /// Amount minted per reward mint, whole tokens.
    pub block_reward: Amount,
    /// Premint policy.
    pub genesis: GenesisAllocation,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: TOKEN_NAME.to_string(),
            symbol: TOKEN_SYMBOL.to_string(),
            decimals: DEFAULT_DECIMALS,
            cap: DEFAULT_CAP_TOKENS,
            block_reward: DEFAULT_BLOCK_REWARD_TOKENS,
            genesis: GenesisAllocation::FullCap,
        }
    }
}

impl TokenConfig {
    /// Default config with the given cap and block reward.
    pub fn new(cap: Amount, block_reward: Amount) -> Self {
        Self {
            cap,
            block_reward,
            ..Self::default()
        }
    }

    /// Replaces the genesis policy.
    pub fn with_genesis(mut self, genesis: GenesisAllocation) -> Self {
        self.genesis = genesis;
        self
    }

    /// Replaces the decimal precision.
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    /// The result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TokenConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every parameter, including that all quantities scale into
    /// base units without overflow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::DecimalsTooLarge {
                got: self.decimals,
                max: MAX_DECIMALS,
            });
        }
        if self.cap == 0 {
            return Err(ConfigError::ZeroCap);
        }
        if self.block_reward == 0 {
            return Err(ConfigError::ZeroBlockReward);
        }
        if let GenesisAllocation::Fixed(tokens) = self.genesis {
            if tokens > self.cap {
                return Err(ConfigError::GenesisExceedsCap {
                    genesis: tokens,
                    cap: self.cap,
                });
            }
        }
        self.cap_units()?;
        self.block_reward_units()?;
        Ok(())
    }

    /// The cap in base units.
    pub fn cap_units(&self) -> Result<Amount, ConfigError> {
        self.scale("cap", self.cap)
    }

    /// The block reward in base units.
    pub fn block_reward_units(&self) -> Result<Amount, ConfigError> {
        self.scale("block_reward", self.block_reward)
    }

    /// The genesis premint in base units.
    pub fn genesis_units(&self) -> Result<Amount, ConfigError> {
        match self.genesis {
            GenesisAllocation::FullCap => self.cap_units(),
            GenesisAllocation::None => Ok(0),
            GenesisAllocation::Fixed(tokens) => self.scale("genesis", tokens),
        }
    }

    fn scale(&self, field: &'static str, whole: Amount) -> Result<Amount, ConfigError> {
        to_base_units(whole, self.decimals).ok_or(ConfigError::ScaleOverflow {
            field,
            decimals: self.decimals,
        })
    }
}
