// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # TetraToken Protocol: Shared Primitives
//!
//! Everything the ledger needs that is not the ledger itself: how accounts
//! are named, how amounts are scaled and displayed, how a deployment is
//! configured, and how a host process sets up logging.
//!
//! - **address**: 20-byte account identities derived from Ed25519 keys.
//! - **units**: `u128` base-unit amounts and decimal formatting.
//! - **config**: Token constants and the validated deployment config.
//! - **logging**: `tracing` subscriber bootstrap for host processes.

pub mod address;
pub mod config;
pub mod logging;
pub mod units;

pub use address::{Address, AddressError};
pub use config::{ConfigError, GenesisAllocation, TokenConfig};
pub use units::Amount;
