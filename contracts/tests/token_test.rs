//! Integration tests for the TetraToken ledger.
//!
//! Deployment and transaction scenarios against a ledger deployed with a
//! one-billion-token cap and a 50-token block reward, with fresh Ed25519
//! identities standing in for the owner and two other accounts.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use tetra_contracts::{TetraToken, TokenError, TokenEvent};
use tetra_protocol::units::format_units;
use tetra_protocol::{Address, GenesisAllocation, TokenConfig};

const TOKEN_CAP: u128 = 1_000_000_000;
const TOKEN_BLOCK_REWARD: u128 = 50;

/// Helper: a random account identity.
fn signer() -> Address {
    Address::from_verifying_key(&SigningKey::generate(&mut OsRng).verifying_key())
}

/// Helper: deploys with the given genesis policy and returns
/// `(token, owner, addr1, addr2)`.
fn deploy(genesis: GenesisAllocation) -> (TetraToken, Address, Address, Address) {
    let owner = signer();
    let config = TokenConfig::new(TOKEN_CAP, TOKEN_BLOCK_REWARD).with_genesis(genesis);
    let token = TetraToken::deploy(owner, &config).unwrap();
    (token, owner, signer(), signer())
}

// ---------------------------------------------------------------------------
// Deployment
// ---------------------------------------------------------------------------

#[test]
fn sets_the_right_owner() {
    let (token, owner, _, _) = deploy(GenesisAllocation::FullCap);
    assert_eq!(token.owner(), owner);
}

#[test]
fn assigns_total_supply_to_owner() {
    let (token, owner, _, _) = deploy(GenesisAllocation::FullCap);
    assert_eq!(token.total_supply(), token.balance_of(&owner));
    assert_eq!(token.total_supply(), token.cap());
}

#[test]
fn cap_matches_deployment_argument() {
    let (token, _, _, _) = deploy(GenesisAllocation::FullCap);
    assert_eq!(format_units(token.cap(), token.decimals()), "1000000000");
}

#[test]
fn block_reward_matches_deployment_argument() {
    let (token, _, _, _) = deploy(GenesisAllocation::FullCap);
    assert_eq!(format_units(token.block_reward(), token.decimals()), "50");
}

#[test]
fn zero_genesis_starts_empty_and_grows_by_reward() {
    let (mut token, owner, addr1, _) = deploy(GenesisAllocation::None);
    assert_eq!(token.total_supply(), 0);
    assert_eq!(token.balance_of(&owner), 0);

    token.mint_block_reward(&owner, &addr1).unwrap();
    token.mint_block_reward(&owner, &addr1).unwrap();
    assert_eq!(token.balance_of(&addr1), 2 * token.block_reward());
    assert_eq!(token.total_supply(), 2 * token.block_reward());
    assert!(token.is_consistent());
}

#[test]
fn full_cap_genesis_leaves_nothing_to_mint() {
    let (mut token, owner, addr1, _) = deploy(GenesisAllocation::FullCap);
    let err = token.mint_block_reward(&owner, &addr1).unwrap_err();
    assert!(matches!(err, TokenError::CapExceeded { .. }));
    assert_eq!(token.total_supply(), token.cap());
    assert_eq!(token.balance_of(&addr1), 0);
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[test]
fn transfers_tokens_between_accounts() {
    let (mut token, owner, addr1, addr2) = deploy(GenesisAllocation::FullCap);

    // Owner -> addr1
    token.transfer(&owner, &addr1, 50).unwrap();
    assert_eq!(token.balance_of(&addr1), 50);

    // addr1 -> addr2, sent as addr1
    token.transfer(&addr1, &addr2, 50).unwrap();
    assert_eq!(token.balance_of(&addr2), 50);
    assert_eq!(token.balance_of(&addr1), 0);
}

#[test]
fn fails_if_sender_lacks_tokens() {
    let (mut token, owner, addr1, _) = deploy(GenesisAllocation::FullCap);
    let initial_owner_balance = token.balance_of(&owner);

    let err = token.transfer(&addr1, &owner, 1).unwrap_err();
    assert_eq!(
        err,
        TokenError::InsufficientBalance {
            balance: 0,
            amount: 1
        }
    );
    assert_eq!(token.balance_of(&owner), initial_owner_balance);
}

#[test]
fn updates_balances_after_transfers() {
    let (mut token, owner, addr1, addr2) = deploy(GenesisAllocation::FullCap);
    let initial_owner_balance = token.balance_of(&owner);

    token.transfer(&owner, &addr1, 100).unwrap();
    token.transfer(&owner, &addr2, 50).unwrap();

    assert_eq!(token.balance_of(&owner), initial_owner_balance - 150);
    assert_eq!(token.balance_of(&addr1), 100);
    assert_eq!(token.balance_of(&addr2), 50);
    assert!(token.is_consistent());
}

#[test]
fn non_owner_mint_changes_nothing() {
    let (mut token, _, addr1, _) = deploy(GenesisAllocation::None);
    let err = token.mint(&addr1, &addr1, 1).unwrap_err();
    assert_eq!(err, TokenError::Unauthorized { caller: addr1 });
    assert_eq!(token.total_supply(), 0);
    assert_eq!(token.balance_of(&addr1), 0);
}

#[test]
fn transfer_stream_rebuilds_balances() {
    let (mut token, owner, addr1, addr2) = deploy(GenesisAllocation::Fixed(1_000));
    token.mint(&owner, &addr2, 7).unwrap();
    token.transfer(&owner, &addr1, 300).unwrap();
    token.transfer(&addr1, &addr2, 120).unwrap();
    token.burn(&addr2, 27).unwrap();

    let mut replayed = std::collections::HashMap::<Address, u128>::new();
    for event in token.take_events() {
        if let TokenEvent::Transfer { from, to, value } = event {
            if !from.is_zero() {
                *replayed.entry(from).or_default() -= value;
            }
            if !to.is_zero() {
                *replayed.entry(to).or_default() += value;
            }
        }
    }
    for account in [owner, addr1, addr2] {
        assert_eq!(replayed.get(&account).copied().unwrap_or(0), token.balance_of(&account));
    }
}
