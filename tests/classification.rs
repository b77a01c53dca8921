use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;

use solana_asset_kit::core::constants::programs;
use solana_asset_kit::{
    CoinTransaction, ContractTransaction, NftTransaction, TokenTransaction, Transaction,
    TransactionClassifier, TransactionType,
};

mod common;

use common::*;

fn connection() -> Result<FixtureConnection> {
    Ok(FixtureConnection::new()
        .with_fixtures(&[
            (SIG_COIN, "coin_transfer.json"),
            (SIG_TOKEN, "token_transfer_checked.json"),
            (SIG_PLAIN, "token_plain_transfer.json"),
            (SIG_2022, "token_2022_transfer.json"),
            (SIG_NFT, "nft_transfer.json"),
            (SIG_CONTRACT, "contract_call.json"),
        ])?
        .with_account(BOB_TOKEN_ACCOUNT, token_account(BOB, TOKEN_MINT, None)))
}

#[test]
fn classifies_every_fixture() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let expected = [
        (SIG_COIN, TransactionType::Coin),
        (SIG_TOKEN, TransactionType::Token),
        (SIG_PLAIN, TransactionType::Token),
        (SIG_2022, TransactionType::Token),
        (SIG_NFT, TransactionType::Nft),
        (SIG_CONTRACT, TransactionType::Contract),
        (SIG_PENDING, TransactionType::General),
    ];
    for (signature, kind) in expected {
        let tx = Transaction::new(signature, conn.clone());
        assert_eq!(tx.transaction_type()?, kind, "signature {signature}");
    }
    Ok(())
}

#[test]
fn coin_transfer_fields() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = CoinTransaction::new(SIG_COIN, conn);

    assert_eq!(tx.sender()?, ALICE);
    assert_eq!(tx.receiver()?, BOB);
    let amount = tx.amount()?;
    assert_eq!(amount.value(), Decimal::from_str("2.0")?);
    assert_eq!(amount.decimals(), 9);
    Ok(())
}

#[test]
fn token_transfer_checked_fields() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = TokenTransaction::new(SIG_TOKEN, conn);

    assert_eq!(tx.address()?, TOKEN_MINT);
    assert_eq!(tx.sender()?, ALICE);
    // Resolved through the destination token account's owner.
    assert_eq!(tx.receiver()?, BOB);
    let amount = tx.amount()?;
    assert_eq!(amount.value(), Decimal::from_str("1.5")?);
    assert_eq!(amount.decimals(), 6);
    // Viewed as a plain contract call, the address is the last program.
    assert_eq!(ContractTransaction::address(&tx)?, programs::TOKEN_PROGRAM);
    Ok(())
}

#[test]
fn plain_token_transfer_uses_post_balance_mint_and_decimals() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = TokenTransaction::new(SIG_PLAIN, conn);

    assert_eq!(tx.address()?, TOKEN_MINT);
    let amount = tx.amount()?;
    assert_eq!(amount.value(), Decimal::from_str("2.5")?);
    assert_eq!(amount.decimals(), 8);
    Ok(())
}

#[test]
fn raw_amount_stays_unscaled_without_post_balances() -> Result<()> {
    let mut bare = load_transaction("token_plain_transfer.json")?;
    bare.meta.post_token_balances.clear();
    let classifier = TransactionClassifier::new(&bare);

    assert_eq!(classifier.token_amount().value(), Decimal::from(250_000_000u64));
    assert_eq!(classifier.token_amount().decimals(), 0);
    assert_eq!(classifier.token_address(), programs::TOKEN_PROGRAM);
    Ok(())
}

#[test]
fn token_receiver_is_empty_when_owner_lookup_fails() -> Result<()> {
    let (_, conn) = shared(connection()?.failing("get_parsed_account_info"));
    let tx = TokenTransaction::new(SIG_TOKEN, conn);

    assert_eq!(tx.receiver()?, "");
    assert_eq!(tx.sender()?, ALICE);
    Ok(())
}

#[test]
fn token_2022_fields() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = TokenTransaction::new(SIG_2022, conn);

    assert_eq!(tx.address()?, TOKEN_2022_MINT);
    assert_eq!(tx.amount()?.value(), Decimal::ONE);
    Ok(())
}

#[test]
fn nft_transfer_fields() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = NftTransaction::new(SIG_NFT, conn);

    assert_eq!(tx.address()?, NFT_MINT);
    assert_eq!(tx.nft_id()?, NFT_MINT);
    assert_eq!(tx.sender()?, ALICE);
    // First post-balance owner, not the instruction.
    assert_eq!(tx.receiver()?, BOB);
    Ok(())
}

#[test]
fn contract_address_is_last_program() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = ContractTransaction::new(SIG_CONTRACT, conn);

    assert_eq!(tx.address()?, CUSTOM_PROGRAM);
    Ok(())
}

#[test]
fn classification_is_stable_across_calls() -> Result<()> {
    for file in [
        "coin_transfer.json",
        "token_transfer_checked.json",
        "nft_transfer.json",
        "contract_call.json",
    ] {
        let tx = load_transaction(file)?;
        let classifier = TransactionClassifier::new(&tx);
        let first = classifier.classify();
        for _ in 0..5 {
            assert_eq!(classifier.classify(), first, "{file}");
        }
    }
    Ok(())
}

#[test]
fn unfetched_transaction_reads_as_empty() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let coin = CoinTransaction::new(SIG_PENDING, conn.clone());
    assert_eq!(coin.sender()?, "");
    assert!(coin.amount()?.is_zero());

    let nft = NftTransaction::new(SIG_PENDING, conn);
    assert_eq!(nft.nft_id()?, "");
    Ok(())
}
