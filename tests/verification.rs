use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Result;
use rust_decimal::Decimal;

use solana_asset_kit::{
    AssetDirection, CoinTransaction, NetworkConfig, NftTransaction, TokenTransaction, Transaction,
    TransactionStatus,
};

mod common;

use common::*;

fn connection() -> Result<FixtureConnection> {
    Ok(FixtureConnection::new()
        .with_fixtures(&[
            (SIG_COIN, "coin_transfer.json"),
            (SIG_FAILED, "failed_coin_transfer.json"),
            (SIG_TOKEN, "token_transfer_checked.json"),
            (SIG_NFT, "nft_transfer.json"),
        ])?
        .with_account(BOB_TOKEN_ACCOUNT, token_account(BOB, TOKEN_MINT, None))
        .with_slot(250_000_032))
}

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("decimal literal")
}

#[test]
fn coin_transfer_scenarios() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = CoinTransaction::new(SIG_COIN, conn);

    assert_eq!(tx.status()?, TransactionStatus::Confirmed);
    assert_eq!(
        tx.verify_transfer(AssetDirection::Incoming, BOB, dec("2.0")),
        TransactionStatus::Confirmed
    );
    assert_eq!(
        tx.verify_transfer(AssetDirection::Incoming, ALICE, dec("2.0")),
        TransactionStatus::Failed
    );
    assert_eq!(
        tx.verify_transfer(AssetDirection::Incoming, BOB, dec("3.0")),
        TransactionStatus::Failed
    );
    assert_eq!(
        tx.verify_transfer(AssetDirection::Outgoing, &ALICE.to_lowercase(), dec("2")),
        TransactionStatus::Confirmed
    );
    Ok(())
}

#[test]
fn pending_short_circuits_for_any_arguments() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let coin = CoinTransaction::new(SIG_PENDING, conn.clone());
    assert_eq!(coin.status()?, TransactionStatus::Pending);
    for (address, amount) in [(BOB, "2.0"), (ALICE, "0"), ("", "-1")] {
        assert_eq!(
            coin.verify_transfer(AssetDirection::Incoming, address, dec(amount)),
            TransactionStatus::Pending
        );
    }

    let nft = NftTransaction::new(SIG_PENDING, conn);
    assert_eq!(
        nft.verify_transfer(AssetDirection::Outgoing, ALICE, NFT_MINT),
        TransactionStatus::Pending
    );
    Ok(())
}

#[test]
fn failed_meta_reports_failed_status() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = Transaction::new(SIG_FAILED, conn);
    assert_eq!(tx.status()?, TransactionStatus::Failed);
    assert_eq!(tx.wait(Duration::from_millis(1)), TransactionStatus::Failed);
    Ok(())
}

#[test]
fn token_and_nft_verification() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let token = TokenTransaction::new(SIG_TOKEN, conn.clone());
    assert_eq!(
        token.verify_transfer(AssetDirection::Incoming, BOB, dec("1.5")),
        TransactionStatus::Confirmed
    );
    assert_eq!(
        token.verify_transfer(AssetDirection::Outgoing, ALICE, dec("1.500000")),
        TransactionStatus::Confirmed
    );
    assert_eq!(
        token.verify_transfer(AssetDirection::Incoming, BOB, dec("1.4")),
        TransactionStatus::Failed
    );

    let nft = NftTransaction::new(SIG_NFT, conn);
    assert_eq!(
        nft.verify_transfer(AssetDirection::Incoming, BOB, NFT_MINT),
        TransactionStatus::Confirmed
    );
    assert_eq!(
        nft.verify_transfer(AssetDirection::Incoming, BOB, &NFT_MINT.to_lowercase()),
        TransactionStatus::Failed
    );
    assert_eq!(
        nft.verify_transfer(AssetDirection::Outgoing, BOB, NFT_MINT),
        TransactionStatus::Failed
    );
    Ok(())
}

#[test]
fn fetch_error_is_an_rpc_error_and_verifies_as_failed() -> Result<()> {
    let (_, conn) = shared(connection()?.failing("get_parsed_transaction"));
    let tx = CoinTransaction::new(SIG_COIN, conn);

    let err = tx.status().unwrap_err();
    assert!(err.to_string().starts_with("rpc request error"), "{err}");
    assert_eq!(
        tx.verify_transfer(AssetDirection::Incoming, BOB, dec("2.0")),
        TransactionStatus::Failed
    );
    assert_eq!(tx.wait(Duration::from_millis(1)), TransactionStatus::Failed);
    Ok(())
}

#[test]
fn fetched_transaction_is_cached_per_instance() -> Result<()> {
    let (fixtures, conn) = shared(connection()?);

    let tx = CoinTransaction::new(SIG_COIN, conn.clone());
    tx.status()?;
    tx.sender()?;
    tx.amount()?;
    tx.verify_transfer(AssetDirection::Incoming, BOB, dec("2"));
    assert_eq!(fixtures.transaction_fetches(), 1);

    // A separate instance owns a separate cache.
    CoinTransaction::new(SIG_COIN, conn).status()?;
    assert_eq!(fixtures.transaction_fetches(), 2);
    Ok(())
}

#[test]
fn missing_transaction_is_fetched_again() -> Result<()> {
    let (fixtures, conn) = shared(connection()?);
    let tx = Transaction::new(SIG_PENDING, conn);
    tx.status()?;
    tx.status()?;
    assert_eq!(fixtures.transaction_fetches(), 2);
    Ok(())
}

#[test]
fn wait_can_be_cancelled() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = Transaction::new(SIG_PENDING, conn);
    let cancel = AtomicBool::new(true);
    assert_eq!(tx.wait_with_cancel(Duration::from_millis(1), &cancel), None);

    let cancel = AtomicBool::new(false);
    let (_, conn) = shared(connection()?);
    let done = Transaction::new(SIG_COIN, conn);
    assert_eq!(
        done.wait_with_cancel(Duration::from_millis(1), &cancel),
        Some(TransactionStatus::Confirmed)
    );
    Ok(())
}

#[test]
fn transaction_details() -> Result<()> {
    let (_, conn) = shared(connection()?);
    let tx = Transaction::new(SIG_COIN, conn.clone());

    assert_eq!(tx.id(), SIG_COIN);
    assert_eq!(tx.signer()?, ALICE);
    assert_eq!(tx.fee()?.value(), dec("0.000005"));
    assert_eq!(tx.block_number()?, 250_000_000);
    assert_eq!(tx.block_timestamp()?, 1_709_251_200);
    assert_eq!(tx.block_confirmation_count()?, 32);

    let devnet = NetworkConfig::testnet().node()?;
    assert_eq!(
        tx.url(&devnet),
        format!("https://solscan.io/tx/{SIG_COIN}?cluster=devnet")
    );

    let pending = Transaction::new(SIG_PENDING, conn);
    assert_eq!(pending.signer()?, "");
    assert_eq!(pending.block_number()?, 0);
    assert_eq!(pending.block_confirmation_count()?, 250_000_032);
    Ok(())
}
