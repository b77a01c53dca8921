//! Solana asset and transaction normalization: transfer builders for the
//! native coin, SPL tokens and NFTs, plus classification and verification of
//! fetched transactions.

pub mod assets;
pub mod config;
pub mod core;
pub mod models;
pub mod provider;
pub mod rpc;
pub mod types;

pub use crate::assets::{
    Coin, DelegatedTransferBuilder, Nft, Token, TransferBuilder, UnsignedTransaction,
};
pub use crate::config::{NetworkConfig, Node};
pub use crate::core::account_resolver::AssociatedAccountResolver;
pub use crate::core::error::AssetError;
pub use crate::core::transaction_classifier::TransactionClassifier;
pub use crate::core::transfer_verifier::{ExpectedValue, TransferVerifier};
pub use crate::core::utils::Amount;
pub use crate::models::{
    CoinTransaction, ContractTransaction, NftTransaction, TokenTransaction, Transaction,
};
pub use crate::provider::Provider;
pub use crate::rpc::{Connection, RpcConnection};
pub use crate::types::{
    AssetDirection, ParsedTransaction, TokenMetadata, TransactionStatus, TransactionType,
};
