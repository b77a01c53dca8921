use std::ops::Deref;
use std::sync::Arc;

use crate::core::error::AssetError;
use crate::core::transfer_verifier::{ExpectedValue, ObservedTransfer, ObservedValue, TransferVerifier};
use crate::models::contract_transaction::ContractTransaction;
use crate::models::transaction::Transaction;
use crate::rpc::Connection;
use crate::types::{AssetDirection, TransactionStatus};

/// NFT transfer.
pub struct NftTransaction {
    inner: ContractTransaction,
}

impl NftTransaction {
    pub fn new(id: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: ContractTransaction::new(id, connection),
        }
    }

    pub fn address(&self) -> Result<String, AssetError> {
        self.read(|classifier| classifier.nft_address())
    }

    pub fn sender(&self) -> Result<String, AssetError> {
        self.read(|classifier| classifier.nft_sender())
    }

    pub fn receiver(&self) -> Result<String, AssetError> {
        self.read(|classifier| classifier.nft_receiver())
    }

    pub fn nft_id(&self) -> Result<String, AssetError> {
        self.read(|classifier| classifier.nft_id())
    }

    pub fn verify_transfer(
        &self,
        direction: AssetDirection,
        address: &str,
        nft_id: &str,
    ) -> TransactionStatus {
        let status = match self.status() {
            Ok(status) => status,
            Err(_) => return TransactionStatus::Failed,
        };
        TransferVerifier::verify(
            status,
            || ObservedTransfer {
                sender: self.sender().unwrap_or_default(),
                receiver: self.receiver().unwrap_or_default(),
                value: ObservedValue::TokenId(self.nft_id().unwrap_or_default()),
            },
            direction,
            address,
            &ExpectedValue::TokenId(nft_id.to_string()),
        )
    }
}

impl Deref for NftTransaction {
    type Target = ContractTransaction;

    fn deref(&self) -> &ContractTransaction {
        &self.inner
    }
}

impl From<Transaction> for NftTransaction {
    fn from(inner: Transaction) -> Self {
        Self {
            inner: ContractTransaction::from(inner),
        }
    }
}
