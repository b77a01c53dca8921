use std::ops::Deref;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::error::AssetError;
use crate::core::transfer_verifier::{ExpectedValue, ObservedTransfer, ObservedValue, TransferVerifier};
use crate::core::utils::Amount;
use crate::models::transaction::Transaction;
use crate::rpc::Connection;
use crate::types::{AssetDirection, TransactionStatus};

/// Native coin transfer.
pub struct CoinTransaction {
    inner: Transaction,
}

impl CoinTransaction {
    pub fn new(id: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: Transaction::new(id, connection),
        }
    }

    pub fn sender(&self) -> Result<String, AssetError> {
        self.read(|classifier| classifier.coin_sender())
    }

    pub fn receiver(&self) -> Result<String, AssetError> {
        self.read(|classifier| classifier.coin_receiver())
    }

    pub fn amount(&self) -> Result<Amount, AssetError> {
        self.read(|classifier| classifier.coin_amount())
    }

    pub fn verify_transfer(
        &self,
        direction: AssetDirection,
        address: &str,
        amount: Decimal,
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
                value: ObservedValue::Amount(self.amount().unwrap_or_default()),
            },
            direction,
            address,
            &ExpectedValue::Amount(amount),
        )
    }
}

impl Deref for CoinTransaction {
    type Target = Transaction;

    fn deref(&self) -> &Transaction {
        &self.inner
    }
}

impl From<Transaction> for CoinTransaction {
    fn from(inner: Transaction) -> Self {
        Self { inner }
    }
}
