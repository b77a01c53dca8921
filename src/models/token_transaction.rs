use std::ops::Deref;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::error::AssetError;
use crate::core::transfer_verifier::{ExpectedValue, ObservedTransfer, ObservedValue, TransferVerifier};
use crate::core::utils::Amount;
use crate::models::contract_transaction::ContractTransaction;
use crate::models::transaction::Transaction;
use crate::rpc::Connection;
use crate::types::{AssetDirection, TransactionStatus};

/// Fungible token transfer.
pub struct TokenTransaction {
    inner: ContractTransaction,
}

impl TokenTransaction {
    pub fn new(id: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: ContractTransaction::new(id, connection),
        }
    }

    /// Mint of the transferred token.
    pub fn address(&self) -> Result<String, AssetError> {
        self.read(|classifier| classifier.token_address())
    }

    pub fn sender(&self) -> Result<String, AssetError> {
        self.read(|classifier| classifier.token_sender())
    }

    /// Owner of the destination token account, looked up on the node.
    /// Empty when the lookup fails.
    pub fn receiver(&self) -> Result<String, AssetError> {
        let destination = self.read(|classifier| {
            classifier
                .token_destination_account()
                .map(str::to_string)
                .unwrap_or_default()
        })?;
        if destination.is_empty() {
            return Ok(String::new());
        }
        match self.connection().get_parsed_account_info(&destination) {
            Ok(account) => Ok(account
                .and_then(|account| account.info_str("owner").map(str::to_string))
                .unwrap_or_default()),
            Err(err) => {
                tracing::warn!(%destination, "destination owner lookup failed: {err:#}");
                Ok(String::new())
            }
        }
    }

    pub fn amount(&self) -> Result<Amount, AssetError> {
        self.read(|classifier| classifier.token_amount())
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
                // Only the compared side needs the extra lookup.
                receiver: match direction {
                    AssetDirection::Incoming => self.receiver().unwrap_or_default(),
                    AssetDirection::Outgoing => String::new(),
                },
                value: ObservedValue::Amount(self.amount().unwrap_or_default()),
            },
            direction,
            address,
            &ExpectedValue::Amount(amount),
        )
    }
}

impl Deref for TokenTransaction {
    type Target = ContractTransaction;

    fn deref(&self) -> &ContractTransaction {
        &self.inner
    }
}

impl From<Transaction> for TokenTransaction {
    fn from(inner: Transaction) -> Self {
        Self {
            inner: ContractTransaction::from(inner),
        }
    }
}
