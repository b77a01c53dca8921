use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use once_cell::unsync::OnceCell;
use solana_sdk::commitment_config::CommitmentConfig;

use crate::config::Node;
use crate::core::constants::COIN_DECIMALS;
use crate::core::error::AssetError;
use crate::core::transaction_classifier::TransactionClassifier;
use crate::core::utils::{from_lamports, Amount};
use crate::rpc::Connection;
use crate::types::{ParsedTransaction, TransactionStatus, TransactionType};

/// A transaction id plus the data fetched for it.
///
/// The fetched transaction is cached for the lifetime of this value once the
/// node returns it; a missing transaction is asked for again on the next read.
pub struct Transaction {
    id: String,
    connection: Arc<dyn Connection>,
    data: OnceCell<ParsedTransaction>,
}

impl Transaction {
    pub fn new(id: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Self {
            id: id.into(),
            connection,
            data: OnceCell::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn connection(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    /// `Ok(None)` while the node has not indexed the transaction.
    pub fn data(&self) -> Result<Option<&ParsedTransaction>, AssetError> {
        if let Some(data) = self.data.get() {
            return Ok(Some(data));
        }
        let fetched = self
            .connection
            .get_parsed_transaction(&self.id, CommitmentConfig::confirmed())
            .map_err(|err| {
                tracing::warn!(id = %self.id, "transaction fetch failed: {err:#}");
                AssetError::rpc_request(format!("{err:#}"))
            })?;
        Ok(fetched.map(|tx| self.data.get_or_init(|| tx)))
    }

    /// Runs `read` over the classifier, or returns the default when there is
    /// no data yet.
    pub(crate) fn read<T, F>(&self, read: F) -> Result<T, AssetError>
    where
        T: Default,
        F: FnOnce(TransactionClassifier<'_>) -> T,
    {
        Ok(self
            .data()?
            .map(|tx| read(TransactionClassifier::new(tx)))
            .unwrap_or_default())
    }

    pub fn transaction_type(&self) -> Result<TransactionType, AssetError> {
        self.read(|classifier| classifier.classify())
    }

    pub fn status(&self) -> Result<TransactionStatus, AssetError> {
        Ok(match self.data()? {
            None => TransactionStatus::Pending,
            Some(tx) if tx.is_failed() => TransactionStatus::Failed,
            Some(_) => TransactionStatus::Confirmed,
        })
    }

    /// Polls until the status leaves PENDING. Any error while polling is
    /// reported as FAILED.
    pub fn wait(&self, interval: Duration) -> TransactionStatus {
        let never = AtomicBool::new(false);
        self.wait_with_cancel(interval, &never)
            .unwrap_or(TransactionStatus::Pending)
    }

    /// [`Transaction::wait`] that gives up with `None` once `cancel` is set.
    pub fn wait_with_cancel(&self, interval: Duration, cancel: &AtomicBool) -> Option<TransactionStatus> {
        loop {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            match self.status() {
                Ok(TransactionStatus::Pending) => {}
                Ok(status) => return Some(status),
                Err(err) => {
                    tracing::warn!(id = %self.id, "wait aborted: {err}");
                    return Some(TransactionStatus::Failed);
                }
            }
            thread::sleep(interval);
        }
    }

    pub fn url(&self, node: &Node) -> String {
        node.transaction_url(&self.id)
    }

    /// Last signer among the account keys.
    pub fn signer(&self) -> Result<String, AssetError> {
        Ok(self
            .data()?
            .and_then(|tx| tx.account_keys.iter().rev().find(|key| key.signer))
            .map(|key| key.pubkey.clone())
            .unwrap_or_default())
    }

    pub fn fee(&self) -> Result<Amount, AssetError> {
        Ok(self
            .data()?
            .map(|tx| from_lamports(tx.meta.fee))
            .unwrap_or(Amount::zero(COIN_DECIMALS)))
    }

    pub fn block_number(&self) -> Result<u64, AssetError> {
        Ok(self.data()?.map(|tx| tx.slot).unwrap_or_default())
    }

    pub fn block_timestamp(&self) -> Result<i64, AssetError> {
        Ok(self.data()?.and_then(|tx| tx.block_time).unwrap_or_default())
    }

    pub fn block_confirmation_count(&self) -> Result<u64, AssetError> {
        let current = self.connection.get_slot()?;
        Ok(current.saturating_sub(self.block_number()?))
    }
}
