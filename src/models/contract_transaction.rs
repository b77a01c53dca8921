use std::ops::Deref;
use std::sync::Arc;

use crate::core::error::AssetError;
use crate::models::transaction::Transaction;
use crate::rpc::Connection;

/// Call into an arbitrary program.
pub struct ContractTransaction {
    inner: Transaction,
}

impl ContractTransaction {
    pub fn new(id: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Self {
            inner: Transaction::new(id, connection),
        }
    }

    /// Program id of the last instruction.
    pub fn address(&self) -> Result<String, AssetError> {
        self.read(|classifier| classifier.contract_address())
    }
}

impl Deref for ContractTransaction {
    type Target = Transaction;

    fn deref(&self) -> &Transaction {
        &self.inner
    }
}

impl From<Transaction> for ContractTransaction {
    fn from(inner: Transaction) -> Self {
        Self { inner }
    }
}
