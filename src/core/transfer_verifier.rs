use rust_decimal::Decimal;

use crate::core::utils::{addresses_equal, Amount};
use crate::types::{AssetDirection, TransactionStatus};

/// Value a caller expects a transfer to have moved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpectedValue {
    /// Human-unit amount of a fungible asset.
    Amount(Decimal),
    /// Mint of a non-fungible token.
    TokenId(String),
}

impl From<Decimal> for ExpectedValue {
    fn from(amount: Decimal) -> Self {
        Self::Amount(amount)
    }
}

/// Value extracted from a fetched transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservedValue {
    Amount(Amount),
    TokenId(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedTransfer {
    pub sender: String,
    pub receiver: String,
    pub value: ObservedValue,
}

impl ObservedTransfer {
    fn value_matches(&self, expected: &ExpectedValue) -> bool {
        match (&self.value, expected) {
            (ObservedValue::Amount(observed), ExpectedValue::Amount(expected)) => {
                observed.matches(*expected)
            }
            // Token ids are compared exactly, unlike addresses.
            (ObservedValue::TokenId(observed), ExpectedValue::TokenId(expected)) => {
                observed == expected
            }
            _ => false,
        }
    }

    fn party(&self, direction: AssetDirection) -> &str {
        match direction {
            AssetDirection::Incoming => &self.receiver,
            AssetDirection::Outgoing => &self.sender,
        }
    }
}

/// Verdict for an expected transfer.
///
/// Extraction is deferred until the status is known, so a pending transaction
/// never triggers the field reads.
pub struct TransferVerifier;

impl TransferVerifier {
    pub fn verify<F>(
        status: TransactionStatus,
        observe: F,
        direction: AssetDirection,
        expected_address: &str,
        expected: &ExpectedValue,
    ) -> TransactionStatus
    where
        F: FnOnce() -> ObservedTransfer,
    {
        if status == TransactionStatus::Pending {
            return TransactionStatus::Pending;
        }
        let observed = observe();
        if !observed.value_matches(expected) {
            tracing::debug!(?observed, ?expected, "transfer value mismatch");
            return TransactionStatus::Failed;
        }
        if !addresses_equal(observed.party(direction), expected_address) {
            tracing::debug!(?direction, expected_address, "transfer address mismatch");
            return TransactionStatus::Failed;
        }
        TransactionStatus::Confirmed
    }
}
