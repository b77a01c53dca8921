use std::sync::Arc;

use rust_decimal::Decimal;

use crate::assets::{TransferBuilder, UnsignedTransaction};
use crate::core::constants::{COIN_DECIMALS, COIN_NAME, COIN_SYMBOL};
use crate::core::error::AssetError;
use crate::core::programs::encode_system_transfer;
use crate::core::utils::{from_lamports, parse_pubkey, to_lamports, Amount};
use crate::rpc::Connection;

/// The native coin.
#[derive(Clone)]
pub struct Coin {
    connection: Arc<dyn Connection>,
}

impl Coin {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    pub fn name(&self) -> &'static str {
        COIN_NAME
    }

    pub fn symbol(&self) -> &'static str {
        COIN_SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        COIN_DECIMALS
    }

    /// Zero when the balance cannot be read.
    pub fn balance(&self, owner: &str) -> Amount {
        match self.connection.get_balance(owner) {
            Ok(lamports) => from_lamports(lamports),
            Err(err) => {
                tracing::warn!(owner, "balance lookup failed: {err:#}");
                Amount::zero(COIN_DECIMALS)
            }
        }
    }
}

impl TransferBuilder for Coin {
    type Quantity = Decimal;

    fn transfer(
        &self,
        sender: &str,
        receiver: &str,
        amount: &Decimal,
    ) -> Result<UnsignedTransaction, AssetError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AssetError::InvalidAmount);
        }
        let from = parse_pubkey(sender)?;
        let to = parse_pubkey(receiver)?;
        if *amount > self.balance(sender).value() {
            return Err(AssetError::InsufficientBalance);
        }

        let lamports = to_lamports(*amount)?;
        tracing::debug!(sender, receiver, lamports, "building coin transfer");

        Ok(UnsignedTransaction::new(
            vec![encode_system_transfer(&from, &to, lamports)],
            from,
        ))
    }
}
