//! Transfer builders for the native coin, fungible tokens and NFTs.
//!
//! A builder checks its preconditions before anything is assembled, so a
//! failed check never yields a partial instruction list.

pub mod coin;
pub mod contract;
pub mod nft;
pub mod token;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::core::error::AssetError;

pub use coin::Coin;
pub use contract::ContractAsset;
pub use nft::Nft;
pub use token::Token;

/// Ordered instructions plus the account that pays the fee.
///
/// Signing and submission happen outside this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    instructions: Vec<Instruction>,
    fee_payer: Pubkey,
}

impl UnsignedTransaction {
    pub fn new(instructions: Vec<Instruction>, fee_payer: Pubkey) -> Self {
        Self {
            instructions,
            fee_payer,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn fee_payer(&self) -> &Pubkey {
        &self.fee_payer
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Unsigned `Transaction` with the fee payer as message payer.
    pub fn to_transaction(&self) -> Transaction {
        Transaction::new_with_payer(&self.instructions, Some(&self.fee_payer))
    }

    /// Wire encoding for an external signer.
    pub fn serialize_base64(&self) -> Result<String, AssetError> {
        let bytes = bincode::serialize(&self.to_transaction())
            .map_err(|err| AssetError::Transport(anyhow::anyhow!("serialize transaction: {err}")))?;
        Ok(STANDARD.encode(bytes))
    }
}

/// `transfer` for an asset kind. `Quantity` is a human-unit amount for
/// fungible assets and a token id for NFTs.
pub trait TransferBuilder {
    type Quantity: ?Sized;

    fn transfer(
        &self,
        sender: &str,
        receiver: &str,
        quantity: &Self::Quantity,
    ) -> Result<UnsignedTransaction, AssetError>;
}

/// Delegated operations, available for token-program assets.
pub trait DelegatedTransferBuilder: TransferBuilder {
    fn transfer_from(
        &self,
        spender: &str,
        owner: &str,
        receiver: &str,
        quantity: &Self::Quantity,
    ) -> Result<UnsignedTransaction, AssetError>;

    fn approve(
        &self,
        owner: &str,
        spender: &str,
        quantity: &Self::Quantity,
    ) -> Result<UnsignedTransaction, AssetError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::programs::encode_system_transfer;
    use base64::Engine as _;

    #[test]
    fn serialized_transaction_carries_payer_first() {
        let payer = Pubkey::new_unique();
        let receiver = Pubkey::new_unique();
        let unsigned = UnsignedTransaction::new(
            vec![encode_system_transfer(&payer, &receiver, 10)],
            payer,
        );
        let tx = unsigned.to_transaction();
        assert_eq!(tx.message.account_keys[0], payer);
        assert_eq!(tx.message.header.num_required_signatures, 1);

        let encoded = unsigned.serialize_base64().unwrap();
        let decoded: Transaction =
            bincode::deserialize(&STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded.message, tx.message);
    }
}
