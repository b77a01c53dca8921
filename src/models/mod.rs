pub mod coin_transaction;
pub mod contract_transaction;
pub mod nft_transaction;
pub mod token_transaction;
pub mod transaction;

pub use coin_transaction::CoinTransaction;
pub use contract_transaction::ContractTransaction;
pub use nft_transaction::NftTransaction;
pub use token_transaction::TokenTransaction;
pub use transaction::Transaction;
