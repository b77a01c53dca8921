pub mod account_resolver;
pub mod binary_reader;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod programs;
pub mod transaction_classifier;
pub mod transfer_verifier;
pub mod utils;
