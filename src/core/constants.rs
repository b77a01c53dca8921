use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

pub mod programs {
    pub const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";
    pub const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
    pub const TOKEN_2022_PROGRAM: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";
    pub const ASSOCIATED_TOKEN_PROGRAM: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
    pub const METADATA_PROGRAM: &str = "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s";
    pub const COMPUTE_BUDGET_PROGRAM: &str = "ComputeBudget111111111111111111111111111111";
    pub const MEMO_PROGRAM: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";
}

pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const TOKEN_2022_PROGRAM_ID: Pubkey = pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");
pub const METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Fractional resolution of the native coin.
pub const COIN_DECIMALS: u8 = 9;

pub const COIN_NAME: &str = "Solana";
pub const COIN_SYMBOL: &str = "SOL";

/// Parsed instruction types that move native coin.
pub const COIN_TRANSFER_TYPES: &[&str] = &["transfer", "createAccount"];
/// Parsed instruction types that move SPL tokens.
pub const TOKEN_TRANSFER_TYPES: &[&str] = &["transfer", "transferChecked"];

/// Interval used by `Transaction::wait` when the caller has no preference.
pub const DEFAULT_WAIT_INTERVAL_MS: u64 = 4_000;

pub mod program_names {
    use super::programs;
    use once_cell::sync::Lazy;
    use std::collections::HashMap;

    static PROGRAM_NAME: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
        let mut map = HashMap::new();
        map.insert(programs::SYSTEM_PROGRAM, "System Program");
        map.insert(programs::TOKEN_PROGRAM, "Token Program");
        map.insert(programs::TOKEN_2022_PROGRAM, "Token-2022 Program");
        map.insert(programs::ASSOCIATED_TOKEN_PROGRAM, "Associated Token Program");
        map.insert(programs::METADATA_PROGRAM, "Token Metadata Program");
        map.insert(programs::COMPUTE_BUDGET_PROGRAM, "Compute Budget Program");
        map.insert(programs::MEMO_PROGRAM, "Memo Program");
        map
    });

    pub fn name(program_id: &str) -> &'static str {
        PROGRAM_NAME
            .get(program_id)
            .copied()
            .unwrap_or("Unknown Program")
    }
}
