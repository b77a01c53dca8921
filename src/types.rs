use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Representation of a raw token amount and its UI value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub amount: String,
    #[serde(default)]
    pub ui_amount: Option<f64>,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_amount_string: Option<String>,
}

impl TokenAmount {
    pub fn new(amount: impl Into<String>, decimals: u8, ui_amount: Option<f64>) -> Self {
        Self {
            amount: amount.into(),
            ui_amount,
            decimals,
            ui_amount_string: None,
        }
    }
}

impl Default for TokenAmount {
    fn default() -> Self {
        Self {
            amount: "0".to_string(),
            ui_amount: Some(0.0),
            decimals: 0,
            ui_amount_string: None,
        }
    }
}

/// Snapshot of a token account balance from transaction meta.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub account_index: u8,
    #[serde(default)]
    pub mint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    pub ui_token_amount: TokenAmount,
}

/// Account key of a parsed message, with its signer/writable flags.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    pub pubkey: String,
    #[serde(default)]
    pub signer: bool,
    #[serde(default)]
    pub writable: bool,
}

/// One instruction of a fetched transaction.
///
/// `parsed` holds the `{type, info}` record an indexing node produces for
/// programs it understands; it is `None` for opaque instructions.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInstruction {
    pub program_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ParsedInstruction {
    /// Parsed instruction type, e.g. `transfer` or `createAccount`.
    pub fn instruction_type(&self) -> Option<&str> {
        self.parsed.as_ref()?.get("type")?.as_str()
    }

    pub fn info(&self) -> Option<&Value> {
        self.parsed.as_ref()?.get("info")
    }

    /// String field of the parsed `info` record.
    pub fn info_str(&self, key: &str) -> Option<&str> {
        self.info()?.get(key)?.as_str()
    }

    pub fn is_type(&self, types: &[&str]) -> bool {
        self.instruction_type()
            .map(|kind| types.contains(&kind))
            .unwrap_or(false)
    }
}

/// Transaction meta information.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub pre_token_balances: Vec<TokenBalance>,
    #[serde(default)]
    pub post_token_balances: Vec<TokenBalance>,
}

/// A confirmed transaction as returned by a node with `jsonParsed` encoding.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub account_keys: Vec<AccountKey>,
    #[serde(default)]
    pub instructions: Vec<ParsedInstruction>,
    #[serde(default)]
    pub meta: TransactionMeta,
}

impl ParsedTransaction {
    pub fn post_token_balances(&self) -> &[TokenBalance] {
        &self.meta.post_token_balances
    }

    /// First post-balance entry that names a mint.
    pub fn first_post_balance_with_mint(&self) -> Option<&TokenBalance> {
        self.meta
            .post_token_balances
            .iter()
            .find(|balance| !balance.mint.is_empty())
    }

    pub fn is_failed(&self) -> bool {
        self.meta.err.as_ref().map(|err| !err.is_null()).unwrap_or(false)
    }
}

/// Semantic kind assigned to a fetched transaction.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    #[default]
    General,
    Coin,
    Token,
    Nft,
    Contract,
}

/// Execution status for a Solana transaction.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Confirmed,
    Failed,
}

/// Which side of a transfer the verified address is expected on.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetDirection {
    Incoming,
    Outgoing,
}

/// Name, symbol, decimals and URI of a mint.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub uri: String,
}

/// Parsed account info: the owning program plus the node's `{type, info}` record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAccount {
    pub owner: String,
    #[serde(default)]
    pub parsed: Option<Value>,
}

impl ParsedAccount {
    pub fn info(&self) -> Option<&Value> {
        self.parsed.as_ref()?.get("info")
    }

    pub fn info_str(&self, key: &str) -> Option<&str> {
        self.info()?.get(key)?.as_str()
    }
}

/// Parsed content of an SPL token account.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub mint: String,
    pub owner: String,
    pub token_amount: TokenAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegated_amount: Option<TokenAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Token account returned by an owner lookup.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccount {
    pub pubkey: String,
    pub info: TokenAccountInfo,
}

/// Entry of a mint's largest-holders list.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LargestAccount {
    pub address: String,
    pub amount: TokenAmount,
}

/// Filter for token-account lookups by owner; `mint` takes precedence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenAccountFilter {
    pub mint: Option<String>,
    pub program_id: Option<String>,
}

impl TokenAccountFilter {
    pub fn mint(mint: impl Into<String>) -> Self {
        Self {
            mint: Some(mint.into()),
            program_id: None,
        }
    }

    pub fn program_id(program_id: impl Into<String>) -> Self {
        Self {
            mint: None,
            program_id: Some(program_id.into()),
        }
    }

    pub fn with_program_id(mut self, program_id: impl Into<String>) -> Self {
        self.program_id = Some(program_id.into());
        self
    }
}
