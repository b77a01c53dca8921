#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::json;
use solana_sdk::commitment_config::CommitmentConfig;

use solana_asset_kit::core::constants::programs;
use solana_asset_kit::rpc::Connection;
use solana_asset_kit::types::{
    LargestAccount, ParsedAccount, ParsedTransaction, TokenAccount, TokenAccountFilter,
    TokenAccountInfo, TokenAmount,
};

pub const ALICE: &str = "3x9az88Dkbxa6tkKByxqEn7jBTJCJCD4dVvou49L24ET";
pub const BOB: &str = "9jLkNAaW9E47LQMHvjohy2uAAyr1331bAxgJKFRU7wF6";
pub const CAROL: &str = "68GLr8rYqhXTRgYuH5MN7BeswuPxjeEZRLMzunr9JQCt";
pub const BOB_TOKEN_ACCOUNT: &str = "8Hgtm6vdCG3HH85etdNqGb53aVpyUwRbCZwdaJK71Apa";
pub const TOKEN_MINT: &str = "E45bGKJps9VrSFEc2p7pETN8a9inHvuAvLvDSLLpytwM";
pub const NFT_MINT: &str = "BcDhVPgAnXqvapT9ebpiBSWYTwza2kR1vTTbg5W1t2Z9";
pub const TOKEN_2022_MINT: &str = "F69xqdu5LaoyXwDKXtwPXzrd3ZXsXF19hAb6dbeSPFmo";
pub const CUSTOM_PROGRAM: &str = "D2QSjfetqcd5zoBg7Dka87AViTB6tETHk9VQjQJnVHP2";

pub const SIG_COIN: &str =
    "2nhxhFXA6fqPhNbckjWpYEKrY313Psvxq8HfALQGcRSKPHuJGbqT7hqP9FqSy2wcjS5ot29qpVKCVEYVsbo77zQk";
pub const SIG_FAILED: &str =
    "3AsvhS1UjvW64PYEjESxQKX3ax5CSA6yPVJTgu23C6iJ3nKPQbUyced31jjA2xMSojwmnQsqajPCVRCG4KN2U2Zt";
pub const SIG_TOKEN: &str =
    "5EVNDxmHrzr2JGTKuPutYUBUHcofji4nHU7XGRuccK6EM6LaA58RSuhnxgCrz19Q7J8rPFD8UCFgegiWga2BcVDr";
pub const SIG_PLAIN: &str =
    "2FRjbhxnUcZHTFFWQVJZYPqWU8tVTQdGKp7dvN1PottoHJnKmrKkapjCd1BzXYQ1CiUccrxeMUX8oXMumjUuHmDT";
pub const SIG_2022: &str =
    "5NsvQz9cQCnKkR7hh3wMjM2oYL1GtoHXx18qcRUQQfF9eoJi1au9oqncBD81NbURdd4SRVnjydHH3eXGmWkBt6Jo";
pub const SIG_NFT: &str =
    "58oUjw5N16yREWRLUgLVJxTxmuyqFmxM7uMsmMbG6R9sjp1BDKzXtYrRMtiaLbEMfV8MhGXLeoYoFZrjQHvTQpQC";
pub const SIG_CONTRACT: &str =
    "3WZYmHuD793x6J5rBgvyfaZWWcjUxoCTP6UXziRxLjhr33TmXguh92osVEJRfrABEry61yvDrHsXrJ6B4B8eDizW";
pub const SIG_PENDING: &str =
    "4dWPYLv9NbzsKRCXurH2Hyq5D1Hm1f35fi4k1ty5L96Wii34HGs52KRYX6bM8aowWKMQxjuqEHCNezwkwao9QpAG";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_transaction(name: &str) -> Result<ParsedTransaction> {
    let path = fixture_path(name);
    let data = fs::read(&path).with_context(|| format!("failed to read {:?}", path))?;
    serde_json::from_slice(&data).with_context(|| format!("failed to parse JSON in {:?}", path))
}

/// Connection answering from in-memory maps.
///
/// Methods listed through [`FixtureConnection::failing`] return an error, and
/// transaction fetches are counted.
#[derive(Default)]
pub struct FixtureConnection {
    transactions: HashMap<String, ParsedTransaction>,
    accounts: HashMap<String, ParsedAccount>,
    token_accounts: HashMap<String, Vec<TokenAccount>>,
    balances: HashMap<String, u64>,
    supplies: HashMap<String, TokenAmount>,
    largest: HashMap<String, Vec<LargestAccount>>,
    account_data: HashMap<String, Vec<u8>>,
    slot: u64,
    failing: HashSet<&'static str>,
    transaction_fetches: AtomicUsize,
    token_account_lookups: AtomicUsize,
}

impl FixtureConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `(signature, fixture file)` pair.
    pub fn with_fixtures(mut self, fixtures: &[(&str, &str)]) -> Result<Self> {
        for (signature, file) in fixtures {
            self.transactions
                .insert(signature.to_string(), load_transaction(file)?);
        }
        Ok(self)
    }

    pub fn with_transaction(mut self, signature: &str, tx: ParsedTransaction) -> Self {
        self.transactions.insert(signature.to_string(), tx);
        self
    }

    pub fn with_account(mut self, address: &str, account: ParsedAccount) -> Self {
        self.accounts.insert(address.to_string(), account);
        self
    }

    pub fn with_token_account(mut self, owner: &str, pubkey: &str, info: TokenAccountInfo) -> Self {
        self.token_accounts
            .entry(owner.to_string())
            .or_default()
            .push(TokenAccount {
                pubkey: pubkey.to_string(),
                info,
            });
        self
    }

    pub fn with_balance(mut self, address: &str, lamports: u64) -> Self {
        self.balances.insert(address.to_string(), lamports);
        self
    }

    pub fn with_supply(mut self, mint: &str, supply: TokenAmount) -> Self {
        self.supplies.insert(mint.to_string(), supply);
        self
    }

    pub fn with_largest_account(mut self, mint: &str, address: &str) -> Self {
        self.largest
            .entry(mint.to_string())
            .or_default()
            .push(LargestAccount {
                address: address.to_string(),
                amount: TokenAmount::new("1", 0, Some(1.0)),
            });
        self
    }

    pub fn with_account_data(mut self, address: &str, data: Vec<u8>) -> Self {
        self.account_data.insert(address.to_string(), data);
        self
    }

    pub fn with_slot(mut self, slot: u64) -> Self {
        self.slot = slot;
        self
    }

    pub fn failing(mut self, method: &'static str) -> Self {
        self.failing.insert(method);
        self
    }

    pub fn transaction_fetches(&self) -> usize {
        self.transaction_fetches.load(Ordering::SeqCst)
    }

    pub fn token_account_lookups(&self) -> usize {
        self.token_account_lookups.load(Ordering::SeqCst)
    }

    fn check(&self, method: &'static str) -> Result<()> {
        if self.failing.contains(method) {
            bail!("{method}: simulated rpc failure");
        }
        Ok(())
    }
}

impl Connection for FixtureConnection {
    fn get_parsed_transaction(
        &self,
        signature: &str,
        _commitment: CommitmentConfig,
    ) -> Result<Option<ParsedTransaction>> {
        self.transaction_fetches.fetch_add(1, Ordering::SeqCst);
        self.check("get_parsed_transaction")?;
        Ok(self.transactions.get(signature).cloned())
    }

    fn get_parsed_account_info(&self, address: &str) -> Result<Option<ParsedAccount>> {
        self.check("get_parsed_account_info")?;
        Ok(self.accounts.get(address).cloned())
    }

    fn get_parsed_token_accounts_by_owner(
        &self,
        owner: &str,
        filter: &TokenAccountFilter,
        _commitment: Option<CommitmentConfig>,
    ) -> Result<Vec<TokenAccount>> {
        self.token_account_lookups.fetch_add(1, Ordering::SeqCst);
        self.check("get_parsed_token_accounts_by_owner")?;
        let accounts = self.token_accounts.get(owner).cloned().unwrap_or_default();
        Ok(match &filter.mint {
            Some(mint) => accounts
                .into_iter()
                .filter(|account| &account.info.mint == mint)
                .collect(),
            None => accounts,
        })
    }

    fn get_token_supply(&self, mint: &str) -> Result<TokenAmount> {
        self.check("get_token_supply")?;
        self.supplies
            .get(mint)
            .cloned()
            .with_context(|| format!("unknown mint {mint}"))
    }

    fn get_token_largest_accounts(&self, mint: &str) -> Result<Vec<LargestAccount>> {
        self.check("get_token_largest_accounts")?;
        Ok(self.largest.get(mint).cloned().unwrap_or_default())
    }

    fn get_balance(&self, address: &str) -> Result<u64> {
        self.check("get_balance")?;
        Ok(self.balances.get(address).copied().unwrap_or_default())
    }

    fn get_account_data(&self, address: &str) -> Result<Option<Vec<u8>>> {
        self.check("get_account_data")?;
        Ok(self.account_data.get(address).cloned())
    }

    fn get_slot(&self) -> Result<u64> {
        self.check("get_slot")?;
        Ok(self.slot)
    }
}

pub fn shared(connection: FixtureConnection) -> (Arc<FixtureConnection>, Arc<dyn Connection>) {
    let concrete = Arc::new(connection);
    let erased: Arc<dyn Connection> = concrete.clone();
    (concrete, erased)
}

/* ----------------------- account builders ----------------------- */

pub fn mint_account(decimals: u8, program_id: &str) -> ParsedAccount {
    ParsedAccount {
        owner: program_id.to_string(),
        parsed: Some(json!({
            "type": "mint",
            "info": {
                "decimals": decimals,
                "freezeAuthority": null,
                "isInitialized": true,
                "mintAuthority": null,
                "supply": "1000000000000"
            }
        })),
    }
}

/// Parsed token account as `getAccountInfo` returns it.
pub fn token_account(owner: &str, mint: &str, delegate: Option<&str>) -> ParsedAccount {
    let mut info = json!({
        "isNative": false,
        "mint": mint,
        "owner": owner,
        "state": "initialized",
        "tokenAmount": { "amount": "1", "decimals": 0, "uiAmount": 1.0, "uiAmountString": "1" }
    });
    if let Some(delegate) = delegate {
        info["delegate"] = json!(delegate);
        info["delegatedAmount"] =
            json!({ "amount": "1", "decimals": 0, "uiAmount": 1.0, "uiAmountString": "1" });
    }
    ParsedAccount {
        owner: programs::TOKEN_PROGRAM.to_string(),
        parsed: Some(json!({ "type": "account", "info": info })),
    }
}

/// Token account as `getTokenAccountsByOwner` returns it.
pub fn holding(mint: &str, owner: &str, raw: u64, decimals: u8) -> TokenAccountInfo {
    TokenAccountInfo {
        mint: mint.to_string(),
        owner: owner.to_string(),
        token_amount: TokenAmount::new(raw.to_string(), decimals, None),
        delegate: None,
        delegated_amount: None,
        state: Some("initialized".to_string()),
    }
}

pub fn delegated(mut info: TokenAccountInfo, delegate: &str, raw: u64) -> TokenAccountInfo {
    info.delegated_amount = Some(TokenAmount::new(raw.to_string(), info.token_amount.decimals, None));
    info.delegate = Some(delegate.to_string());
    info
}
