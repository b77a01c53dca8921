use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use solana_account_decoder::parse_token::UiTokenAmount;
use solana_account_decoder::{UiAccount, UiAccountData, UiAccountEncoding};
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcTransactionConfig};
use solana_client::rpc_request::{RpcRequest, TokenAccountsFilter};
use solana_client::rpc_response::Response;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::{
    EncodedConfirmedTransactionWithStatusMeta, EncodedTransaction, UiCompiledInstruction,
    UiInstruction, UiMessage, UiParsedInstruction, UiTransactionEncoding,
    UiTransactionTokenBalance,
};

use crate::config::Node;
use crate::types::{
    AccountKey, LargestAccount, ParsedAccount, ParsedInstruction, ParsedTransaction,
    TokenAccount, TokenAccountFilter, TokenAccountInfo, TokenAmount, TokenBalance,
    TransactionMeta,
};

/// Read-side view of a Solana node.
///
/// Every core component receives one of these explicitly; nothing in the
/// crate reaches for a global connection.
pub trait Connection: Send + Sync {
    /// `Ok(None)` while the transaction is not yet available.
    fn get_parsed_transaction(
        &self,
        signature: &str,
        commitment: CommitmentConfig,
    ) -> Result<Option<ParsedTransaction>>;

    fn get_parsed_account_info(&self, address: &str) -> Result<Option<ParsedAccount>>;

    fn get_parsed_token_accounts_by_owner(
        &self,
        owner: &str,
        filter: &TokenAccountFilter,
        commitment: Option<CommitmentConfig>,
    ) -> Result<Vec<TokenAccount>>;

    fn get_token_supply(&self, mint: &str) -> Result<TokenAmount>;

    fn get_token_largest_accounts(&self, mint: &str) -> Result<Vec<LargestAccount>>;

    /// Native balance in lamports.
    fn get_balance(&self, address: &str) -> Result<u64>;

    /// Raw account data, for accounts the node cannot parse.
    fn get_account_data(&self, address: &str) -> Result<Option<Vec<u8>>>;

    fn get_slot(&self) -> Result<u64>;
}

/// `Connection` backed by a blocking JSON-RPC client.
pub struct RpcConnection {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcConnection {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self::with_commitment(rpc_url, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(rpc_url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url.into(), commitment),
            commitment,
        }
    }

    pub fn from_node(node: &Node) -> Self {
        Self::new(node.rpc_url.clone())
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

impl Connection for RpcConnection {
    fn get_parsed_transaction(
        &self,
        signature: &str,
        commitment: CommitmentConfig,
    ) -> Result<Option<ParsedTransaction>> {
        let signature = Signature::from_str(signature).context("invalid signature")?;
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::JsonParsed),
            commitment: Some(commitment),
            max_supported_transaction_version: Some(0),
        };

        // `getTransaction` answers `null` for unknown signatures; the typed
        // client call would turn that into a decode error.
        let encoded: Option<EncodedConfirmedTransactionWithStatusMeta> = self
            .client
            .send(
                RpcRequest::GetTransaction,
                json!([signature.to_string(), config]),
            )
            .with_context(|| format!("failed to fetch transaction {signature}"))?;

        encoded.map(convert_transaction).transpose()
    }

    fn get_parsed_account_info(&self, address: &str) -> Result<Option<ParsedAccount>> {
        let pubkey = parse_key(address)?;
        let config = RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::JsonParsed),
            commitment: Some(self.commitment),
            data_slice: None,
            min_context_slot: None,
        };
        let response: Response<Option<UiAccount>> = self
            .client
            .send(RpcRequest::GetAccountInfo, json!([pubkey.to_string(), config]))
            .with_context(|| format!("failed to fetch account {pubkey}"))?;

        Ok(response.value.map(convert_account))
    }

    fn get_parsed_token_accounts_by_owner(
        &self,
        owner: &str,
        filter: &TokenAccountFilter,
        commitment: Option<CommitmentConfig>,
    ) -> Result<Vec<TokenAccount>> {
        let owner = parse_key(owner)?;
        let filter = match (&filter.mint, &filter.program_id) {
            (Some(mint), _) => TokenAccountsFilter::Mint(parse_key(mint)?),
            (None, Some(program_id)) => TokenAccountsFilter::ProgramId(parse_key(program_id)?),
            (None, None) => bail!("token account lookup needs a mint or a program id"),
        };
        let accounts = self
            .client
            .get_token_accounts_by_owner_with_commitment(
                &owner,
                filter,
                commitment.unwrap_or(self.commitment),
            )
            .with_context(|| format!("failed to fetch token accounts of {owner}"))?
            .value;

        Ok(accounts
            .into_iter()
            .filter_map(|keyed| {
                let info = match convert_account(keyed.account).info().cloned() {
                    Some(info) => info,
                    None => {
                        tracing::debug!(account = %keyed.pubkey, "token account is not parsed");
                        return None;
                    }
                };
                match serde_json::from_value::<TokenAccountInfo>(info) {
                    Ok(info) => Some(TokenAccount {
                        pubkey: keyed.pubkey,
                        info,
                    }),
                    Err(err) => {
                        tracing::debug!(account = %keyed.pubkey, "unexpected token account shape: {err}");
                        None
                    }
                }
            })
            .collect())
    }

    fn get_token_supply(&self, mint: &str) -> Result<TokenAmount> {
        let mint = parse_key(mint)?;
        let supply = self
            .client
            .get_token_supply(&mint)
            .with_context(|| format!("failed to fetch supply of {mint}"))?;
        Ok(convert_token_amount(&supply))
    }

    fn get_token_largest_accounts(&self, mint: &str) -> Result<Vec<LargestAccount>> {
        let mint = parse_key(mint)?;
        let accounts = self
            .client
            .get_token_largest_accounts(&mint)
            .with_context(|| format!("failed to fetch largest accounts of {mint}"))?;
        Ok(accounts
            .into_iter()
            .map(|balance| LargestAccount {
                amount: convert_token_amount(&balance.amount),
                address: balance.address,
            })
            .collect())
    }

    fn get_balance(&self, address: &str) -> Result<u64> {
        let pubkey = parse_key(address)?;
        self.client
            .get_balance(&pubkey)
            .with_context(|| format!("failed to fetch balance of {pubkey}"))
    }

    fn get_account_data(&self, address: &str) -> Result<Option<Vec<u8>>> {
        let pubkey = parse_key(address)?;
        let response = self
            .client
            .get_account_with_commitment(&pubkey, self.commitment)
            .with_context(|| format!("failed to fetch account {pubkey}"))?;
        Ok(response.value.map(|account| account.data))
    }

    fn get_slot(&self) -> Result<u64> {
        self.client.get_slot().context("failed to fetch slot")
    }
}

/// Fetch one transaction from `rpc_url` at `confirmed` commitment.
pub fn fetch_transaction(rpc_url: &str, signature: &str) -> Result<Option<ParsedTransaction>> {
    RpcConnection::new(rpc_url).get_parsed_transaction(signature, CommitmentConfig::confirmed())
}

fn parse_key(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address).map_err(|err| anyhow!("invalid address {address}: {err}"))
}

/// Convert a `jsonParsed` RPC transaction into the crate's model.
pub fn convert_transaction(tx: EncodedConfirmedTransactionWithStatusMeta) -> Result<ParsedTransaction> {
    let ui_tx = match &tx.transaction.transaction {
        EncodedTransaction::Json(tx) => tx,
        _ => bail!("expected JSON encoded transaction"),
    };
    let message = match &ui_tx.message {
        UiMessage::Parsed(message) => message,
        UiMessage::Raw(_) => bail!("expected jsonParsed message"),
    };

    let account_keys: Vec<AccountKey> = message
        .account_keys
        .iter()
        .map(|account| AccountKey {
            pubkey: account.pubkey.clone(),
            signer: account.signer,
            writable: account.writable,
        })
        .collect();
    let keys: Vec<String> = account_keys.iter().map(|key| key.pubkey.clone()).collect();

    let instructions = message
        .instructions
        .iter()
        .map(|ix| convert_ui_instruction(ix, &keys))
        .collect();

    let meta = match tx.transaction.meta.as_ref() {
        Some(meta) => TransactionMeta {
            err: meta
                .err
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .context("unserializable transaction error")?,
            fee: meta.fee,
            pre_token_balances: convert_token_balances(meta.pre_token_balances.as_ref().into()),
            post_token_balances: convert_token_balances(meta.post_token_balances.as_ref().into()),
        },
        None => TransactionMeta::default(),
    };

    Ok(ParsedTransaction {
        slot: tx.slot,
        block_time: tx.block_time,
        signatures: ui_tx.signatures.clone(),
        account_keys,
        instructions,
        meta,
    })
}

fn convert_token_balances(balances: Option<&Vec<UiTransactionTokenBalance>>) -> Vec<TokenBalance> {
    balances
        .map(|items| {
            items
                .iter()
                .map(|balance| TokenBalance {
                    account_index: balance.account_index,
                    mint: balance.mint.clone(),
                    owner: balance.owner.clone().into(),
                    program_id: balance.program_id.clone().into(),
                    ui_token_amount: convert_token_amount(&balance.ui_token_amount),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn convert_token_amount(amount: &UiTokenAmount) -> TokenAmount {
    TokenAmount {
        amount: amount.amount.clone(),
        ui_amount: amount.ui_amount,
        decimals: amount.decimals,
        ui_amount_string: Some(amount.ui_amount_string.clone()),
    }
}

fn convert_account(account: UiAccount) -> ParsedAccount {
    let parsed = match account.data {
        UiAccountData::Json(decoded) => Some(decoded.parsed),
        _ => None,
    };
    ParsedAccount {
        owner: account.owner,
        parsed,
    }
}

fn convert_compiled_instruction(
    instruction: &UiCompiledInstruction,
    account_keys: &[String],
) -> ParsedInstruction {
    let program_id = account_keys
        .get(instruction.program_id_index as usize)
        .cloned()
        .unwrap_or_default();
    let accounts = instruction
        .accounts
        .iter()
        .filter_map(|index| account_keys.get(*index as usize).cloned())
        .collect();
    ParsedInstruction {
        program_id,
        program: None,
        parsed: None,
        accounts,
        data: Some(instruction.data.clone()),
    }
}

fn convert_ui_instruction(instruction: &UiInstruction, account_keys: &[String]) -> ParsedInstruction {
    match instruction {
        UiInstruction::Compiled(compiled) => convert_compiled_instruction(compiled, account_keys),
        UiInstruction::Parsed(parsed) => match parsed {
            UiParsedInstruction::PartiallyDecoded(instruction) => ParsedInstruction {
                program_id: instruction.program_id.clone(),
                program: None,
                parsed: None,
                accounts: instruction.accounts.clone(),
                data: Some(instruction.data.clone()),
            },
            UiParsedInstruction::Parsed(instruction) => ParsedInstruction {
                program_id: instruction.program_id.clone(),
                program: Some(instruction.program.clone()),
                parsed: Some(instruction.parsed.clone()),
                accounts: Vec::new(),
                data: None,
            },
        },
    }
}
