//! Classification and field extraction over a fetched transaction.
//!
//! Everything here is a pure function of the [`ParsedTransaction`]. Where a
//! field can be encoded several ways, the candidates are listed as ordered
//! strategy tables and the first one that produces a value wins; the order is
//! part of the behaviour:
//!
//! | field | order |
//! |---|---|
//! | coin receiver | `destination`, `newAccount` |
//! | token sender | `authority`, `multisigAuthority` |
//! | token/NFT address | instruction `mint`, first post-balance mint, last instruction program id |
//! | token amount | reported `tokenAmount`, raw `amount` scaled by post-balance decimals (0 if none) |
//! | NFT id | instruction `mint`, first post-balance mint |
//!
//! Coin and token fields come from the *first* matching transfer
//! instruction; the contract address comes from the *last* instruction.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::core::constants::{
    programs, COIN_DECIMALS, COIN_TRANSFER_TYPES, TOKEN_TRANSFER_TYPES,
};
use crate::core::utils::{from_lamports, Amount};
use crate::types::{ParsedInstruction, ParsedTransaction, TokenAmount, TransactionType};

/// One way of reading a field from the matched instruction.
type Strategy<T> = for<'a> fn(&TransactionClassifier<'a>, &'a ParsedInstruction) -> Option<T>;

const COIN_RECEIVER: &[Strategy<String>] = &[info_destination, info_new_account];
const TOKEN_SENDER: &[Strategy<String>] = &[info_authority, info_multisig_authority];
const TOKEN_ADDRESS: &[Strategy<String>] =
    &[instruction_mint, post_balance_mint, last_instruction_program_id];
const TOKEN_AMOUNT: &[Strategy<Amount>] = &[reported_token_amount, raw_amount_with_post_balance_decimals];
const NFT_ID: &[Strategy<String>] = &[instruction_mint, post_balance_mint];

#[derive(Clone, Copy, Debug)]
pub struct TransactionClassifier<'a> {
    tx: &'a ParsedTransaction,
}

impl<'a> TransactionClassifier<'a> {
    pub fn new(tx: &'a ParsedTransaction) -> Self {
        Self { tx }
    }

    pub fn transaction(&self) -> &'a ParsedTransaction {
        self.tx
    }

    /// Kind of the first instruction that targets a known program.
    pub fn classify(&self) -> TransactionType {
        for instruction in &self.tx.instructions {
            let program_id = instruction.program_id.as_str();
            if program_id == programs::TOKEN_2022_PROGRAM {
                return self.traced(TransactionType::Token, program_id);
            }
            if program_id == programs::TOKEN_PROGRAM {
                let kind = match self.tx.first_post_balance_with_mint() {
                    Some(balance) if balance.ui_token_amount.decimals == 0 => TransactionType::Nft,
                    _ => TransactionType::Token,
                };
                return self.traced(kind, program_id);
            }
            if program_id == programs::SYSTEM_PROGRAM && instruction.is_type(COIN_TRANSFER_TYPES) {
                return self.traced(TransactionType::Coin, program_id);
            }
        }
        self.traced(TransactionType::Contract, "")
    }

    fn traced(&self, kind: TransactionType, program_id: &str) -> TransactionType {
        tracing::debug!(
            signature = self.tx.signatures.first().map(String::as_str).unwrap_or_default(),
            program_id,
            ?kind,
            "classified transaction"
        );
        kind
    }

    /* ----------------------- coin ----------------------- */

    pub fn coin_transfer_instruction(&self) -> Option<&'a ParsedInstruction> {
        self.tx
            .instructions
            .iter()
            .find(|instruction| instruction.is_type(COIN_TRANSFER_TYPES))
    }

    pub fn coin_sender(&self) -> String {
        self.coin_transfer_instruction()
            .and_then(|ix| info_string(ix, "source"))
            .unwrap_or_default()
    }

    pub fn coin_receiver(&self) -> String {
        self.coin_transfer_instruction()
            .and_then(|ix| first_match(self, ix, COIN_RECEIVER))
            .unwrap_or_default()
    }

    pub fn coin_amount(&self) -> Amount {
        self.coin_transfer_instruction()
            .and_then(|ix| ix.info()?.get("lamports")?.as_u64())
            .map(from_lamports)
            .unwrap_or(Amount::zero(COIN_DECIMALS))
    }

    /* ----------------------- contract ----------------------- */

    pub fn last_instruction(&self) -> Option<&'a ParsedInstruction> {
        self.tx.instructions.last()
    }

    /// Program id of the last instruction.
    pub fn contract_address(&self) -> String {
        self.last_instruction()
            .map(|ix| ix.program_id.clone())
            .unwrap_or_default()
    }

    /* ----------------------- token ----------------------- */

    pub fn token_transfer_instruction(&self) -> Option<&'a ParsedInstruction> {
        self.tx
            .instructions
            .iter()
            .find(|instruction| instruction.is_type(TOKEN_TRANSFER_TYPES))
    }

    pub fn token_address(&self) -> String {
        self.token_transfer_instruction()
            .and_then(|ix| first_match(self, ix, TOKEN_ADDRESS))
            .unwrap_or_default()
    }

    pub fn token_sender(&self) -> String {
        self.token_transfer_instruction()
            .and_then(|ix| first_match(self, ix, TOKEN_SENDER))
            .unwrap_or_default()
    }

    /// Destination token account; its owner is the receiver.
    pub fn token_destination_account(&self) -> Option<&'a str> {
        self.token_transfer_instruction()?.info_str("destination")
    }

    pub fn token_amount(&self) -> Amount {
        self.token_transfer_instruction()
            .and_then(|ix| first_match(self, ix, TOKEN_AMOUNT))
            .unwrap_or(Amount::zero(0))
    }

    /* ----------------------- nft ----------------------- */

    pub fn nft_address(&self) -> String {
        self.token_address()
    }

    pub fn nft_sender(&self) -> String {
        self.token_sender()
    }

    /// Owner of the first post-balance entry.
    pub fn nft_receiver(&self) -> String {
        self.tx
            .post_token_balances()
            .first()
            .and_then(|balance| balance.owner.clone())
            .unwrap_or_default()
    }

    pub fn nft_id(&self) -> String {
        self.token_transfer_instruction()
            .and_then(|ix| first_match(self, ix, NFT_ID))
            .unwrap_or_default()
    }
}

fn first_match<'a, T>(
    classifier: &TransactionClassifier<'a>,
    instruction: &'a ParsedInstruction,
    strategies: &[Strategy<T>],
) -> Option<T> {
    strategies
        .iter()
        .find_map(|strategy| strategy(classifier, instruction))
}

fn info_string(instruction: &ParsedInstruction, key: &str) -> Option<String> {
    instruction
        .info_str(key)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn info_destination<'a>(_: &TransactionClassifier<'a>, ix: &'a ParsedInstruction) -> Option<String> {
    info_string(ix, "destination")
}

fn info_new_account<'a>(_: &TransactionClassifier<'a>, ix: &'a ParsedInstruction) -> Option<String> {
    info_string(ix, "newAccount")
}

fn info_authority<'a>(_: &TransactionClassifier<'a>, ix: &'a ParsedInstruction) -> Option<String> {
    info_string(ix, "authority")
}

fn info_multisig_authority<'a>(_: &TransactionClassifier<'a>, ix: &'a ParsedInstruction) -> Option<String> {
    info_string(ix, "multisigAuthority")
}

fn instruction_mint<'a>(_: &TransactionClassifier<'a>, ix: &'a ParsedInstruction) -> Option<String> {
    info_string(ix, "mint")
}

fn post_balance_mint<'a>(classifier: &TransactionClassifier<'a>, _: &'a ParsedInstruction) -> Option<String> {
    classifier
        .tx
        .first_post_balance_with_mint()
        .map(|balance| balance.mint.clone())
}

fn last_instruction_program_id<'a>(
    classifier: &TransactionClassifier<'a>,
    _: &'a ParsedInstruction,
) -> Option<String> {
    classifier
        .last_instruction()
        .map(|ix| ix.program_id.clone())
        .filter(|program_id| !program_id.is_empty())
}

/// `tokenAmount` as reported by `transferChecked`.
fn reported_token_amount<'a>(_: &TransactionClassifier<'a>, ix: &'a ParsedInstruction) -> Option<Amount> {
    let reported: TokenAmount = serde_json::from_value(ix.info()?.get("tokenAmount")?.clone()).ok()?;
    if let Some(amount) = Amount::from_base_units_str(&reported.amount, reported.decimals) {
        return Some(amount);
    }
    let ui_value = match reported.ui_amount_string.as_deref() {
        Some(text) => Decimal::from_str(text).ok(),
        None => reported.ui_amount.and_then(|value| Decimal::try_from(value).ok()),
    }?;
    Some(Amount::new(ui_value, reported.decimals))
}

/// Raw `amount` of a plain `transfer`, scaled by the decimals of the
/// post-balance entry for the same mint. With no such entry the scale is 0
/// and the base-unit integer is returned unscaled.
fn raw_amount_with_post_balance_decimals<'a>(
    classifier: &TransactionClassifier<'a>,
    ix: &'a ParsedInstruction,
) -> Option<Amount> {
    let raw = match ix.info()?.get("amount")? {
        Value::String(text) => text.trim().parse::<u64>().ok()?,
        Value::Number(number) => number.as_u64()?,
        _ => return None,
    };
    let balances = classifier.tx.post_token_balances();
    let entry = match ix.info_str("mint") {
        Some(mint) => balances.iter().find(|balance| balance.mint == mint),
        None => classifier.tx.first_post_balance_with_mint(),
    };
    let decimals = entry
        .map(|balance| balance.ui_token_amount.decimals)
        .unwrap_or(0);
    Amount::from_base_units(raw, decimals)
}
