//! Mint metadata lookup.
//!
//! Decimals come from the parsed mint account. Name, symbol and URI come from
//! the Token-2022 `tokenMetadata` extension when the mint carries one, else
//! from the Metaplex metadata account derived from the mint.

use anyhow::Result;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;

use crate::core::binary_reader::{BinaryReader, BinaryReaderError};
use crate::core::constants::METADATA_PROGRAM_ID;
use crate::rpc::Connection;
use crate::types::TokenMetadata;

/// `Ok(None)` when `mint` is not an initialized mint account.
///
/// Only the mint account read is fatal. A failed or undecodable Metaplex read
/// leaves name, symbol and URI empty and keeps the mint's decimals.
pub fn fetch_token_metadata(connection: &dyn Connection, mint: &str) -> Result<Option<TokenMetadata>> {
    let Some(account) = connection.get_parsed_account_info(mint)? else {
        return Ok(None);
    };
    let Some(info) = account.info() else {
        return Ok(None);
    };
    let Some(decimals) = mint_decimals(info) else {
        return Ok(None);
    };

    let mut metadata = TokenMetadata {
        decimals,
        ..TokenMetadata::default()
    };

    if let Some(state) = token_metadata_extension(info) {
        metadata.name = field(state, "name");
        metadata.symbol = field(state, "symbol");
        metadata.uri = field(state, "uri");
        return Ok(Some(metadata));
    }

    let mint_key: Pubkey = match mint.parse() {
        Ok(key) => key,
        Err(_) => return Ok(Some(metadata)),
    };
    let address = metadata_address(&mint_key);
    let data = match connection.get_account_data(&address.to_string()) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(mint, %address, "metadata account read failed: {err:#}");
            None
        }
    };
    if let Some(data) = data {
        match decode_metaplex_metadata(&data) {
            Ok(record) => {
                metadata.name = record.name;
                metadata.symbol = record.symbol;
                metadata.uri = record.uri;
            }
            Err(err) => tracing::debug!(%address, "undecodable metadata account: {err}"),
        }
    }

    Ok(Some(metadata))
}

/// Decimals of `mint` straight from its parsed account; `Ok(None)` when the
/// account is missing or is not a mint.
pub fn fetch_mint_decimals(connection: &dyn Connection, mint: &str) -> Result<Option<u8>> {
    Ok(connection
        .get_parsed_account_info(mint)?
        .and_then(|account| account.info().and_then(mint_decimals)))
}

fn mint_decimals(info: &Value) -> Option<u8> {
    let decimals = info.get("decimals").and_then(Value::as_u64)?;
    u8::try_from(decimals).ok()
}

/// Metaplex metadata PDA: seeds `["metadata", program, mint]`.
pub fn metadata_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[b"metadata", METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &METADATA_PROGRAM_ID,
    )
    .0
}

/// Leading fields of a Metaplex metadata account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaplexMetadata {
    pub update_authority: String,
    pub mint: String,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

pub fn decode_metaplex_metadata(data: &[u8]) -> Result<MetaplexMetadata, BinaryReaderError> {
    let mut reader = BinaryReader::new(data);
    let _key = reader.read_u8()?;
    let update_authority = reader.read_pubkey()?;
    let mint = reader.read_pubkey()?;
    // Fixed-size fields are right-padded with NULs on chain.
    let name = reader.read_string()?.trim_end_matches('\0').to_string();
    let symbol = reader.read_string()?.trim_end_matches('\0').to_string();
    let uri = reader.read_string()?.trim_end_matches('\0').to_string();
    Ok(MetaplexMetadata {
        update_authority,
        mint,
        name,
        symbol,
        uri,
    })
}

fn token_metadata_extension(info: &Value) -> Option<&Value> {
    info.get("extensions")?
        .as_array()?
        .iter()
        .find(|ext| ext.get("extension").and_then(Value::as_str) == Some("tokenMetadata"))?
        .get("state")
}

fn field(state: &Value, key: &str) -> String {
    state
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
