use std::sync::Arc;

use once_cell::unsync::OnceCell;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

use crate::core::account_resolver::AssociatedAccountResolver;
use crate::core::constants::TOKEN_PROGRAM_ID;
use crate::core::error::AssetError;
use crate::core::metadata::{fetch_mint_decimals, fetch_token_metadata};
use crate::core::programs::encode_create_associated_account;
use crate::core::utils::parse_pubkey;
use crate::rpc::Connection;
use crate::types::TokenMetadata;

/// State shared by mint-backed assets: the mint, its connection and the
/// lazily fetched metadata.
pub struct ContractAsset {
    address: String,
    mint: Pubkey,
    connection: Arc<dyn Connection>,
    resolver: AssociatedAccountResolver,
    metadata: OnceCell<TokenMetadata>,
}

impl ContractAsset {
    pub fn new(address: impl Into<String>, connection: Arc<dyn Connection>) -> Result<Self, AssetError> {
        let address = address.into();
        let mint = parse_pubkey(&address)?;
        Ok(Self {
            address,
            mint,
            resolver: AssociatedAccountResolver::new(connection.clone()),
            connection,
            metadata: OnceCell::new(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn mint(&self) -> &Pubkey {
        &self.mint
    }

    pub fn connection(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    pub fn resolver(&self) -> &AssociatedAccountResolver {
        &self.resolver
    }

    /// Cached metadata of this mint. Misses are retried on the next call.
    pub fn metadata(&self) -> Option<&TokenMetadata> {
        if let Some(metadata) = self.metadata.get() {
            return Some(metadata);
        }
        let metadata = self.fetch_metadata(&self.address)?;
        Some(self.metadata.get_or_init(|| metadata))
    }

    /// Uncached metadata of any mint.
    pub fn fetch_metadata(&self, mint: &str) -> Option<TokenMetadata> {
        match fetch_token_metadata(self.connection(), mint) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(mint, "metadata lookup failed: {err:#}");
                None
            }
        }
    }

    /// Decimals of this mint for amount scaling. Unlike the display reads this
    /// never guesses: an unreadable or non-mint account is an error.
    pub fn decimals(&self) -> Result<u8, AssetError> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata.decimals);
        }
        fetch_mint_decimals(self.connection(), &self.address)?.ok_or_else(|| {
            AssetError::invalid_address(format!("{}: not a mint account", self.address))
        })
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id_of(&self.address)
    }

    /// Owning program of `mint`; the legacy token program when unknown.
    pub fn program_id_of(&self, mint: &str) -> Pubkey {
        let owner = match self.connection.get_parsed_account_info(mint) {
            Ok(Some(account)) => account.owner,
            Ok(None) => return TOKEN_PROGRAM_ID,
            Err(err) => {
                tracing::warn!(mint, "program lookup failed: {err:#}");
                return TOKEN_PROGRAM_ID;
            }
        };
        parse_pubkey(&owner).unwrap_or(TOKEN_PROGRAM_ID)
    }

    /// Create-account instruction for `account` when the node does not know it.
    pub fn create_account_if_missing(
        &self,
        payer: &Pubkey,
        owner: &Pubkey,
        account: &Pubkey,
        mint: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Option<Instruction>, AssetError> {
        match self.connection.get_parsed_account_info(&account.to_string())? {
            Some(_) => Ok(None),
            None => {
                tracing::debug!(%account, %owner, "destination token account missing, creating it");
                Ok(Some(encode_create_associated_account(
                    payer, owner, mint, program_id,
                )))
            }
        }
    }
}
