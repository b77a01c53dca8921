use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;

use crate::assets::contract::ContractAsset;
use crate::assets::{DelegatedTransferBuilder, TransferBuilder, UnsignedTransaction};
use crate::core::constants::programs::TOKEN_PROGRAM;
use crate::core::error::AssetError;
use crate::core::programs::{encode_token_approve, encode_token_transfer};
use crate::core::utils::{addresses_equal, parse_pubkey};
use crate::rpc::Connection;
use crate::types::{ParsedAccount, TokenAccountFilter};

/// Non-fungible tokens of a collection; a token id is the token's mint.
pub struct Nft {
    contract: ContractAsset,
}

impl Nft {
    pub fn new(address: impl Into<String>, connection: Arc<dyn Connection>) -> Result<Self, AssetError> {
        Ok(Self {
            contract: ContractAsset::new(address, connection)?,
        })
    }

    pub fn address(&self) -> &str {
        self.contract.address()
    }

    pub fn name(&self) -> String {
        self.contract
            .metadata()
            .map(|metadata| metadata.name.clone())
            .unwrap_or_default()
    }

    pub fn symbol(&self) -> String {
        self.contract
            .metadata()
            .map(|metadata| metadata.symbol.clone())
            .unwrap_or_default()
    }

    /// Zero-decimal legacy token accounts of `owner`, minus one: an owner
    /// holding a single NFT reports 0 and an empty wallet reports -1.
    pub fn balance(&self, owner: &str) -> i64 {
        let accounts = match self.contract.connection().get_parsed_token_accounts_by_owner(
            owner,
            &TokenAccountFilter::program_id(TOKEN_PROGRAM),
            None,
        ) {
            Ok(accounts) => accounts,
            Err(err) => {
                tracing::warn!(owner, "nft balance lookup failed: {err:#}");
                Vec::new()
            }
        };
        let held = accounts
            .iter()
            .filter(|account| account.info.token_amount.decimals == 0)
            .count() as i64;
        held - 1
    }

    /// Owner of the largest account holding `token_id`; empty when unknown.
    pub fn owner(&self, token_id: &str) -> String {
        self.holder_account(token_id)
            .and_then(|account| account.info_str("owner").map(str::to_string))
            .unwrap_or_default()
    }

    pub fn approved(&self, token_id: &str) -> Option<String> {
        self.holder_account(token_id)?
            .info_str("delegate")
            .map(str::to_string)
    }

    pub fn token_uri(&self, token_id: &str) -> String {
        self.contract
            .fetch_metadata(token_id)
            .map(|metadata| metadata.uri)
            .unwrap_or_default()
    }

    fn holder_account(&self, token_id: &str) -> Option<ParsedAccount> {
        let connection = self.contract.connection();
        let result = connection
            .get_token_largest_accounts(token_id)
            .and_then(|accounts| match accounts.into_iter().next() {
                Some(largest) => connection.get_parsed_account_info(&largest.address),
                None => Ok(None),
            });
        match result {
            Ok(account) => account,
            Err(err) => {
                tracing::warn!(token_id, "nft holder lookup failed: {err:#}");
                None
            }
        }
    }

    fn check_ownership(&self, owner: &str, token_id: &str) -> Result<(), AssetError> {
        if self.balance(owner) <= 0 {
            return Err(AssetError::InsufficientBalance);
        }
        if !addresses_equal(&self.owner(token_id), owner) {
            return Err(AssetError::UnauthorizedAddress);
        }
        Ok(())
    }

    fn token_accounts(&self, token_id: &str) -> Result<(Pubkey, Pubkey), AssetError> {
        let mint = parse_pubkey(token_id)?;
        Ok((mint, self.contract.program_id_of(token_id)))
    }
}

impl TransferBuilder for Nft {
    type Quantity = str;

    fn transfer(
        &self,
        sender: &str,
        receiver: &str,
        token_id: &str,
    ) -> Result<UnsignedTransaction, AssetError> {
        self.transfer_from(sender, sender, receiver, token_id)
    }
}

impl DelegatedTransferBuilder for Nft {
    fn transfer_from(
        &self,
        spender: &str,
        owner: &str,
        receiver: &str,
        token_id: &str,
    ) -> Result<UnsignedTransaction, AssetError> {
        self.check_ownership(owner, token_id)?;
        if !addresses_equal(spender, owner) {
            let approved = self.approved(token_id).unwrap_or_default();
            if !addresses_equal(&approved, spender) {
                return Err(AssetError::UnauthorizedAddress);
            }
        }

        let (mint, program_id) = self.token_accounts(token_id)?;
        let owner_key = parse_pubkey(owner)?;
        let spender_key = parse_pubkey(spender)?;
        let receiver_key = parse_pubkey(receiver)?;

        let resolver = self.contract.resolver();
        let owner_account = resolver.resolve(&owner_key, &mint, &program_id)?;
        let receiver_account = resolver.resolve(&receiver_key, &mint, &program_id)?;

        let mut instructions = Vec::with_capacity(2);
        if let Some(create) = self.contract.create_account_if_missing(
            &spender_key,
            &receiver_key,
            &receiver_account,
            &mint,
            &program_id,
        )? {
            instructions.push(create);
        }
        instructions.push(encode_token_transfer(
            &program_id,
            &owner_account,
            &receiver_account,
            &spender_key,
            1,
        )?);
        tracing::debug!(token_id, %program_id, instructions = instructions.len(), "built nft transfer");

        Ok(UnsignedTransaction::new(instructions, spender_key))
    }

    fn approve(
        &self,
        owner: &str,
        spender: &str,
        token_id: &str,
    ) -> Result<UnsignedTransaction, AssetError> {
        self.check_ownership(owner, token_id)?;

        let (mint, program_id) = self.token_accounts(token_id)?;
        let owner_key = parse_pubkey(owner)?;
        let spender_key = parse_pubkey(spender)?;
        let owner_account = self
            .contract
            .resolver()
            .resolve(&owner_key, &mint, &program_id)?;

        let approve = encode_token_approve(&program_id, &owner_account, &spender_key, &owner_key, 1)?;
        Ok(UnsignedTransaction::new(vec![approve], owner_key))
    }
}
