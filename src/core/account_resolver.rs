use std::sync::Arc;

use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

use crate::core::error::AssetError;
use crate::core::programs::derive_associated_account;
use crate::core::utils::parse_pubkey;
use crate::rpc::Connection;
use crate::types::TokenAccountFilter;

/// Picks the token account an owner holds a mint in.
///
/// A live lookup wins; when it errors or finds nothing, the associated
/// account is derived. Only lookup failures fall back: a derivation failure
/// is returned to the caller.
#[derive(Clone)]
pub struct AssociatedAccountResolver {
    connection: Arc<dyn Connection>,
}

impl AssociatedAccountResolver {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    pub fn resolve(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Pubkey, AssetError> {
        if let Some(account) = self.lookup(owner, mint, program_id) {
            return Ok(account);
        }
        tracing::debug!(%owner, %mint, "no live token account, deriving associated account");
        derive_associated_account(mint, owner, false, program_id)
    }

    fn lookup(&self, owner: &Pubkey, mint: &Pubkey, program_id: &Pubkey) -> Option<Pubkey> {
        let filter = TokenAccountFilter::mint(mint.to_string()).with_program_id(program_id.to_string());
        let accounts = match self.connection.get_parsed_token_accounts_by_owner(
            &owner.to_string(),
            &filter,
            Some(CommitmentConfig::confirmed()),
        ) {
            Ok(accounts) => accounts,
            Err(err) => {
                tracing::warn!(%owner, %mint, "token account lookup failed: {err:#}");
                return None;
            }
        };
        let first = accounts.into_iter().next()?;
        match parse_pubkey(&first.pubkey) {
            Ok(account) => Some(account),
            Err(err) => {
                tracing::warn!(%owner, "node returned an unusable token account: {err}");
                None
            }
        }
    }
}
