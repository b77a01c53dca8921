use std::sync::Arc;

use once_cell::unsync::OnceCell;
use rust_decimal::Decimal;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

use crate::assets::contract::ContractAsset;
use crate::assets::{DelegatedTransferBuilder, TransferBuilder, UnsignedTransaction};
use crate::core::error::AssetError;
use crate::core::programs::{encode_token_approve, encode_token_transfer};
use crate::core::utils::{addresses_equal, parse_pubkey, Amount};
use crate::rpc::Connection;
use crate::types::{TokenAccount, TokenAccountFilter, TokenAmount};

/// Fungible SPL token, legacy or Token-2022.
pub struct Token {
    contract: ContractAsset,
    program_id: OnceCell<Pubkey>,
}

impl Token {
    pub fn new(address: impl Into<String>, connection: Arc<dyn Connection>) -> Result<Self, AssetError> {
        Ok(Self {
            contract: ContractAsset::new(address, connection)?,
            program_id: OnceCell::new(),
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

    pub fn decimals(&self) -> u8 {
        self.contract
            .metadata()
            .map(|metadata| metadata.decimals)
            .unwrap_or(0)
    }

    pub fn program_id(&self) -> Pubkey {
        *self.program_id.get_or_init(|| self.contract.program_id())
    }

    pub fn balance(&self, owner: &str) -> Amount {
        match self.first_account(owner) {
            Ok(Some(account)) => amount_of(&account.info.token_amount),
            Ok(None) => Amount::zero(self.decimals()),
            Err(err) => {
                tracing::warn!(owner, mint = self.address(), "token balance lookup failed: {err:#}");
                Amount::zero(self.decimals())
            }
        }
    }

    pub fn total_supply(&self) -> Amount {
        match self.contract.connection().get_token_supply(self.address()) {
            Ok(supply) => amount_of(&supply),
            Err(err) => {
                tracing::warn!(mint = self.address(), "token supply lookup failed: {err:#}");
                Amount::zero(self.decimals())
            }
        }
    }

    /// Amount `owner` has delegated; zero when `spender` is given and is not
    /// the delegate.
    pub fn allowance(&self, owner: &str, spender: Option<&str>) -> Amount {
        let account = match self.first_account(owner) {
            Ok(Some(account)) => account,
            Ok(None) => return Amount::zero(self.decimals()),
            Err(err) => {
                tracing::warn!(owner, mint = self.address(), "allowance lookup failed: {err:#}");
                return Amount::zero(self.decimals());
            }
        };
        let Some(delegated) = account.info.delegated_amount.as_ref() else {
            return Amount::zero(account.info.token_amount.decimals);
        };
        if let Some(spender) = spender {
            let delegate = account.info.delegate.as_deref().unwrap_or_default();
            if !addresses_equal(delegate, spender) {
                return Amount::zero(delegated.decimals);
            }
        }
        amount_of(delegated)
    }

    fn first_account(&self, owner: &str) -> anyhow::Result<Option<TokenAccount>> {
        let accounts = self.contract.connection().get_parsed_token_accounts_by_owner(
            owner,
            &TokenAccountFilter::mint(self.address()),
            Some(CommitmentConfig::confirmed()),
        )?;
        Ok(accounts.into_iter().next())
    }

    fn base_units(&self, amount: Decimal) -> Result<u64, AssetError> {
        Amount::new(amount, self.contract.decimals()?).to_base_units()
    }
}

fn amount_of(amount: &TokenAmount) -> Amount {
    Amount::from_base_units_str(&amount.amount, amount.decimals)
        .unwrap_or(Amount::zero(amount.decimals))
}

fn check_amount(amount: &Decimal) -> Result<(), AssetError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AssetError::InvalidAmount);
    }
    Ok(())
}

impl TransferBuilder for Token {
    type Quantity = Decimal;

    fn transfer(
        &self,
        sender: &str,
        receiver: &str,
        amount: &Decimal,
    ) -> Result<UnsignedTransaction, AssetError> {
        self.transfer_from(sender, sender, receiver, amount)
    }
}

impl DelegatedTransferBuilder for Token {
    fn transfer_from(
        &self,
        spender: &str,
        owner: &str,
        receiver: &str,
        amount: &Decimal,
    ) -> Result<UnsignedTransaction, AssetError> {
        check_amount(amount)?;
        if *amount > self.balance(owner).value() {
            return Err(AssetError::InsufficientBalance);
        }
        if !addresses_equal(spender, owner) {
            let allowance = self.allowance(owner, Some(spender));
            if allowance.is_zero() {
                return Err(AssetError::UnauthorizedAddress);
            }
            if *amount > allowance.value() {
                return Err(AssetError::InvalidAmount);
            }
        }

        let program_id = self.program_id();
        let owner_key = parse_pubkey(owner)?;
        let spender_key = parse_pubkey(spender)?;
        let receiver_key = parse_pubkey(receiver)?;
        let raw_amount = self.base_units(*amount)?;

        let mint = self.contract.mint();
        let resolver = self.contract.resolver();
        let owner_account = resolver.resolve(&owner_key, mint, &program_id)?;
        let receiver_account = resolver.resolve(&receiver_key, mint, &program_id)?;

        let mut instructions = Vec::with_capacity(2);
        if let Some(create) = self.contract.create_account_if_missing(
            &spender_key,
            &receiver_key,
            &receiver_account,
            mint,
            &program_id,
        )? {
            instructions.push(create);
        }
        instructions.push(encode_token_transfer(
            &program_id,
            &owner_account,
            &receiver_account,
            &spender_key,
            raw_amount,
        )?);
        tracing::debug!(
            mint = self.address(),
            %program_id,
            raw_amount,
            instructions = instructions.len(),
            "built token transfer"
        );

        Ok(UnsignedTransaction::new(instructions, spender_key))
    }

    fn approve(
        &self,
        owner: &str,
        spender: &str,
        amount: &Decimal,
    ) -> Result<UnsignedTransaction, AssetError> {
        check_amount(amount)?;
        if *amount > self.balance(owner).value() {
            return Err(AssetError::InsufficientBalance);
        }

        let program_id = self.program_id();
        let owner_key = parse_pubkey(owner)?;
        let spender_key = parse_pubkey(spender)?;
        let raw_amount = self.base_units(*amount)?;
        let owner_account = self
            .contract
            .resolver()
            .resolve(&owner_key, self.contract.mint(), &program_id)?;

        let approve = encode_token_approve(
            &program_id,
            &owner_account,
            &spender_key,
            &owner_key,
            raw_amount,
        )?;
        Ok(UnsignedTransaction::new(vec![approve], owner_key))
    }
}
