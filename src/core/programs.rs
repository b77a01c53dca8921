//! Instruction encoders and associated-account derivation.
//!
//! Thin wrappers over `solana-sdk`, `spl-token` and
//! `spl-associated-token-account`. The builders decide which of these to call
//! and with which arguments; bytes are produced here.

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_associated_token_account::instruction::create_associated_token_account;

use crate::core::constants::{TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::core::error::AssetError;

pub fn is_token_program(program_id: &Pubkey) -> bool {
    *program_id == TOKEN_PROGRAM_ID || *program_id == TOKEN_2022_PROGRAM_ID
}

/// Associated token account of `owner` for `mint` under `program_id`.
///
/// Fails for owners off the ed25519 curve (program-derived addresses) unless
/// `allow_off_curve` is set.
pub fn derive_associated_account(
    mint: &Pubkey,
    owner: &Pubkey,
    allow_off_curve: bool,
    program_id: &Pubkey,
) -> Result<Pubkey, AssetError> {
    if !allow_off_curve && !owner.is_on_curve() {
        return Err(AssetError::Derivation(format!("owner {owner} is off curve")));
    }
    if !is_token_program(program_id) {
        return Err(AssetError::Derivation(format!(
            "{program_id} is not a token program"
        )));
    }
    Ok(get_associated_token_address_with_program_id(
        owner, mint, program_id,
    ))
}

pub fn encode_system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::transfer(from, to, lamports)
}

/// Token `Transfer`. Token-2022 shares the legacy layout, so the instruction
/// is encoded for the legacy program and re-targeted to `program_id`.
pub fn encode_token_transfer(
    program_id: &Pubkey,
    source: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction, AssetError> {
    let mut instruction = spl_token::instruction::transfer(
        &spl_token::id(),
        source,
        destination,
        authority,
        &[],
        amount,
    )
    .map_err(|err| AssetError::Transport(anyhow::anyhow!("encode transfer: {err}")))?;
    instruction.program_id = *program_id;
    Ok(instruction)
}

pub fn encode_token_approve(
    program_id: &Pubkey,
    source: &Pubkey,
    delegate: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Result<Instruction, AssetError> {
    let mut instruction =
        spl_token::instruction::approve(&spl_token::id(), source, delegate, owner, &[], amount)
            .map_err(|err| AssetError::Transport(anyhow::anyhow!("encode approve: {err}")))?;
    instruction.program_id = *program_id;
    Ok(instruction)
}

pub fn encode_create_associated_account(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    program_id: &Pubkey,
) -> Instruction {
    create_associated_token_account(payer, owner, mint, program_id)
}
