use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};

use crate::{
    adapter::{require_receipt_account, CpiYieldProtocol},
    errors::*,
    state::*,
};

/// Accounts of one yield adapter, shared by every instruction that touches
/// the pooled position
///
/// Adapter-internal accounts are validated by the adapter program itself; the
/// vault only checks what it owns.
#[derive(Accounts)]
pub struct ProtocolAccounts<'info> {
    /// Adapter program
    /// CHECK: executable, matched against vault state or the registry by the handler
    #[account(executable)]
    pub program: UncheckedAccount<'info>,

    /// Adapter state
    /// CHECK: must be owned by the adapter program, decoded only by the adapter
    #[account(mut, owner = program.key())]
    pub state: UncheckedAccount<'info>,

    /// Adapter's reserve of the underlying asset
    #[account(mut)]
    pub reserve: Box<Account<'info, TokenAccount>>,

    /// Receipt token credited to the vault by the adapter
    #[account(mut)]
    pub receipt_mint: Box<Account<'info, Mint>>,

    /// Vault's receipt balance with this adapter
    /// Security: must be the vault authority's ATA for receipt_mint, checked in `adapter`
    #[account(
        mut,
        token::mint = receipt_mint,
    )]
    pub vault_receipt_account: Box<Account<'info, TokenAccount>>,
}

impl<'info> ProtocolAccounts<'info> {
    /// Ensure these accounts describe the protocol currently holding the position
    pub fn require_active(&self, vault_state: &VaultState) -> Result<()> {
        require_keys_eq!(
            self.program.key(),
            vault_state.current_protocol,
            VaultError::InvalidProtocol
        );
        require_keys_eq!(
            self.receipt_mint.key(),
            vault_state.receipt_mint,
            VaultError::InvalidProtocol
        );
        Ok(())
    }

    /// Build the CPI-backed protocol, signing as the vault authority
    pub fn adapter<'a>(
        &self,
        vault_authority: &AccountInfo<'info>,
        vault_asset_account: &AccountInfo<'info>,
        token_program: &AccountInfo<'info>,
        signer_seeds: &'a [&'a [&'a [u8]]],
    ) -> Result<CpiYieldProtocol<'a, 'info>> {
        require_keys_eq!(
            self.vault_receipt_account.owner,
            vault_authority.key(),
            VaultError::InvalidOwner
        );
        // Total assets are read from here, so only the canonical account counts
        require_receipt_account(
            &self.vault_receipt_account.key(),
            &vault_authority.key(),
            &self.receipt_mint.key(),
        )?;

        Ok(CpiYieldProtocol {
            program: self.program.to_account_info(),
            state: self.state.to_account_info(),
            reserve: self.reserve.to_account_info(),
            receipt_mint: self.receipt_mint.to_account_info(),
            vault_asset_account: vault_asset_account.clone(),
            vault_receipt_account: self.vault_receipt_account.to_account_info(),
            vault_authority: vault_authority.clone(),
            token_program: token_program.clone(),
            signer_seeds,
        })
    }
}
