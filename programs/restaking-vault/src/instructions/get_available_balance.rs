use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::{adapter::receipt_account_address, constants::*, errors::*, state::*};

/// Read-only valuation of a depositor's position net of the performance fee
#[derive(Accounts)]
pub struct GetAvailableBalance<'info> {
    /// Vault state PDA
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Depositor being valued
    /// CHECK: only used as a seed
    pub owner: UncheckedAccount<'info>,

    /// Owner's ledger entry, may not exist yet
    /// CHECK: validated by seeds, decoded by the handler when initialized
    #[account(
        seeds = [DEPOSITOR_SEED, vault_state.key().as_ref(), owner.key().as_ref()],
        bump,
    )]
    pub owner_depositor: UncheckedAccount<'info>,

    /// Vault authority PDA
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's receipt balance in the current protocol, i.e. total assets
    /// Security: only the vault authority's ATA for the current receipt mint
    #[account(
        address = receipt_account_address(&vault_authority.key(), &vault_state.receipt_mint)
            @ VaultError::InvalidReceiptAccount,
        constraint = vault_receipt_account.mint == vault_state.receipt_mint @ VaultError::InvalidProtocol,
    )]
    pub vault_receipt_account: Account<'info, TokenAccount>,
}

pub fn handler(ctx: Context<GetAvailableBalance>) -> Result<u64> {
    let depositor_info = ctx.accounts.owner_depositor.to_account_info();

    // Never deposited: same as an all-zero record
    if depositor_info.data_is_empty() {
        return Ok(0);
    }

    require_keys_eq!(*depositor_info.owner, crate::ID, VaultError::InvalidOwner);
    let depositor = {
        let data = depositor_info.try_borrow_data()?;
        DepositorAccount::try_deserialize(&mut &data[..])?
    };

    let valuation = ctx
        .accounts
        .vault_state
        .valuation(&depositor, ctx.accounts.vault_receipt_account.amount)?;

    msg!(
        "value {} profit {} fee {} payout {}",
        valuation.full_share_value,
        valuation.profit,
        valuation.fee,
        valuation.payout
    );

    Ok(valuation.payout)
}
