use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{constants::*, engine, errors::*, events::*, state::*};

use super::protocol_accounts::*;

/// Move the whole pooled position from the current protocol to an approved one
///
/// Architecture: Registry + Whitelist
/// - Treasury-only (has_one constraint)
/// - Target must be enabled in the protocol registry with a matching receipt mint
/// - Withdraw-all then supply-all in one transaction; ledger untouched
/// - The vault authority's receipt ATA for the target must already exist
#[derive(Accounts)]
pub struct Restake<'info> {
    /// Treasury - only they can restake
    pub treasury: Signer<'info>,

    /// Vault state PDA
    /// Security: has_one constraint validates treasury from state
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = treasury @ VaultError::Unauthorized,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// Protocol registry PDA
    #[account(
        seeds = [PROTOCOL_REGISTRY_SEED, vault_state.key().as_ref()],
        bump = protocol_registry.bump,
    )]
    pub protocol_registry: Box<Account<'info, ProtocolRegistry>>,

    /// Vault authority PDA
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's asset token account, holds the position between the two protocols
    #[account(
        mut,
        constraint = vault_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_asset_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_asset_account: Box<Account<'info, TokenAccount>>,

    /// Protocol currently holding the position
    pub current: ProtocolAccounts<'info>,

    /// Protocol receiving the position
    pub next: ProtocolAccounts<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Restake>) -> Result<()> {
    // CHECKS: distinct, approved target and accounts of the active protocol
    let next_program = ctx.accounts.next.program.key();
    let next_receipt_mint = ctx.accounts.next.receipt_mint.key();
    require_keys_neq!(
        next_program,
        ctx.accounts.vault_state.current_protocol,
        VaultError::SameProtocol
    );
    ctx.accounts
        .protocol_registry
        .require_restake_target(&next_program, &next_receipt_mint)?;
    ctx.accounts.current.require_active(&ctx.accounts.vault_state)?;

    let asset_mint_key = ctx.accounts.vault_state.asset_mint;
    let authority_bump = ctx.accounts.vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let vault_authority = ctx.accounts.vault_authority.to_account_info();
    let vault_asset_account = ctx.accounts.vault_asset_account.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();

    let mut current = ctx.accounts.current.adapter(
        &vault_authority,
        &vault_asset_account,
        &token_program,
        signer_seeds,
    )?;
    let mut next = ctx.accounts.next.adapter(
        &vault_authority,
        &vault_asset_account,
        &token_program,
        signer_seeds,
    )?;

    let treasury = ctx.accounts.treasury.key();
    let vault_state = &mut ctx.accounts.vault_state;
    let outcome = engine::restake(vault_state, &treasury, &mut current, &mut next)?;
    vault_state.receipt_mint = next_receipt_mint;

    msg!(
        "Restaked {} from {} to {}",
        outcome.amount,
        outcome.old_protocol,
        outcome.new_protocol
    );

    emit!(ProtocolRestaked {
        vault: vault_state.key(),
        old_protocol: outcome.old_protocol,
        new_protocol: outcome.new_protocol,
        amount: outcome.amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
