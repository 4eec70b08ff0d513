use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::{constants::*, engine, errors::*, events::*, state::*};

use super::protocol_accounts::*;

/// Deposit assets into the vault, supply them to the active protocol and
/// credit shares to the receiver
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Caller must sign the asset transfer
/// ✅ 2. ACCOUNT OWNERSHIP: Vault state and depositor PDAs validated with seeds
/// ✅ 6. MATH SAFETY: Share calculation uses checked u128 math, rounds down
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 8. BUSINESS LOGIC: Protocol accounts must match the vault's current protocol
/// ✅ 10. EVENTS: Emits Deposited event
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// Caller providing the assets
    /// Security: Must be signer, pays for the depositor record on first deposit
    #[account(mut)]
    pub caller: Signer<'info>,

    /// Depositor credited with the shares
    /// CHECK: any address can receive shares; bound through the depositor PDA seeds
    pub receiver: UncheckedAccount<'info>,

    /// Vault state PDA
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// Receiver's ledger entry, created on first deposit
    #[account(
        init_if_needed,
        payer = caller,
        space = DEPOSITOR_ACCOUNT_SIZE,
        seeds = [DEPOSITOR_SEED, vault_state.key().as_ref(), receiver.key().as_ref()],
        bump
    )]
    pub receiver_depositor: Box<Account<'info, DepositorAccount>>,

    /// Share mint
    /// Security: Must match vault_state.share_mint
    #[account(
        mut,
        address = vault_state.share_mint,
    )]
    pub share_mint: Box<Account<'info, Mint>>,

    /// Vault authority PDA
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Caller's asset token account (source)
    #[account(
        mut,
        constraint = caller_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = caller_asset_account.owner == caller.key() @ VaultError::InvalidOwner,
    )]
    pub caller_asset_account: Box<Account<'info, TokenAccount>>,

    /// Receiver's share token account (destination)
    #[account(
        mut,
        constraint = receiver_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
        constraint = receiver_share_account.owner == receiver.key() @ VaultError::InvalidOwner,
    )]
    pub receiver_share_account: Box<Account<'info, TokenAccount>>,

    /// Vault's asset token account, staging area between caller and protocol
    #[account(
        mut,
        constraint = vault_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_asset_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_asset_account: Box<Account<'info, TokenAccount>>,

    pub protocol: ProtocolAccounts<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<u64> {
    // CHECKS: Validate amount and source balance
    require!(amount > 0, VaultError::ZeroDepositAmount);
    engine::require_funds(ctx.accounts.caller_asset_account.amount, amount)?;
    ctx.accounts.protocol.require_active(&ctx.accounts.vault_state)?;

    let asset_mint_key = ctx.accounts.vault_state.asset_mint;
    let authority_bump = ctx.accounts.vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    // Pull assets from caller into the vault
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.caller_asset_account.to_account_info(),
            to: ctx.accounts.vault_asset_account.to_account_info(),
            authority: ctx.accounts.caller.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    let mut protocol = ctx.accounts.protocol.adapter(
        &ctx.accounts.vault_authority.to_account_info(),
        &ctx.accounts.vault_asset_account.to_account_info(),
        &ctx.accounts.token_program.to_account_info(),
        signer_seeds,
    )?;

    let receiver_depositor = &mut ctx.accounts.receiver_depositor;
    if receiver_depositor.is_new() {
        receiver_depositor.vault = ctx.accounts.vault_state.key();
        receiver_depositor.owner = ctx.accounts.receiver.key();
        receiver_depositor.bump = ctx.bumps.receiver_depositor;
    }

    // Supply to the protocol, then record shares
    let outcome = engine::deposit(
        &mut ctx.accounts.vault_state,
        &mut ctx.accounts.receiver_depositor,
        &mut protocol,
        amount,
    )?;

    // Mint share tokens mirroring the ledger
    let mint_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        MintTo {
            mint: ctx.accounts.share_mint.to_account_info(),
            to: ctx.accounts.receiver_share_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::mint_to(mint_ctx, outcome.shares)?;

    emit!(Deposited {
        vault: ctx.accounts.vault_state.key(),
        caller: ctx.accounts.caller.key(),
        receiver: ctx.accounts.receiver.key(),
        assets: amount,
        shares: outcome.shares,
        total_assets: outcome.total_assets,
        total_shares: ctx.accounts.vault_state.total_shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(outcome.shares)
}
