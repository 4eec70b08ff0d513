use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::{constants::*, engine, errors::*, events::*, state::*};

use super::protocol_accounts::*;

/// Withdraw assets from an owner's position, paying the performance fee to
/// the treasury
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Caller must be the owner or an approved share delegate
/// ✅ 2. ACCOUNT OWNERSHIP: Depositor PDA bound to vault and owner by seeds
/// ✅ 6. MATH SAFETY: Shares burned round up, fee rounds up
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Validates mint and owner, treasury account owner
/// ✅ 10. EVENTS: Emits Withdrawn event
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Caller - owner of the shares or delegate on the owner's share account
    #[account(mut)]
    pub caller: Signer<'info>,

    /// Owner whose shares are burned
    /// CHECK: bound through the depositor PDA seeds and share account owner
    pub owner: UncheckedAccount<'info>,

    /// Vault state PDA
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// Owner's ledger entry
    #[account(
        mut,
        seeds = [DEPOSITOR_SEED, vault_state.key().as_ref(), owner.key().as_ref()],
        bump = owner_depositor.bump,
    )]
    pub owner_depositor: Box<Account<'info, DepositorAccount>>,

    /// Share mint
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

    /// Owner's share token account, burned from
    #[account(
        mut,
        constraint = owner_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
        constraint = owner_share_account.owner == owner.key() @ VaultError::InvalidOwner,
    )]
    pub owner_share_account: Box<Account<'info, TokenAccount>>,

    /// Receiver's asset token account
    #[account(
        mut,
        constraint = receiver_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub receiver_asset_account: Box<Account<'info, TokenAccount>>,

    /// Treasury's asset token account, receives the performance fee
    #[account(
        mut,
        constraint = treasury_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = treasury_asset_account.owner == vault_state.treasury @ VaultError::InvalidOwner,
    )]
    pub treasury_asset_account: Box<Account<'info, TokenAccount>>,

    /// Vault's asset token account, receives the redeemed assets from the protocol
    #[account(
        mut,
        constraint = vault_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_asset_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_asset_account: Box<Account<'info, TokenAccount>>,

    pub protocol: ProtocolAccounts<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<u64> {
    // CHECKS: Caller is the owner or holds a delegation on the owner's shares
    let caller = ctx.accounts.caller.key();
    let owner = ctx.accounts.owner.key();
    engine::authorize_withdraw(&caller, &owner, ctx.accounts.owner_share_account.delegate)?;
    ctx.accounts.protocol.require_active(&ctx.accounts.vault_state)?;

    let asset_mint_key = ctx.accounts.vault_state.asset_mint;
    let authority_bump = ctx.accounts.vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let mut protocol = ctx.accounts.protocol.adapter(
        &ctx.accounts.vault_authority.to_account_info(),
        &ctx.accounts.vault_asset_account.to_account_info(),
        &ctx.accounts.token_program.to_account_info(),
        signer_seeds,
    )?;

    // Redeem from the protocol, then burn ledger shares
    let outcome = engine::withdraw(
        &mut ctx.accounts.vault_state,
        &mut ctx.accounts.owner_depositor,
        &mut protocol,
        amount,
    )?;

    // Burn share tokens; SPL enforces the delegated amount when caller != owner
    let burn_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Burn {
            mint: ctx.accounts.share_mint.to_account_info(),
            from: ctx.accounts.owner_share_account.to_account_info(),
            authority: ctx.accounts.caller.to_account_info(),
        },
    );
    token::burn(burn_ctx, outcome.shares)?;

    let payout_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault_asset_account.to_account_info(),
            to: ctx.accounts.receiver_asset_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(payout_ctx, outcome.payout)?;

    if outcome.fee > 0 {
        let fee_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault_asset_account.to_account_info(),
                to: ctx.accounts.treasury_asset_account.to_account_info(),
                authority: ctx.accounts.vault_authority.to_account_info(),
            },
            signer_seeds,
        );
        token::transfer(fee_ctx, outcome.fee)?;
    }

    emit!(Withdrawn {
        vault: ctx.accounts.vault_state.key(),
        caller,
        receiver: ctx.accounts.receiver_asset_account.owner,
        owner,
        assets: amount,
        shares: outcome.shares,
        fee: outcome.fee,
        total_assets: outcome.total_assets,
        total_shares: ctx.accounts.vault_state.total_shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(outcome.shares)
}
