use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Initialize a new vault for a given asset token and its first yield protocol
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Deployer paying for the vault accounts
    /// Security: Must be signer; holds no privileges after initialization
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Vault state PDA
    /// Security: Initialized with proper space and padding for upgrades
    #[account(
        init,
        payer = payer,
        space = VAULT_STATE_SIZE,
        seeds = [VAULT_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_state: Box<Account<'info, VaultState>>,

    /// Asset token mint (the underlying token users deposit)
    /// Security: No constraints needed - any valid mint can have a vault
    pub asset_mint: Box<Account<'info, Mint>>,

    /// Share token mint PDA (vault shares)
    /// Security: Mint authority is vault_authority PDA
    #[account(
        init,
        payer = payer,
        seeds = [SHARE_MINT_SEED, asset_mint.key().as_ref()],
        bump,
        mint::decimals = asset_mint.decimals,
        mint::authority = vault_authority,
    )]
    pub share_mint: Box<Account<'info, Mint>>,

    /// Vault authority PDA - mint authority for shares, signs adapter CPIs
    /// CHECK: PDA used as mint authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's token account for staging assets
    /// Security: Owned by vault_authority PDA, correct mint
    #[account(
        init,
        payer = payer,
        associated_token::mint = asset_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_asset_account: Box<Account<'info, TokenAccount>>,

    /// Protocol registry PDA, seeded with the initial protocol
    #[account(
        init,
        payer = payer,
        space = ProtocolRegistry::SPACE,
        seeds = [PROTOCOL_REGISTRY_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub protocol_registry: Box<Account<'info, ProtocolRegistry>>,

    /// First yield adapter program
    /// CHECK: only its id is stored; must be executable
    #[account(executable)]
    pub protocol_program: UncheckedAccount<'info>,

    /// Receipt token the first adapter credits to the vault
    pub receipt_mint: Box<Account<'info, Mint>>,

    /// Vault's receipt account with the first adapter, the only one counted as total assets
    #[account(
        init,
        payer = payer,
        associated_token::mint = receipt_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_receipt_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<Initialize>,
    treasury: Pubkey,
    fee_bps: u16,
    protocol_name: String,
) -> Result<()> {
    // CHECKS: Validate configuration
    require!(fee_bps <= MAX_FEE_BPS, VaultError::InvalidFeeRate);

    let protocol = ctx.accounts.protocol_program.key();
    let receipt_mint = ctx.accounts.receipt_mint.key();
    let vault_key = ctx.accounts.vault_state.key();

    // EFFECTS: Initialize vault state
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.treasury = treasury;
    vault_state.asset_mint = ctx.accounts.asset_mint.key();
    vault_state.share_mint = ctx.accounts.share_mint.key();
    vault_state.current_protocol = protocol;
    vault_state.receipt_mint = receipt_mint;
    vault_state.total_shares = 0;
    vault_state.fee_bps = fee_bps;
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.share_bump = ctx.bumps.share_mint;
    vault_state.authority_bump = ctx.bumps.vault_authority;
    vault_state._reserved = [0; 64];

    let registry = &mut ctx.accounts.protocol_registry;
    registry.vault = vault_key;
    registry.bump = ctx.bumps.protocol_registry;
    registry.approved_protocols = Vec::new();
    registry.register(protocol, receipt_mint, protocol_name)?;

    // INTERACTIONS: Emit event
    emit!(VaultInitialized {
        vault: vault_key,
        treasury,
        asset_mint: vault_state.asset_mint,
        share_mint: vault_state.share_mint,
        protocol,
        fee_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
