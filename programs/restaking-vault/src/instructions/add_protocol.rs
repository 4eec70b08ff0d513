use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Add a new yield adapter to the approved whitelist
#[derive(Accounts)]
pub struct AddProtocol<'info> {
    /// Treasury - only they can manage protocols
    /// Security: Must be signer and match vault_state.treasury
    pub treasury: Signer<'info>,

    /// Vault state PDA
    /// Security: has_one constraint validates treasury from state
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = treasury @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Protocol registry PDA, created by `initialize`
    #[account(
        mut,
        seeds = [PROTOCOL_REGISTRY_SEED, vault_state.key().as_ref()],
        bump = protocol_registry.bump,
    )]
    pub protocol_registry: Account<'info, ProtocolRegistry>,
}

pub fn handler(
    ctx: Context<AddProtocol>,
    target: Pubkey,
    receipt_mint: Pubkey,
    name: String,
) -> Result<()> {
    let registry = &mut ctx.accounts.protocol_registry;

    // CHECKS + EFFECTS: name length, duplicates and capacity enforced by the registry
    registry.register(target, receipt_mint, name.clone())?;

    emit!(ProtocolAdded {
        vault: registry.vault,
        target,
        receipt_mint,
        name,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
