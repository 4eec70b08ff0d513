use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Toggle a protocol on/off in the whitelist
///
/// Disabling the active protocol leaves the position where it is; it only
/// stops future restakes into it.
#[derive(Accounts)]
pub struct ToggleProtocol<'info> {
    /// Treasury - only they can manage protocols
    pub treasury: Signer<'info>,

    /// Vault state PDA
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = treasury @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Protocol registry PDA
    #[account(
        mut,
        seeds = [PROTOCOL_REGISTRY_SEED, vault_state.key().as_ref()],
        bump = protocol_registry.bump,
    )]
    pub protocol_registry: Account<'info, ProtocolRegistry>,
}

pub fn handler(
    ctx: Context<ToggleProtocol>,
    target: Pubkey,
    enabled: bool,
) -> Result<()> {
    let registry = &mut ctx.accounts.protocol_registry;
    registry.set_enabled(&target, enabled)?;

    msg!("Protocol {} enabled: {}", target, enabled);

    emit!(ProtocolToggled {
        vault: registry.vault,
        target,
        enabled,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
