// Restaking Vault - pooled share vault over a pluggable yield protocol on Solana
// Security: Follows Solana security best practices with comprehensive validation
// Architecture: Registry + Whitelist for the adapters the treasury may restake into

use anchor_lang::prelude::*;

pub mod adapter;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;

use instructions::*;

declare_id!("EYVruvkrwGnvCnzqn8xsZhS8tkkZHvLfEk1vMvfoGdq8");

#[program]
pub mod restaking_vault {
    use super::*;

    /// Initialize a new vault for a given asset token
    ///
    /// Security considerations:
    /// - Treasury and fee rate fixed here, fee bounded by MAX_FEE_BPS
    /// - Creates share mint with vault authority PDA as mint authority
    /// - Registers the first yield adapter in the protocol registry
    pub fn initialize(
        ctx: Context<Initialize>,
        treasury: Pubkey,
        fee_bps: u16,
        protocol_name: String,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, treasury, fee_bps, protocol_name)
    }

    /// Deposit assets into the vault and receive shares
    ///
    /// Security considerations:
    /// - Validates caller and receiver token accounts (mint, owner)
    /// - Protocol accounts must match the vault's current protocol
    /// - Adapter must credit the receipt balance 1:1
    /// - Emits event for tracking
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<u64> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraw assets, burning the owner's shares
    ///
    /// Security considerations:
    /// - Caller must be the owner or an approved delegate on the share account
    /// - Shares burned round up so withdrawers never extract more than their claim
    /// - Performance fee on realized profit paid to the treasury
    /// - Emits event for tracking
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<u64> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// What the owner would receive for their whole position, fee deducted
    pub fn get_available_balance(ctx: Context<GetAvailableBalance>) -> Result<u64> {
        instructions::get_available_balance::handler(ctx)
    }

    /// Move the pooled position into another approved protocol
    ///
    /// Security considerations:
    /// - Treasury-only function (has_one constraint)
    /// - Target must be enabled in the registry and differ from the current protocol
    /// - Shares and cost bases are untouched
    /// - Emits event for transparency
    pub fn restake(ctx: Context<Restake>) -> Result<()> {
        instructions::restake::handler(ctx)
    }

    /// Add a new protocol to the approved whitelist
    ///
    /// Security considerations:
    /// - Treasury-only function
    /// - Validates protocol doesn't already exist
    /// - Enforces registry size limits
    /// - Emits event for tracking
    pub fn add_protocol(
        ctx: Context<AddProtocol>,
        target: Pubkey,
        receipt_mint: Pubkey,
        name: String,
    ) -> Result<()> {
        instructions::add_protocol::handler(ctx, target, receipt_mint, name)
    }

    /// Toggle a protocol on/off in the whitelist
    ///
    /// Security considerations:
    /// - Treasury-only function
    /// - Allows disabling protocols without removing them
    /// - Emits event for tracking
    pub fn toggle_protocol(
        ctx: Context<ToggleProtocol>,
        target: Pubkey,
        enabled: bool,
    ) -> Result<()> {
        instructions::toggle_protocol::handler(ctx, target, enabled)
    }
}
