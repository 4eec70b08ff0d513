use anchor_lang::prelude::*;

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub treasury: Pubkey,
    pub asset_mint: Pubkey,
    pub share_mint: Pubkey,
    pub protocol: Pubkey,
    pub fee_bps: u16,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub receiver: Pubkey,
    pub assets: u64,
    pub shares: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when assets are withdrawn
#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub receiver: Pubkey,
    pub owner: Pubkey,
    pub assets: u64,
    pub shares: u64,
    pub fee: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when the pooled position moves to another protocol
#[event]
pub struct ProtocolRestaked {
    pub vault: Pubkey,
    pub old_protocol: Pubkey,
    pub new_protocol: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

/// Event emitted when a protocol is added to the registry
#[event]
pub struct ProtocolAdded {
    pub vault: Pubkey,
    pub target: Pubkey,
    pub receipt_mint: Pubkey,
    pub name: String,
    pub timestamp: i64,
}

/// Event emitted when a protocol is toggled
#[event]
pub struct ProtocolToggled {
    pub vault: Pubkey,
    pub target: Pubkey,
    pub enabled: bool,
    pub timestamp: i64,
}
