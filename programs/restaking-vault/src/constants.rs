// Constants for the Restaking Vault program

/// Seed for vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for share mint PDA
pub const SHARE_MINT_SEED: &[u8] = b"shares";

/// Seed for vault token account PDA
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for per-depositor ledger PDA
pub const DEPOSITOR_SEED: &[u8] = b"depositor";

/// Seed for the approved protocol registry PDA
pub const PROTOCOL_REGISTRY_SEED: &[u8] = b"protocol_registry";

/// 100% expressed in basis points
pub const BASIS_POINTS_100_PERCENT: u16 = 10_000;

/// Performance fee charged on realized profit (5%)
pub const DEFAULT_FEE_BPS: u16 = 500;

/// Upper bound accepted by `initialize` for the performance fee (20%)
pub const MAX_FEE_BPS: u16 = 2_000;

/// Maximum number of adapters the registry can hold
pub const MAX_PROTOCOLS: usize = 10;

/// Maximum length of a registry entry name
pub const MAX_PROTOCOL_NAME_LEN: usize = 32;

/// Space for VaultState account (8 discriminator + 32 treasury + 32 asset_mint +
/// 32 share_mint + 32 current_protocol + 32 receipt_mint + 8 total_shares +
/// 2 fee_bps + 1 bump + 1 share_bump + 1 authority_bump + 64 padding)
pub const VAULT_STATE_SIZE: usize = 8 + 32 + 32 + 32 + 32 + 32 + 8 + 2 + 1 + 1 + 1 + 64;

/// Space for DepositorAccount (8 discriminator + 32 vault + 32 owner +
/// 8 shares + 8 initial_deposit + 1 bump)
pub const DEPOSITOR_ACCOUNT_SIZE: usize = 8 + 32 + 32 + 8 + 8 + 1;
