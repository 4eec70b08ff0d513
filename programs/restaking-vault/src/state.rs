use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::VaultError,
    math::{apply_bp, mul_div, Rounding},
};

/// Global vault state tracking shares and the active yield protocol
///
/// Total assets are never stored: they are the vault's receipt balance in
/// `current_protocol`, read at the start of every instruction.
#[account]
pub struct VaultState {
    /// Treasury - can restake, manage the protocol registry and receives fees
    pub treasury: Pubkey,           // 32 bytes

    /// Mint of the underlying asset token
    pub asset_mint: Pubkey,         // 32 bytes

    /// Mint of the vault share token
    pub share_mint: Pubkey,         // 32 bytes

    /// Program id of the adapter currently holding the pooled position
    pub current_protocol: Pubkey,   // 32 bytes

    /// Receipt token issued to the vault by `current_protocol`
    pub receipt_mint: Pubkey,       // 32 bytes

    /// Total shares issued to depositors
    pub total_shares: u64,          // 8 bytes

    /// Performance fee on realized profit, in basis points
    pub fee_bps: u16,               // 2 bytes

    /// Bump seed for vault state PDA
    pub bump: u8,                   // 1 byte

    /// Bump seed for share mint PDA
    pub share_bump: u8,             // 1 byte

    /// Bump seed for vault authority PDA
    pub authority_bump: u8,         // 1 byte

    // Padding for future upgrades
    pub _reserved: [u8; 64],        // 64 bytes
}

/// Per-depositor share ledger entry
///
/// Created on first deposit and never closed; a depositor who withdrew
/// everything keeps an all-zero record.
#[account]
pub struct DepositorAccount {
    /// Vault this record belongs to
    pub vault: Pubkey,              // 32 bytes

    /// Depositor credited with the shares
    pub owner: Pubkey,              // 32 bytes

    /// Shares owned, mirrored by the depositor's share token balance
    pub shares: u64,                // 8 bytes

    /// Cost basis: principal still attributed to `shares`
    pub initial_deposit: u64,       // 8 bytes

    /// Bump seed for PDA
    pub bump: u8,                   // 1 byte
}

/// Protocol registry for approved yield adapters
///
/// Restake can only target an enabled entry, so the treasury cannot move the
/// pooled position into an arbitrary program.
#[account]
pub struct ProtocolRegistry {
    /// Vault this registry belongs to
    pub vault: Pubkey,              // 32 bytes

    /// List of approved adapter programs
    pub approved_protocols: Vec<ApprovedProtocol>, // 4 + (n * 101) bytes

    /// Bump seed for PDA
    pub bump: u8,                   // 1 byte
}

/// Individual approved protocol entry
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct ApprovedProtocol {
    /// Program id of the adapter
    pub target: Pubkey,             // 32 bytes

    /// Receipt token the adapter credits to the vault
    pub receipt_mint: Pubkey,       // 32 bytes

    /// Whether restaking into this protocol is currently allowed
    pub enabled: bool,              // 1 byte

    /// Human-readable name (e.g., "Kamino", "MarginFi")
    pub name: String,               // 4 + up to 32 bytes
}

/// Read-only breakdown of what a depositor could take out right now
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Valuation {
    /// Pro-rata claim on total assets, principal and yield included
    pub full_share_value: u64,
    /// Claim above cost basis, zero when the position is at a loss
    pub profit: u64,
    /// Performance fee owed to the treasury on `profit`
    pub fee: u64,
    /// `full_share_value - fee`
    pub payout: u64,
}

impl ProtocolRegistry {
    /// 8 (discriminator) + 32 (vault) + 4 (vec len) + (10 * 101) + 1 (bump)
    pub const SPACE: usize = 8 + 32 + 4 + (MAX_PROTOCOLS * 101) + 1;

    /// Check if a protocol target is approved and enabled
    pub fn is_protocol_approved(&self, target: &Pubkey) -> bool {
        self.approved_protocols
            .iter()
            .any(|p| p.target == *target && p.enabled)
    }

    /// Get protocol by target
    pub fn get_protocol(&self, target: &Pubkey) -> Option<&ApprovedProtocol> {
        self.approved_protocols.iter().find(|p| p.target == *target)
    }

    /// Get mutable protocol by target
    pub fn get_protocol_mut(&mut self, target: &Pubkey) -> Option<&mut ApprovedProtocol> {
        self.approved_protocols
            .iter_mut()
            .find(|p| p.target == *target)
    }

    /// Append a new enabled entry
    pub fn register(&mut self, target: Pubkey, receipt_mint: Pubkey, name: String) -> Result<()> {
        require!(name.len() <= MAX_PROTOCOL_NAME_LEN, VaultError::NameTooLong);
        require!(
            self.get_protocol(&target).is_none(),
            VaultError::ProtocolAlreadyExists
        );
        require!(
            self.approved_protocols.len() < MAX_PROTOCOLS,
            VaultError::RegistryFull
        );

        self.approved_protocols.push(ApprovedProtocol {
            target,
            receipt_mint,
            enabled: true,
            name,
        });
        Ok(())
    }

    /// Enable or disable restaking into `target`
    ///
    /// Only gates future restakes; a vault already in `target` stays there.
    pub fn set_enabled(&mut self, target: &Pubkey, enabled: bool) -> Result<()> {
        let protocol = self
            .get_protocol_mut(target)
            .ok_or(VaultError::ProtocolNotFound)?;
        protocol.enabled = enabled;
        Ok(())
    }

    /// Ensure `target` may receive the pooled position with `receipt_mint` as its receipt
    pub fn require_restake_target(&self, target: &Pubkey, receipt_mint: &Pubkey) -> Result<()> {
        let receipt_matches = self
            .get_protocol(target)
            .is_some_and(|p| p.receipt_mint == *receipt_mint);
        require!(
            self.is_protocol_approved(target) && receipt_matches,
            VaultError::ProtocolNotApproved
        );
        Ok(())
    }
}

impl VaultState {
    /// Shares minted for a deposit of `assets`
    ///
    /// - If first deposit: shares = assets
    /// - Otherwise: shares = floor(assets * totalShares / totalAssets)
    pub fn shares_for_deposit(&self, assets: u64, total_assets: u64) -> Result<u64> {
        // First deposit: 1:1 ratio
        if self.total_shares == 0 {
            return Ok(assets);
        }

        mul_div(assets, self.total_shares, total_assets, Rounding::Down)
    }

    /// Shares burned to withdraw `assets`: ceil(assets * totalShares / totalAssets)
    pub fn shares_for_withdraw(&self, assets: u64, total_assets: u64) -> Result<u64> {
        mul_div(assets, self.total_shares, total_assets, Rounding::Up)
    }

    /// Asset value of shares: floor(shares * totalAssets / totalShares)
    pub fn assets_for_shares(&self, shares: u64, total_assets: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(0);
        }

        mul_div(shares, total_assets, self.total_shares, Rounding::Down)
    }

    /// Fee owed on `profit`, rounded up
    pub fn performance_fee(&self, profit: u64) -> Result<u64> {
        apply_bp(profit, self.fee_bps, Rounding::Up)
    }

    /// Value a depositor's position net of the performance fee
    ///
    /// A position below its cost basis pays no fee; the loss is carried by the
    /// share price like any other depositor's.
    pub fn valuation(&self, depositor: &DepositorAccount, total_assets: u64) -> Result<Valuation> {
        let full_share_value = self.assets_for_shares(depositor.shares, total_assets)?;
        let profit = full_share_value.saturating_sub(depositor.initial_deposit);
        let fee = self.performance_fee(profit)?;
        let payout = full_share_value
            .checked_sub(fee)
            .ok_or(error!(VaultError::MathOverflow))?;

        Ok(Valuation {
            full_share_value,
            profit,
            fee,
            payout,
        })
    }
}

impl DepositorAccount {
    /// True until the first deposit writes vault and owner
    pub fn is_new(&self) -> bool {
        self.owner == Pubkey::default()
    }

    /// Credit `amount` of principal, minting shares at the pre-deposit price
    pub fn mint(
        &mut self,
        vault: &mut VaultState,
        amount: u64,
        total_assets_before: u64,
    ) -> Result<u64> {
        require!(amount > 0, VaultError::ZeroDepositAmount);

        let shares = vault.shares_for_deposit(amount, total_assets_before)?;
        require!(shares > 0, VaultError::DepositTooSmall);

        let owner_shares = self
            .shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        let total_shares = vault
            .total_shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        let initial_deposit = self
            .initial_deposit
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        self.shares = owner_shares;
        self.initial_deposit = initial_deposit;
        vault.total_shares = total_shares;

        Ok(shares)
    }

    /// Remove `shares` and the matching fraction of cost basis
    ///
    /// Returns the cost basis released, which is the principal part of the
    /// withdrawal.
    pub fn burn(&mut self, vault: &mut VaultState, shares: u64) -> Result<u64> {
        require!(shares <= self.shares, VaultError::InsufficientShares);

        let released = if shares == self.shares {
            self.initial_deposit
        } else {
            mul_div(self.initial_deposit, shares, self.shares, Rounding::Up)?
                .min(self.initial_deposit)
        };

        let total_shares = vault
            .total_shares
            .checked_sub(shares)
            .ok_or(VaultError::MathOverflow)?;

        self.shares -= shares;
        self.initial_deposit -= released;
        vault.total_shares = total_shares;

        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_vault(total_shares: u64) -> VaultState {
        VaultState {
            treasury: Pubkey::default(),
            asset_mint: Pubkey::default(),
            share_mint: Pubkey::default(),
            current_protocol: Pubkey::default(),
            receipt_mint: Pubkey::default(),
            total_shares,
            fee_bps: DEFAULT_FEE_BPS,
            bump: 0,
            share_bump: 0,
            authority_bump: 0,
            _reserved: [0; 64],
        }
    }

    fn mock_depositor(shares: u64, initial_deposit: u64) -> DepositorAccount {
        DepositorAccount {
            vault: Pubkey::default(),
            owner: Pubkey::new_unique(),
            shares,
            initial_deposit,
            bump: 0,
        }
    }

    #[test]
    fn test_first_deposit() {
        let vault = mock_vault(0);
        assert_eq!(vault.shares_for_deposit(1000, 0).unwrap(), 1000);
    }

    #[test]
    fn test_subsequent_deposit_equal_ratio() {
        let vault = mock_vault(1000);
        assert_eq!(vault.shares_for_deposit(500, 1000).unwrap(), 500);
    }

    #[test]
    fn test_subsequent_deposit_with_profit() {
        // Vault has 2000 assets but only 1000 shares (profit made)
        let vault = mock_vault(1000);
        // New depositor gets 250 shares for 500 assets
        assert_eq!(vault.shares_for_deposit(500, 2000).unwrap(), 250);
    }

    #[test]
    fn test_deposit_into_wiped_out_vault() {
        // Shares outstanding but nothing backing them
        let vault = mock_vault(1000);
        let err = vault.shares_for_deposit(500, 0).unwrap_err();
        assert_eq!(err, VaultError::DivisionByZero.into());
    }

    #[test]
    fn test_assets_for_shares() {
        let vault = mock_vault(1000);
        // 500 shares should be worth 1000 assets
        assert_eq!(vault.assets_for_shares(500, 2000).unwrap(), 1000);
        assert_eq!(mock_vault(0).assets_for_shares(500, 2000).unwrap(), 0);
    }

    #[test]
    fn test_withdraw_rounds_shares_up() {
        // 1000 assets backed by 333 shares: 100 assets = 33.3 shares
        let vault = mock_vault(333);
        assert_eq!(vault.shares_for_deposit(100, 1000).unwrap(), 33);
        assert_eq!(vault.shares_for_withdraw(100, 1000).unwrap(), 34);
    }

    #[test]
    fn test_mint_tracks_cost_basis() {
        let mut vault = mock_vault(1000);
        let mut depositor = mock_depositor(0, 0);

        // Price is 2 assets per share
        let shares = depositor.mint(&mut vault, 500, 2000).unwrap();

        assert_eq!(shares, 250);
        assert_eq!(depositor.shares, 250);
        assert_eq!(depositor.initial_deposit, 500);
        assert_eq!(vault.total_shares, 1250);
    }

    #[test]
    fn test_mint_rejects_dust() {
        let mut vault = mock_vault(1);
        let mut depositor = mock_depositor(0, 0);

        // One share is worth 1000 assets, 10 assets buys nothing
        let err = depositor.mint(&mut vault, 10, 1000).unwrap_err();
        assert_eq!(err, VaultError::DepositTooSmall.into());
        assert_eq!(depositor.initial_deposit, 0);
        assert_eq!(vault.total_shares, 1);
    }

    #[test]
    fn test_mint_rejects_zero() {
        let mut vault = mock_vault(0);
        let mut depositor = mock_depositor(0, 0);
        let err = depositor.mint(&mut vault, 0, 0).unwrap_err();
        assert_eq!(err, VaultError::ZeroDepositAmount.into());
    }

    #[test]
    fn test_burn_releases_proportional_basis() {
        let mut vault = mock_vault(400);
        let mut depositor = mock_depositor(400, 300);

        // A quarter of the shares releases a quarter of the basis
        let released = depositor.burn(&mut vault, 100).unwrap();

        assert_eq!(released, 75);
        assert_eq!(depositor.shares, 300);
        assert_eq!(depositor.initial_deposit, 225);
        assert_eq!(vault.total_shares, 300);
    }

    #[test]
    fn test_burn_all_clears_basis() {
        let mut vault = mock_vault(3);
        let mut depositor = mock_depositor(3, 10);

        assert_eq!(depositor.burn(&mut vault, 3).unwrap(), 10);
        assert_eq!(depositor.shares, 0);
        assert_eq!(depositor.initial_deposit, 0);
        assert_eq!(vault.total_shares, 0);
    }

    #[test]
    fn test_burn_more_than_owned() {
        let mut vault = mock_vault(100);
        let mut depositor = mock_depositor(100, 100);

        let err = depositor.burn(&mut vault, 101).unwrap_err();
        assert_eq!(err, VaultError::InsufficientShares.into());
        assert_eq!(depositor.shares, 100);
        assert_eq!(vault.total_shares, 100);
    }

    #[test]
    fn test_valuation_with_yield() {
        // 500 USDC deposited, 50 USDC of yield accrued
        let vault = mock_vault(500_000_000);
        let depositor = mock_depositor(500_000_000, 500_000_000);

        let valuation = vault.valuation(&depositor, 550_000_000).unwrap();

        assert_eq!(valuation.full_share_value, 550_000_000);
        assert_eq!(valuation.profit, 50_000_000);
        assert_eq!(valuation.fee, 2_500_000);
        assert_eq!(valuation.payout, 547_500_000);
    }

    #[test]
    fn test_valuation_at_loss_waives_fee() {
        let vault = mock_vault(500);
        let depositor = mock_depositor(500, 500);

        let valuation = vault.valuation(&depositor, 400).unwrap();

        assert_eq!(valuation.full_share_value, 400);
        assert_eq!(valuation.profit, 0);
        assert_eq!(valuation.fee, 0);
        assert_eq!(valuation.payout, 400);
    }

    #[test]
    fn test_registry_rejects_duplicates_and_overflow() {
        let mut registry = ProtocolRegistry {
            vault: Pubkey::new_unique(),
            approved_protocols: Vec::new(),
            bump: 0,
        };

        let target = Pubkey::new_unique();
        registry
            .register(target, Pubkey::new_unique(), "Kamino".to_string())
            .unwrap();
        let err = registry
            .register(target, Pubkey::new_unique(), "Kamino".to_string())
            .unwrap_err();
        assert_eq!(err, VaultError::ProtocolAlreadyExists.into());

        for i in 1..MAX_PROTOCOLS {
            registry
                .register(Pubkey::new_unique(), Pubkey::new_unique(), format!("P{i}"))
                .unwrap();
        }
        let err = registry
            .register(Pubkey::new_unique(), Pubkey::new_unique(), "Full".to_string())
            .unwrap_err();
        assert_eq!(err, VaultError::RegistryFull.into());
    }
}
