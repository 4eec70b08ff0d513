use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::invoke_signed,
};
use anchor_spl::{associated_token::get_associated_token_address, token::TokenAccount};

use crate::errors::VaultError;

/// Discriminator of the adapter's `supply` instruction, sha256("global:supply")[..8]
pub const SUPPLY_DISCRIMINATOR: [u8; 8] = [81, 67, 116, 61, 250, 209, 5, 198];

/// Discriminator of the adapter's `withdraw` instruction, sha256("global:withdraw")[..8]
pub const WITHDRAW_DISCRIMINATOR: [u8; 8] = [183, 18, 70, 156, 148, 109, 161, 34];

/// Capability every yield protocol plugged into the vault must provide.
///
/// The engine only talks to this trait, so restaking swaps implementations
/// without touching ledger code.
pub trait YieldProtocol {
    /// Program id identifying the protocol
    fn key(&self) -> Pubkey;

    /// Hand `amount` of the asset to the protocol; the vault's receipt balance
    /// grows by exactly `amount`.
    fn supply(&mut self, amount: u64) -> Result<()>;

    /// Redeem `amount` from the receipt balance back into the vault's asset account
    fn withdraw(&mut self, amount: u64) -> Result<()>;

    /// Current redeemable value held by the vault, principal plus accrued yield
    fn receipt_balance(&self) -> Result<u64>;
}

/// Anchor-style instruction data: discriminator followed by the LE amount
pub fn adapter_instruction_data(discriminator: [u8; 8], amount: u64) -> Vec<u8> {
    let mut data = discriminator.to_vec();
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

/// The one receipt account the vault values: the vault authority's ATA for `receipt_mint`
pub fn receipt_account_address(vault_authority: &Pubkey, receipt_mint: &Pubkey) -> Pubkey {
    get_associated_token_address(vault_authority, receipt_mint)
}

/// Reject any receipt account other than the canonical one
pub fn require_receipt_account(
    account: &Pubkey,
    vault_authority: &Pubkey,
    receipt_mint: &Pubkey,
) -> Result<()> {
    require_keys_eq!(
        *account,
        receipt_account_address(vault_authority, receipt_mint),
        VaultError::InvalidReceiptAccount
    );
    Ok(())
}

/// A balance moved by an adapter call must have grown by exactly `amount`
pub fn require_exact_credit(before: u64, after: u64, amount: u64) -> Result<()> {
    require!(
        after.checked_sub(before) == Some(amount),
        VaultError::AdapterFailure
    );
    Ok(())
}

/// Read the balance of an SPL token account without going through `Account`,
/// so the value reflects any CPI that ran earlier in the instruction
pub fn token_balance(account: &AccountInfo) -> Result<u64> {
    let data = account.try_borrow_data()?;
    let token = TokenAccount::try_deserialize(&mut &data[..])?;
    Ok(token.amount)
}

/// Yield protocol reached through CPI into an adapter program.
///
/// Account order passed to the adapter for both `supply` and `withdraw`:
/// 0. adapter state (w)
/// 1. adapter asset reserve (w)
/// 2. receipt mint (w)
/// 3. vault asset account (w)
/// 4. vault receipt account (w)
/// 5. vault authority (signer)
/// 6. token program
pub struct CpiYieldProtocol<'a, 'info> {
    pub program: AccountInfo<'info>,
    pub state: AccountInfo<'info>,
    pub reserve: AccountInfo<'info>,
    pub receipt_mint: AccountInfo<'info>,
    pub vault_asset_account: AccountInfo<'info>,
    pub vault_receipt_account: AccountInfo<'info>,
    pub vault_authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

impl<'a, 'info> CpiYieldProtocol<'a, 'info> {
    fn invoke(&self, discriminator: [u8; 8], amount: u64) -> Result<()> {
        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new(self.state.key(), false),
                AccountMeta::new(self.reserve.key(), false),
                AccountMeta::new(self.receipt_mint.key(), false),
                AccountMeta::new(self.vault_asset_account.key(), false),
                AccountMeta::new(self.vault_receipt_account.key(), false),
                AccountMeta::new_readonly(self.vault_authority.key(), true),
                AccountMeta::new_readonly(self.token_program.key(), false),
            ],
            data: adapter_instruction_data(discriminator, amount),
        };

        invoke_signed(
            &ix,
            &[
                self.state.clone(),
                self.reserve.clone(),
                self.receipt_mint.clone(),
                self.vault_asset_account.clone(),
                self.vault_receipt_account.clone(),
                self.vault_authority.clone(),
                self.token_program.clone(),
                self.program.clone(),
            ],
            self.signer_seeds,
        )
        .map_err(|_| error!(VaultError::AdapterFailure))
    }
}

impl<'a, 'info> YieldProtocol for CpiYieldProtocol<'a, 'info> {
    fn key(&self) -> Pubkey {
        self.program.key()
    }

    fn supply(&mut self, amount: u64) -> Result<()> {
        let before = self.receipt_balance()?;
        self.invoke(SUPPLY_DISCRIMINATOR, amount)?;
        let after = self.receipt_balance()?;

        // Receipt must be credited 1:1
        require_exact_credit(before, after, amount)
    }

    fn withdraw(&mut self, amount: u64) -> Result<()> {
        let before = token_balance(&self.vault_asset_account)?;
        self.invoke(WITHDRAW_DISCRIMINATOR, amount)?;
        let after = token_balance(&self.vault_asset_account)?;

        require_exact_credit(before, after, amount)
    }

    fn receipt_balance(&self) -> Result<u64> {
        token_balance(&self.vault_receipt_account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_data_layout() {
        let data = adapter_instruction_data(SUPPLY_DISCRIMINATOR, 500_000_000);

        assert_eq!(data.len(), 16);
        assert_eq!(&data[..8], &SUPPLY_DISCRIMINATOR);
        assert_eq!(&data[8..], &500_000_000u64.to_le_bytes());
    }

    #[test]
    fn test_discriminators_differ() {
        assert_ne!(SUPPLY_DISCRIMINATOR, WITHDRAW_DISCRIMINATOR);
    }

    #[test]
    fn test_exact_credit_accepted() {
        require_exact_credit(1_000, 1_500, 500).unwrap();
        require_exact_credit(0, 0, 0).unwrap();
    }

    #[test]
    fn test_short_or_excess_credit_rejected() {
        // Adapter kept a cut
        let err = require_exact_credit(1_000, 1_499, 500).unwrap_err();
        assert_eq!(err, VaultError::AdapterFailure.into());

        // Adapter credited more than supplied
        let err = require_exact_credit(1_000, 1_501, 500).unwrap_err();
        assert_eq!(err, VaultError::AdapterFailure.into());

        // Balance went down
        let err = require_exact_credit(1_000, 900, 500).unwrap_err();
        assert_eq!(err, VaultError::AdapterFailure.into());
    }

    #[test]
    fn test_only_canonical_receipt_account_accepted() {
        let vault_authority = Pubkey::new_unique();
        let receipt_mint = Pubkey::new_unique();
        let canonical = receipt_account_address(&vault_authority, &receipt_mint);

        require_receipt_account(&canonical, &vault_authority, &receipt_mint).unwrap();

        // Another token account owned by the vault authority, same mint
        let err = require_receipt_account(&Pubkey::new_unique(), &vault_authority, &receipt_mint)
            .unwrap_err();
        assert_eq!(err, VaultError::InvalidReceiptAccount.into());

        // Canonical account of a different receipt mint
        let other = receipt_account_address(&vault_authority, &Pubkey::new_unique());
        let err = require_receipt_account(&other, &vault_authority, &receipt_mint).unwrap_err();
        assert_eq!(err, VaultError::InvalidReceiptAccount.into());
    }
}
