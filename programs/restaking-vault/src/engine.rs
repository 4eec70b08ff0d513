//! Share accounting and protocol migration, independent of account plumbing.
//!
//! Every operation runs checks first, then talks to the yield protocol, and
//! only then writes the ledger, so a protocol failure never leaves a
//! half-updated `VaultState` or `DepositorAccount` behind.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;

use crate::{
    adapter::YieldProtocol,
    errors::VaultError,
    state::{DepositorAccount, VaultState},
};

/// Result of a successful deposit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositOutcome {
    pub shares: u64,
    pub total_assets: u64,
}

/// Result of a successful withdrawal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub shares: u64,
    /// Performance fee routed to the treasury
    pub fee: u64,
    /// Assets sent to the receiver, `amount - fee`
    pub payout: u64,
    pub total_assets: u64,
}

/// Result of moving the pooled position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestakeOutcome {
    pub old_protocol: Pubkey,
    pub new_protocol: Pubkey,
    pub amount: u64,
}

/// Caller's asset balance must cover the deposit
pub fn require_funds(balance: u64, amount: u64) -> Result<()> {
    require!(balance >= amount, VaultError::InsufficientAllowanceOrBalance);
    Ok(())
}

/// Only the owner, or the delegate set on the owner's share account, may withdraw
pub fn authorize_withdraw(
    caller: &Pubkey,
    owner: &Pubkey,
    share_delegate: COption<Pubkey>,
) -> Result<()> {
    let delegated = share_delegate == COption::Some(*caller);
    require!(caller == owner || delegated, VaultError::Unauthorized);
    Ok(())
}

/// Supply `amount` to the active protocol and credit `receiver` with shares
///
/// The asset transfer into the vault happens before this is called.
pub fn deposit<P: YieldProtocol>(
    vault: &mut VaultState,
    receiver: &mut DepositorAccount,
    protocol: &mut P,
    amount: u64,
) -> Result<DepositOutcome> {
    require!(amount > 0, VaultError::ZeroDepositAmount);
    require_keys_eq!(
        protocol.key(),
        vault.current_protocol,
        VaultError::InvalidProtocol
    );

    let total_assets_before = protocol.receipt_balance()?;
    let preview = vault.shares_for_deposit(amount, total_assets_before)?;
    require!(preview > 0, VaultError::DepositTooSmall);
    let total_assets = total_assets_before
        .checked_add(amount)
        .ok_or(VaultError::MathOverflow)?;

    protocol.supply(amount)?;

    let shares = receiver.mint(vault, amount, total_assets_before)?;

    Ok(DepositOutcome {
        shares,
        total_assets,
    })
}

/// Redeem `amount` of assets from `owner`'s claim
///
/// Shares burned round up and the performance fee applies to the part of
/// `amount` above the cost basis released by the burn.
pub fn withdraw<P: YieldProtocol>(
    vault: &mut VaultState,
    owner: &mut DepositorAccount,
    protocol: &mut P,
    amount: u64,
) -> Result<WithdrawOutcome> {
    require!(amount > 0, VaultError::ZeroWithdrawAmount);
    require_keys_eq!(
        protocol.key(),
        vault.current_protocol,
        VaultError::InvalidProtocol
    );

    let total_assets = protocol.receipt_balance()?;
    let claimable = vault.assets_for_shares(owner.shares, total_assets)?;
    require!(amount <= claimable, VaultError::InsufficientBalance);

    let shares = vault.shares_for_withdraw(amount, total_assets)?;
    require!(shares <= owner.shares, VaultError::InsufficientShares);

    protocol.withdraw(amount)?;

    let released = owner.burn(vault, shares)?;
    let fee = vault.performance_fee(amount.saturating_sub(released))?;
    let payout = amount
        .checked_sub(fee)
        .ok_or(VaultError::MathOverflow)?;

    Ok(WithdrawOutcome {
        shares,
        fee,
        payout,
        total_assets: total_assets - amount,
    })
}

/// Move the entire pooled position from `current` to `next`
///
/// Shares and cost bases are untouched; only `current_protocol` changes.
pub fn restake<C: YieldProtocol, N: YieldProtocol>(
    vault: &mut VaultState,
    caller: &Pubkey,
    current: &mut C,
    next: &mut N,
) -> Result<RestakeOutcome> {
    require_keys_eq!(*caller, vault.treasury, VaultError::Unauthorized);
    require_keys_neq!(next.key(), vault.current_protocol, VaultError::SameProtocol);
    require_keys_eq!(
        current.key(),
        vault.current_protocol,
        VaultError::InvalidProtocol
    );

    let amount = current.receipt_balance()?;
    let next_before = next.receipt_balance()?;

    if amount > 0 {
        current.withdraw(amount)?;
        next.supply(amount)?;
    }

    let expected = next_before
        .checked_add(amount)
        .ok_or(VaultError::MathOverflow)?;
    require!(
        next.receipt_balance()? == expected,
        VaultError::AdapterFailure
    );

    let old_protocol = vault.current_protocol;
    vault.current_protocol = next.key();

    Ok(RestakeOutcome {
        old_protocol,
        new_protocol: vault.current_protocol,
        amount,
    })
}
