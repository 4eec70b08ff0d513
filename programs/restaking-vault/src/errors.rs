use anchor_lang::prelude::*;

/// Custom error codes for the Restaking Vault program
///
/// Every error aborts the whole instruction; nothing is retried on-chain.
#[error_code]
pub enum VaultError {
    #[msg("Deposit amount must be greater than zero")]
    ZeroDepositAmount,

    #[msg("Withdraw amount must be greater than zero")]
    ZeroWithdrawAmount,

    #[msg("Deposit too small to mint any shares")]
    DepositTooSmall,

    #[msg("Caller balance is too low for the requested deposit")]
    InsufficientAllowanceOrBalance,

    #[msg("Owner does not hold enough shares")]
    InsufficientShares,

    #[msg("Withdraw amount exceeds the owner's claimable balance")]
    InsufficientBalance,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Cannot divide by zero - vault has no assets backing its shares")]
    DivisionByZero,

    #[msg("Invalid token mint - does not match vault asset")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Unauthorized - only the treasury or the share owner can perform this action")]
    Unauthorized,

    #[msg("Protocol accounts do not match the vault's current protocol")]
    InvalidProtocol,

    #[msg("Restake target is already the current protocol")]
    SameProtocol,

    #[msg("Yield protocol rejected or misreported the operation")]
    AdapterFailure,

    #[msg("Protocol not approved - target not in whitelist or disabled")]
    ProtocolNotApproved,

    #[msg("Protocol already exists in registry")]
    ProtocolAlreadyExists,

    #[msg("Protocol not found in registry")]
    ProtocolNotFound,

    #[msg("Protocol registry is full - maximum protocols reached")]
    RegistryFull,

    #[msg("Protocol name too long - maximum 32 characters")]
    NameTooLong,

    #[msg("Fee rate exceeds the maximum allowed")]
    InvalidFeeRate,

    #[msg("Receipt account is not the vault authority's associated account for the receipt mint")]
    InvalidReceiptAccount,
}
