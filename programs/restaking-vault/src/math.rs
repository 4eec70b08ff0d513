use anchor_lang::prelude::*;

use crate::{constants::BASIS_POINTS_100_PERCENT, errors::VaultError};

/// Rounding direction for share/asset conversions.
///
/// Every conversion picks the direction that favors the vault:
///
/// | Operation          | Convert          | Rounding |
/// |--------------------|------------------|----------|
/// | Deposit            | assets -> shares | Down     |
/// | Withdraw           | assets -> shares | Up       |
/// | Valuation          | shares -> assets | Down     |
/// | Performance fee    | profit -> fee    | Up       |
/// | Cost basis release | basis -> basis   | Up       |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// `amount * numerator / denominator` with a u128 intermediate
pub fn mul_div(amount: u64, numerator: u64, denominator: u64, rounding: Rounding) -> Result<u64> {
    require!(denominator != 0, VaultError::DivisionByZero);

    let product = (amount as u128)
        .checked_mul(numerator as u128)
        .ok_or(error!(VaultError::MathOverflow))?;
    let denominator = denominator as u128;

    let mut quotient = product / denominator;
    if rounding == Rounding::Up && product % denominator != 0 {
        quotient += 1;
    }

    u64::try_from(quotient).map_err(|_| error!(VaultError::MathOverflow))
}

/// Apply basis points to an amount
pub fn apply_bp(amount: u64, bp: u16, rounding: Rounding) -> Result<u64> {
    mul_div(amount, bp as u64, BASIS_POINTS_100_PERCENT as u64, rounding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_exact() {
        assert_eq!(mul_div(500, 1000, 2000, Rounding::Down).unwrap(), 250);
        assert_eq!(mul_div(500, 1000, 2000, Rounding::Up).unwrap(), 250);
    }

    #[test]
    fn test_mul_div_rounding_direction() {
        // 100 * 333 / 1000 = 33.3
        assert_eq!(mul_div(100, 333, 1000, Rounding::Down).unwrap(), 33);
        assert_eq!(mul_div(100, 333, 1000, Rounding::Up).unwrap(), 34);
    }

    #[test]
    fn test_mul_div_large_values() {
        // Intermediate product exceeds u64 but the quotient fits
        let result = mul_div(u64::MAX, u64::MAX / 2, u64::MAX / 2, Rounding::Down).unwrap();
        assert_eq!(result, u64::MAX);
    }

    #[test]
    fn test_mul_div_overflowing_quotient() {
        assert!(mul_div(u64::MAX, 2, 1, Rounding::Down).is_err());
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        let err = mul_div(1, 1, 0, Rounding::Down).unwrap_err();
        assert_eq!(err, VaultError::DivisionByZero.into());
    }

    #[test]
    fn test_apply_bp() {
        // 5% of 50 USDC (6 decimals) is 2.5 USDC
        assert_eq!(apply_bp(50_000_000, 500, Rounding::Up).unwrap(), 2_500_000);
        // 5% of 1 unit rounds up to 1 in favor of the treasury
        assert_eq!(apply_bp(1, 500, Rounding::Up).unwrap(), 1);
        assert_eq!(apply_bp(1, 500, Rounding::Down).unwrap(), 0);
    }
}
