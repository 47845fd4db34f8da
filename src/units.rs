//! Conversion between human decimal amounts and 18-decimal fixed-point
//! token units (wei), plus display helpers.

use crate::errors::{AppError, Result};
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use ethers::types::U256;
use num_bigint::{BigInt, Sign};
use std::str::FromStr;

/// Decimals shared by ETH and VETH.
pub const DECIMALS: i64 = 18;

/// Integer digits in `U256::MAX`.
const MAX_INTEGER_DIGITS: i64 = 78;

/// One whole token in wei.
pub fn wad() -> U256 {
    U256::exp10(DECIMALS as usize)
}

/// Parse a human decimal amount (e.g. `"1.5"`, `"2e-3"`) into wei.
///
/// Digits beyond the 18th decimal are truncated. Empty, non-numeric and
/// negative input is rejected with `InvalidInput`, as is anything that does
/// not fit in 256 bits.
pub fn to_wei(amount: &str) -> Result<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid("amount is empty"));
    }
    let value = BigDecimal::from_str(trimmed)
        .map_err(|e| AppError::invalid(format!("{trimmed:?} is not a number: {e}")))?;
    if value < BigDecimal::zero() {
        return Err(AppError::invalid(format!("{trimmed:?} is negative")));
    }

    // Bound the magnitude before rescaling; `1e30000000` would otherwise
    // allocate every digit.
    let (mantissa, exponent) = value.as_bigint_and_exponent();
    if mantissa.is_zero() {
        return Ok(U256::zero());
    }
    let mantissa_digits = mantissa.magnitude().to_str_radix(10).len() as i64;
    let integer_digits = mantissa_digits.saturating_sub(exponent);
    if integer_digits > MAX_INTEGER_DIGITS {
        return Err(AppError::invalid(format!(
            "{trimmed:?} exceeds the 256-bit token range"
        )));
    }
    if integer_digits.saturating_add(DECIMALS) <= 0 {
        return Ok(U256::zero());
    }

    let (digits, _scale) = value.with_scale(DECIMALS).into_bigint_and_exponent();
    let (_sign, bytes) = digits.to_bytes_be();
    if bytes.len() > 32 {
        return Err(AppError::invalid(format!(
            "{trimmed:?} exceeds the 256-bit token range"
        )));
    }
    Ok(U256::from_big_endian(&bytes))
}

/// Exact decimal value of a wei amount.
pub fn from_wei(wei: U256) -> BigDecimal {
    let mut buf = [0u8; 32];
    wei.to_big_endian(&mut buf);
    BigDecimal::new(BigInt::from_bytes_be(Sign::Plus, &buf), DECIMALS)
}

/// Lossy float view of a wei amount, used for rate arithmetic only.
pub fn wei_to_f64(wei: U256) -> f64 {
    from_wei(wei).to_f64().unwrap_or(0.0)
}

/// Plain decimal string for a wei amount, trailing zeros trimmed.
pub fn format_wei(wei: U256) -> String {
    let one = wad();
    let whole = wei / one;
    let frac = wei % one;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>18}", frac.to_string());
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Eight significant digits with thousands separators, e.g. `1,234,567.9`.
pub fn prettify(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let rendered = if magnitude >= 7 {
        let step = 10f64.powi(magnitude - 7);
        format!("{:.0}", (value / step).round() * step)
    } else {
        let decimals = (7 - magnitude) as usize;
        format!("{:.*}", decimals, value)
    };

    let rendered = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        rendered
    };

    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(to_wei("1").unwrap(), wad());
        assert_eq!(
            to_wei("1.5").unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(to_wei("0.000000000000000001").unwrap(), U256::one());
        assert_eq!(to_wei(" 2e-3 ").unwrap(), U256::from(2_000_000_000_000_000u128));
        assert_eq!(to_wei("0").unwrap(), U256::zero());
    }

    #[test]
    fn truncates_below_one_wei() {
        assert_eq!(to_wei("0.0000000000000000019").unwrap(), U256::one());
        assert_eq!(to_wei("0.0000000000000000009").unwrap(), U256::zero());
    }

    #[test]
    fn rejects_bad_input() {
        for raw in ["", "   ", "abc", "1.2.3", "-1", "-0.5", "NaN", "inf"] {
            assert!(
                matches!(to_wei(raw), Err(AppError::InvalidInput(_))),
                "{raw:?} should be rejected"
            );
        }
        assert!(matches!(to_wei("1e80"), Err(AppError::InvalidInput(_))));
        // 78 integer digits passes the digit bound but not the byte check
        assert!(matches!(to_wei("2e77"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn extreme_exponents_are_bounded() {
        assert!(matches!(to_wei("1e30000000"), Err(AppError::InvalidInput(_))));
        assert_eq!(to_wei("1e-30000000").unwrap(), U256::zero());
        assert_eq!(to_wei("123e-21").unwrap(), U256::zero());
        assert_eq!(to_wei("1e-18").unwrap(), U256::one());
        assert_eq!(to_wei("0e-30000000").unwrap(), U256::zero());
        assert_eq!(to_wei("1e59").unwrap(), U256::exp10(77));
    }

    #[test]
    fn round_trips_decimal_amounts() {
        for raw in [
            "0",
            "1",
            "0.1",
            "123.456",
            "0.000000000000000001",
            "98765432109876543210.123456789012345678",
        ] {
            let wei = to_wei(raw).unwrap();
            assert_eq!(from_wei(wei), BigDecimal::from_str(raw).unwrap(), "{raw}");
            assert_eq!(format_wei(wei), raw, "{raw}");
        }
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_wei(to_wei("2.500").unwrap()), "2.5");
        assert_eq!(format_wei(to_wei("10").unwrap()), "10");
    }

    #[test]
    fn wei_to_f64_matches_decimal() {
        assert!((wei_to_f64(to_wei("0.25").unwrap()) - 0.25).abs() < 1e-15);
        assert_eq!(wei_to_f64(U256::zero()), 0.0);
    }

    #[test]
    fn prettify_groups_and_trims() {
        assert_eq!(prettify(1234567.891), "1,234,567.9");
        assert_eq!(prettify(1234.5), "1,234.5");
        assert_eq!(prettify(100.0), "100");
        assert_eq!(prettify(0.000123456789), "0.00012345679");
        assert_eq!(prettify(-2500.25), "-2,500.25");
        assert_eq!(prettify(123456789.0), "123,456,790");
        assert_eq!(prettify(f64::NAN), "0");
    }
}
