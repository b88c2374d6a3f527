//! Fixed-point amounts and offer prices.
//!
//! Amounts travel as signed 64-bit stroop counts; one unit is 10^7
//! stroops, so a decimal amount may carry at most seven fractional digits.

use std::fmt;
use std::str::FromStr;

use crate::codec::{Decoder, Encoder, XdrCodec};
use crate::TransactionError;

/// Stroops in one unit of an asset.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Number of fractional digits an amount may carry.
pub const AMOUNT_DECIMALS: usize = 7;

/// Parse a non-negative decimal amount (e.g. `"10.5"`) into stroops.
///
/// # Returns
/// `InvalidAmount` for negative numbers, more than seven fractional
/// digits, malformed input or values that overflow `i64`.
pub fn parse_amount(s: &str) -> Result<i64, TransactionError> {
    let invalid = |why: &str| TransactionError::InvalidAmount(format!("{:?}: {}", s, why));

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected a non-negative decimal number"));
    }
    if s.contains('.') && frac.is_empty() {
        return Err(invalid("missing fractional digits"));
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected a non-negative decimal number"));
    }
    if frac.len() > AMOUNT_DECIMALS {
        return Err(invalid("more than 7 fractional digits"));
    }

    let whole: i64 = whole.parse().map_err(|_| invalid("overflow"))?;
    let mut frac_stroops: i64 = 0;
    for (i, b) in frac.bytes().enumerate() {
        frac_stroops += (b - b'0') as i64 * 10i64.pow((AMOUNT_DECIMALS - 1 - i) as u32);
    }

    whole
        .checked_mul(STROOPS_PER_UNIT)
        .and_then(|v| v.checked_add(frac_stroops))
        .ok_or_else(|| invalid("overflow"))
}

/// Format stroops as a decimal with exactly seven fractional digits.
pub fn format_amount(stroops: i64) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    let abs = stroops.unsigned_abs();
    let unit = STROOPS_PER_UNIT as u64;
    format!("{}{}.{:07}", sign, abs / unit, abs % unit)
}

/// Check that an amount field is non-negative.
pub(crate) fn check_non_negative(field: &str, stroops: i64) -> Result<(), TransactionError> {
    if stroops < 0 {
        return Err(TransactionError::InvalidAmount(format!(
            "{} must not be negative, got {}",
            field, stroops
        )));
    }
    Ok(())
}

/// An offer price as the fraction `n / d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Price {
    /// Numerator.
    pub n: i32,
    /// Denominator.
    pub d: i32,
}

impl Price {
    /// Create a price from a positive numerator and denominator.
    pub fn new(n: i32, d: i32) -> Result<Self, TransactionError> {
        if n <= 0 || d <= 0 {
            return Err(TransactionError::InvalidPrice(format!(
                "{}/{} must have a positive numerator and denominator",
                n, d
            )));
        }
        Ok(Price { n, d })
    }

    /// Create the exact reduced fraction for a decimal string such as `"1.25"`.
    pub fn from_decimal(s: &str) -> Result<Self, TransactionError> {
        let invalid = |why: &str| TransactionError::InvalidPrice(format!("{:?}: {}", s, why));
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
            || frac.len() > 18
        {
            return Err(invalid("expected a positive decimal number"));
        }

        let digits = format!("{}{}", whole, frac);
        let mut n: u128 = digits.parse().map_err(|_| invalid("overflow"))?;
        let mut d: u128 = 10u128.pow(frac.len() as u32);
        let g = gcd(n, d);
        if g > 1 {
            n /= g;
            d /= g;
        }
        let n = i32::try_from(n).map_err(|_| invalid("numerator does not fit in 32 bits"))?;
        let d = i32::try_from(d).map_err(|_| invalid("denominator does not fit in 32 bits"))?;
        Self::new(n, d)
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl FromStr for Price {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

impl XdrCodec for Price {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_i32(self.n);
        enc.write_i32(self.d);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        let n = dec.read_i32()?;
        let d = dec.read_i32()?;
        Ok(Price { n, d })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0").unwrap(), 0);
        assert_eq!(parse_amount("10").unwrap(), 100_000_000);
        assert_eq!(parse_amount("10.5").unwrap(), 105_000_000);
        assert_eq!(parse_amount("0.0000001").unwrap(), 1);
        assert_eq!(parse_amount("922337203685.4775807").unwrap(), i64::MAX);
    }

    #[test]
    fn test_parse_amount_rejects() {
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("1.00000001").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount(".5").is_err());
        assert!(parse_amount("5.").is_err());
        assert!(parse_amount("1e5").is_err());
        assert!(parse_amount("922337203685.4775808").is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(105_000_000), "10.5000000");
        assert_eq!(format_amount(1), "0.0000001");
        assert_eq!(format_amount(-1), "-0.0000001");
    }

    #[test]
    fn test_price_from_decimal() {
        assert_eq!(Price::from_decimal("1.25").unwrap(), Price { n: 5, d: 4 });
        assert_eq!(Price::from_decimal("3").unwrap(), Price { n: 3, d: 1 });
        assert_eq!(Price::from_decimal("0.1").unwrap(), Price { n: 1, d: 10 });
        assert!(Price::from_decimal("0").is_err());
        assert!(Price::from_decimal("abc").is_err());
        assert!(Price::from_decimal("99999999999").is_err());
    }
}
