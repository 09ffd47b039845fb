//! Fixed-point decimal arithmetic.
//!
//! Every node has to arrive at bit-identical prices, so no floating point is involved anywhere in
//! fee computation. A [`Dec`] is an unsigned integer scaled by `10^18`, which gives the same
//! 18-digit canonical string form that gas prices are quoted in, for example
//! `"0.062500000000000000"`.

use {
    alloy::primitives::U256,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
    thiserror::Error,
};

const PRECISION: usize = 18;
const ONE_RAW: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// An unsigned decimal number with 18 fractional digits.
///
/// Multiplication and division truncate towards zero. Operations that can overflow or divide by
/// zero come in `checked_*` and `saturating_*` flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dec(U256);

impl Dec {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const ONE: Self = Self(ONE_RAW);
    pub const PRECISION: usize = PRECISION;

    /// Wraps an integer already scaled by `10^18`.
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// The underlying integer scaled by `10^18`.
    pub const fn raw(self) -> U256 {
        self.0
    }

    pub fn from_u64(value: u64) -> Self {
        // u64::MAX * 10^18 is far below U256::MAX.
        Self(U256::from(value) * ONE_RAW)
    }

    /// Creates `numerator / denominator`, truncated to 18 fractional digits.
    ///
    /// Returns [`None`] when `denominator` is zero.
    pub fn from_ratio(numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }

        Some(Self(U256::from(numerator) * ONE_RAW / U256::from(denominator)))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        self.0
            .checked_mul(rhs.0)
            .map(|product| Self(product / ONE_RAW))
    }

    pub fn saturating_mul(self, rhs: Self) -> Self {
        self.checked_mul(rhs).unwrap_or(Self(U256::MAX))
    }

    pub fn checked_quo(self, rhs: Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }

        self.0
            .checked_mul(ONE_RAW)
            .map(|numerator| Self(numerator / rhs.0))
    }

    /// Calculates `self * numerator / denominator` with a single truncation at the end.
    ///
    /// Because the scale factors cancel out, `x.checked_mul_div(y, y)` is exactly `x` for any
    /// non-zero `y`. Interpolation relies on this to land on its breakpoints without rounding
    /// error.
    pub fn checked_mul_div(self, numerator: Self, denominator: Self) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }

        self.0
            .checked_mul(numerator.0)
            .map(|product| Self(product / denominator.0))
    }

    pub fn saturating_mul_u64(self, rhs: u64) -> Self {
        Self(self.0.saturating_mul(U256::from(rhs)))
    }

    /// The integer part, rounded towards zero.
    pub fn floor(self) -> U256 {
        self.0 / ONE_RAW
    }

    /// The integer part, rounded away from zero if there is any fractional part.
    pub fn ceil(self) -> U256 {
        let floor = self.floor();

        if (self.0 % ONE_RAW).is_zero() {
            floor
        } else {
            floor + U256::from(1)
        }
    }
}

impl Display for Dec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let integer = self.0 / ONE_RAW;
        let fraction = (self.0 % ONE_RAW).to_string();

        write!(f, "{integer}.{fraction:0>width$}", width = PRECISION)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDecError {
    #[error("Decimal string is empty")]
    Empty,
    #[error("Decimal string contains a character other than digits and a single dot")]
    InvalidDigit,
    #[error("Decimal has more than 18 fractional digits")]
    TooPrecise,
    #[error("Decimal is too large")]
    Overflow,
}

impl FromStr for Dec {
    type Err = ParseDecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (integer, fraction) = s.split_once('.').unwrap_or((s, ""));

        if integer.is_empty() && fraction.is_empty() {
            return Err(ParseDecError::Empty);
        }

        if !integer
            .bytes()
            .chain(fraction.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(ParseDecError::InvalidDigit);
        }

        if fraction.len() > PRECISION {
            return Err(ParseDecError::TooPrecise);
        }

        let digits = format!("{integer}{fraction:0<width$}", width = PRECISION);

        U256::from_str_radix(&digits, 10)
            .map(Self)
            .map_err(|_| ParseDecError::Overflow)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    fn dec(s: &str) -> Dec {
        s.parse().unwrap()
    }

    #[test_case("10", "10.000000000000000000"; "integer")]
    #[test_case("0.0625", "0.062500000000000000"; "fraction")]
    #[test_case("1000.5", "1000.500000000000000000"; "mixed")]
    #[test_case(".5", "0.500000000000000000"; "no integer part")]
    #[test_case("7.", "7.000000000000000000"; "trailing dot")]
    #[test_case("0.000000000000000001", "0.000000000000000001"; "smallest unit")]
    fn test_canonical_string_has_eighteen_fractional_digits(input: &str, expected: &str) {
        let actual = dec(input).to_string();

        assert_eq!(actual, expected);
    }

    #[test_case("", ParseDecError::Empty; "empty")]
    #[test_case(".", ParseDecError::Empty; "only dot")]
    #[test_case("-1", ParseDecError::InvalidDigit; "negative")]
    #[test_case("1.2.3", ParseDecError::InvalidDigit; "two dots")]
    #[test_case("0.0000000000000000001", ParseDecError::TooPrecise; "nineteen digits")]
    fn test_malformed_string_is_rejected(input: &str, expected: ParseDecError) {
        let actual = input.parse::<Dec>().unwrap_err();

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_huge_number_overflows() {
        let input = "9".repeat(80);

        let actual = input.parse::<Dec>().unwrap_err();

        assert_eq!(actual, ParseDecError::Overflow);
    }

    #[test]
    fn test_multiplication_truncates_towards_zero() {
        let actual = dec("0.000000000000000001").checked_mul(dec("0.5")).unwrap();

        assert_eq!(actual, Dec::ZERO);
    }

    #[test]
    fn test_quotient_of_equal_values_is_one() {
        let value = dec("0.333333333333333333");

        let actual = value.checked_quo(value).unwrap();

        assert_eq!(actual, Dec::ONE);
    }

    #[test]
    fn test_division_by_zero_is_none() {
        assert_eq!(Dec::ONE.checked_quo(Dec::ZERO), None);
        assert_eq!(Dec::ONE.checked_mul_div(Dec::ONE, Dec::ZERO), None);
        assert_eq!(Dec::from_ratio(1, 0), None);
    }

    #[test]
    fn test_mul_div_by_same_value_is_identity() {
        let value = dec("937.5");
        let ratio = dec("0.7");

        let actual = value.checked_mul_div(ratio, ratio).unwrap();

        assert_eq!(actual, value);
    }

    #[test]
    fn test_ratio_matches_parsed_decimal() {
        let actual = Dec::from_ratio(25_000_000, 50_000_000).unwrap();

        assert_eq!(actual, dec("0.5"));
    }

    #[test_case("10", 10, 10; "whole")]
    #[test_case("10.1", 10, 11; "fractional")]
    #[test_case("0.000000000000000001", 0, 1; "tiny")]
    fn test_floor_and_ceil(input: &str, floor: u64, ceil: u64) {
        let value = dec(input);

        assert_eq!(value.floor(), U256::from(floor));
        assert_eq!(value.ceil(), U256::from(ceil));
    }

    #[test]
    fn test_subtraction_below_zero_is_none() {
        assert_eq!(Dec::ZERO.checked_sub(Dec::ONE), None);
        assert_eq!(Dec::ZERO.saturating_sub(Dec::ONE), Dec::ZERO);
    }

    #[test]
    fn test_json_representation_is_canonical_string() {
        let value = dec("0.0625");

        let json = serde_json::to_string(&value).unwrap();
        let actual: Dec = serde_json::from_str(&json).unwrap();

        assert_eq!(json, "\"0.062500000000000000\"");
        assert_eq!(actual, value);
    }
}
