// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use super::BigInt;

/// Errors from constructing or operating on a [`BigRat`].
///
/// These all indicate a violated caller contract rather than a bad
/// external input; parsing has its own error type.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BigRatError {
    /// A fraction was constructed with a zero denominator.
    ZeroDenominator,
    /// Division by a zero fraction, or reciprocal of zero.
    DivisionByZero,
    /// Zero raised to a negative exponent.
    ZeroToNegativeExponent,
    /// NaN or an infinity where a finite double was required.
    NotFinite,
}

impl fmt::Display for BigRatError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BigRatError::ZeroDenominator => write!(fmt, "denominator cannot be zero"),
            BigRatError::DivisionByZero => write!(fmt, "division by zero"),
            BigRatError::ZeroToNegativeExponent => {
                write!(fmt, "zero raised to a negative exponent")
            }
            BigRatError::NotFinite => write!(fmt, "value is NaN or infinite"),
        }
    }
}

impl std::error::Error for BigRatError {}

/// Errors from parsing the `"num"` / `"num/den"` text form.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParseBigRatError {
    /// Numerator or denominator was not a base-10 integer.
    InvalidInt,
    /// The denominator parsed to zero.
    ZeroDenominator,
}

impl fmt::Display for ParseBigRatError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParseBigRatError::InvalidInt => write!(fmt, "invalid integer in fraction literal"),
            ParseBigRatError::ZeroDenominator => write!(fmt, "fraction denominator is zero"),
        }
    }
}

impl std::error::Error for ParseBigRatError {}

/// Arbitrary-precision rational number.
///
/// Every observable value is in lowest terms with a strictly positive
/// denominator; any sign lives in the numerator. Values are immutable
/// once constructed, so an `Arc<BigRat>` can be shared across threads
/// without further locking.
#[derive(Clone, Debug)]
pub struct BigRat {
    numer: BigInt,
    denom: BigInt,
}

impl BigRat {
    pub fn zero() -> BigRat {
        BigRat {
            numer: BigInt::zero(),
            denom: BigInt::one(),
        }
    }

    pub fn one() -> BigRat {
        BigRat {
            numer: BigInt::one(),
            denom: BigInt::one(),
        }
    }

    pub fn neg_one() -> BigRat {
        BigRat {
            numer: -&BigInt::one(),
            denom: BigInt::one(),
        }
    }

    /// Builds `numer/denom`, sign-normalized and reduced.
    pub fn new(numer: BigInt, denom: BigInt) -> Result<BigRat, BigRatError> {
        if denom.is_zero() {
            return Err(BigRatError::ZeroDenominator);
        }
        Ok(BigRat::normalized(numer, denom))
    }

    /// Borrowing variant of [`BigRat::new`].
    pub fn ratio(numer: &BigInt, denom: &BigInt) -> Result<BigRat, BigRatError> {
        BigRat::new(numer.clone(), denom.clone())
    }

    pub fn small_ratio(numer: i64, denom: i64) -> Result<BigRat, BigRatError> {
        BigRat::new(BigInt::from(numer), BigInt::from(denom))
    }

    /// Approximates a finite double by the continued fraction
    /// expansion, stopping before the denominator exceeds
    /// `max_denominator` (unbounded when `max_denominator <= 0`).
    ///
    /// This is an approximation, not an exact reconstruction:
    /// round-tripping an arbitrary double is only guaranteed to land
    /// within the stopping tolerance and the denominator bound.
    pub fn from_f64(value: f64, max_denominator: i64) -> Result<BigRat, BigRatError> {
        if !value.is_finite() {
            return Err(BigRatError::NotFinite);
        }
        let bound = if max_denominator <= 0 {
            i64::max_value()
        } else {
            max_denominator
        };

        let negative = value < 0.0;
        let value = value.abs();

        // Convergents h/k of the continued fraction, seeded
        // h[-2]=0, h[-1]=1, k[-2]=1, k[-1]=0.
        let (mut h0, mut h1) = (0i64, 1i64);
        let (mut k0, mut k1) = (1i64, 0i64);
        let mut x = value;

        while k1 <= bound {
            let a = x.floor();
            let term = a as i64;
            let h2 = match term.checked_mul(h1).and_then(|h| h.checked_add(h0)) {
                Some(h) => h,
                None => break,
            };
            let k2 = match term.checked_mul(k1).and_then(|k| k.checked_add(k0)) {
                Some(k) => k,
                None => break,
            };
            if k2 > bound {
                break;
            }
            h0 = h1;
            h1 = h2;
            k0 = k1;
            k1 = k2;
            if (value - h1 as f64 / k1 as f64).abs() < 1e-15 {
                break;
            }
            x = 1.0 / (x - a);
            if x > 1e15 {
                break;
            }
        }

        BigRat::small_ratio(if negative { -h1 } else { h1 }, k1)
    }

    // Every construction funnels through here: move the sign into the
    // numerator, then divide out the GCD. The divisor divides both
    // parts exactly, so truncating division is safe.
    fn normalized(numer: BigInt, denom: BigInt) -> BigRat {
        debug_assert!(!denom.is_zero(), "fraction with zero denominator");
        let (mut numer, mut denom) = if denom.is_negative() {
            (-&numer, -&denom)
        } else {
            (numer, denom)
        };
        let gcd = numer.gcd(&denom);
        if !gcd.is_one() {
            numer = &numer / &gcd;
            denom = &denom / &gcd;
        }
        BigRat { numer, denom }
    }

    /// Independent copy of the numerator.
    pub fn numer(&self) -> BigInt {
        self.numer.clone()
    }

    /// Independent copy of the denominator. Always positive.
    pub fn denom(&self) -> BigInt {
        self.denom.clone()
    }

    pub fn abs(&self) -> BigRat {
        BigRat::normalized(self.numer.abs(), self.denom.clone())
    }

    pub fn recip(&self) -> Result<BigRat, BigRatError> {
        if self.is_zero() {
            return Err(BigRatError::DivisionByZero);
        }
        Ok(BigRat::normalized(self.denom.clone(), self.numer.clone()))
    }

    pub fn checked_div(&self, rhs: &BigRat) -> Result<BigRat, BigRatError> {
        if rhs.is_zero() {
            return Err(BigRatError::DivisionByZero);
        }
        Ok(BigRat::normalized(
            &self.numer * &rhs.denom,
            &self.denom * &rhs.numer,
        ))
    }

    /// Integer power by squaring. A negative exponent inverts the base
    /// first; `exponent == 0` gives 1 for every base, including zero.
    pub fn pow(&self, exponent: i64) -> Result<BigRat, BigRatError> {
        if exponent == 0 {
            return Ok(BigRat::one());
        }
        if self.is_zero() {
            if exponent < 0 {
                return Err(BigRatError::ZeroToNegativeExponent);
            }
            return Ok(BigRat::zero());
        }
        let mut base = if exponent < 0 {
            self.recip()?
        } else {
            self.clone()
        };
        let mut exponent = exponent.unsigned_abs();
        let mut result = BigRat::one();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = &result * &base;
            }
            exponent >>= 1;
            if exponent > 0 {
                base = &base * &base;
            }
        }
        Ok(result)
    }

    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.numer == self.denom
    }

    pub fn is_negative(&self) -> bool {
        self.numer.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        !self.numer.is_negative() && !self.numer.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Greatest integer not above the value.
    pub fn floor(&self) -> BigRat {
        if self.is_integer() {
            return self.clone();
        }
        BigRat::from(self.numer.div_floor(&self.denom))
    }

    /// Smallest integer not below the value.
    pub fn ceil(&self) -> BigRat {
        if self.is_integer() {
            return self.clone();
        }
        let below = self.numer.div_floor(&self.denom);
        BigRat::from(&below + &BigInt::one())
    }

    /// Integer part, truncated toward zero. Floor division rounds
    /// toward negative infinity, so inexact negatives get corrected by
    /// one.
    pub fn whole_part(&self) -> BigInt {
        let quotient = self.numer.div_floor(&self.denom);
        if self.is_negative() && !self.is_integer() {
            &quotient + &BigInt::one()
        } else {
            quotient
        }
    }

    pub fn trunc(&self) -> BigRat {
        BigRat::from(self.whole_part())
    }

    /// Fractional part, sign-preserving: `fract(-7/3)` is `-1/3`.
    pub fn fract(&self) -> BigRat {
        if self.is_integer() {
            return BigRat::zero();
        }
        self - &self.trunc()
    }

    /// Nearest integer, ties to even (banker's rounding).
    ///
    /// The tie test is exact value equality of the absolute fractional
    /// part against 1/2; everything off the tie adds a signed half and
    /// truncates toward zero.
    pub fn round(&self) -> BigRat {
        if self.is_integer() {
            return self.clone();
        }
        let half = BigRat::normalized(BigInt::one(), BigInt::from(2i64));
        if self.fract().abs() == half {
            // Parity of the full-precision whole part picks the even
            // neighbor.
            let whole = self.whole_part();
            let even = if whole.is_even() {
                whole
            } else if self.is_negative() {
                &whole - &BigInt::one()
            } else {
                &whole + &BigInt::one()
            };
            BigRat::from(even)
        } else {
            let signed_half = if self.is_negative() { -&half } else { half };
            (self + &signed_half).trunc()
        }
    }

    pub fn sign(&self) -> i32 {
        if self.is_zero() {
            0
        } else if self.is_negative() {
            -1
        } else {
            1
        }
    }

    pub fn min(&self, other: &BigRat) -> BigRat {
        if self < other {
            self.clone()
        } else {
            other.clone()
        }
    }

    pub fn max(&self, other: &BigRat) -> BigRat {
        if self > other {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Nearest double; large operands are subject to double rounding
    /// and overflow, so the result is not guaranteed exact.
    pub fn as_float(&self) -> f64 {
        self.numer.as_float() / self.denom.as_float()
    }

    /// `Some` only for integer values whose numerator fits in an i64.
    pub fn as_int(&self) -> Option<i64> {
        if self.is_integer() {
            self.numer.as_int()
        } else {
            None
        }
    }

    pub fn fits_i32(&self) -> bool {
        self.is_integer() && self.numer.as_int32().is_some()
    }

    pub fn fits_i64(&self) -> bool {
        self.is_integer() && self.numer.as_int().is_some()
    }

    /// Whether the value survives a round trip through a double.
    ///
    /// Operational check: convert to a double, re-approximate with a
    /// denominator bound of 1,000,000, compare exactly. This can give
    /// false negatives for some exactly-representable large fractions.
    pub fn fits_f64(&self) -> bool {
        let approx = self.as_float();
        if !approx.is_finite() {
            return false;
        }
        match BigRat::from_f64(approx, 1_000_000) {
            Ok(roundtrip) => roundtrip == *self,
            Err(_err) => false,
        }
    }

    /// Stable content digest: a base-33 polynomial hash of the decimal
    /// text of each part, combined `h1 ^ (h2 << 1)`. Equal values hash
    /// equal because hashing runs on the reduced canonical form.
    pub fn hash_value(&self) -> u64 {
        fn djb2(text: &str) -> u64 {
            text.bytes()
                .fold(0u64, |hash, byte| hash.wrapping_mul(33).wrapping_add(u64::from(byte)))
        }
        let numer = djb2(&self.numer.to_str_radix(10));
        let denom = djb2(&self.denom.to_str_radix(10));
        numer ^ (denom << 1)
    }
}

impl From<BigInt> for BigRat {
    fn from(value: BigInt) -> BigRat {
        BigRat {
            numer: value,
            denom: BigInt::one(),
        }
    }
}

impl From<i64> for BigRat {
    fn from(value: i64) -> BigRat {
        BigRat::from(BigInt::from(value))
    }
}

impl fmt::Display for BigRat {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom.is_one() {
            write!(fmt, "{}", self.numer)
        } else {
            write!(fmt, "{}/{}", self.numer, self.denom)
        }
    }
}

impl FromStr for BigRat {
    type Err = ParseBigRatError;

    fn from_str(input: &str) -> Result<BigRat, ParseBigRatError> {
        match input.find('/') {
            None => {
                let numer = BigInt::from_str_radix(input, 10)
                    .map_err(|_err| ParseBigRatError::InvalidInt)?;
                Ok(BigRat::from(numer))
            }
            Some(slash) => {
                let numer = BigInt::from_str_radix(&input[..slash], 10)
                    .map_err(|_err| ParseBigRatError::InvalidInt)?;
                let denom = BigInt::from_str_radix(&input[slash + 1..], 10)
                    .map_err(|_err| ParseBigRatError::InvalidInt)?;
                if denom.is_zero() {
                    return Err(ParseBigRatError::ZeroDenominator);
                }
                Ok(BigRat::normalized(numer, denom))
            }
        }
    }
}

impl Ord for BigRat {
    fn cmp(&self, other: &BigRat) -> Ordering {
        // Cross-multiplication preserves order because both
        // denominators are positive; no reduction needed.
        (&self.numer * &other.denom).cmp(&(&other.numer * &self.denom))
    }
}

impl PartialOrd for BigRat {
    fn partial_cmp(&self, other: &BigRat) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BigRat {
    fn eq(&self, other: &BigRat) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigRat {}

impl Hash for BigRat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl Serialize for BigRat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BigRat {
    fn deserialize<D>(deserializer: D) -> Result<BigRat, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StrVisitor;

        impl<'de> Visitor<'de> for StrVisitor {
            type Value = BigRat;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(fmt, "a rational number like \"-3/4\"")
            }

            fn visit_str<E>(self, value: &str) -> Result<BigRat, E>
            where
                E: de::Error,
            {
                value.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(StrVisitor)
    }
}

impl<'a> Add for &'a BigRat {
    type Output = BigRat;

    fn add(self, rhs: &'a BigRat) -> BigRat {
        BigRat::normalized(
            &(&self.numer * &rhs.denom) + &(&rhs.numer * &self.denom),
            &self.denom * &rhs.denom,
        )
    }
}

impl<'a> Sub for &'a BigRat {
    type Output = BigRat;

    fn sub(self, rhs: &'a BigRat) -> BigRat {
        BigRat::normalized(
            &(&self.numer * &rhs.denom) - &(&rhs.numer * &self.denom),
            &self.denom * &rhs.denom,
        )
    }
}

impl<'a> Mul for &'a BigRat {
    type Output = BigRat;

    fn mul(self, rhs: &'a BigRat) -> BigRat {
        BigRat::normalized(&self.numer * &rhs.numer, &self.denom * &rhs.denom)
    }
}

impl<'a> Div for &'a BigRat {
    type Output = BigRat;

    /// Panics on a zero divisor; [`BigRat::checked_div`] is the
    /// recoverable form.
    fn div(self, rhs: &'a BigRat) -> BigRat {
        match self.checked_div(rhs) {
            Ok(quotient) => quotient,
            Err(_err) => panic!("division by zero"),
        }
    }
}

impl<'a> Neg for &'a BigRat {
    type Output = BigRat;

    fn neg(self) -> BigRat {
        BigRat::normalized(-&self.numer, self.denom.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{BigInt, BigRat, BigRatError, ParseBigRatError};

    fn rat(numer: i64, denom: i64) -> BigRat {
        BigRat::small_ratio(numer, denom).unwrap()
    }

    #[test]
    fn test_reduction() {
        let reduced = rat(6, 8);
        assert_eq!(reduced.numer(), BigInt::from(3i64));
        assert_eq!(reduced.denom(), BigInt::from(4i64));

        // scaling numerator and denominator by the same factor is
        // invisible after reduction
        assert_eq!(rat(3 * 7, 4 * 7).numer(), BigInt::from(3i64));
        assert_eq!(rat(0, 5).denom(), BigInt::one());
    }

    #[test]
    fn test_sign_normalization() {
        let a = rat(3, -4);
        let b = rat(-3, 4);
        assert_eq!(a.numer(), b.numer());
        assert_eq!(a.denom(), b.denom());
        assert!(a.is_negative());

        let c = rat(-3, -4);
        assert!(c.is_positive());
        assert_eq!(c.numer(), BigInt::from(3i64));
        assert_eq!(c.denom(), BigInt::from(4i64));
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(
            BigRat::small_ratio(1, 0).unwrap_err(),
            BigRatError::ZeroDenominator
        );
        assert_eq!(
            BigRat::zero().recip().unwrap_err(),
            BigRatError::DivisionByZero
        );
        assert_eq!(
            BigRat::one().checked_div(&BigRat::zero()).unwrap_err(),
            BigRatError::DivisionByZero
        );
        assert_eq!(
            BigRat::zero().pow(-2).unwrap_err(),
            BigRatError::ZeroToNegativeExponent
        );
    }

    #[test]
    fn test_round_ties_to_even() {
        assert_eq!(rat(5, 2).round(), BigRat::from(2));
        assert_eq!(rat(7, 2).round(), BigRat::from(4));
        assert_eq!(rat(-5, 2).round(), BigRat::from(-2));
        assert_eq!(rat(-7, 2).round(), BigRat::from(-4));
        assert_eq!(rat(1, 2).round(), BigRat::zero());
        assert_eq!(rat(-1, 2).round(), BigRat::zero());
    }

    #[test]
    fn test_round_off_tie() {
        assert_eq!(rat(7, 3).round(), BigRat::from(2));
        assert_eq!(rat(-7, 3).round(), BigRat::from(-2));
        assert_eq!(rat(5, 3).round(), BigRat::from(2));
        assert_eq!(rat(-5, 3).round(), BigRat::from(-2));
        assert_eq!(BigRat::from(4).round(), BigRat::from(4));
    }

    #[test]
    fn test_round_tie_beyond_machine_words() {
        // 10^30 is even; (2*10^30 + 1)/2 must round down to it, which
        // requires parity at full precision.
        let huge = BigInt::from(10u64).pow(30);
        let twice_plus_one = &(&huge + &huge) + &BigInt::one();
        let tie = BigRat::new(twice_plus_one, BigInt::from(2i64)).unwrap();
        assert_eq!(tie.round(), BigRat::from(huge));
    }

    #[test]
    fn test_floor_ceil_trunc_negative() {
        let f = rat(-7, 3);
        assert_eq!(f.floor(), BigRat::from(-3));
        assert_eq!(f.ceil(), BigRat::from(-2));
        assert_eq!(f.trunc(), BigRat::from(-2));
        assert_eq!(f.whole_part(), BigInt::from(-2i64));
        assert_eq!(f.fract(), rat(-1, 3));
    }

    #[test]
    fn test_fract_of_integer_is_zero() {
        assert!(BigRat::from(9).fract().is_zero());
        assert!(BigRat::from(-9).fract().is_zero());
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(BigRat::from_f64(0.5, 1000).unwrap(), rat(1, 2));
        assert_eq!(BigRat::from_f64(-0.5, 1000).unwrap(), rat(-1, 2));
        assert_eq!(BigRat::from_f64(1.0 / 3.0, 10).unwrap(), rat(1, 3));
        assert_eq!(BigRat::from_f64(42.0, 0).unwrap(), BigRat::from(42));

        assert_eq!(
            BigRat::from_f64(f64::NAN, 1000).unwrap_err(),
            BigRatError::NotFinite
        );
        assert_eq!(
            BigRat::from_f64(f64::INFINITY, 1000).unwrap_err(),
            BigRatError::NotFinite
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abc".parse::<BigRat>().unwrap_err(),
            ParseBigRatError::InvalidInt
        );
        assert_eq!(
            "".parse::<BigRat>().unwrap_err(),
            ParseBigRatError::InvalidInt
        );
        assert_eq!(
            "1/2/3".parse::<BigRat>().unwrap_err(),
            ParseBigRatError::InvalidInt
        );
        assert_eq!(
            "1/0".parse::<BigRat>().unwrap_err(),
            ParseBigRatError::ZeroDenominator
        );
    }

    #[test]
    fn test_parse_negative_denominator() {
        // never emitted, but accepted and sign-normalized
        let parsed: BigRat = "3/-4".parse().unwrap();
        assert_eq!(parsed, rat(-3, 4));
        assert_eq!(parsed.to_string(), "-3/4");
    }

    #[test]
    fn test_hash_of_equal_values() {
        assert_eq!(rat(3, 4).hash_value(), rat(6, 8).hash_value());
        assert_ne!(rat(3, 4).hash_value(), rat(1, 2).hash_value());
        assert_ne!(rat(1, 2).hash_value(), rat(-1, 2).hash_value());
    }

    #[test]
    fn test_predicates() {
        assert!(BigRat::zero().is_zero());
        assert!(BigRat::one().is_one());
        assert!(BigRat::neg_one().is_negative());
        assert!(!BigRat::neg_one().is_positive());
        assert!(rat(10, 2).is_integer());
        assert!(!rat(3, 2).is_integer());
        assert!(!BigRat::zero().is_positive());
        assert!(!BigRat::zero().is_negative());
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_div_operator_panics_on_zero() {
        let _ = &BigRat::one() / &BigRat::zero();
    }
}
