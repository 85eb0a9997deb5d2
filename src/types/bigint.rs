// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use num::bigint::BigInt as NumInt;
use num::cast::ToPrimitive;
use num::traits::{Num, One, Signed, Zero};
use num::Integer;
use std::cmp::Ord;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Arbitrary-precision signed integer.
///
/// This is a facade over the bignum engine; the rational layer never
/// touches the backing implementation directly, so swapping it out
/// means editing this one file.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct BigInt {
    inner: NumInt,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BigIntError {
    ParseError,
}

impl fmt::Display for BigIntError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BigIntError::ParseError => write!(fmt, "invalid integer literal"),
        }
    }
}

impl std::error::Error for BigIntError {}

impl BigInt {
    pub fn one() -> BigInt {
        BigInt {
            inner: NumInt::one(),
        }
    }

    pub fn zero() -> BigInt {
        BigInt {
            inner: NumInt::zero(),
        }
    }

    pub fn from_str_radix(input: &str, base: u32) -> Result<Self, BigIntError> {
        NumInt::from_str_radix(input, base)
            .map(|inner| BigInt { inner })
            .map_err(|_err| BigIntError::ParseError)
    }

    pub fn pow(&self, exponent: u32) -> BigInt {
        BigInt {
            inner: self.inner.pow(exponent),
        }
    }

    pub fn abs(&self) -> BigInt {
        BigInt {
            inner: self.inner.abs(),
        }
    }

    /// Greatest common divisor of the two magnitudes. Always
    /// non-negative.
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        BigInt {
            inner: self.inner.gcd(&other.inner),
        }
    }

    /// Division rounding toward negative infinity, unlike the `/`
    /// operator which truncates toward zero.
    pub fn div_floor(&self, other: &BigInt) -> BigInt {
        BigInt {
            inner: self.inner.div_floor(&other.inner),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.inner.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }

    pub fn is_even(&self) -> bool {
        self.inner.is_even()
    }

    pub fn as_int(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn as_int32(&self) -> Option<i32> {
        self.inner.to_i32()
    }

    /// Nearest double, losing precision past 53 bits of mantissa and
    /// saturating to an infinity past the exponent range.
    pub fn as_float(&self) -> f64 {
        match self.inner.to_f64() {
            Some(value) => value,
            None if self.inner.is_negative() => f64::NEG_INFINITY,
            None => f64::INFINITY,
        }
    }

    pub fn to_str_radix(&self, base: u32) -> String {
        self.inner.to_str_radix(base)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(fmt)
    }
}

impl From<u64> for BigInt {
    fn from(value: u64) -> BigInt {
        BigInt {
            inner: NumInt::from(value),
        }
    }
}

impl From<i64> for BigInt {
    fn from(value: i64) -> BigInt {
        BigInt {
            inner: NumInt::from(value),
        }
    }
}

impl<'a> Add for &'a BigInt {
    type Output = BigInt;

    fn add(self, rhs: &'a BigInt) -> BigInt {
        BigInt {
            inner: &self.inner + &rhs.inner,
        }
    }
}

impl<'a> Sub for &'a BigInt {
    type Output = BigInt;

    fn sub(self, rhs: &'a BigInt) -> BigInt {
        BigInt {
            inner: &self.inner - &rhs.inner,
        }
    }
}

impl<'a> Mul for &'a BigInt {
    type Output = BigInt;

    fn mul(self, rhs: &'a BigInt) -> BigInt {
        BigInt {
            inner: &self.inner * &rhs.inner,
        }
    }
}

impl<'a> Div for &'a BigInt {
    type Output = BigInt;

    fn div(self, rhs: &'a BigInt) -> BigInt {
        BigInt {
            inner: &self.inner / &rhs.inner,
        }
    }
}

impl<'a> Neg for &'a BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        BigInt {
            inner: -&self.inner,
        }
    }
}
