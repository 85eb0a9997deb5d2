// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exact arbitrary-precision rational arithmetic.
//!
//! [`BigRat`] is a fraction of two arbitrary-precision integers, kept
//! in lowest terms with a strictly positive denominator. There is no
//! rounding error anywhere: the four operations, comparison, and the
//! floor/ceil/trunc/round family are all exact, which makes the type
//! suitable for interpreters, computer algebra, and money.
//!
//! The bignum engine sits behind the opaque [`BigInt`] facade, so the
//! rational layer is independent of any particular backing
//! implementation.
//!
//! Values are immutable once constructed. `Clone` produces an
//! independent value; wrap a value in `std::sync::Arc` to share one
//! allocation across threads — no locking is needed beyond the
//! reference count.
//!
//! ## Example
//!
//! ```rust
//! use bigrat::BigRat;
//!
//! let a = BigRat::small_ratio(1, 2)?;
//! let b = BigRat::small_ratio(1, 3)?;
//! let sum = &a + &b;
//! assert_eq!(sum.to_string(), "5/6");
//!
//! let parsed: BigRat = "6/8".parse().unwrap();
//! assert_eq!(parsed.to_string(), "3/4");
//! # Ok::<(), bigrat::BigRatError>(())
//! ```

pub mod types;

pub use crate::types::{BigInt, BigIntError, BigRat, BigRatError, ParseBigRatError};
