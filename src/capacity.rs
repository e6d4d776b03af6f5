//! Capacity rounding and the load-factor gate.
//!
//! Slot arrays are always an exact power of two long so home indexes can be
//! computed with a mask instead of a modulo.

use crate::error::Error;
use crate::error::InvalidArgument;

/// Smallest slot array a table will ever use.
pub const MIN_CAPACITY: usize = 2;

/// Expansion happens once `(len + 1) / capacity` reaches
/// `LOAD_FACTOR_NUMERATOR / LOAD_FACTOR_DENOMINATOR`.
const LOAD_FACTOR_NUMERATOR: u128 = 85;
const LOAD_FACTOR_DENOMINATOR: u128 = 100;

/// Rounds `min_capacity` up to the least power of two that is at least
/// `max(min_capacity, 2)`.
///
/// # Errors
///
/// - [`InvalidArgument::ZeroCapacity`] if `min_capacity` is zero.
/// - [`Error::TypeOverflow`] if no power of two fits in `usize`.
///
/// # Examples
///
/// ```rust
/// use probe_hash::capacity::round_up_pow2;
///
/// assert_eq!(round_up_pow2(1), Ok(2));
/// assert_eq!(round_up_pow2(3), Ok(4));
/// assert_eq!(round_up_pow2(1000), Ok(1024));
/// assert!(round_up_pow2(0).is_err());
/// assert!(round_up_pow2(usize::MAX).is_err());
/// ```
pub fn round_up_pow2(min_capacity: usize) -> Result<usize, Error> {
    if min_capacity == 0 {
        return Err(InvalidArgument::ZeroCapacity.into());
    }

    min_capacity
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .ok_or(Error::TypeOverflow {
            requested: min_capacity,
        })
}

/// Returns `true` if inserting one more entry into a table holding `len` live
/// entries would reach the load-factor threshold.
#[inline(always)]
pub(crate) fn expansion_due(len: usize, capacity: usize) -> bool {
    (len as u128 + 1) * LOAD_FACTOR_DENOMINATOR >= capacity as u128 * LOAD_FACTOR_NUMERATOR
}

/// Doubles `capacity`, or `None` if the result does not fit in `usize`.
#[inline(always)]
pub(crate) fn doubled(capacity: usize) -> Option<usize> {
    capacity.checked_mul(2)
}
