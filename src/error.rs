use thiserror::Error as ThisError;

/// Arguments rejected before a table is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum InvalidArgument {
    /// A table was requested with a minimum capacity of zero.
    #[error("minimum capacity must be non-zero")]
    ZeroCapacity,
    /// A zero-length key was offered for insertion.
    #[error("key must not be empty")]
    EmptyKey,
}

/// Errors returned by fallible table and set operations.
///
/// Every error is local to the call that produced it. The structure the call
/// was made on is left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// The call was rejected because of its arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    /// Backing storage for the slot array could not be obtained.
    #[error("failed to allocate storage for {slots} slots")]
    AllocationFailure {
        /// Number of slots that were requested.
        slots: usize,
    },
    /// The table cannot grow further and inserting would leave no empty slot.
    #[error("table is saturated at capacity {capacity}")]
    CapacityExhausted {
        /// Capacity of the table at the time of the refusal.
        capacity: usize,
    },
    /// No power of two representable in `usize` can hold the request.
    #[error("capacity {requested} cannot be rounded to a representable power of two")]
    TypeOverflow {
        /// The minimum capacity that was requested.
        requested: usize,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn invalid_argument_converts_into_error() {
        let err: Error = InvalidArgument::EmptyKey.into();
        assert_eq!(err, Error::InvalidArgument(InvalidArgument::EmptyKey));
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::InvalidArgument(InvalidArgument::ZeroCapacity).to_string(),
            "invalid argument: minimum capacity must be non-zero"
        );
        assert_eq!(
            Error::CapacityExhausted { capacity: 8 }.to_string(),
            "table is saturated at capacity 8"
        );
        assert_eq!(
            Error::AllocationFailure { slots: 16 }.to_string(),
            "failed to allocate storage for 16 slots"
        );
    }
}
