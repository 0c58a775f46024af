use thiserror::Error;

/// Errors that can occur while operating the round-robin window. Marked as non-exhaustive to
/// allow for future additions without breaking the API. Apart from `StorageError` all of them
/// are static: they describe a configuration or a record type that can never work.
#[derive(Error, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// Slots need to be at least one byte wide
    #[error("invalid slot size")]
    InvalidSlotSize,

    /// `max_addr` has to be at or above `min_addr` and the distance between both has to be a
    /// multiple of the slot size
    #[error("invalid window")]
    InvalidWindow,

    /// A window of a single slot would erase every record right after writing it
    #[error("window too small")]
    WindowTooSmall,

    /// The last slot of the window ends beyond the capacity of the storage device
    #[error("window exceeds storage capacity")]
    WindowExceedsCapacity,

    /// The serialized record does not fill exactly one slot
    #[error("record size mismatch: expected {expected} bytes, got {actual}")]
    RecordSizeMismatch { expected: usize, actual: usize },

    /// The internal error value is returned from the provided `impl embedded_storage::Storage`
    #[error("internal storage error")]
    StorageError,
}
