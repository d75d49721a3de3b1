/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `snowid` can emit.
///
/// Configuration errors ([`Error::is_configuration`]) are only ever returned
/// while building a [`Layout`] or validating a [`GeneratorConfig`]; a
/// constructed generator never produces them.
/// [`Error::ClockExhausted`] is terminal: once the elapsed time since the
/// epoch no longer fits the timestamp field, every subsequent call fails the
/// same way.
///
/// [`Layout`]: crate::Layout
/// [`GeneratorConfig`]: crate::GeneratorConfig
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The datacenter and worker fields leave no room for a sequence.
    #[error(
        "datacenter bits ({datacenter_bits}) + worker bits ({worker_bits}) must be less than {limit}",
        limit = crate::NODE_AND_SEQUENCE_BITS
    )]
    SequenceBitsExhausted {
        /// Requested datacenter field width.
        datacenter_bits: u8,
        /// Requested worker field width.
        worker_bits: u8,
    },

    /// The worker ID does not fit in its allotted bits.
    #[error("worker id {worker_id} does not fit in {worker_bits} bits")]
    WorkerIdOutOfRange {
        /// Requested worker ID.
        worker_id: u64,
        /// Worker field width.
        worker_bits: u8,
    },

    /// The datacenter ID does not fit in its allotted bits.
    #[error("datacenter id {datacenter_id} does not fit in {datacenter_bits} bits")]
    DatacenterIdOutOfRange {
        /// Requested datacenter ID.
        datacenter_id: u64,
        /// Datacenter field width.
        datacenter_bits: u8,
    },

    /// The epoch is so late that timestamps measured from it overflow Unix
    /// milliseconds.
    #[error(
        "epoch {epoch_millis}ms is beyond the latest supported epoch {max}ms",
        max = crate::MAX_EPOCH_MILLIS
    )]
    EpochOutOfRange {
        /// Requested epoch in milliseconds since 1970-01-01 UTC.
        epoch_millis: u64,
    },

    /// Milliseconds elapsed since the epoch no longer fit in the 41-bit
    /// timestamp field. The generator has outlived its usable lifetime.
    #[error(
        "{elapsed}ms since epoch exceeds the {width}-bit timestamp field",
        width = crate::TIMESTAMP_BITS
    )]
    ClockExhausted {
        /// Milliseconds since the epoch observed by the clock.
        elapsed: u64,
    },

    /// A raw value is negative and therefore not a valid ID.
    #[error("{0} is not a valid id: ids are non-negative")]
    NegativeId(i64),

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns `true` for errors raised while validating a layout or epoch.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::SequenceBitsExhausted { .. }
                | Self::WorkerIdOutOfRange { .. }
                | Self::DatacenterIdOutOfRange { .. }
                | Self::EpochOutOfRange { .. }
        )
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
