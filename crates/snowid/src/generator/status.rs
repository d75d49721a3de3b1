use crate::SnowflakeId;

/// Represents the result of a non-blocking attempt to generate an ID.
///
/// This type models the outcome of [`IdGenerator::poll_id`]:
///
/// - [`IdGenStatus::Ready`] indicates a new ID was successfully generated.
/// - [`IdGenStatus::Pending`] means the current millisecond's sequence is
///   exhausted and no ID can be minted until the clock reaches `yield_until`.
///
/// This allows callers to back off (sleep, yield, or reschedule) instead of
/// spinning inside the generator's lock the way [`IdGenerator::next_id`] does.
///
/// [`IdGenerator::poll_id`]: crate::IdGenerator::poll_id
/// [`IdGenerator::next_id`]: crate::IdGenerator::next_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID could be generated because the sequence has been exhausted for
    /// the current millisecond.
    Pending {
        /// The earliest timestamp (inclusive, relative to the clock's epoch)
        /// at which generation can resume.
        yield_until: u64,
    },
}
