use crate::{Error, Result, time::saturating_millis};
use core::fmt;
use core::time::Duration;

/// A 64-bit Snowflake identifier.
///
/// The raw value is always non-negative: the sign bit sits above the 41-bit
/// timestamp and is never set. Ordering follows the raw integer, which means
/// IDs sort by timestamp first, then datacenter, worker, and sequence.
///
/// Use [`Layout::decode`] (or [`IdGenerator::decode`]) to split an ID back into
/// its fields; the ID itself does not know which layout produced it.
///
/// [`Layout::decode`]: crate::Layout::decode
/// [`IdGenerator::decode`]: crate::IdGenerator::decode
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
pub struct SnowflakeId(i64);

impl SnowflakeId {
    /// Wraps a raw value that is known to be non-negative.
    pub(crate) const fn from_raw_unchecked(raw: i64) -> Self {
        debug_assert!(raw >= 0);
        Self(raw)
    }

    /// Returns the raw integer.
    pub const fn to_raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.0
    }
}

impl TryFrom<i64> for SnowflakeId {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        if raw < 0 {
            return Err(Error::NegativeId(raw));
        }
        Ok(Self(raw))
    }
}

/// The fields of a decoded [`SnowflakeId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdParts {
    /// Milliseconds since the epoch of the clock that minted the ID.
    pub timestamp: u64,
    /// Datacenter field; always `0` when the layout has no datacenter bits.
    pub datacenter_id: u64,
    /// Worker field; always `0` when the layout has no worker bits.
    pub worker_id: u64,
    /// Position of the ID within its millisecond.
    pub sequence: u64,
}

impl IdParts {
    /// Absolute time of the ID in milliseconds since 1970-01-01 UTC, given
    /// the epoch its generator was configured with.
    ///
    /// Returns `None` if the sum does not fit in a `u64`, which can only
    /// happen for epochs beyond [`MAX_EPOCH_MILLIS`](crate::MAX_EPOCH_MILLIS).
    pub const fn unix_millis(&self, epoch: Duration) -> Option<u64> {
        saturating_millis(epoch).checked_add(self.timestamp)
    }
}
