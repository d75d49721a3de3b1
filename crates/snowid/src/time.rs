use core::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Default epoch: Monday, March 3, 2025 00:00:00 UTC
///
/// Every timestamp field is measured from this instant. It must never change
/// for the lifetime of a deployment: IDs minted against different epochs do
/// not sort against each other.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_740_960_000_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MILLIS: Duration = Duration::from_millis(0);

/// Whole milliseconds in `d`, saturating at `u64::MAX` (~584 million years)
/// instead of truncating the high bits.
pub(crate) const fn saturating_millis(d: Duration) -> u64 {
    let millis = d.as_millis();
    if millis > u64::MAX as u128 {
        u64::MAX
    } else {
        millis as u64
    }
}

/// A source of millisecond timestamps relative to a fixed epoch.
///
/// This abstraction lets the generator run against the real wall clock or a
/// mocked time source in tests. The epoch is a property of the time source,
/// so two generators with different clocks can use different epochs.
///
/// # Example
///
/// ```
/// use snowid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// Wall-clock time source offset from a fixed epoch.
///
/// Each call reads `SystemTime::now()`, so readings follow any adjustment made
/// to the system clock, including backward steps. The generator tolerates
/// those by continuing to mint within the last observed millisecond.
///
/// Readings taken before the epoch saturate to `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch_millis: u64,
}

impl Default for SystemClock {
    /// Constructs a wall clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a wall clock using `epoch` as the origin (t = 0), given as
    /// a [`Duration`] since 1970-01-01 UTC. Epochs beyond `u64::MAX`
    /// milliseconds saturate.
    ///
    /// # Example
    ///
    /// ```
    /// use snowid::{SystemClock, TimeSource, TWITTER_EPOCH};
    ///
    /// let clock = SystemClock::with_epoch(TWITTER_EPOCH);
    /// assert!(clock.current_millis() > 0);
    /// ```
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: saturating_millis(epoch),
        }
    }

    /// Constructs a wall clock from an epoch in milliseconds since 1970-01-01
    /// UTC.
    pub const fn with_epoch_millis(epoch_millis: u64) -> Self {
        Self { epoch_millis }
    }

    /// The configured epoch in milliseconds since 1970-01-01 UTC.
    pub const fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A system clock set before 1970 reads as the Unix epoch itself.
        let unix_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, saturating_millis);
        unix_millis.saturating_sub(self.epoch_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_epoch_is_march_third_2025() {
        // 2025-01-01 plus January (31) and February (28) plus two days.
        let jan_first = 1_735_689_600_000;
        assert_eq!(DEFAULT_EPOCH.as_millis(), jan_first + 61 * 86_400_000);
    }

    #[test]
    fn oversized_epoch_saturates() {
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
        assert_eq!(SystemClock::with_epoch(Duration::MAX).epoch_millis(), u64::MAX);
        assert_eq!(saturating_millis(Duration::from_millis(u64::MAX)), u64::MAX);
        assert_eq!(saturating_millis(DEFAULT_EPOCH), 1_740_960_000_000);
    }

    #[test]
    fn clock_before_epoch_saturates_to_zero() {
        let far_future = SystemClock::with_epoch(Duration::from_millis(u64::MAX));
        assert_eq!(far_future.current_millis(), 0);
    }

    #[test]
    fn clock_tracks_wall_time_from_epoch() {
        let unix = SystemClock::with_epoch(UNIX_EPOCH_MILLIS);
        let custom = SystemClock::default();

        let a = custom.current_millis();
        let b = unix.current_millis();
        let c = custom.current_millis();

        let epoch = DEFAULT_EPOCH.as_millis() as u64;
        assert!(a + epoch <= b);
        assert!(b <= c + epoch);
    }
}
