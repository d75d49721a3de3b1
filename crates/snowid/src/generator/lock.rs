use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, IdParts, Layout, MAX_TIMESTAMP, Result, SnowflakeId, SystemClock, TimeSource,
    generator::{IdGenStatus, Mutex, MutexGuard},
};

/// Mutable generator state. Only ever touched through the lock.
#[derive(Debug, Default)]
struct State {
    last_timestamp: u64,
    sequence: u64,
}

impl State {
    /// Moves to `now` if the clock has advanced past the last minted
    /// millisecond. Readings at or behind it leave the state untouched, so
    /// minting continues within `last_timestamp`.
    fn observe(&mut self, now: u64) {
        #[cfg(feature = "tracing")]
        if now < self.last_timestamp {
            tracing::trace!(
                now,
                last_timestamp = self.last_timestamp,
                "clock behind last timestamp"
            );
        }
        if now > self.last_timestamp {
            self.last_timestamp = now;
            self.sequence = 0;
        }
    }

    fn is_exhausted(&self, layout: &Layout) -> bool {
        self.sequence > layout.max_sequence()
    }

    fn mint(&mut self, layout: &Layout) -> SnowflakeId {
        let id = layout.compose(self.last_timestamp, self.sequence);
        self.sequence += 1;
        id
    }
}

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The generator keeps its last timestamp and sequence counter behind a single
/// mutex held for the whole of [`next_id`]. Clones share that state, so a
/// clone handed to another thread is the *same* generator, not a second node.
///
/// Uniqueness across generators relies entirely on each one being built with
/// a distinct `(datacenter_id, worker_id)` pair in the same [`Layout`] and
/// the same epoch.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ IDs from one instance strictly increase while the clock does not move
///   backward
/// - ⚠️ Under sustained overload, callers block for the remainder of the
///   millisecond
///
/// # Example
/// ```
/// use snowid::IdGenerator;
///
/// let generator = IdGenerator::cluster_with_datacenter(3, 5, 7, 5)?;
/// let id = generator.next_id()?;
///
/// let parts = generator.decode(id);
/// assert_eq!(parts.datacenter_id, 3);
/// assert_eq!(parts.worker_id, 7);
/// assert_eq!(parts.sequence, 0);
/// # Ok::<(), snowid::Error>(())
/// ```
///
/// [`next_id`]: IdGenerator::next_id
#[derive(Debug)]
pub struct IdGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<State>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<State>>,
    layout: Layout,
    time: T,
}

impl IdGenerator<SystemClock> {
    /// Creates a single-node generator on the wall clock and
    /// [`DEFAULT_EPOCH`](crate::DEFAULT_EPOCH).
    ///
    /// All 22 low bits are sequence bits, allowing 4,194,304 IDs per
    /// millisecond. Use only when exactly one generator mints IDs.
    pub fn single() -> Self {
        Self::new(Layout::single(), SystemClock::default())
    }

    /// Creates a worker-only cluster generator on the wall clock and
    /// [`DEFAULT_EPOCH`](crate::DEFAULT_EPOCH).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the layout is invalid; see
    /// [`Layout::cluster`].
    pub fn cluster(worker_id: u64, worker_bits: u8) -> Result<Self> {
        Ok(Self::new(
            Layout::cluster(worker_id, worker_bits)?,
            SystemClock::default(),
        ))
    }

    /// Creates a datacenter and worker cluster generator on the wall clock
    /// and [`DEFAULT_EPOCH`](crate::DEFAULT_EPOCH).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the layout is invalid; see
    /// [`Layout::cluster_with_datacenter`].
    pub fn cluster_with_datacenter(
        datacenter_id: u64,
        datacenter_bits: u8,
        worker_id: u64,
        worker_bits: u8,
    ) -> Result<Self> {
        Ok(Self::new(
            Layout::cluster_with_datacenter(datacenter_id, datacenter_bits, worker_id, worker_bits)?,
            SystemClock::default(),
        ))
    }
}

impl<T> IdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `layout` that reads time from `time`.
    ///
    /// The epoch is whatever `time` measures from. The initial timestamp and
    /// sequence are zero, so the first ID minted after the clock passes the
    /// epoch carries sequence `0`.
    ///
    /// # Example
    /// ```
    /// use snowid::{IdGenerator, Layout, SystemClock, TWITTER_EPOCH};
    ///
    /// let generator = IdGenerator::new(Layout::cluster(12, 10)?, SystemClock::with_epoch(TWITTER_EPOCH));
    /// assert_eq!(generator.decode(generator.next_id()?).worker_id, 12);
    /// # Ok::<(), snowid::Error>(())
    /// ```
    pub fn new(layout: Layout, time: T) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(State::default()))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(State::default())),
            layout,
            time,
        }
    }

    /// The bit allocation and node identifiers of this generator.
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Splits an ID minted by this generator (or any generator sharing its
    /// layout) into its fields.
    pub const fn decode(&self, id: SnowflakeId) -> IdParts {
        self.layout.decode(id)
    }

    /// Generates the next ID, blocking until one is available.
    ///
    /// When the current millisecond's sequence is exhausted, this spins
    /// *while holding the lock* until the clock advances, so no other caller
    /// can mint in the meantime. Use [`IdGenerator::poll_id`] to back off
    /// outside the lock instead.
    ///
    /// # Errors
    /// - [`Error::ClockExhausted`] if the time since the epoch no longer fits
    ///   41 bits
    /// - `Error::LockPoisoned` if another thread panicked while holding the
    ///   lock (std mutex only)
    ///
    /// # Example
    /// ```
    /// use snowid::IdGenerator;
    ///
    /// let generator = IdGenerator::single();
    /// let a = generator.next_id()?;
    /// let b = generator.next_id()?;
    /// assert!(b > a);
    /// # Ok::<(), snowid::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.lock()?;
        state.observe(self.now()?);

        if state.is_exhausted(&self.layout) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                timestamp = state.last_timestamp,
                "sequence exhausted, waiting for next millisecond"
            );
            while state.is_exhausted(&self.layout) {
                core::hint::spin_loop();
                state.observe(self.now()?);
            }
        }

        Ok(state.mint(&self.layout))
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// Returns [`IdGenStatus::Pending`] instead of spinning when the current
    /// millisecond's sequence is exhausted. The caller decides how to wait.
    ///
    /// # Errors
    /// Same as [`IdGenerator::next_id`].
    ///
    /// # Example
    /// ```
    /// use snowid::{IdGenStatus, IdGenerator};
    ///
    /// let generator = IdGenerator::single();
    /// let id = loop {
    ///     match generator.poll_id()? {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// assert_eq!(generator.decode(id).sequence, 0);
    /// # Ok::<(), snowid::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let mut state = self.lock()?;
        state.observe(self.now()?);

        if state.is_exhausted(&self.layout) {
            return Ok(IdGenStatus::Pending {
                yield_until: state.last_timestamp + 1,
            });
        }
        Ok(IdGenStatus::Ready {
            id: state.mint(&self.layout),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    fn now(&self) -> Result<u64> {
        let now = self.time.current_millis();
        if now > MAX_TIMESTAMP {
            return Err(Self::cold_clock_exhausted(now));
        }
        Ok(now)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_exhausted(elapsed: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(elapsed, "clock exceeds the timestamp field");
        Error::ClockExhausted { elapsed }
    }
}

impl<T> Clone for IdGenerator<T>
where
    T: TimeSource + Clone,
{
    /// Returns a handle to the same generator state.
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            layout: self.layout,
            time: self.time.clone(),
        }
    }
}
