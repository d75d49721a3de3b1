use crate::{Error, IdParts, Result, SnowflakeId};

/// Width of the timestamp field.
pub const TIMESTAMP_BITS: u8 = 41;

/// Bits below the timestamp, shared by the datacenter, worker, and sequence
/// fields.
pub const NODE_AND_SEQUENCE_BITS: u8 = 22;

/// Largest representable timestamp (`2^41 - 1` milliseconds, ~69 years).
pub const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Latest epoch, in milliseconds since 1970-01-01 UTC, at which every
/// timestamp still maps to a representable Unix time.
pub const MAX_EPOCH_MILLIS: u64 = u64::MAX - MAX_TIMESTAMP;

/// A validated bit allocation together with the node identifiers it encodes.
///
/// Bit layout, most to least significant:
///
/// ```text
///  Bit Index:  63     62            22              ...                0
///              +------+-------------+------------+---------+-----------+
///  Field:      | zero | timestamp   | datacenter | worker  | sequence  |
///              +------+-------------+------------+---------+-----------+
///  Width:        1        41          dc_bits      w_bits    22-dc-w
/// ```
///
/// Both node fields are zero-width in single-node mode. The sequence field
/// always keeps at least one bit.
///
/// # Example
///
/// ```
/// use snowid::Layout;
///
/// let layout = Layout::cluster_with_datacenter(3, 5, 7, 5)?;
/// assert_eq!(layout.sequence_bits(), 12);
/// assert_eq!(layout.max_sequence(), 4095);
///
/// let parts = layout.decode(layout.compose(1_000, 9));
/// assert_eq!((parts.timestamp, parts.datacenter_id, parts.worker_id, parts.sequence), (1_000, 3, 7, 9));
/// # Ok::<(), snowid::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    datacenter_id: u64,
    datacenter_bits: u8,
    worker_id: u64,
    worker_bits: u8,
    sequence_bits: u8,
}

impl Layout {
    /// Single-node layout: all 22 low bits are sequence bits.
    ///
    /// Only safe when exactly one generator mints IDs in the shared ID space.
    pub const fn single() -> Self {
        Self {
            datacenter_id: 0,
            datacenter_bits: 0,
            worker_id: 0,
            worker_bits: 0,
            sequence_bits: NODE_AND_SEQUENCE_BITS,
        }
    }

    /// Worker-only cluster layout with `22 - worker_bits` sequence bits.
    ///
    /// # Errors
    ///
    /// - [`Error::SequenceBitsExhausted`] if `worker_bits >= 22`
    /// - [`Error::WorkerIdOutOfRange`] if `worker_id >= 2^worker_bits`
    pub const fn cluster(worker_id: u64, worker_bits: u8) -> Result<Self> {
        Self::cluster_with_datacenter(0, 0, worker_id, worker_bits)
    }

    /// Datacenter and worker cluster layout with
    /// `22 - datacenter_bits - worker_bits` sequence bits.
    ///
    /// # Errors
    ///
    /// - [`Error::SequenceBitsExhausted`] if `datacenter_bits + worker_bits >=
    ///   22`
    /// - [`Error::WorkerIdOutOfRange`] if `worker_id >= 2^worker_bits`
    /// - [`Error::DatacenterIdOutOfRange`] if `datacenter_id >=
    ///   2^datacenter_bits`
    pub const fn cluster_with_datacenter(
        datacenter_id: u64,
        datacenter_bits: u8,
        worker_id: u64,
        worker_bits: u8,
    ) -> Result<Self> {
        // Widen before adding so two large widths cannot wrap below the limit.
        let node_bits = datacenter_bits as u16 + worker_bits as u16;
        if node_bits >= NODE_AND_SEQUENCE_BITS as u16 {
            return Err(Error::SequenceBitsExhausted {
                datacenter_bits,
                worker_bits,
            });
        }
        if worker_id > field_max(worker_bits) {
            return Err(Error::WorkerIdOutOfRange {
                worker_id,
                worker_bits,
            });
        }
        if datacenter_id > field_max(datacenter_bits) {
            return Err(Error::DatacenterIdOutOfRange {
                datacenter_id,
                datacenter_bits,
            });
        }
        Ok(Self {
            datacenter_id,
            datacenter_bits,
            worker_id,
            worker_bits,
            sequence_bits: NODE_AND_SEQUENCE_BITS - node_bits as u8,
        })
    }

    /// Datacenter ID encoded into every ID.
    pub const fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }

    /// Width of the datacenter field.
    pub const fn datacenter_bits(&self) -> u8 {
        self.datacenter_bits
    }

    /// Largest datacenter ID this layout can hold.
    pub const fn max_datacenter_id(&self) -> u64 {
        field_max(self.datacenter_bits)
    }

    /// Worker ID encoded into every ID.
    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// Width of the worker field.
    pub const fn worker_bits(&self) -> u8 {
        self.worker_bits
    }

    /// Largest worker ID this layout can hold.
    pub const fn max_worker_id(&self) -> u64 {
        field_max(self.worker_bits)
    }

    /// Width of the sequence field.
    pub const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    /// Largest sequence value, i.e. IDs per millisecond minus one.
    pub const fn max_sequence(&self) -> u64 {
        field_max(self.sequence_bits)
    }

    const fn worker_shift(&self) -> u8 {
        self.sequence_bits
    }

    const fn datacenter_shift(&self) -> u8 {
        self.sequence_bits + self.worker_bits
    }

    /// Packs `timestamp` and `sequence` with this layout's node identifiers.
    ///
    /// Callers must keep `timestamp <= MAX_TIMESTAMP` and `sequence <=
    /// max_sequence()`; wider values would bleed into neighboring fields.
    pub const fn compose(&self, timestamp: u64, sequence: u64) -> SnowflakeId {
        debug_assert!(timestamp <= MAX_TIMESTAMP);
        debug_assert!(sequence <= self.max_sequence());
        let raw = (timestamp << NODE_AND_SEQUENCE_BITS)
            | (self.datacenter_id << self.datacenter_shift())
            | (self.worker_id << self.worker_shift())
            | sequence;
        // Bit 63 is clear since the timestamp tops out at 41 bits.
        SnowflakeId::from_raw_unchecked(raw as i64)
    }

    /// Splits `id` into its fields according to this layout.
    pub const fn decode(&self, id: SnowflakeId) -> IdParts {
        let raw = id.to_raw() as u64;
        IdParts {
            timestamp: raw >> NODE_AND_SEQUENCE_BITS,
            datacenter_id: (raw >> self.datacenter_shift()) & self.max_datacenter_id(),
            worker_id: (raw >> self.worker_shift()) & self.max_worker_id(),
            sequence: raw & self.max_sequence(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::single()
    }
}

/// All-ones mask for a field of `bits` width (`bits < 64`).
const fn field_max(bits: u8) -> u64 {
    (1 << bits) - 1
}
