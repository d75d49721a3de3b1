use core::time::Duration;

use crate::{
    DEFAULT_EPOCH, Error, IdGenerator, Layout, MAX_EPOCH_MILLIS, Result, SystemClock,
    time::saturating_millis,
};

/// Plain-data description of a generator.
///
/// Useful when the node identity comes from a config file or the
/// environment. The three construction modes fall out of the bit widths:
/// both zero is single-node, only `worker_bits` set is a worker-only
/// cluster, and both set is a datacenter and worker cluster.
///
/// With the `serde` feature, every field is optional when deserializing and
/// falls back to [`GeneratorConfig::default`] (single-node on
/// [`DEFAULT_EPOCH`]).
///
/// # Example
///
/// ```
/// use snowid::GeneratorConfig;
///
/// let generator = GeneratorConfig::cluster_with_datacenter(3, 5, 7, 5).build()?;
/// assert_eq!(generator.layout().sequence_bits(), 12);
/// # Ok::<(), snowid::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct GeneratorConfig {
    /// Datacenter identifier; must be below `2^datacenter_bits`.
    pub datacenter_id: u64,
    /// Width of the datacenter field.
    pub datacenter_bits: u8,
    /// Worker identifier; must be below `2^worker_bits`.
    pub worker_id: u64,
    /// Width of the worker field.
    pub worker_bits: u8,
    /// Epoch in milliseconds since 1970-01-01 UTC.
    pub epoch_millis: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::single()
    }
}

impl GeneratorConfig {
    /// Single-node configuration on [`DEFAULT_EPOCH`].
    pub const fn single() -> Self {
        Self::cluster_with_datacenter(0, 0, 0, 0)
    }

    /// Worker-only cluster configuration on [`DEFAULT_EPOCH`].
    pub const fn cluster(worker_id: u64, worker_bits: u8) -> Self {
        Self::cluster_with_datacenter(0, 0, worker_id, worker_bits)
    }

    /// Datacenter and worker cluster configuration on [`DEFAULT_EPOCH`].
    pub const fn cluster_with_datacenter(
        datacenter_id: u64,
        datacenter_bits: u8,
        worker_id: u64,
        worker_bits: u8,
    ) -> Self {
        Self {
            datacenter_id,
            datacenter_bits,
            worker_id,
            worker_bits,
            epoch_millis: saturating_millis(DEFAULT_EPOCH),
        }
    }

    /// Replaces the epoch. Epochs beyond `u64::MAX` milliseconds saturate
    /// and are then rejected by [`GeneratorConfig::validate`].
    #[must_use]
    pub const fn with_epoch(mut self, epoch: Duration) -> Self {
        self.epoch_millis = saturating_millis(epoch);
        self
    }

    /// The configured epoch.
    pub const fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch_millis)
    }

    /// Validates the bit allocation and node identifiers.
    ///
    /// # Errors
    ///
    /// Returns a configuration error; see
    /// [`Layout::cluster_with_datacenter`].
    pub const fn layout(&self) -> Result<Layout> {
        Layout::cluster_with_datacenter(
            self.datacenter_id,
            self.datacenter_bits,
            self.worker_id,
            self.worker_bits,
        )
    }

    /// Validates the epoch and the layout, returning the layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EpochOutOfRange`] if `epoch_millis` exceeds
    /// [`MAX_EPOCH_MILLIS`], otherwise any error from
    /// [`GeneratorConfig::layout`].
    pub const fn validate(&self) -> Result<Layout> {
        if self.epoch_millis > MAX_EPOCH_MILLIS {
            return Err(Error::EpochOutOfRange {
                epoch_millis: self.epoch_millis,
            });
        }
        self.layout()
    }

    /// Wall clock measuring from the configured epoch.
    pub const fn clock(&self) -> SystemClock {
        SystemClock::with_epoch_millis(self.epoch_millis)
    }

    /// Builds a wall-clock generator from this configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the epoch or layout is invalid.
    pub fn build(&self) -> Result<IdGenerator<SystemClock>> {
        Ok(IdGenerator::new(self.validate()?, self.clock()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TWITTER_EPOCH, TimeSource};

    #[test]
    fn default_is_single_node_on_default_epoch() {
        let config = GeneratorConfig::default();
        assert_eq!(config.layout(), Ok(Layout::single()));
        assert_eq!(config.epoch(), DEFAULT_EPOCH);
        assert_eq!(config.clock(), SystemClock::default());
    }

    #[test]
    fn modes_map_onto_layouts() {
        assert_eq!(
            GeneratorConfig::cluster(5, 4).layout(),
            Layout::cluster(5, 4)
        );
        assert_eq!(
            GeneratorConfig::cluster_with_datacenter(1, 2, 3, 4).layout(),
            Layout::cluster_with_datacenter(1, 2, 3, 4)
        );
    }

    #[test]
    fn build_surfaces_configuration_errors() {
        let err = GeneratorConfig::cluster(16, 4).build().unwrap_err();
        assert_eq!(
            err,
            Error::WorkerIdOutOfRange {
                worker_id: 16,
                worker_bits: 4
            }
        );
    }

    #[test]
    fn epoch_flows_into_clock() {
        let config = GeneratorConfig::single().with_epoch(TWITTER_EPOCH);
        assert_eq!(config.epoch_millis, 1_288_834_974_657);
        assert!(config.clock().current_millis() > SystemClock::default().current_millis());
    }

    #[test]
    fn oversized_epoch_saturates_and_fails_validation() {
        let config = GeneratorConfig::single().with_epoch(Duration::MAX);
        assert_eq!(config.epoch_millis, u64::MAX);
        assert_eq!(
            config.build().unwrap_err(),
            Error::EpochOutOfRange {
                epoch_millis: u64::MAX
            }
        );
    }

    #[test]
    fn validate_bounds_epoch() {
        let mut config = GeneratorConfig::cluster(5, 4);
        config.epoch_millis = MAX_EPOCH_MILLIS;
        assert_eq!(config.validate(), Layout::cluster(5, 4));

        config.epoch_millis = MAX_EPOCH_MILLIS + 1;
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            err,
            Error::EpochOutOfRange {
                epoch_millis: MAX_EPOCH_MILLIS + 1
            }
        );

        // The epoch is checked before the layout.
        config.worker_id = 16;
        assert!(matches!(
            config.validate(),
            Err(Error::EpochOutOfRange { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_partial_config() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "worker_id": 9, "worker_bits": 6 }"#).unwrap();
        assert_eq!(config, GeneratorConfig::cluster(9, 6));

        let config: GeneratorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GeneratorConfig::single());

        assert!(serde_json::from_str::<GeneratorConfig>(r#"{ "machine_id": 1 }"#).is_err());
    }
}
