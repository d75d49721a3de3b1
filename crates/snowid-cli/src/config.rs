use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use snowid::{DEFAULT_EPOCH, GeneratorConfig};

/// Command-line interface for the `snowid` binary.
///
/// Node settings are parsed from CLI arguments or environment variables (a
/// `.env` file in the working directory is loaded first). A JSON config file
/// given with `--config` replaces the individual node flags entirely.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowid",
    version,
    about = "Mint and decode coordination-free Snowflake IDs"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub node: NodeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mint new IDs, one per line.
    Mint {
        /// Number of IDs to mint.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Print each ID with its decoded fields as a JSON object.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Split IDs into timestamp, datacenter, worker, and sequence.
    Decode {
        /// IDs to decode, as decimal integers.
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,

        /// Print JSON objects instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Identity and bit layout of the generator.
///
/// Every generator sharing an ID space must use the same bit widths and
/// epoch, and a distinct `(datacenter_id, worker_id)` pair.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct NodeArgs {
    /// Datacenter identifier, below `2^datacenter_bits`.
    ///
    /// Environment variable: `SNOWID_DATACENTER_ID`
    #[arg(long, global = true, env = "SNOWID_DATACENTER_ID", default_value_t = 0)]
    pub datacenter_id: u64,

    /// Width of the datacenter field. `0` disables it.
    ///
    /// Environment variable: `SNOWID_DATACENTER_BITS`
    #[arg(long, global = true, env = "SNOWID_DATACENTER_BITS", default_value_t = 0)]
    pub datacenter_bits: u8,

    /// Worker identifier, below `2^worker_bits`.
    ///
    /// Environment variable: `SNOWID_WORKER_ID`
    #[arg(long, global = true, env = "SNOWID_WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Width of the worker field. `0` with no datacenter field means
    /// single-node mode.
    ///
    /// Environment variable: `SNOWID_WORKER_BITS`
    #[arg(long, global = true, env = "SNOWID_WORKER_BITS", default_value_t = 0)]
    pub worker_bits: u8,

    /// Epoch in milliseconds since 1970-01-01 UTC. Must never change for a
    /// deployment.
    ///
    /// Environment variable: `SNOWID_EPOCH_MILLIS`
    #[arg(
        long,
        global = true,
        env = "SNOWID_EPOCH_MILLIS",
        default_value_t = DEFAULT_EPOCH.as_millis() as u64
    )]
    pub epoch_millis: u64,

    /// JSON file holding a full generator config. Overrides the flags above.
    ///
    /// Environment variable: `SNOWID_CONFIG`
    #[arg(long, global = true, env = "SNOWID_CONFIG")]
    pub config: Option<PathBuf>,
}

impl NodeArgs {
    /// Resolves the generator config and validates its epoch and layout.
    ///
    /// An epoch later than the current wall clock is rejected: a clock
    /// reading before the epoch is clamped to zero, so every ID would carry
    /// timestamp `0` until the epoch arrives.
    pub fn resolve(&self) -> anyhow::Result<GeneratorConfig> {
        let config: GeneratorConfig = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => GeneratorConfig {
                datacenter_id: self.datacenter_id,
                datacenter_bits: self.datacenter_bits,
                worker_id: self.worker_id,
                worker_bits: self.worker_bits,
                epoch_millis: self.epoch_millis,
            },
        };

        config.validate().context("invalid generator config")?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before 1970-01-01")?;
        if u128::from(config.epoch_millis) > now.as_millis() {
            bail!(
                "epoch {}ms is in the future (now is {}ms)",
                config.epoch_millis,
                now.as_millis()
            );
        }
        Ok(config)
    }
}

impl Command {
    /// Rejects arguments clap cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Self::Mint { count: 0, .. } = self {
            bail!("--count must be greater than 0");
        }
        Ok(())
    }
}
