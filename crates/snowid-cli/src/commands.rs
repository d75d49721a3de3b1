use std::io::Write;

use anyhow::Context;
use serde::Serialize;
use snowid::{GeneratorConfig, IdParts, Layout, SnowflakeId, TimeSource};

/// One decoded ID as printed by `--json`.
#[derive(Debug, Serialize)]
struct Decoded {
    id: SnowflakeId,
    #[serde(flatten)]
    parts: IdParts,
    unix_millis: u64,
}

impl Decoded {
    fn new(id: SnowflakeId, layout: &Layout, config: &GeneratorConfig) -> anyhow::Result<Self> {
        let parts = layout.decode(id);
        let unix_millis = parts.unix_millis(config.epoch()).with_context(|| {
            format!(
                "timestamp {} overflows epoch {}ms",
                parts.timestamp, config.epoch_millis
            )
        })?;
        Ok(Self {
            id,
            parts,
            unix_millis,
        })
    }
}

/// Mints `count` IDs with `time` and writes them to `out`.
pub fn mint<T: TimeSource>(
    config: &GeneratorConfig,
    time: T,
    count: usize,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let layout = config.validate()?;
    let generator = snowid::IdGenerator::new(layout, time);
    tracing::debug!(?layout, count, "minting ids");

    for _ in 0..count {
        let id = generator.next_id().context("generating id")?;
        if json {
            serde_json::to_writer(&mut *out, &Decoded::new(id, &layout, config)?)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}

/// Decodes raw `ids` against the configured layout and writes the fields to
/// `out`.
pub fn decode(
    config: &GeneratorConfig,
    ids: &[i64],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let layout = config.layout()?;

    for &raw in ids {
        let id = SnowflakeId::try_from(raw)?;
        let decoded = Decoded::new(id, &layout, config)?;
        if json {
            serde_json::to_writer(&mut *out, &decoded)?;
            writeln!(out)?;
        } else {
            let IdParts {
                timestamp,
                datacenter_id,
                worker_id,
                sequence,
            } = decoded.parts;
            writeln!(
                out,
                "{id}\ttimestamp={timestamp} unix_millis={} datacenter={datacenter_id} worker={worker_id} sequence={sequence}",
                decoded.unix_millis
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowid::{DEFAULT_EPOCH, Error};

    struct MockTime {
        millis: u64,
    }

    impl TimeSource for MockTime {
        fn current_millis(&self) -> u64 {
            self.millis
        }
    }

    fn lines(out: Vec<u8>) -> Vec<String> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn mint_prints_one_id_per_line() {
        let config = GeneratorConfig::cluster_with_datacenter(3, 5, 7, 5);
        let mut out = Vec::new();
        mint(&config, MockTime { millis: 1 }, 3, false, &mut out).unwrap();

        let base = (1 << 22) | (3 << 17) | (7 << 12);
        assert_eq!(
            lines(out),
            [base.to_string(), (base + 1).to_string(), (base + 2).to_string()]
        );
    }

    #[test]
    fn mint_json_includes_fields() {
        let config = GeneratorConfig::cluster(5, 4);
        let mut out = Vec::new();
        mint(&config, MockTime { millis: 10 }, 2, true, &mut out).unwrap();

        let rows: Vec<serde_json::Value> = lines(out)
            .iter()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["timestamp"], 10);
        assert_eq!(rows[1]["worker_id"], 5);
        assert_eq!(rows[1]["datacenter_id"], 0);
        assert_eq!(rows[1]["sequence"], 1);
        assert_eq!(
            rows[1]["unix_millis"],
            DEFAULT_EPOCH.as_millis() as u64 + 10
        );
    }

    #[test]
    fn mint_reports_clock_exhaustion() {
        let mut out = Vec::new();
        let err = mint(
            &GeneratorConfig::single(),
            MockTime { millis: u64::MAX },
            1,
            false,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ClockExhausted { .. })
        ));
    }

    #[test]
    fn decode_prints_fields() {
        let config = GeneratorConfig::cluster_with_datacenter(3, 5, 7, 5);
        let raw = (1_000_i64 << 22) | (3 << 17) | (7 << 12) | 9;
        let mut out = Vec::new();
        decode(&config, &[raw], false, &mut out).unwrap();

        assert_eq!(
            lines(out),
            [format!(
                "{raw}\ttimestamp=1000 unix_millis={} datacenter=3 worker=7 sequence=9",
                DEFAULT_EPOCH.as_millis() + 1_000
            )]
        );
    }

    #[test]
    fn decode_reports_unix_time_overflow() {
        let config = GeneratorConfig {
            epoch_millis: u64::MAX,
            ..GeneratorConfig::single()
        };
        let mut out = Vec::new();
        let err = decode(&config, &[1 << 22], false, &mut out).unwrap_err();
        assert!(err.to_string().contains("overflows epoch"));
        assert!(out.is_empty());

        // Timestamp zero still maps onto the epoch itself.
        decode(&config, &[0], true, &mut out).unwrap();
        let row: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(row["unix_millis"], u64::MAX);
    }

    #[test]
    fn decode_rejects_negative_ids() {
        let mut out = Vec::new();
        let err = decode(&GeneratorConfig::single(), &[-1], true, &mut out).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::NegativeId(-1)));
    }
}
