mod commands;
mod config;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{CliArgs, Command};
use telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_tracing();

    args.command.validate()?;
    let config = args.node.resolve()?;
    if cfg!(debug_assertions) {
        tracing::info!("Resolved generator config: {:#?}", config);
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match &args.command {
        Command::Mint { count, json } => {
            commands::mint(&config, config.clock(), *count, *json, &mut out)?;
        }
        Command::Decode { ids, json } => {
            commands::decode(&config, ids, *json, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}
