use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use surface_place::config::EngineConfig;
use surface_place::replay::{ReplayRecord, Script, run_script};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Replay(#[from] surface_place::replay::ReplayError),
    #[error(transparent)]
    Config(#[from] surface_place::config::ConfigError),
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "surface-replay", about = "Replay a scripted AR placement session and print the resulting actions")]
struct Cli {
    /// Path to the JSON event script.
    #[arg(long, env = "SURFACE_REPLAY_SCRIPT")]
    script: String,

    /// Pretty-print each record instead of one JSON object per line.
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    // Load .env before the subscriber so RUST_LOG can come from it.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to load .env"),
    }

    let cli = Cli::parse();
    match run(&cli) {
        Ok(count) => {
            info!(records = count, script = %cli.script, "replay finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<usize, CliError> {
    let script = Script::from_path(&cli.script)?;
    let config = match script.config.clone() {
        Some(config) => config,
        None => EngineConfig::from_env()?,
    };

    let (_engine, records) = run_script(&script, config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in &records {
        write_record(&mut out, record, cli.pretty)?;
    }
    out.flush()?;
    Ok(records.len())
}

fn write_record(out: &mut impl Write, record: &ReplayRecord, pretty: bool) -> Result<(), CliError> {
    let line = if pretty { serde_json::to_string_pretty(record)? } else { serde_json::to_string(record)? };
    writeln!(out, "{line}")?;
    Ok(())
}
