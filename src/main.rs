use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zonefile::config::{ConfigOverrides, ReaderConfig, ViewKind};
use zonefile::{Result, ZoneView};

/// Read a DNS zone file and print its records or RRSets as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Zone file to read; standard input if omitted
    file: Option<PathBuf>,

    /// Origin for relative names
    #[arg(short, long)]
    origin: Option<String>,

    /// Projection to print
    #[arg(long, value_enum)]
    view: Option<ViewKind>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("zonefile: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let content = match &args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    debug!(
        "Read {} bytes of zone content, view {}",
        content.len(),
        config.view
    );

    let view = ZoneView::new(config.parser());
    let origin = config.origin();
    let output = match config.view {
        ViewKind::Records => to_json(&view.records_document(&content, origin)?, config.pretty)?,
        ViewKind::RecordSets => {
            to_json(&view.record_sets_document(&content, origin)?, config.pretty)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn load_config(args: &Args) -> Result<ReaderConfig> {
    let overrides = ConfigOverrides {
        origin: args.origin.clone(),
        view: args.view,
        pretty: args.pretty,
    };
    let config = ReaderConfig::load(
        args.config.as_deref(),
        |key| std::env::var(key).ok(),
        &overrides,
    )?;
    Ok(config)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
