//! Copy standard input to standard output and a file.
//!
//! Input is split into lines; each line goes to standard output and then to
//! the destination file before the next one is read.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tee::exit_codes;
use tee::io::config::{TeeConfig, load_config};
use tee::io::destination::open_destination;
use tee::logging;
use tee::tee_loop::tee_stream;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "tee",
    version,
    about = "Branch stdin to stdout and a file"
)]
struct Cli {
    /// Destination file.
    file: Option<PathBuf>,

    /// Destination file, when not given positionally.
    #[arg(short = 'f', long = "filepath", value_name = "FILE")]
    filepath: Option<PathBuf>,

    /// Append to the file instead of replacing it.
    #[arg(short, long)]
    append: bool,

    /// TOML config file (retry_limit, compact_threshold).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Consecutive I/O failures tolerated before giving up.
    #[arg(long, value_name = "N")]
    retry_limit: Option<u32>,

    /// Further positional arguments are accepted and ignored.
    #[arg(hide = true)]
    ignored: Vec<String>,
}

impl Cli {
    /// Positional path first, then `--filepath`, else empty.
    fn destination(&self) -> PathBuf {
        self.file
            .clone()
            .or_else(|| self.filepath.clone())
            .unwrap_or_default()
    }

    fn config(&self) -> Result<TeeConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path).context("load config")?,
            None => TeeConfig::default(),
        };
        if let Some(limit) = self.retry_limit {
            config.retry_limit = limit;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("tee: {:#}", err);
            exit_codes::FAILURE
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;
    let destination = cli.destination();

    let file = open_destination(&destination, cli.append)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = tee_stream(stdin.lock(), stdout.lock(), file, &config)?;

    debug!(
        path = %destination.display(),
        chunks = summary.chunks,
        bytes = summary.bytes,
        "copy complete"
    );
    Ok(())
}
