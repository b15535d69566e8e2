//! `fusionctl`: drive the erasure coding engine from the shell.
//!
//! Results are printed to stdout as JSON arrays; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! fusionctl matrix -m 3 -k 5                      # coding matrix, row-major
//! fusionctl encode --data 10,20,30,40 -w 8        # code symbols for data
//! fusionctl update --code 41169 --code-index 1 \
//!     --old 222 --new 0 --position 1 -m 3 -k 3    # one incremental update
//! fusionctl recover --data 10,0,30,40 --code 40,0 \
//!     --erasures 1,5,-1 -w 8                      # recover lost symbols
//! fusionctl -c fusion.toml matrix                 # parameters from a file
//! FUSIONCTL_CONFIG=fusion.toml fusionctl matrix    # same, via environment
//! ```

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fusion_erasure::CodeConfig;
use fusion_erasure::boundary;
use tracing::{debug, info};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "fusionctl",
    version,
    about = "Systematic Reed-Solomon erasure coding over GF(2^w)"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true, env = "FUSIONCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Number of primary (data) symbols.
    #[arg(short = 'm', long, global = true)]
    data_count: Option<usize>,

    /// Number of backup (code) symbols.
    #[arg(short = 'k', long, global = true)]
    code_count: Option<usize>,

    /// Field width in bits.
    #[arg(short = 'w', long = "width", global = true)]
    w: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the coding matrix, row-major.
    Matrix,

    /// Compute code symbols for a data vector.
    Encode {
        /// Data symbols, comma separated.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        data: Vec<i64>,
    },

    /// Update one code symbol after a single data symbol changed.
    Update {
        /// Current value of the code symbol.
        #[arg(long, allow_negative_numbers = true)]
        code: i64,

        /// Which code symbol to update.
        #[arg(long)]
        code_index: usize,

        /// Previous value of the data symbol.
        #[arg(long, allow_negative_numbers = true)]
        old: i64,

        /// New value of the data symbol.
        #[arg(long, allow_negative_numbers = true)]
        new: i64,

        /// Which data symbol changed.
        #[arg(long)]
        position: usize,
    },

    /// Recover erased symbols and print the full data vector.
    Recover {
        /// Data symbols (erased positions may hold anything).
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        data: Vec<i64>,

        /// Code symbols (erased positions may hold anything).
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        code: Vec<i64>,

        /// Erased positions, optionally terminated by -1.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        erasures: Vec<i64>,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    // CLI args override config file values.
    if let Some(m) = cli.data_count {
        config.code.data_count = Some(m);
    }
    if let Some(k) = cli.code_count {
        config.code.code_count = Some(k);
    }
    if let Some(w) = cli.w {
        config.code.w = Some(w);
    }
    let code_config = config.code_config().context("invalid code parameters")?;
    info!(
        data_count = code_config.data_count,
        code_count = code_config.code_count,
        w = code_config.w,
        "code configuration"
    );

    let output = run(cli.command, code_config)?;
    println!("{output}");
    Ok(())
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
/// Logs go to stderr so stdout carries only results.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute one command and render its result as JSON.
fn run(command: Commands, config: CodeConfig) -> Result<String> {
    let output = match command {
        Commands::Matrix => serde_json::to_string(&boundary::rs_matrix(config)?)?,
        Commands::Encode { data } => {
            serde_json::to_string(&boundary::rs_encode(config, &data)?)?
        }
        Commands::Update {
            code,
            code_index,
            old,
            new,
            position,
        } => {
            debug!(code_index, position, "updating code symbol");
            serde_json::to_string(&boundary::rs_code(
                config, code, code_index, old, new, position,
            )?)?
        }
        Commands::Recover {
            data,
            code,
            erasures,
        } => serde_json::to_string(&boundary::recover_data(config, &code, &data, &erasures)?)?,
    };
    Ok(output)
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
