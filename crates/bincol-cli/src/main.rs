//! CLI driver for the binary-column round-trip check.

use std::path::PathBuf;

use clap::Parser;
use snafu::{ensure, ResultExt, Snafu};

use bincol_core::verify::{self, VerifyError};

#[derive(Debug, Snafu)]
enum CliError {
    #[snafu(display("Output directory {path} is not usable: {source}"))]
    OutDir {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("{source}"))]
    Run { source: VerifyError },

    #[snafu(display("{failed} format pipeline(s) failed"))]
    VerificationFailed { failed: usize },
}

type CliResult<T> = Result<T, CliError>;

/// Verify that a text column tagged for binary output survives a
/// Parquet and an ORC round trip with a binary on-disk schema type.
#[derive(Debug, Parser)]
struct Cli {
    /// Directory the check files are written to (default: system temp dir)
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let out_dir = match cli.out_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir).context(OutDirSnafu {
                path: dir.display().to_string(),
            })?;
            dir
        }
        None => std::env::temp_dir(),
    };

    let summary = verify::run(&out_dir).context(RunSnafu)?;

    for report in &summary.reports {
        println!("Schema of {}", report.path.display());
        println!("{}", report.schema);
    }
    for failure in &summary.failures {
        eprintln!("{failure}");
    }

    ensure!(
        summary.is_success(),
        VerificationFailedSnafu {
            failed: summary.failures.len(),
        }
    );
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
