//! Titanic Feature Preparation - Main Entry Point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use titanic_prep::{init_logging, prepare, submit, Settings};
use tracing::info;

#[derive(Parser)]
#[command(name = "titanic-prep", version, about = "Feature matrices and submissions for Titanic survival prediction")]
struct Cli {
    /// Optional TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build aligned train/test feature matrices
    Prepare {
        #[arg(long)]
        train: PathBuf,
        #[arg(long)]
        test: PathBuf,
        #[arg(long, default_value = "features")]
        out_dir: PathBuf,
    },
    /// Write a submission file from externally produced predictions
    Submit {
        #[arg(long)]
        test: PathBuf,
        #[arg(long)]
        predictions: PathBuf,
        /// Defaults to a timestamped file in the configured output directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    info!("=== titanic-prep v{} ===", env!("CARGO_PKG_VERSION"));
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Prepare {
            train,
            test,
            out_dir,
        } => {
            prepare(&settings, &train, &test, &out_dir)?;
        }
        Command::Submit {
            test,
            predictions,
            output,
        } => {
            let path = submit(&settings, &test, &predictions, output.as_deref())?;
            info!("Submission ready: {}", path.display());
        }
    }

    Ok(())
}
