//! CLI interface for bag-courier: command parsing, argument validation and
//! the async [`run`] entrypoint shared by `main()` and integration tests.
//!
//! All pipeline logic lives in [`crate::pipeline`]; this module is strictly
//! glue between the parsed arguments, the loaded config and the concrete
//! tool wrapper.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::apt_cmd::AptCmd;
use crate::contract::{BagTool, DownloadRequest};
use crate::load_config::load_config;
use crate::pipeline::run_jobs;

/// CLI for bag-courier: bag, validate and upload archival packages.
#[derive(Parser)]
#[clap(
    name = "bag-courier",
    version,
    about = "Bag, validate and upload archival packages through apt-cmd"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bag, validate and upload every job in the given config file
    Run {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Download a single object from the configured receiving bucket
    Fetch {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Key of the object to download
        #[clap(long)]
        key: String,
        /// Target file, or an existing directory to place the object in;
        /// defaults to the key in the current directory
        #[clap(long)]
        saveas: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { config } => {
            let config = load_config(config)?;
            let tool = AptCmd::from_env();
            let report = run_jobs(&config, &tool).await;
            tracing::info!(
                completed = report.completed(),
                failed = report.failed(),
                "run finished"
            );
            // Per-job failures are reported on stdout; the run itself
            // always completes with exit code zero.
            Ok(())
        }
        Commands::Fetch { config, key, saveas } => {
            let config = load_config(config)?;
            let tool = AptCmd::from_env();
            let saveas = resolve_saveas(saveas, &key);
            tool.download_object(DownloadRequest {
                host: &config.upload.host,
                bucket: &config.upload.bucket,
                key: &key,
                saveas: &saveas,
            })
            .await
            .map_err(|e| anyhow::anyhow!("Download failed for {key}: {e}"))?;
            println!("Downloaded: {}", saveas.display());
            Ok(())
        }
    }
}

/// A `--saveas` naming an existing directory gets the object key appended;
/// when absent, the key becomes the file name in the current directory.
fn resolve_saveas(saveas: Option<PathBuf>, key: &str) -> PathBuf {
    let path = saveas.unwrap_or_else(|| PathBuf::from(key));
    if path.is_dir() {
        path.join(key)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saveas_defaults_to_key() {
        assert_eq!(resolve_saveas(None, "photo_001.jpg"), PathBuf::from("photo_001.jpg"));
    }

    #[test]
    fn saveas_directory_gets_key_appended() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_saveas(Some(dir.path().to_path_buf()), "photo_001.jpg");
        assert_eq!(resolved, dir.path().join("photo_001.jpg"));
    }

    #[test]
    fn saveas_file_path_is_kept() {
        let target = PathBuf::from("/tmp/does-not-exist/vacation.jpg");
        assert_eq!(resolve_saveas(Some(target.clone()), "photo_001.jpg"), target);
    }
}
