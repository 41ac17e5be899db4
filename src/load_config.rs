//! `load_config`: loads the static YAML config into typed [`Config`] structs.
//!
//! This is the only place where untrusted YAML is parsed, and where
//! load-time validation happens: every job must yield a derivable bag name
//! and the tag/manifest settings must be non-empty. Credentials are NOT
//! read here; they stay in the process environment and are passed through
//! to the child process by the tool wrapper.
//!
//! All errors use `anyhow` for context-rich diagnostics surfaced at the
//! CLI boundary.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::config::Config;

/// Loads and validates a YAML config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: Config = match serde_yaml::from_str(&config_content) {
        Ok(conf) => conf,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    validate(&config)?;
    info!(jobs = config.jobs.len(), "Configuration loaded");
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.bagging.manifest_algs.is_empty() {
        anyhow::bail!("config: at least one manifest algorithm is required");
    }
    require("bagging.profile", &config.bagging.profile)?;
    require("bagging.source_organization", &config.bagging.source_organization)?;
    require("bagging.storage_option", &config.bagging.storage_option)?;
    require("upload.host", &config.upload.host)?;
    require("upload.bucket", &config.upload.bucket)?;

    for job in &config.jobs {
        if job.bag_name().is_none() {
            anyhow::bail!(
                "config: cannot derive a bag name from source_dir {:?}",
                job.source_dir
            );
        }
        require("jobs[].title", &job.title)?;
        require("jobs[].access", &job.access)?;
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("config: {field} must not be empty");
    }
    Ok(())
}
