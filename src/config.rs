//! Typed configuration for a pipeline run: global bagging/upload settings
//! plus the ordered job list. Loaded from YAML by [`crate::load_config`].

use serde::Deserialize;
use std::path::PathBuf;

/// The full configuration for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bagging: BaggingConfig,
    pub upload: UploadConfig,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Settings shared by every `bag create` / `bag validate` invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct BaggingConfig {
    /// Directory the tarred bags are written into.
    pub output_dir: PathBuf,
    /// BagIt profile name, e.g. "aptrust".
    pub profile: String,
    /// Manifest and tag-manifest algorithms, e.g. [md5, sha256].
    pub manifest_algs: Vec<String>,
    /// Written into bag-info.txt/Source-Organization.
    pub source_organization: String,
    /// Written into aptrust-info.txt/Storage-Option.
    pub storage_option: String,
}

/// Where validated bags are uploaded to.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// S3-compatible endpoint, e.g. "s3.amazonaws.com".
    pub host: String,
    /// Receiving bucket name.
    pub bucket: String,
}

/// One unit of work: a source directory plus its per-bag tag values.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub source_dir: PathBuf,
    pub title: String,
    pub access: String,
}

impl Job {
    /// The bag is named after the last path segment of the source directory,
    /// so `/a/b/test_bag_1` produces `test_bag_1`. Returns `None` for paths
    /// with no usable final segment (e.g. `/`).
    pub fn bag_name(&self) -> Option<String> {
        self.source_dir
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.to_string())
    }
}
