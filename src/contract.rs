//! # contract: interface for the external bagging tool
//!
//! This module defines a single trait ([`BagTool`]) and the plain request
//! types for the four operations the pipeline delegates to `apt-cmd`:
//! bag creation, bag validation, S3 upload and S3 download.
//!
//! ## Interface & Extensibility
//! - Implement the [`BagTool`] trait to plug in a different tool binary or a
//!   test double.
//! - All methods are async and report a binary outcome: the subprocess
//!   either exited zero or it did not.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.
#![allow(unused)]

use async_trait::async_trait;
use std::path::Path;

use mockall::{automock, predicate::*};

/// One repeatable `--tags` flag: target tag file, tag name and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag file inside the bag, e.g. `bag-info.txt` or `aptrust-info.txt`.
    pub tag_file: String,
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(tag_file: &str, name: &str, value: &str) -> Self {
        Self {
            tag_file: tag_file.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Renders the flag the way `apt-cmd bag create` expects it.
    pub fn flag(&self) -> String {
        format!("--tags={}/{}={}", self.tag_file, self.name, self.value)
    }
}

/// Everything needed to package one source directory into a tarred bag.
#[derive(Debug)]
pub struct CreateBagRequest<'a> {
    /// Directory whose contents are packaged.
    pub bag_dir: &'a Path,
    /// Full path of the `.tar` file to produce.
    pub output_file: &'a Path,
    /// BagIt profile name.
    pub profile: &'a str,
    /// Manifest and tag-manifest algorithms.
    pub manifest_algs: &'a [String],
    /// Metadata tags written into the bag's tag files.
    pub tags: &'a [Tag],
}

/// Upload of one local file into a receiving bucket.
#[derive(Debug)]
pub struct UploadRequest<'a> {
    pub host: &'a str,
    pub bucket: &'a str,
    pub file: &'a Path,
}

/// Download of one object from a bucket to a local path.
#[derive(Debug)]
pub struct DownloadRequest<'a> {
    pub host: &'a str,
    pub bucket: &'a str,
    pub key: &'a str,
    pub saveas: &'a Path,
}

/// Error type for [`BagTool`] operations. The taxonomy is deliberately
/// binary: the tool process failed to launch, or it exited non-zero.
#[derive(Debug)]
pub enum ToolError {
    /// The subprocess could not be spawned at all.
    Launch(std::io::Error),
    /// The subprocess ran and exited with a non-zero status.
    ExitFailure { code: Option<i32>, stderr: String },
}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        ToolError::Launch(e)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::Launch(e) => write!(f, "failed to launch tool process: {e}"),
            ToolError::ExitFailure { code, stderr } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                if stderr.is_empty() {
                    write!(f, "tool exited with non-zero code {code}")
                } else {
                    write!(f, "tool exited with non-zero code {code}: {stderr}")
                }
            }
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::Launch(e) => Some(e),
            ToolError::ExitFailure { .. } => None,
        }
    }
}

/// Trait for the external tool every pipeline step shells out to.
/// The implementor is responsible for building the argument vector and
/// passing credentials through to the child process.
///
/// The trait is implemented by the real `apt-cmd` wrapper and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait BagTool: Send + Sync {
    /// Package a source directory into a tarred bag with manifests and tags.
    async fn create_bag<'a>(&self, req: CreateBagRequest<'a>) -> Result<(), ToolError>;

    /// Validate a produced bag against a named BagIt profile.
    async fn validate_bag<'a>(&self, bag_file: &'a Path, profile: &'a str)
        -> Result<(), ToolError>;

    /// Upload a bag file to the receiving bucket.
    async fn upload_bag<'a>(&self, req: UploadRequest<'a>) -> Result<(), ToolError>;

    /// Download a single object from an S3-compatible service.
    async fn download_object<'a>(&self, req: DownloadRequest<'a>) -> Result<(), ToolError>;
}
