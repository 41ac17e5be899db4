//! Concrete [`BagTool`] backed by the `apt-cmd` binary.
//!
//! Commands are spawned with an argument vector (no shell), so tag values
//! containing spaces or symbols need no quoting. AWS credentials are passed
//! through to the child process environment; `apt-cmd` reads them from
//! `APTRUST_AWS_KEY` / `APTRUST_AWS_SECRET`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{error, info};

use crate::contract::{BagTool, CreateBagRequest, DownloadRequest, ToolError, UploadRequest};

/// Overrides the tool binary, mainly so tests can substitute a stub.
pub const APT_CMD_ENV: &str = "APT_CMD";
pub const AWS_KEY_ENV: &str = "APTRUST_AWS_KEY";
pub const AWS_SECRET_ENV: &str = "APTRUST_AWS_SECRET";

const DEFAULT_PROGRAM: &str = "apt-cmd";

/// Credential pair consumed by `apt-cmd` for S3 operations.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub key: String,
    pub secret: String,
}

impl AwsCredentials {
    /// Reads both credential variables; `None` when either is absent.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var(AWS_KEY_ENV).ok()?;
        let secret = std::env::var(AWS_SECRET_ENV).ok()?;
        Some(Self { key, secret })
    }
}

/// Wrapper that shells out to `apt-cmd`, one blocking call per step.
pub struct AptCmd {
    program: PathBuf,
    credentials: Option<AwsCredentials>,
}

impl AptCmd {
    pub fn new(program: PathBuf, credentials: Option<AwsCredentials>) -> Self {
        Self { program, credentials }
    }

    /// Resolves the binary from `APT_CMD` (falling back to `apt-cmd` on the
    /// PATH) and credentials from the environment. Missing credentials are
    /// not an error here; uploads will simply fail at the tool.
    pub fn from_env() -> Self {
        let program = std::env::var_os(APT_CMD_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM));
        let credentials = AwsCredentials::from_env();
        if credentials.is_none() {
            tracing::warn!(
                "AWS credentials not found in environment; s3 operations will fail"
            );
        }
        Self { program, credentials }
    }

    fn run(&self, args: &[String]) -> Result<(), ToolError> {
        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(creds) = &self.credentials {
            command.env(AWS_KEY_ENV, &creds.key);
            command.env(AWS_SECRET_ENV, &creds.secret);
        }

        info!(program = %self.program.display(), args = %args.join(" "), "invoking tool");
        let output = command.output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(
                program = %self.program.display(),
                args = %args.join(" "),
                code = ?output.status.code(),
                stderr = %stderr,
                "tool exited with non-zero code"
            );
            return Err(ToolError::ExitFailure { code: output.status.code(), stderr });
        }
        Ok(())
    }
}

fn create_args(req: &CreateBagRequest<'_>) -> Vec<String> {
    let mut args = vec![
        "bag".to_string(),
        "create".to_string(),
        format!("--profile={}", req.profile),
        format!("--manifest-algs={}", req.manifest_algs.join(",")),
        format!("--output-file={}", req.output_file.display()),
        format!("--bag-dir={}", req.bag_dir.display()),
    ];
    args.extend(req.tags.iter().map(|tag| tag.flag()));
    args
}

fn validate_args(bag_file: &Path, profile: &str) -> Vec<String> {
    vec![
        "bag".to_string(),
        "validate".to_string(),
        "-p".to_string(),
        profile.to_string(),
        bag_file.display().to_string(),
    ]
}

fn upload_args(req: &UploadRequest<'_>) -> Vec<String> {
    vec![
        "s3".to_string(),
        "upload".to_string(),
        format!("--host={}", req.host),
        format!("--bucket={}", req.bucket),
        req.file.display().to_string(),
    ]
}

fn download_args(req: &DownloadRequest<'_>) -> Vec<String> {
    vec![
        "s3".to_string(),
        "download".to_string(),
        format!("--host={}", req.host),
        format!("--bucket={}", req.bucket),
        format!("--key={}", req.key),
        format!("--saveas={}", req.saveas.display()),
    ]
}

#[async_trait]
impl BagTool for AptCmd {
    async fn create_bag<'a>(&self, req: CreateBagRequest<'a>) -> Result<(), ToolError> {
        self.run(&create_args(&req))
    }

    async fn validate_bag<'a>(
        &self,
        bag_file: &'a Path,
        profile: &'a str,
    ) -> Result<(), ToolError> {
        self.run(&validate_args(bag_file, profile))
    }

    async fn upload_bag<'a>(&self, req: UploadRequest<'a>) -> Result<(), ToolError> {
        self.run(&upload_args(&req))
    }

    async fn download_object<'a>(&self, req: DownloadRequest<'a>) -> Result<(), ToolError> {
        self.run(&download_args(&req))
    }
}
