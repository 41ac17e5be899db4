//! High-level pipeline: create → validate → upload for each configured job.
//!
//! The run is strictly sequential: every subprocess completes before the
//! next command is issued, and jobs are processed in config order. A failed
//! step skips the rest of that job only; the run always continues with the
//! next job and the function never errors as a whole.
//!
//! One fixed status line per step per job goes to stdout; `tracing` events
//! carry the diagnostic detail.

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::contract::{BagTool, CreateBagRequest, Tag, UploadRequest};

/// Outcome of a whole run, one entry per configured job.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub jobs: Vec<JobReport>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| j.outcome == JobOutcome::Completed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.jobs.len() - self.completed()
    }
}

#[derive(Debug, Serialize)]
pub struct JobReport {
    pub bag_name: String,
    pub outcome: JobOutcome,
}

/// Which step, if any, ended the job early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobOutcome {
    Completed,
    CreateFailed,
    ValidateFailed,
    UploadFailed,
}

/// Runs every job in order and reports per-job outcomes.
pub async fn run_jobs<T>(config: &Config, tool: &T) -> RunReport
where
    T: BagTool + ?Sized,
{
    info!(jobs = config.jobs.len(), "starting bagging pipeline");
    let mut jobs = Vec::with_capacity(config.jobs.len());

    for job in &config.jobs {
        // load_config rejects underivable names; guard for programmatic callers.
        let Some(bag_name) = job.bag_name() else {
            error!(source_dir = ?job.source_dir, "cannot derive bag name from source directory");
            println!("ERROR CREATING: {}", job.source_dir.display());
            jobs.push(JobReport {
                bag_name: job.source_dir.display().to_string(),
                outcome: JobOutcome::CreateFailed,
            });
            continue;
        };

        let tar_file = config.bagging.output_dir.join(format!("{bag_name}.tar"));
        let tags = [
            Tag::new(
                "bag-info.txt",
                "Source-Organization",
                &config.bagging.source_organization,
            ),
            Tag::new("aptrust-info.txt", "Title", &job.title),
            Tag::new("aptrust-info.txt", "Access", &job.access),
            Tag::new(
                "aptrust-info.txt",
                "Storage-Option",
                &config.bagging.storage_option,
            ),
        ];

        let create = tool
            .create_bag(CreateBagRequest {
                bag_dir: &job.source_dir,
                output_file: &tar_file,
                profile: &config.bagging.profile,
                manifest_algs: &config.bagging.manifest_algs,
                tags: &tags,
            })
            .await;
        if let Err(e) = create {
            error!(bag = %bag_name, error = %e, "create step failed");
            println!("ERROR CREATING: {bag_name}");
            jobs.push(JobReport { bag_name, outcome: JobOutcome::CreateFailed });
            continue;
        }
        info!(bag = %bag_name, "create step succeeded");
        println!("Bagged: {bag_name}");

        if let Err(e) = tool.validate_bag(&tar_file, &config.bagging.profile).await {
            error!(bag = %bag_name, error = %e, "validate step failed");
            println!("ERROR VALIDATING: {bag_name}");
            jobs.push(JobReport { bag_name, outcome: JobOutcome::ValidateFailed });
            continue;
        }
        info!(bag = %bag_name, "validate step succeeded");
        println!("Validated: {bag_name}");

        let upload = tool
            .upload_bag(UploadRequest {
                host: &config.upload.host,
                bucket: &config.upload.bucket,
                file: &tar_file,
            })
            .await;
        if let Err(e) = upload {
            error!(bag = %bag_name, error = %e, "upload step failed");
            println!("ERROR UPLOADING: {bag_name}");
            jobs.push(JobReport { bag_name, outcome: JobOutcome::UploadFailed });
            continue;
        }
        info!(bag = %bag_name, "upload step succeeded");
        println!("Uploaded: {bag_name}");
        println!("Bagged, Validated, Uploaded: {bag_name}");
        jobs.push(JobReport { bag_name, outcome: JobOutcome::Completed });
    }

    let report = RunReport { jobs };
    info!(
        completed = report.completed(),
        failed = report.failed(),
        "bagging pipeline finished"
    );
    match serde_json::to_string_pretty(&report) {
        Ok(json) => debug!(json = %json, "pipeline report"),
        Err(e) => error!(error = ?e, "failed to serialize pipeline report"),
    }
    report
}
