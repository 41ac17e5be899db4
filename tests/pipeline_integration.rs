use std::path::PathBuf;

use bag_courier::config::{BaggingConfig, Config, Job, UploadConfig};
use bag_courier::contract::{MockBagTool, ToolError};
use bag_courier::pipeline::{run_jobs, JobOutcome};

fn test_config(jobs: Vec<Job>) -> Config {
    Config {
        bagging: BaggingConfig {
            output_dir: PathBuf::from("/out"),
            profile: "aptrust".to_string(),
            manifest_algs: vec!["md5".to_string(), "sha256".to_string()],
            source_organization: "College".to_string(),
            storage_option: "Standard".to_string(),
        },
        upload: UploadConfig {
            host: "s3.amazonaws.com".to_string(),
            bucket: "aptrust.receiving.test.example.edu".to_string(),
        },
        jobs,
    }
}

fn job(source_dir: &str, title: &str, access: &str) -> Job {
    Job {
        source_dir: PathBuf::from(source_dir),
        title: title.to_string(),
        access: access.to_string(),
    }
}

fn exit_failure() -> ToolError {
    ToolError::ExitFailure { code: Some(1), stderr: "boom".to_string() }
}

#[tokio::test]
async fn all_steps_succeed_for_every_job() {
    let config = test_config(vec![
        job("/in/test_bag_1", "Bag 1", "Institution"),
        job("/in/test_bag_2", "Bag 2", "Consortia"),
    ]);

    let mut tool = MockBagTool::new();
    tool.expect_create_bag()
        .times(2)
        .withf(|req| {
            req.profile == "aptrust"
                && req.manifest_algs == ["md5", "sha256"]
                && req.tags.len() == 4
                && req.tags.iter().any(|t| {
                    t.tag_file == "bag-info.txt"
                        && t.name == "Source-Organization"
                        && t.value == "College"
                })
        })
        .returning(|_| Ok(()));
    tool.expect_validate_bag()
        .times(2)
        .withf(|bag_file, profile| {
            profile == "aptrust" && bag_file.to_string_lossy().ends_with(".tar")
        })
        .returning(|_, _| Ok(()));
    tool.expect_upload_bag()
        .times(2)
        .withf(|req| req.bucket == "aptrust.receiving.test.example.edu")
        .returning(|_| Ok(()));

    let report = run_jobs(&config, &tool).await;

    assert_eq!(report.jobs.len(), 2);
    assert_eq!(report.completed(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.jobs[0].bag_name, "test_bag_1");
    assert_eq!(report.jobs[0].outcome, JobOutcome::Completed);
    assert_eq!(report.jobs[1].bag_name, "test_bag_2");
}

#[tokio::test]
async fn create_request_carries_job_specific_values() {
    let config = test_config(vec![job("/in/test_bag_1", "Bag 1", "Institution")]);

    let mut tool = MockBagTool::new();
    tool.expect_create_bag()
        .times(1)
        .withf(|req| {
            req.bag_dir == std::path::Path::new("/in/test_bag_1")
                && req.output_file == std::path::Path::new("/out/test_bag_1.tar")
                && req.tags.iter().any(|t| {
                    t.tag_file == "aptrust-info.txt" && t.name == "Title" && t.value == "Bag 1"
                })
                && req.tags.iter().any(|t| {
                    t.tag_file == "aptrust-info.txt"
                        && t.name == "Access"
                        && t.value == "Institution"
                })
                && req.tags.iter().any(|t| {
                    t.tag_file == "aptrust-info.txt"
                        && t.name == "Storage-Option"
                        && t.value == "Standard"
                })
        })
        .returning(|_| Ok(()));
    tool.expect_validate_bag().times(1).returning(|_, _| Ok(()));
    tool.expect_upload_bag().times(1).returning(|_| Ok(()));

    let report = run_jobs(&config, &tool).await;
    assert_eq!(report.completed(), 1);
}

#[tokio::test]
async fn failed_create_skips_validate_and_upload_but_later_jobs_run() {
    let config = test_config(vec![
        job("/in/test_bag_1", "Bag 1", "Institution"),
        job("/in/test_bag_2", "Bag 2", "Consortia"),
    ]);

    let mut tool = MockBagTool::new();
    // First job fails at create; second runs through.
    tool.expect_create_bag().times(2).returning(|req| {
        if req.bag_dir.ends_with("test_bag_1") {
            Err(exit_failure())
        } else {
            Ok(())
        }
    });
    // Validate and upload are invoked only for the surviving job.
    tool.expect_validate_bag()
        .times(1)
        .withf(|bag_file, _| bag_file.to_string_lossy().contains("test_bag_2"))
        .returning(|_, _| Ok(()));
    tool.expect_upload_bag()
        .times(1)
        .withf(|req| req.file.to_string_lossy().contains("test_bag_2"))
        .returning(|_| Ok(()));

    let report = run_jobs(&config, &tool).await;

    assert_eq!(report.jobs.len(), 2);
    assert_eq!(report.jobs[0].outcome, JobOutcome::CreateFailed);
    assert_eq!(report.jobs[1].outcome, JobOutcome::Completed);
}

#[tokio::test]
async fn failed_validate_skips_upload_for_that_job_only() {
    let config = test_config(vec![
        job("/in/test_bag_1", "Bag 1", "Institution"),
        job("/in/test_bag_2", "Bag 2", "Consortia"),
    ]);

    let mut tool = MockBagTool::new();
    tool.expect_create_bag().times(2).returning(|_| Ok(()));
    tool.expect_validate_bag().times(2).returning(|bag_file, _| {
        if bag_file.to_string_lossy().contains("test_bag_1") {
            Err(exit_failure())
        } else {
            Ok(())
        }
    });
    tool.expect_upload_bag()
        .times(1)
        .withf(|req| req.file.to_string_lossy().contains("test_bag_2"))
        .returning(|_| Ok(()));

    let report = run_jobs(&config, &tool).await;

    assert_eq!(report.jobs[0].outcome, JobOutcome::ValidateFailed);
    assert_eq!(report.jobs[1].outcome, JobOutcome::Completed);
}

#[tokio::test]
async fn failed_upload_is_reported_but_run_continues() {
    let config = test_config(vec![
        job("/in/test_bag_1", "Bag 1", "Institution"),
        job("/in/test_bag_2", "Bag 2", "Consortia"),
    ]);

    let mut tool = MockBagTool::new();
    tool.expect_create_bag().times(2).returning(|_| Ok(()));
    tool.expect_validate_bag().times(2).returning(|_, _| Ok(()));
    tool.expect_upload_bag().times(2).returning(|req| {
        if req.file.to_string_lossy().contains("test_bag_1") {
            Err(exit_failure())
        } else {
            Ok(())
        }
    });

    let report = run_jobs(&config, &tool).await;

    assert_eq!(report.jobs[0].outcome, JobOutcome::UploadFailed);
    assert_eq!(report.jobs[1].outcome, JobOutcome::Completed);
    assert_eq!(report.completed(), 1);
    assert_eq!(report.failed(), 1);
}

#[tokio::test]
async fn empty_job_list_produces_empty_report() {
    let config = test_config(vec![]);
    let tool = MockBagTool::new();

    let report = run_jobs(&config, &tool).await;
    assert!(report.jobs.is_empty());
    assert_eq!(report.completed(), 0);
}
