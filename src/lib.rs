//! bag-courier: orchestration pipeline around the `apt-cmd` binary.
//!
//! Reads a YAML job list and, per job, shells out to `apt-cmd bag create`,
//! `apt-cmd bag validate` and `apt-cmd s3 upload` in sequence, deciding
//! success per step from the subprocess exit code.

pub mod apt_cmd;
pub mod cli;
pub mod config;
pub mod contract;
pub mod load_config;
pub mod pipeline;

pub use cli::{run, Cli, Commands};
