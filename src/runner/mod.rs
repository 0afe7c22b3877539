//! # Job Runner
//!
//! Executes independent pack and unpack jobs concurrently and reduces
//! their outcomes to a single summary. Jobs share nothing but the log
//! sink: a failing job is recorded and its siblings keep running.

use std::path::Path;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::common::JobConfig;
use crate::error::PackError;
use crate::{archive, extract};

/// One unit of work: build an archive from a tree, or unpack archives
/// into a tree.
#[derive(Debug, Clone)]
pub enum Job {
    Pack(JobConfig),
    Unpack(JobConfig),
}

impl Job {
    /// The job's destination path, used to label log lines.
    pub fn dest(&self) -> &Path {
        match self {
            Job::Pack(config) | Job::Unpack(config) => &config.dest,
        }
    }

    async fn execute(self) -> Result<(), PackError> {
        match self {
            Job::Pack(config) => archive::build(&config).await,
            Job::Unpack(config) => extract::extract(&config).await,
        }
    }
}

/// Aggregate outcome of a batch of jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// How many jobs finished without an error.
    pub succeeded: usize,
    /// True if at least one job failed, however many succeeded.
    pub failed: bool,
}

impl RunSummary {
    pub fn ok(&self) -> bool {
        !self.failed
    }
}

/// Runs every job concurrently and waits for all of them to finish.
///
/// All jobs are launched up front; the summary is produced only after
/// every job reaches a terminal state. A failing job is reported
/// individually and never cancels its siblings.
pub async fn run(jobs: Vec<Job>) -> RunSummary {
    let mut tasks = JoinSet::new();
    for job in jobs {
        let label = job.dest().display().to_string();
        tasks.spawn(async move { (label, job.execute().await) });
    }

    let mut summary = RunSummary::default();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok((_, Ok(()))) => summary.succeeded += 1,
            Ok((label, Err(err))) => {
                summary.failed = true;
                error!("job '{label}' failed: {err}");
            }
            Err(join_err) => {
                summary.failed = true;
                error!("job panicked: {join_err}");
            }
        }
    }

    if summary.succeeded > 0 {
        let noun = if summary.succeeded == 1 { "job" } else { "jobs" };
        info!("{} {noun} finished.", summary.succeeded);
    }
    summary
}
