//! # Publish Dispatcher
//!
//! Runs the registry publish command once per prepared package directory,
//! with at most one in-flight command per available CPU.
//!
//! ## Outcomes
//!
//! Every directory ends in exactly one [`PublishOutcome`]:
//!
//! - `Published`: the command exited successfully.
//! - `SkippedDuplicate`: the registry already has this version. Re-running a
//!   release is therefore idempotent.
//! - `Ignored`: the command failed but the dispatcher was told to ignore
//!   errors. The failure is logged as a warning.
//! - `Failed`: any other failure.
//!
//! Failures never abort the other units and nothing is retried or rolled
//! back. The caller gets a [`PublishReport`] in input order; completion
//! order across units is unspecified.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use log::{debug, error, info, warn};
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Registry message for a version that already exists
pub const DUPLICATE_VERSION_MESSAGE: &str =
    "You cannot publish over the previously published version";

/// Captured output of a successful publish command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryOutput {
    pub stdout: String,
}

/// Something that can publish a package directory
pub trait Registry: Sync {
    /// Publish the package in `package_dir`, returning the command output.
    ///
    /// Failures are reported as `Error::PublishCommand`.
    fn publish(&self, package_dir: &Path) -> Result<RegistryOutput>;
}

/// Publishes by running `<program> publish <dir> <flags...>`
#[derive(Debug, Clone)]
pub struct NpmRegistry {
    program: String,
    flags: Vec<String>,
}

impl NpmRegistry {
    /// `flags` are appended verbatim to every invocation
    pub fn new(program: impl Into<String>, flags: Vec<String>) -> Self {
        Self {
            program: program.into(),
            flags,
        }
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }
}

impl Registry for NpmRegistry {
    fn publish(&self, package_dir: &Path) -> Result<RegistryOutput> {
        let output = Command::new(&self.program)
            .arg("publish")
            .arg(package_dir)
            .args(&self.flags)
            .output()
            .map_err(|e| Error::PublishCommand {
                package: package_dir.to_path_buf(),
                status: None,
                message: format!("failed to run '{}': {}", self.program, e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !stdout.trim().is_empty() {
            debug!("{}", stdout.trim());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::PublishCommand {
                package: package_dir.to_path_buf(),
                status: output.status.code(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(RegistryOutput { stdout })
    }
}

/// Final state of one publish unit
#[derive(Debug)]
pub enum PublishOutcome {
    Published,
    SkippedDuplicate,
    Ignored(String),
    Failed(Error),
}

impl PublishOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, PublishOutcome::Failed(_))
    }
}

/// Per-directory outcomes of a publish run, in input order
#[derive(Debug, Default)]
pub struct PublishReport {
    pub outcomes: Vec<(PathBuf, PublishOutcome)>,
}

impl PublishReport {
    /// True when no unit failed
    pub fn is_success(&self) -> bool {
        !self.outcomes.iter().any(|(_, outcome)| outcome.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes.iter().filter_map(|(dir, outcome)| match outcome {
            PublishOutcome::Failed(e) => Some((dir.as_path(), e)),
            _ => None,
        })
    }

    /// Report for a run whose workers never started: every unit failed
    pub fn not_started(package_dirs: &[PathBuf], cause: &Error) -> Self {
        let outcomes = package_dirs
            .iter()
            .map(|dir| {
                let error = Error::WorkerPool {
                    message: cause.to_string(),
                };
                (dir.clone(), PublishOutcome::Failed(error))
            })
            .collect();
        Self { outcomes }
    }

    pub fn published(&self) -> usize {
        self.count(|o| matches!(o, PublishOutcome::Published))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, PublishOutcome::SkippedDuplicate))
    }

    pub fn ignored(&self) -> usize {
        self.count(|o| matches!(o, PublishOutcome::Ignored(_)))
    }

    fn count(&self, pred: impl Fn(&PublishOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Number of publish commands allowed in flight: one per available CPU
pub fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Runs a [`Registry`] over a set of package directories
pub struct Dispatcher<R> {
    registry: R,
    ignore_errors: bool,
    workers: usize,
}

impl<R: Registry> Dispatcher<R> {
    pub fn new(registry: R, ignore_errors: bool) -> Self {
        Self {
            registry,
            ignore_errors,
            workers: worker_count(),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Publish a single directory and classify the result
    pub fn publish_one(&self, package_dir: &Path) -> PublishOutcome {
        match self.registry.publish(package_dir) {
            Ok(_) => {
                info!("Published {}", package_dir.display());
                PublishOutcome::Published
            }
            Err(e) if e.to_string().contains(DUPLICATE_VERSION_MESSAGE) => {
                debug!("Ignoring duplicate version error.");
                PublishOutcome::SkippedDuplicate
            }
            Err(e) if self.ignore_errors => {
                warn!("Ignoring publish error: {}", e);
                PublishOutcome::Ignored(e.to_string())
            }
            Err(e) => PublishOutcome::Failed(e),
        }
    }

    fn build_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("publish-{}", i))
            .build()
            .map_err(|e| Error::WorkerPool {
                message: e.to_string(),
            })
    }

    /// Publish every directory in `package_dirs`.
    ///
    /// Never fails as a whole: per-package failures, including a pool that
    /// could not start, land in the report.
    pub fn publish(&self, package_dirs: &[PathBuf]) -> PublishReport {
        debug!("Publishing started with {} worker(s)", self.workers);
        let started = Instant::now();

        let outcomes: Vec<(PathBuf, PublishOutcome)> = match self.build_pool() {
            Ok(pool) => pool.install(|| {
                package_dirs
                    .par_iter()
                    .map(|dir| (dir.clone(), self.publish_one(dir)))
                    .collect()
            }),
            Err(e) => {
                error!("{}", e);
                return self.finish(PublishReport::not_started(package_dirs, &e), started);
            }
        };
        self.finish(PublishReport { outcomes }, started)
    }

    fn finish(&self, report: PublishReport, started: Instant) -> PublishReport {
        if report.is_success() {
            info!("Done publishing!");
        } else {
            error!("Error publishing!");
            for (dir, e) in report.failures() {
                error!("{}: {}", dir.display(), e);
            }
        }

        info!("Publishing took {}ms", started.elapsed().as_millis());
        report
    }
}
