//! Orchestrator for a complete release run
//!
//! Runs the phases in order:
//! 1. Resolve configuration and read the root project version
//! 2. Discover plugin source paths
//! 3. Prepare every manifest (fatal on error)
//! 4. Publish the allow-listed directories
//!
//! Preparation finishes before any publish command starts.

use std::path::{Path, PathBuf};

use log::info;

use crate::config::{self, ReleaseConfig};
use crate::discovery::{discover_plugins, read_root_version};
use crate::error::Result;
use crate::prepare::{prepare, PreparedRelease};
use crate::publish::{Dispatcher, NpmRegistry, PublishReport, Registry};

/// Inputs of a release run
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Project root holding `package.json` and the plugin sources
    pub root: PathBuf,
    /// Explicit config file; `<root>/.plugin-publish.yaml` otherwise
    pub config_path: Option<PathBuf>,
    /// Replaces the configured allow-list when non-empty
    pub packages: Vec<String>,
    /// Program invoked as `<npm> publish <dir> <flags...>`
    pub npm: String,
    /// Extra arguments forwarded to every publish invocation
    pub publish_flags: Vec<String>,
    pub ignore_errors: bool,
}

impl ReleaseOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_path: None,
            packages: Vec::new(),
            npm: "npm".to_string(),
            publish_flags: Vec::new(),
            ignore_errors: false,
        }
    }

    /// Load the configuration and apply command-line overrides
    pub fn resolve_config(&self) -> Result<ReleaseConfig> {
        let mut config = config::load(&self.root, self.config_path.as_deref())?;
        if !self.packages.is_empty() {
            config.publish_packages = self.packages.clone();
        }
        Ok(config)
    }
}

/// What a release run did
#[derive(Debug)]
pub struct ReleaseSummary {
    pub prepared: PreparedRelease,
    pub report: PublishReport,
}

impl ReleaseSummary {
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }
}

/// Run a release with `npm` as the registry client
pub fn run(options: &ReleaseOptions) -> Result<ReleaseSummary> {
    let registry = NpmRegistry::new(options.npm.clone(), options.publish_flags.clone());
    info!("npm publish FLAGS: {}", registry.flags().join(" "));
    run_with_registry(options, registry)
}

/// Run a release against any [`Registry`]
pub fn run_with_registry<R: Registry>(options: &ReleaseOptions, registry: R) -> Result<ReleaseSummary> {
    let config = options.resolve_config()?;
    let version = read_root_version(&options.root)?;
    info!("Releasing version {}", version);

    let plugin_paths = discover_plugins(&options.root, &config.plugins)?;
    let dist = dist_root(&options.root, &config);
    let prepared = prepare(&config, &dist, &plugin_paths, &version)?;

    let dispatcher = Dispatcher::new(registry, options.ignore_errors);
    let report = dispatcher.publish(&prepared.publish_set);

    Ok(ReleaseSummary { prepared, report })
}

/// Absolute distribution root for a project
pub fn dist_root(root: &Path, config: &ReleaseConfig) -> PathBuf {
    root.join(&config.dist)
}
