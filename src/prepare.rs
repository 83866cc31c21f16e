//! Manifest preparation
//!
//! Writes one `package.json` for the core package and two for every plugin
//! (the plugin directory and its `ngx` companion), and collects the
//! directories that should be handed to the registry.
//!
//! Any write failure aborts preparation: a partially prepared release is
//! never published.

use std::path::{Path, PathBuf};

use log::{debug, info};
use semver::Version;
use serde_json::Value as JsonValue;

use crate::config::ReleaseConfig;
use crate::discovery::plugin_name;
use crate::error::Result;
use crate::manifest::{build_manifest, dependency_map, write_manifest_file, DependencyMap};

/// Name of the core package directory under the distribution root
pub const CORE_PACKAGE: &str = "core";

/// Name of the framework-integration companion directory inside each plugin
pub const COMPANION_DIR: &str = "ngx";

/// Output of [`prepare`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedRelease {
    /// Every directory a manifest was written to, in write order
    pub written: Vec<PathBuf>,
    /// Directories to publish, in discovery order
    pub publish_set: Vec<PathBuf>,
}

/// Writes manifests and tracks which of them are published
pub struct Preparer<'a> {
    config: &'a ReleaseConfig,
    release: PreparedRelease,
}

impl<'a> Preparer<'a> {
    pub fn new(config: &'a ReleaseConfig) -> Self {
        Self {
            config,
            release: PreparedRelease::default(),
        }
    }

    /// Write the manifest of package `name` into `dir`.
    ///
    /// `dir` joins the publish set when `name` is on the allow-list.
    pub fn write_manifest(&mut self, name: &str, document: &JsonValue, dir: &Path) -> Result<()> {
        let path = write_manifest_file(document, dir)?;
        debug!("Wrote {}", path.display());
        self.release.written.push(dir.to_path_buf());

        if self.config.is_published(name) {
            debug!("Queued {} for publishing", name);
            self.release.publish_set.push(dir.to_path_buf());
        }
        Ok(())
    }

    /// Write a companion copy of a manifest into `dir`.
    ///
    /// Companion directories are never published directly.
    pub fn write_companion_manifest(&mut self, document: &JsonValue, dir: &Path) -> Result<()> {
        let path = write_manifest_file(document, dir)?;
        debug!("Wrote {}", path.display());
        self.release.written.push(dir.to_path_buf());
        Ok(())
    }

    pub fn finish(self) -> PreparedRelease {
        self.release
    }
}

/// Write every manifest of the release under `dist`.
///
/// `dist` is the absolute distribution root; `plugin_paths` comes from
/// [`discover_plugins`](crate::discovery::discover_plugins).
pub fn prepare(
    config: &ReleaseConfig,
    dist: &Path,
    plugin_paths: &[PathBuf],
    version: &Version,
) -> Result<PreparedRelease> {
    let mut preparer = Preparer::new(config);

    let core = build_manifest(
        config,
        CORE_PACKAGE,
        dependency_map([("rxjs", config.rxjs_version_range.as_str())]),
        dependency_map([(config.types_package.as_str(), "latest")]),
        version,
    );
    preparer.write_manifest(CORE_PACKAGE, &core, &dist.join(CORE_PACKAGE))?;

    let plugin_peers = dependency_map([
        (
            config.core_package.as_str(),
            config.core_version_range.as_str(),
        ),
        ("rxjs", config.rxjs_version_range.as_str()),
    ]);

    for plugin_path in plugin_paths {
        let name = plugin_name(plugin_path)?;
        let manifest = build_manifest(
            config,
            &name,
            plugin_peers.clone(),
            DependencyMap::new(),
            version,
        );
        let dir = dist.join("plugins").join(&name);

        preparer.write_manifest(&name, &manifest, &dir)?;
        preparer.write_companion_manifest(&manifest, &dir.join(COMPANION_DIR))?;
    }

    let release = preparer.finish();
    info!(
        "Prepared {} manifest(s), {} package(s) to publish",
        release.written.len(),
        release.publish_set.len()
    );
    Ok(release)
}
