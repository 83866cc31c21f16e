//! # Plugin Publish Library
//!
//! This library prepares `package.json` manifests for every package of a
//! plugin monorepo and publishes a selected subset of them to npm. It backs
//! the `plugin-publish` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use plugin_publish::config::ReleaseConfig;
//! use plugin_publish::manifest::{build_manifest, dependency_map, DependencyMap};
//! use semver::Version;
//!
//! let config = ReleaseConfig::default();
//! let manifest = build_manifest(
//!     &config,
//!     "camera",
//!     dependency_map([("rxjs", "^7.3.0")]),
//!     DependencyMap::new(),
//!     &Version::new(5, 41, 0),
//! );
//!
//! assert_eq!(manifest["name"], "@bennord-awesome-cordova-plugins/camera");
//! assert_eq!(manifest["version"], "5.41.0");
//! ```
//!
//! ## Execution Flow
//!
//! The entry point is [`release::run`], which executes:
//!
//! 1.  **Configuration**: Load `.plugin-publish.yaml` (or defaults) and the
//!     root project's version.
//! 2.  **Discovery**: Find every plugin source path.
//! 3.  **Preparation**: Write the core manifest and, per plugin, a manifest
//!     in the plugin directory and its `ngx` companion. Returns the set of
//!     directories to publish.
//! 4.  **Publishing**: Run `npm publish` over that set, one command in
//!     flight per CPU, tolerating already-published versions.

pub mod config;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod output;
pub mod prepare;
pub mod publish;
pub mod release;

#[cfg(test)]
mod manifest_proptest;
