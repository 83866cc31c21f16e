//! # Release Configuration
//!
//! This module defines `ReleaseConfig`, the set of constants that shape a
//! release: the npm scope packages are published under, where manifests are
//! written, how plugins are discovered, which packages are actually sent to
//! the registry, and the shared manifest fields.
//!
//! Every field has a default, so a repository without a config file gets the
//! stock release. A `.plugin-publish.yaml` file may override any subset of
//! keys:
//!
//! ```yaml
//! scope: "@my-org-cordova-plugins"
//! publish_packages:
//!   - camera
//!   - in-app-browser
//! manifest:
//!   author: my-org
//! ```
//!
//! The file is validated after parsing (see [`ReleaseConfig::validate`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// File name looked up in the project root when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".plugin-publish.yaml";

/// Shared fields merged into every generated `package.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestDefaults {
    pub description: String,
    pub main: String,
    pub module: String,
    pub typings: String,
    pub author: String,
    pub license: String,
    /// Git URL recorded under `repository.url`
    pub repository: String,
}

impl Default for ManifestDefaults {
    fn default() -> Self {
        Self {
            description: "Awesome Cordova Plugins (bennord fork) - Native plugins for ionic apps"
                .to_string(),
            main: "bundle.js".to_string(),
            module: "index.js".to_string(),
            typings: "index.d.ts".to_string(),
            author: "ionic".to_string(),
            license: "MIT".to_string(),
            repository: "https://github.com/bennord/awesome-cordova-plugins.git".to_string(),
        }
    }
}

/// Release-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// npm scope prepended to every package name
    pub scope: String,
    /// Distribution root, relative to the project root
    pub dist: PathBuf,
    /// Glob (relative to the project root) matching one file per plugin
    pub plugins: String,
    /// Package names whose prepared directory is handed to `npm publish`
    pub publish_packages: Vec<String>,
    /// Package every plugin declares as a peer dependency
    pub core_package: String,
    pub core_version_range: String,
    pub rxjs_version_range: String,
    /// Type definitions the core package depends on at `latest`
    pub types_package: String,
    pub manifest: ManifestDefaults,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            scope: "@bennord-awesome-cordova-plugins".to_string(),
            dist: PathBuf::from("dist/@awesome-cordova-plugins"),
            plugins: "src/@awesome-cordova-plugins/plugins/*/index.ts".to_string(),
            publish_packages: vec!["in-app-browser".to_string()],
            core_package: "@awesome-cordova-plugins/core".to_string(),
            core_version_range: "^5.1.0".to_string(),
            rxjs_version_range: "^5.5.0 || ^6.5.0 || ^7.3.0".to_string(),
            types_package: "@types/cordova".to_string(),
            manifest: ManifestDefaults::default(),
        }
    }
}

impl ReleaseConfig {
    /// Whether `name` is on the publish allow-list
    pub fn is_published(&self, name: &str) -> bool {
        self.publish_packages.iter().any(|p| p == name)
    }

    /// Full scoped package name, e.g. `@scope/camera`
    pub fn scoped_name(&self, name: &str) -> String {
        format!("{}/{}", self.scope, name)
    }

    /// Check values that would otherwise only fail at publish time
    pub fn validate(&self) -> Result<()> {
        if !self.scope.starts_with('@') || self.scope.len() < 2 || self.scope.contains('/') {
            return Err(Error::ConfigParse {
                message: format!("invalid scope '{}'", self.scope),
                hint: Some("A scope looks like '@my-org', without a trailing '/'".to_string()),
            });
        }

        Url::parse(&self.manifest.repository).map_err(|e| Error::ConfigParse {
            message: format!("invalid repository URL '{}': {}", self.manifest.repository, e),
            hint: Some("Use a full URL such as 'https://github.com/org/repo.git'".to_string()),
        })?;

        glob::Pattern::new(&self.plugins)?;

        if self.dist.is_absolute() {
            return Err(Error::ConfigParse {
                message: format!("dist '{}' must be relative", self.dist.display()),
                hint: Some("Paths are resolved against the project root".to_string()),
            });
        }

        Ok(())
    }
}

/// Parse a YAML string into a validated configuration
pub fn parse(yaml_content: &str) -> Result<ReleaseConfig> {
    // An empty or comment-only file deserializes to null
    let config = match serde_yaml::from_str::<Option<ReleaseConfig>>(yaml_content) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            return Err(Error::ConfigParse {
                message: e.to_string(),
                hint: None,
            })
        }
    };
    config.validate()?;
    Ok(config)
}

/// Load the configuration from a file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ReleaseConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("cannot read '{}': {}", path.display(), e),
        hint: None,
    })?;
    parse(&content)
}

/// Resolve the configuration for a project root.
///
/// An explicit path must exist. Without one, `<root>/.plugin-publish.yaml`
/// is used when present and the defaults otherwise.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<ReleaseConfig> {
    match explicit {
        Some(path) => from_file(path),
        None => {
            let candidate = root.join(DEFAULT_CONFIG_FILE);
            if candidate.is_file() {
                from_file(candidate)
            } else {
                Ok(ReleaseConfig::default())
            }
        }
    }
}
