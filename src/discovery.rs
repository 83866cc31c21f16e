//! Plugin discovery and root project metadata
//!
//! Supplies the two inputs the preparer consumes: the ordered list of plugin
//! source paths, and the version string of the root `package.json`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use semver::Version;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Find every plugin source path matching `pattern` under `root`.
///
/// `pattern` is a glob relative to `root`, e.g.
/// `src/@awesome-cordova-plugins/plugins/*/index.ts`. Results come back in
/// glob order (sorted by path).
pub fn discover_plugins(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let root_str = root.to_str().ok_or_else(|| Error::Discovery {
        message: format!("non UTF-8 project root: {}", root.display()),
    })?;
    // The root is a literal path; only `pattern` carries glob syntax
    let full_pattern = Path::new(&glob::Pattern::escape(root_str)).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let mut paths = Vec::new();
    for entry in glob::glob(&full_pattern)? {
        let path = entry.map_err(|e| Error::Discovery {
            message: format!("unreadable plugin entry: {}", e),
        })?;
        paths.push(path);
    }

    debug!("Discovered {} plugin(s) matching {}", paths.len(), pattern);
    Ok(paths)
}

fn separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[/\\]+").expect("separator regex is valid"))
}

/// Derive a plugin's name from its source path.
///
/// The name is the second-to-last path segment, so both
/// `.../plugins/camera/index.ts` and `.../plugins/camera/src` yield `camera`.
/// Both `/` and `\` count as separators.
pub fn plugin_name(path: &Path) -> Result<String> {
    let raw = path.to_string_lossy();
    let segments: Vec<&str> = separators().split(&raw).collect();

    match segments.len().checked_sub(2).map(|i| segments[i]) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(Error::Discovery {
            message: format!("cannot derive a plugin name from '{}'", raw),
        }),
    }
}

#[derive(Deserialize)]
struct RootPackage {
    version: Option<String>,
}

/// Read and parse the `version` of `<root>/package.json`
pub fn read_root_version(root: &Path) -> Result<Version> {
    let path = root.join("package.json");
    let content = std::fs::read_to_string(&path).map_err(|e| Error::RootVersion {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let package: RootPackage = serde_json::from_str(&content).map_err(|e| Error::RootVersion {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let version = package.version.ok_or_else(|| Error::RootVersion {
        path: path.clone(),
        message: "missing \"version\" field".to_string(),
    })?;

    Ok(Version::parse(&version)?)
}
