//! `package.json` construction and serialization
//!
//! Every manifest starts from a base template built from
//! [`ManifestDefaults`](crate::config::ManifestDefaults) and is deep-merged
//! with the per-package fields (name, version, dependency maps). The base is
//! rebuilt on every call, so no two packages ever share a document.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use serde_json::{json, Map, Value as JsonValue};

use crate::config::ReleaseConfig;
use crate::error::{Error, Result};

/// File name written into every package directory
pub const MANIFEST_FILE: &str = "package.json";

/// A name -> version range mapping, as used by `dependencies` and
/// `peerDependencies`
pub type DependencyMap = Map<String, JsonValue>;

/// Build a dependency map from `(package, range)` pairs
pub fn dependency_map<'a, I>(entries: I) -> DependencyMap
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .map(|(name, range)| (name.to_string(), JsonValue::String(range.to_string())))
        .collect()
}

/// The fields shared by every package
pub fn base_template(config: &ReleaseConfig) -> JsonValue {
    let defaults = &config.manifest;
    json!({
        "description": defaults.description,
        "main": defaults.main,
        "module": defaults.module,
        "typings": defaults.typings,
        "author": defaults.author,
        "license": defaults.license,
        "repository": {
            "type": "git",
            "url": defaults.repository,
        },
    })
}

/// Recursively merge `source` into `target`.
///
/// Objects are merged key by key; any other value in `source` replaces the
/// one in `target`.
pub fn merge_json_values(target: &mut JsonValue, source: &JsonValue) {
    match (target, source) {
        (JsonValue::Object(target_map), JsonValue::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_json_values(existing, value);
                    }
                    Some(existing) => *existing = value.clone(),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

/// Build the manifest for the package `name`.
///
/// Pure: no I/O, and the result shares nothing with earlier results.
pub fn build_manifest(
    config: &ReleaseConfig,
    name: &str,
    peer_dependencies: DependencyMap,
    dependencies: DependencyMap,
    version: &Version,
) -> JsonValue {
    let mut manifest = base_template(config);
    let overrides = json!({
        "name": config.scoped_name(name),
        "dependencies": dependencies,
        "peerDependencies": peer_dependencies,
        "version": version.to_string(),
    });
    merge_json_values(&mut manifest, &overrides);
    manifest
}

/// Serialize `document` to `<dir>/package.json`, creating `dir` as needed.
///
/// Output is compact JSON followed by a newline. Returns the written path.
pub fn write_manifest_file(document: &JsonValue, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", dir.display(), e),
    })?;

    let path = dir.join(MANIFEST_FILE);
    let mut content = serde_json::to_string(document)?;
    content.push('\n');

    fs::write(&path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", path.display(), e),
    })?;

    Ok(path)
}
