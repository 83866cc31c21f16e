//! Shared test utilities for E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_plugins(&["camera", "badge"]);
//! fixture.command().arg("--npm").arg("echo").assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::TestFixture;
    #[allow(unused_imports)]
    pub use super::DIST;
}

/// Default distribution root, relative to the project root
pub const DIST: &str = "dist/@awesome-cordova-plugins";

/// A temporary monorepo with a root `package.json` and plugin sources.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a project at version 5.41.0 with no plugins.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("package.json")
            .write_str(r#"{"name": "awesome-cordova-plugins", "version": "5.41.0"}"#)
            .expect("Failed to write package.json");
        Self { temp_dir }
    }

    /// Add one plugin source directory per name.
    pub fn with_plugins(self, names: &[&str]) -> Self {
        for name in names {
            self.temp_dir
                .child(format!("src/@awesome-cordova-plugins/plugins/{}/index.ts", name))
                .write_str("export {};\n")
                .expect("Failed to write plugin source");
        }
        self
    }

    /// Add a `.plugin-publish.yaml` with the given content.
    #[allow(dead_code)]
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".plugin-publish.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add an executable script standing in for `npm`.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn with_fake_npm(self, body: &str) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let script = self.temp_dir.child("fake-npm");
        script
            .write_str(&format!("#!/bin/sh\n{}\n", body))
            .expect("Failed to write fake npm");
        std::fs::set_permissions(script.path(), std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake npm executable");
        self
    }

    /// Path of the script written by `with_fake_npm`.
    #[allow(dead_code)]
    pub fn fake_npm(&self) -> PathBuf {
        self.temp_dir.path().join("fake-npm")
    }

    /// Get the path to the project root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a directory under the distribution root.
    pub fn dist(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(DIST).join(relative)
    }

    /// A `plugin-publish` command rooted at this project.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("plugin-publish");
        cmd.arg("--root")
            .arg(self.path())
            .arg("--color")
            .arg("never")
            .env_remove("RUST_LOG")
            .env_remove("PLUGIN_PUBLISH_CONFIG")
            .env_remove("PLUGIN_PUBLISH_NPM");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
