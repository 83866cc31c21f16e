//! # Error Handling
//!
//! This module defines the centralized error type for `plugin-publish`. It
//! uses the `thiserror` library to create an `Error` enum that covers every
//! failure mode of a release run, with contextual fields to aid debugging.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into two groups:
//!   - Prepare-phase failures (configuration, discovery, version lookup,
//!     manifest writes). These are fatal and propagate to the caller.
//!   - Publish-phase failures (`PublishCommand`, `WorkerPool`). The
//!     dispatcher records these per package instead of aborting the run.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for plugin-publish operations
#[derive(Error, Debug)]
pub enum Error {
    /// The release configuration file could not be parsed or failed validation.
    ///
    /// Optionally carries a hint about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// Plugin discovery failed (bad pattern, unreadable entry, unnamed path).
    #[error("Plugin discovery error: {message}")]
    Discovery { message: String },

    /// The root project's `package.json` did not yield a usable version.
    #[error("Root version error for {}: {message}", path.display())]
    RootVersion { path: PathBuf, message: String },

    /// A manifest could not be written to disk.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// The registry publish command failed for one package directory.
    #[error("Publish command failed for {}: {message}", package.display())]
    PublishCommand {
        package: PathBuf,
        /// Exit code of the child process, if it ran at all
        status: Option<i32>,
        /// Diagnostic text: stderr of the child, or the spawn error
        message: String,
    },

    /// The publish worker pool could not be created.
    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
