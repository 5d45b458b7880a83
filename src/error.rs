//! Domain-specific error types for the bootstrapper.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`ManifestError`],
//! [`SubprocessError`]) while command handlers at the CLI boundary convert
//! them to [`anyhow::Error`] via the standard `?` operator.
//!
//! None of these errors is fatal to a run: each one is caught where it
//! happens, logged, and recorded as a failed step.
//!
//! # Error hierarchy
//!
//! ```text
//! WincfgError
//! ├── Manifest(ManifestError)     : unreadable or unparsable package manifest
//! ├── Subprocess(SubprocessError) : winget / PowerShell invocation failures
//! ├── Filesystem(FilesystemError) : create, write, copy, link failures
//! └── Config(ConfigError)         : home / environment resolution
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the bootstrapper.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum WincfgError {
    /// The package manifest could not be loaded.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// A child process could not be started or reported failure.
    #[error("Subprocess error: {0}")]
    Subprocess(#[from] SubprocessError),

    /// A filesystem operation failed.
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Settings could not be resolved from the environment.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that arise while loading the package manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest source could not be read.
    #[error("failed to read manifest {location}: {source}")]
    Read {
        /// Where the manifest was read from (file path or bundled name).
        location: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The bundled manifest is not present in the template store.
    #[error("bundled manifest not found: {0}")]
    Missing(String),

    /// The manifest is not valid JSON or does not match the record schema.
    #[error("failed to parse manifest {location}: {source}")]
    Parse {
        /// Where the manifest was read from (file path or bundled name).
        location: String,
        /// Underlying decoding error.
        source: serde_json::Error,
    },
}

/// Errors that arise from running external programs.
#[derive(Error, Debug)]
pub enum SubprocessError {
    /// The program could not be started at all (not found, permission denied).
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully.
    #[error("{program} failed (exit {}): {stderr}", .code.unwrap_or(-1))]
    Failed {
        /// Program (and context label) that was invoked.
        program: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The program succeeded but produced no usable output.
    #[error("{0} returned no output")]
    EmptyOutput(String),
}

/// Errors that arise from filesystem operations.
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// A directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A template file or folder does not exist in the store.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// A symbolic link could not be created or replaced.
    #[error("symlink error at {}: {reason}", .link.display())]
    Symlink {
        /// Path where the link should live.
        link: PathBuf,
        /// Human-readable reason.
        reason: String,
    },
}

/// Errors that arise while resolving settings from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `USERPROFILE` nor `HOME` is set.
    #[error("neither USERPROFILE nor HOME environment variable is set")]
    MissingHome,

    /// A required environment variable is not set or empty.
    #[error("environment variable {0} is not set")]
    MissingVariable(String),
}
