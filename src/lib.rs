//! Windows development environment bootstrapper.
//!
//! Lets the user pick tools from a bundled package manifest, installs the
//! missing ones with winget in a single batch, and lays down their
//! configuration: an aggregated PowerShell profile, per-tool config folders
//! and symbolic links.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: settings, manifest loading and validation
//! - **[`resources`]**: idempotent primitives (winget packages, symlinks, the profile file)
//! - **[`tasks`]**: named units of work that record per-step outcomes
//! - **[`commands`]**: subcommand orchestration (`install`, `list`, `completions`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod prompt;
pub mod resources;
pub mod tasks;
