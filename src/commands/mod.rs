//! Top-level subcommand orchestration.
pub mod completions;
pub mod install;
pub mod list;
pub mod version;

use std::sync::Arc;

use anyhow::Result;

use crate::assets::{DirStore, EmbeddedStore, FileStore};
use crate::cli::GlobalOpts;
use crate::config::{self, PackageDescriptor, Settings};
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::tasks::Context;

/// Version string embedded at build time.
#[must_use]
pub fn version_string() -> &'static str {
    option_env!("WINCFG_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Resolve settings from the environment and apply `--config-root`.
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn resolve_settings(global: &GlobalOpts) -> Result<Settings> {
    let settings = Settings::from_env()?;
    Ok(match &global.config_root {
        Some(root) => settings.with_config_root(root),
        None => settings,
    })
}

/// The template store selected by `--templates`, or the bundled one.
#[must_use]
pub fn template_store(global: &GlobalOpts) -> Arc<dyn FileStore> {
    match &global.templates {
        Some(dir) => Arc::new(DirStore::new(dir)),
        None => Arc::new(EmbeddedStore),
    }
}

/// Build the run context shared by every task of a command.
///
/// # Errors
///
/// Returns an error if settings cannot be resolved.
pub fn build_context(global: &GlobalOpts, log: Arc<dyn Log>) -> Result<Context> {
    let settings = resolve_settings(global)?;
    log.debug(&format!("config root: {}", settings.config_root.display()));
    Ok(Context::new(
        settings,
        log,
        Arc::new(SystemExecutor),
        template_store(global),
    ))
}

/// Load the manifest, falling back to an empty list on failure.
///
/// A broken manifest never stops the run: the error is logged and the
/// remaining steps see no packages.
#[must_use]
pub fn load_packages(ctx: &Context, global: &GlobalOpts) -> Vec<PackageDescriptor> {
    ctx.log.stage("Loading manifest");
    match config::load_manifest(ctx.store.as_ref(), global.manifest.as_deref(), ctx.log.as_ref()) {
        Ok(packages) => {
            ctx.log.info(&format!("loaded {} packages", packages.len()));
            packages
        }
        Err(e) => {
            ctx.log.error(&format!("failed to load manifest: {e}"));
            Vec::new()
        }
    }
}

/// Print the summary and bail if any task failed.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
