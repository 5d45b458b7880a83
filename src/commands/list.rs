//! Command: list the packages in the manifest.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::PackageDescriptor;
use crate::logging::{Log, Logger};
use crate::prompt::option_label;
use crate::resources::package::{self, InstalledSet};

/// Marker shown after packages winget already reports as installed.
const INSTALLED_MARKER: &str = "(installed)";

/// Print every manifest package with its picker label.
///
/// # Errors
///
/// Returns an error if settings cannot be resolved.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let ctx = super::build_context(global, Arc::clone(log) as Arc<dyn Log>)?;
    let packages = super::load_packages(&ctx, global);
    let installed = package::load_installed_set(ctx.executor.as_ref(), ctx.log.as_ref());

    for line in render(&packages, &installed) {
        println!("{line}");
    }
    Ok(())
}

/// One line per package, in manifest order.
#[must_use]
pub fn render(packages: &[PackageDescriptor], installed: &InstalledSet) -> Vec<String> {
    packages
        .iter()
        .map(|p| {
            let label = option_label(p);
            if installed.contains(&p.id) {
                format!("{label} {INSTALLED_MARKER}")
            } else {
                label
            }
        })
        .collect()
}
