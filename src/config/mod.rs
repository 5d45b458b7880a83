//! Run configuration: settings resolved from the environment and the package
//! manifest.
pub mod manifest;
pub mod settings;
pub mod validation;

use std::path::Path;

use crate::assets::FileStore;
use crate::error::ManifestError;
use crate::logging::Log;

pub use manifest::{PackageDescriptor, SymlinkDeclaration};
pub use settings::Settings;

/// Load the package manifest and log any validation warnings.
///
/// Reads `manifest` from disk when given, otherwise the `packages.json`
/// bundled in `store`.
///
/// # Errors
///
/// Returns a [`ManifestError`] if the manifest cannot be read or decoded.
pub fn load_manifest(
    store: &dyn FileStore,
    manifest: Option<&Path>,
    log: &dyn Log,
) -> Result<Vec<PackageDescriptor>, ManifestError> {
    let packages = match manifest {
        Some(path) => {
            log.debug(&format!("loading manifest from {}", path.display()));
            manifest::load_file(path)?
        }
        None => manifest::load_bundled(store)?,
    };

    log.debug(&format!("loaded {} packages", packages.len()));
    for warning in validation::validate_all(&packages) {
        log.warn(&warning.to_string());
    }

    Ok(packages)
}
