//! Non-fatal manifest checks.
//!
//! Each validator inspects the loaded packages and returns warnings; none of
//! them stops a run.
use std::collections::HashSet;
use std::path::{Component, Path};

use super::manifest::PackageDescriptor;

/// Source name used in warnings raised against the package manifest.
const MANIFEST_SOURCE: &str = "packages.json";

/// A validation warning detected during manifest loading.
///
/// Warnings never stop a run; they are logged so a broken manifest entry is
/// visible before it produces a confusing failure later on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "packages.json").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning for `item` in `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.source, self.item, self.message)
    }
}

/// Trait for manifest validators.
pub trait ConfigValidator {
    /// Validate the manifest and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;
}

/// Checks package identifiers and config folder names.
#[derive(Debug)]
pub struct PackageValidator<'a> {
    packages: &'a [PackageDescriptor],
}

impl<'a> PackageValidator<'a> {
    /// Create a validator over `packages`.
    #[must_use]
    pub const fn new(packages: &'a [PackageDescriptor]) -> Self {
        Self { packages }
    }
}

impl ConfigValidator for PackageValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for package in self.packages {
            if package.id.trim().is_empty() {
                warnings.push(ValidationWarning::new(
                    MANIFEST_SOURCE,
                    &package.id,
                    "package id is empty",
                ));
            } else if !seen.insert(package.id.as_str()) {
                warnings.push(ValidationWarning::new(
                    MANIFEST_SOURCE,
                    &package.id,
                    "duplicate package id",
                ));
            }

            if let Some(folder) = &package.config_folder
                && !is_single_component(folder)
            {
                warnings.push(ValidationWarning::new(
                    MANIFEST_SOURCE,
                    &package.id,
                    format!("configFolder '{folder}' should be a single directory name"),
                ));
            }
        }

        warnings
    }
}

/// Checks that symlink sources stay inside the config root.
#[derive(Debug)]
pub struct SymlinkValidator<'a> {
    packages: &'a [PackageDescriptor],
}

impl<'a> SymlinkValidator<'a> {
    /// Create a validator over `packages`.
    #[must_use]
    pub const fn new(packages: &'a [PackageDescriptor]) -> Self {
        Self { packages }
    }
}

impl ConfigValidator for SymlinkValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for package in self.packages {
            for link in &package.symlinks {
                let source = Path::new(&link.source);
                if source.is_absolute() || link.source.starts_with(['/', '\\']) {
                    warnings.push(ValidationWarning::new(
                        MANIFEST_SOURCE,
                        format!("{}: {}", package.id, link.source),
                        "symlink source should be relative to the config root",
                    ));
                } else if source.components().any(|c| c == Component::ParentDir) {
                    warnings.push(ValidationWarning::new(
                        MANIFEST_SOURCE,
                        format!("{}: {}", package.id, link.source),
                        "symlink source escapes the config root",
                    ));
                }

                if link.target.trim().is_empty() {
                    warnings.push(ValidationWarning::new(
                        MANIFEST_SOURCE,
                        format!("{}: {}", package.id, link.source),
                        "symlink target variable is empty",
                    ));
                }
            }
        }

        warnings
    }
}

/// Run every validator over the manifest.
#[must_use]
pub fn validate_all(packages: &[PackageDescriptor]) -> Vec<ValidationWarning> {
    let validators: [&dyn ConfigValidator; 2] = [
        &PackageValidator::new(packages),
        &SymlinkValidator::new(packages),
    ];
    validators.iter().flat_map(|v| v.validate()).collect()
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
