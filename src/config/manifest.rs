//! Package manifest loading.
//!
//! The manifest is a JSON array of package records bundled with the binary
//! as `templates/packages.json`:
//!
//! ```json
//! [
//!   {
//!     "id": "Derailed.k9s",
//!     "icon": "🐶",
//!     "description": "Kubernetes TUI",
//!     "profile": ["$Env:K9S_CONFIG_DIR=\"$HOME\\.config\\k9s\""],
//!     "configFolder": "k9s",
//!     "symlinks": [{ "source": "k9s", "target": "LOCALAPPDATA" }]
//!   }
//! ]
//! ```
//!
//! Only `id` is required.  Optional fields that are missing, `null`, or of
//! the wrong shape decode to their empty value instead of failing the whole
//! manifest.
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::assets::FileStore;
use crate::error::ManifestError;

/// Name of the bundled manifest inside the template store.
pub const MANIFEST_FILE: &str = "packages.json";

/// One selectable package and the configuration it brings along.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    /// Package manager identifier (e.g. `Starship.Starship`).
    pub id: String,
    /// Display glyph shown next to the package in the picker.
    #[serde(default, deserialize_with = "lenient")]
    pub icon: String,
    /// Human-readable description.
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    /// Lines appended to the shell profile when the package is selected.
    #[serde(default, deserialize_with = "lenient")]
    pub profile: Vec<String>,
    /// Template subdirectory copied verbatim into the config root.
    #[serde(default, deserialize_with = "lenient")]
    pub config_folder: Option<String>,
    /// Links created from environment-determined locations into the config root.
    #[serde(default, deserialize_with = "lenient")]
    pub symlinks: Vec<SymlinkDeclaration>,
}

impl PackageDescriptor {
    /// Create a descriptor with only an id set.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            icon: String::new(),
            description: String::new(),
            profile: Vec::new(),
            config_folder: None,
            symlinks: Vec::new(),
        }
    }

    /// Whether selecting this package contributes a profile block.
    #[must_use]
    pub const fn has_profile(&self) -> bool {
        !self.profile.is_empty()
    }
}

/// A link declared by a package.
///
/// The link lives at `$<target>/<name>` (with `name` defaulting to
/// `source`) and points at `<config root>/<source>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SymlinkDeclaration {
    /// Path relative to the config root that the link points to.
    pub source: String,
    /// Environment variable naming the directory that receives the link.
    pub target: String,
    /// File or directory name of the link; defaults to `source`.
    #[serde(default)]
    pub name: Option<String>,
}

impl SymlinkDeclaration {
    /// Name of the link inside the target directory.
    #[must_use]
    pub fn link_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.source)
    }
}

/// Decode an optional field, falling back to its default when the value is
/// `null` or has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Parse manifest bytes.
///
/// `location` is only used in error messages.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] if the bytes are not a JSON array of
/// records each carrying a string `id`.
pub fn parse(bytes: &[u8], location: &str) -> Result<Vec<PackageDescriptor>, ManifestError> {
    serde_json::from_slice(bytes).map_err(|source| ManifestError::Parse {
        location: location.to_string(),
        source,
    })
}

/// Load the manifest bundled in the template store.
///
/// # Errors
///
/// Returns [`ManifestError::Missing`] if the store has no `packages.json`,
/// or [`ManifestError::Parse`] if it cannot be decoded.
pub fn load_bundled(store: &dyn FileStore) -> Result<Vec<PackageDescriptor>, ManifestError> {
    let bytes = store
        .read(MANIFEST_FILE)
        .map_err(|_| ManifestError::Missing(MANIFEST_FILE.to_string()))?;
    parse(&bytes, MANIFEST_FILE)
}

/// Load a manifest from a file on disk.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] if the file cannot be read, or
/// [`ManifestError::Parse`] if it cannot be decoded.
pub fn load_file(path: &Path) -> Result<Vec<PackageDescriptor>, ManifestError> {
    let location = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| ManifestError::Read {
        location: location.clone(),
        source,
    })?;
    parse(&bytes, &location)
}
