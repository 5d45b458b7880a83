//! Template store.
//!
//! At compile time, `include_dir!` embeds everything under `templates/`:
//!   - `packages.json`  the package manifest
//!   - `profile.ps1`    base of the aggregated shell profile
//!   - `<tool>/...`     per-tool config folders copied into the config root
//!
//! `--templates <DIR>` swaps the embedded copy for a [`DirStore`] so template
//! edits can be tried without rebuilding.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use include_dir::{Dir, DirEntry, include_dir};

use crate::error::FilesystemError;
use crate::resources::helpers::fs::copy_dir_recursive;

/// Every bundled template, compiled in at build time.
static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Read-only access to bundled template files.
pub trait FileStore: Send + Sync + Debug {
    /// Return the bytes of the template at `path` (relative, `/`-separated).
    ///
    /// # Errors
    ///
    /// Returns [`FilesystemError::TemplateNotFound`] if no such file exists.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Recursively copy the template directory `name` into `dest`, creating
    /// `dest` and overwriting files already there.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a template directory or a file
    /// cannot be written.
    fn copy_dir(&self, name: &str, dest: &Path) -> Result<()>;
}

/// Templates compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedStore;

impl FileStore for EmbeddedStore {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        TEMPLATES
            .get_file(path)
            .map(|f| f.contents().to_vec())
            .ok_or_else(|| FilesystemError::TemplateNotFound(path.to_string()).into())
    }

    fn copy_dir(&self, name: &str, dest: &Path) -> Result<()> {
        let dir = TEMPLATES
            .get_dir(name)
            .ok_or_else(|| FilesystemError::TemplateNotFound(name.to_string()))?;
        write_embedded_dir(dir, dir.path(), dest)
    }
}

/// Write the files of an embedded directory below `dest`, keeping their
/// layout relative to `root`.
fn write_embedded_dir(dir: &Dir<'_>, root: &Path, dest: &Path) -> Result<()> {
    let here = dest.join(dir.path().strip_prefix(root).unwrap_or(dir.path()));
    std::fs::create_dir_all(&here).map_err(|source| FilesystemError::CreateDir {
        path: here.clone(),
        source,
    })?;
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => write_embedded_dir(sub, root, dest)?,
            DirEntry::File(file) => {
                let relative = file.path().strip_prefix(root).unwrap_or(file.path());
                let target = dest.join(relative);
                std::fs::write(&target, file.contents()).map_err(|source| {
                    FilesystemError::Write {
                        path: target.clone(),
                        source,
                    }
                })?;
            }
        }
    }
    Ok(())
}

/// Templates read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Serve templates from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileStore for DirStore {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        if !full.is_file() {
            return Err(FilesystemError::TemplateNotFound(path.to_string()).into());
        }
        std::fs::read(&full).with_context(|| format!("reading template {}", full.display()))
    }

    fn copy_dir(&self, name: &str, dest: &Path) -> Result<()> {
        let src = self.root.join(name);
        if !src.is_dir() {
            return Err(FilesystemError::TemplateNotFound(name.to_string()).into());
        }
        copy_dir_recursive(&src, dest)
    }
}
