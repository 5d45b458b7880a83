//! Aggregated shell profile buffer.
use std::path::PathBuf;

use anyhow::Result;

use super::helpers::fs::ensure_parent_dir;
use super::{Applicable, ResourceChange};
use crate::error::FilesystemError;

/// Shell profile content assembled from a base template and per-package
/// blocks.
///
/// Each block is a `# <id>` header, the package's lines verbatim, and one
/// blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileBuffer {
    content: Vec<u8>,
}

impl ProfileBuffer {
    /// Start a buffer from the base template bytes.
    #[must_use]
    pub fn new(base: impl Into<Vec<u8>>) -> Self {
        Self {
            content: base.into(),
        }
    }

    /// Append a block for `id`.  Does nothing when `lines` is empty.
    pub fn append_block(&mut self, id: &str, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        if !self.content.is_empty() && !self.content.ends_with(b"\n") {
            self.content.push(b'\n');
        }
        self.content.extend_from_slice(format!("# {id}\n").as_bytes());
        for line in lines {
            self.content.extend_from_slice(line.as_bytes());
            self.content.push(b'\n');
        }
        self.content.push(b'\n');
    }

    /// The assembled bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }
}

/// Writes a [`ProfileBuffer`] to disk, replacing whatever is there.
#[derive(Debug)]
pub struct ProfileFileResource<'a> {
    /// Destination file.
    pub path: PathBuf,
    buffer: &'a ProfileBuffer,
}

impl<'a> ProfileFileResource<'a> {
    /// Create a resource writing `buffer` to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, buffer: &'a ProfileBuffer) -> Self {
        Self {
            path: path.into(),
            buffer,
        }
    }
}

impl Applicable for ProfileFileResource<'_> {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.path)?;
        std::fs::write(&self.path, self.buffer.as_bytes()).map_err(|source| {
            FilesystemError::Write {
                path: self.path.clone(),
                source,
            }
        })?;
        Ok(ResourceChange::Applied)
    }
}
