//! Symlink resource.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::helpers::fs::{ensure_parent_dir, is_dir_like, remove_existing};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::FilesystemError;

/// What a link points at.
///
/// Windows needs this up front because the source may not exist yet when the
/// link is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// A single file, such as `profile.ps1`.
    File,
    /// A directory, such as a copied config folder.
    Dir,
}

/// A symlink resource that can be checked and applied.
///
/// The source does not have to exist: a dangling link is created and becomes
/// valid once the source is written.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
    /// Whether the source is a file or a directory.
    pub kind: LinkKind,
}

impl SymlinkResource {
    /// Create a link to a file.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self {
            source,
            target,
            kind: LinkKind::File,
        }
    }

    /// Create a link to a directory.
    #[must_use]
    pub const fn dir(source: PathBuf, target: PathBuf) -> Self {
        Self {
            source,
            target,
            kind: LinkKind::Dir,
        }
    }

    /// Bring the link into its desired state.
    ///
    /// A link that already points at `source` is left alone and reported as
    /// [`ResourceChange::AlreadyCorrect`]; anything else at `target` is
    /// removed and replaced.
    ///
    /// # Errors
    ///
    /// Returns [`FilesystemError::Symlink`] if the link cannot be created
    /// (target is a populated directory, removal or creation failed).
    pub fn ensure(&self) -> Result<ResourceChange> {
        match self.current_state()? {
            ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Invalid { reason } => Err(FilesystemError::Symlink {
                link: self.target.clone(),
                reason,
            }
            .into()),
            ResourceState::Missing | ResourceState::Incorrect { .. } => {
                self.apply().map_err(|e| {
                    FilesystemError::Symlink {
                        link: self.target.clone(),
                        reason: format!("{e:#}"),
                    }
                    .into()
                })
            }
        }
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.target)?;
        remove_existing(&self.target)?;
        create_symlink(&self.source, &self.target, self.kind)
            .with_context(|| format!("create link: {}", self.target.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        let Ok(meta) = std::fs::symlink_metadata(&self.target) else {
            return Ok(ResourceState::Missing);
        };

        if meta.is_symlink() {
            let existing = std::fs::read_link(&self.target)
                .with_context(|| format!("reading link: {}", self.target.display()))?;
            return Ok(if paths_equal(&existing, &self.source) {
                ResourceState::Correct
            } else {
                ResourceState::Incorrect {
                    current: format!("points to {}", existing.display()),
                }
            });
        }

        if is_dir_like(&meta) {
            // Only an empty real directory is safe to replace.
            let empty = std::fs::read_dir(&self.target)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            return Ok(if empty {
                ResourceState::Incorrect {
                    current: "target is an empty directory".to_string(),
                }
            } else {
                ResourceState::Invalid {
                    reason: "target is a real directory".to_string(),
                }
            });
        }

        Ok(ResourceState::Incorrect {
            current: "target is a regular file".to_string(),
        })
    }
}

/// Compare two paths for equality, ignoring `\\?\` verbatim prefixes.
fn paths_equal(a: &Path, b: &Path) -> bool {
    dunce::simplified(a) == dunce::simplified(b)
}

/// Create a symlink at `link` pointing to `target`.
#[cfg_attr(unix, allow(unused_variables))]
fn create_symlink(target: &Path, link: &Path, kind: LinkKind) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).with_context(|| {
            format!(
                "creating symlink {} -> {}",
                link.display(),
                target.display()
            )
        })?;
    }

    #[cfg(windows)]
    {
        use crate::exec::{Executor as _, SystemExecutor};

        let is_dir = kind == LinkKind::Dir;
        let result = if is_dir {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };

        if result.is_err() {
            // Without Developer Mode symlinks need elevation; directory
            // junctions do not, so fall back to mklink /J for directories.
            let link_str = link.to_string_lossy();
            let target_str = target.to_string_lossy();
            let mut args: Vec<&str> = vec!["/c", "mklink"];
            if is_dir {
                args.push("/J");
            }
            args.push(&link_str);
            args.push(&target_str);
            SystemExecutor.run("cmd", &args)?;
        }
    }

    Ok(())
}
