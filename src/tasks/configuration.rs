//! Configuration assembly: profile blocks, config folders and declared links.
//!
//! Selected packages are compiled, in manifest order, into a flat list of
//! [`Instruction`]s which [`AssembleConfiguration`] then interprets against
//! the config root.  Selection order never affects the result.
use std::collections::HashSet;

use anyhow::Result;

use super::{Context, Report, StepOutcome, Task, TaskResult};
use crate::config::settings::PROFILE_FILE;
use crate::config::{PackageDescriptor, SymlinkDeclaration};
use crate::error::FilesystemError;
use crate::resources::ResourceChange;
use crate::resources::profile::{ProfileBuffer, ProfileFileResource};
use crate::resources::symlink::{LinkKind, SymlinkResource};
use crate::resources::Applicable as _;

/// One configuration action derived from a package descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Append a `# <id>` block with `lines` to the profile buffer.
    AppendProfile {
        /// Package the block belongs to.
        id: String,
        /// Lines copied verbatim.
        lines: Vec<String>,
    },
    /// Copy the template directory `folder` to `<config root>/<folder>`.
    CopyFolder {
        /// Package the folder belongs to.
        id: String,
        /// Template directory name.
        folder: String,
    },
    /// Link `$<target>/<name>` to `<config root>/<source>`.
    CreateSymlink {
        /// Package the link belongs to.
        id: String,
        /// The declared link.
        link: SymlinkDeclaration,
        /// [`LinkKind::Dir`] when the link points at the package's config folder.
        kind: LinkKind,
    },
}

/// Compile the selected descriptors into instructions.
///
/// Descriptors are visited in manifest order; within one package the profile
/// block comes first, then the folder copy, then its links.  Unknown ids in
/// `selected` are ignored.
#[must_use]
pub fn compile(selected: &[String], packages: &[PackageDescriptor]) -> Vec<Instruction> {
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
    let mut instructions = Vec::new();

    for package in packages.iter().filter(|p| selected.contains(p.id.as_str())) {
        if package.has_profile() {
            instructions.push(Instruction::AppendProfile {
                id: package.id.clone(),
                lines: package.profile.clone(),
            });
        }
        if let Some(folder) = package.config_folder.as_ref().filter(|f| !f.is_empty()) {
            instructions.push(Instruction::CopyFolder {
                id: package.id.clone(),
                folder: folder.clone(),
            });
        }
        instructions.extend(package.symlinks.iter().map(|link| Instruction::CreateSymlink {
            id: package.id.clone(),
            link: link.clone(),
            kind: if package.config_folder.as_deref() == Some(link.source.as_str()) {
                LinkKind::Dir
            } else {
                LinkKind::File
            },
        }));
    }

    instructions
}

/// Lay down the profile, config folders and declared links for the selection.
#[derive(Debug, Clone)]
pub struct AssembleConfiguration {
    selected: Vec<String>,
    packages: Vec<PackageDescriptor>,
}

impl AssembleConfiguration {
    /// Create the task for `selected` ids out of the full manifest.
    #[must_use]
    pub const fn new(selected: Vec<String>, packages: Vec<PackageDescriptor>) -> Self {
        Self { selected, packages }
    }

    /// Run every instruction, collecting per-step outcomes.
    ///
    /// Never stops early: a failed copy or link is recorded and the next
    /// instruction runs.  The profile is written last.
    pub fn assemble(&self, ctx: &Context) -> Report {
        let mut report = Report::default();
        let settings = &ctx.settings;
        let root = &settings.config_root;

        let root_created = std::fs::create_dir_all(root)
            .map(|()| ResourceChange::Applied)
            .map_err(|source| {
                anyhow::Error::from(FilesystemError::CreateDir {
                    path: root.clone(),
                    source,
                })
            });
        report.record_change(
            format!("config root {}", root.display()),
            root_created,
            ctx.log.as_ref(),
        );

        let mut buffer = match ctx.store.read(PROFILE_FILE) {
            Ok(base) => ProfileBuffer::new(base),
            Err(e) => {
                ctx.log.error(&format!("reading {PROFILE_FILE} template: {e:#}"));
                report.record(
                    format!("{PROFILE_FILE} template"),
                    StepOutcome::Failed(format!("{e:#}")),
                );
                ProfileBuffer::default()
            }
        };

        for instruction in compile(&self.selected, &self.packages) {
            match instruction {
                Instruction::AppendProfile { id, lines } => {
                    ctx.log.debug(&format!("profile block for {id}"));
                    buffer.append_block(&id, &lines);
                }
                Instruction::CopyFolder { id, folder } => {
                    let dest = settings.in_config_root(&folder);
                    let result = ctx
                        .store
                        .copy_dir(&folder, &dest)
                        .map(|()| ResourceChange::Applied);
                    report.record_change(
                        format!("{id}: copied {folder} to {}", dest.display()),
                        result,
                        ctx.log.as_ref(),
                    );
                }
                Instruction::CreateSymlink { id, link, kind } => {
                    let description = format!("{id}: link ${}/{}", link.target, link.link_name());
                    let source = settings.in_config_root(&link.source);
                    let kind = if source.is_dir() { LinkKind::Dir } else { kind };
                    let result = settings
                        .dir_from_var(&link.target)
                        .map_err(anyhow::Error::from)
                        .and_then(|dir| {
                            SymlinkResource {
                                source,
                                target: dir.join(link.link_name()),
                                kind,
                            }
                            .ensure()
                        });
                    report.record_change(description, result, ctx.log.as_ref());
                }
            }
        }

        let profile = ProfileFileResource::new(settings.profile_path(), &buffer);
        report.record_change(
            format!("wrote {}", profile.description()),
            profile.apply(),
            ctx.log.as_ref(),
        );

        report
    }
}

impl Task for AssembleConfiguration {
    fn name(&self) -> &'static str {
        "Create configuration files"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        self.assemble(ctx).finish(ctx)
    }
}
