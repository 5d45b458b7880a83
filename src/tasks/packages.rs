//! Package installer task.
use anyhow::Result;

use super::processing::plural;
use super::{Context, Task, TaskResult};
use crate::resources::package::{self, InstallReport, PackageOutcome};

/// Install the selected packages with winget, skipping those already present.
#[derive(Debug, Clone, Default)]
pub struct InstallPackages {
    requested: Vec<String>,
}

impl InstallPackages {
    /// Create the task for the given package ids.
    #[must_use]
    pub const fn new(requested: Vec<String>) -> Self {
        Self { requested }
    }

    /// Query the installed set and install the delta.
    #[must_use]
    pub fn install(&self, ctx: &Context) -> InstallReport {
        let installed = package::load_installed_set(ctx.executor.as_ref(), ctx.log.as_ref());
        package::install(
            &self.requested,
            &installed,
            ctx.executor.as_ref(),
            ctx.log.as_ref(),
        )
    }
}

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install packages"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.requested.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let report = self.install(ctx);

        if report.batch().is_empty() {
            return Ok(TaskResult::Skipped(
                "all packages already installed".to_string(),
            ));
        }

        let unverified = report
            .outcomes
            .iter()
            .filter(|(_, o)| *o == PackageOutcome::Unverified)
            .count();
        if unverified > 0 {
            ctx.log.warn(&format!(
                "{} could not be verified after install",
                plural(unverified, "package")
            ));
        }

        let failures = report.failures();
        if !failures.is_empty() {
            anyhow::bail!(
                "{} failed to install: {}",
                plural(failures.len(), "package"),
                failures.join(", ")
            );
        }
        Ok(TaskResult::Ok)
    }
}
