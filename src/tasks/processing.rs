use anyhow::Result;

use super::context::Context;
use crate::logging::Log;
use crate::resources::ResourceChange;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use wincfg_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("all packages already installed".into());
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task had nothing to do.
    Skipped(String),
}

/// Outcome of one step inside a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step changed something.
    Changed,
    /// The step found everything already in place.
    AlreadyOk,
    /// The step failed; later steps still ran.
    Failed(String),
}

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// What the step acted on.
    pub description: String,
    /// How it went.
    pub outcome: StepOutcome,
}

/// Per-step outcomes collected while a task keeps going past failures.
///
/// # Examples
///
/// ```
/// use wincfg_cli::tasks::{Report, StepOutcome};
///
/// let mut report = Report::default();
/// report.record("profile.ps1", StepOutcome::Changed);
/// report.record("nvim", StepOutcome::AlreadyOk);
/// report.record("k9s", StepOutcome::Failed("LOCALAPPDATA is not set".into()));
///
/// assert_eq!(report.summary(), "1 changed, 1 already ok, 1 failed");
/// assert_eq!(report.failures().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    steps: Vec<Step>,
}

impl Report {
    /// Record a step outcome.
    pub fn record(&mut self, description: impl Into<String>, outcome: StepOutcome) {
        self.steps.push(Step {
            description: description.into(),
            outcome,
        });
    }

    /// Record the result of applying a resource, logging it as it happens.
    pub fn record_change(
        &mut self,
        description: impl Into<String>,
        result: Result<ResourceChange>,
        log: &dyn Log,
    ) {
        let description = description.into();
        let outcome = match result {
            Ok(ResourceChange::Applied) => {
                log.info(&description);
                StepOutcome::Changed
            }
            Ok(ResourceChange::AlreadyCorrect) => {
                log.debug(&format!("ok: {description}"));
                StepOutcome::AlreadyOk
            }
            Err(e) => {
                log.error(&format!("{description}: {e:#}"));
                StepOutcome::Failed(format!("{e:#}"))
            }
        };
        self.record(description, outcome);
    }

    /// All recorded steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Steps that failed.
    pub fn failures(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed(_)))
    }

    /// Whether no step failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self) -> String {
        let count = |f: fn(&StepOutcome) -> bool| self.steps.iter().filter(|s| f(&s.outcome)).count();
        let changed = count(|o| matches!(o, StepOutcome::Changed));
        let already_ok = count(|o| matches!(o, StepOutcome::AlreadyOk));
        let failed = count(|o| matches!(o, StepOutcome::Failed(_)));

        let mut summary = format!("{changed} changed, {already_ok} already ok");
        if failed > 0 {
            summary.push_str(&format!(", {failed} failed"));
        }
        summary
    }

    /// Log the summary and convert the report into a task result.
    ///
    /// # Errors
    ///
    /// Returns an error naming every failed step if any step failed.
    pub fn finish(self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info(&self.summary());
        let failed: Vec<String> = self
            .failures()
            .map(|s| s.description.clone())
            .collect();
        if failed.is_empty() {
            Ok(TaskResult::Ok)
        } else {
            anyhow::bail!("{} failed: {}", plural(failed.len(), "step"), failed.join(", "))
        }
    }
}

/// `"1 step"`, `"2 steps"`.
pub(crate) fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
