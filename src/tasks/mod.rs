//! Named units of work that orchestrate resource changes.
pub mod configuration;
mod context;
pub mod links;
pub mod packages;
mod processing;

pub use context::Context;
pub use processing::{Report, Step, StepOutcome, TaskResult};

use anyhow::Result;

use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the current run.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails, such as when a system command
    /// fails or a file cannot be written.  Tasks that process several items
    /// finish every item first and then report the failures together.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Execute a task, recording the result in the logger.
///
/// Failures are logged and recorded, never propagated: the caller always
/// moves on to the next task.
pub fn execute(task: &dyn Task, ctx: &Context) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

/// Record a task the user chose not to run.
pub fn decline(task: &dyn Task, ctx: &Context) {
    ctx.log.debug(&format!("skipping task: {} (declined)", task.name()));
    ctx.log
        .record_task(task.name(), TaskStatus::NotApplicable, Some("declined"));
}
