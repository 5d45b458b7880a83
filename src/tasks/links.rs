//! Links from the shell and the editor into the config root.
//!
//! Both links are created even when their source has not been written yet,
//! so declining the configuration step still leaves working links for a
//! later run.
use std::path::PathBuf;

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::error::SubprocessError;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Applicable as _, ResourceChange};

/// Package whose selection triggers the editor-config link.
pub const EDITOR_PACKAGE: &str = "Neovim.Neovim";

/// PowerShell 7, preferred when on PATH.
const PWSH: &str = "pwsh";
/// Windows PowerShell, always present on Windows.
const WINDOWS_POWERSHELL: &str = "powershell";

/// Ask the shell where its current-user profile lives.
///
/// # Errors
///
/// Returns an error if the shell cannot be run or prints nothing.
pub fn shell_profile_path(ctx: &Context) -> Result<PathBuf> {
    let shell = if ctx.executor.which(PWSH) {
        PWSH
    } else {
        WINDOWS_POWERSHELL
    };
    ctx.log.debug(&format!("querying $PROFILE from {shell}"));
    let result = ctx
        .executor
        .run(shell, &["-NoProfile", "-Command", "echo $PROFILE"])?;
    let path = result.stdout.trim();
    if path.is_empty() {
        return Err(SubprocessError::EmptyOutput(shell.to_string()).into());
    }
    Ok(PathBuf::from(path))
}

fn report_link(ctx: &Context, link: &SymlinkResource) -> Result<TaskResult> {
    match link.ensure()? {
        ResourceChange::AlreadyCorrect => {
            ctx.log.info(&format!("already linked: {}", link.description()));
        }
        ResourceChange::Applied => {
            ctx.log.info(&format!("linked {}", link.description()));
        }
    }
    Ok(TaskResult::Ok)
}

/// Point the shell's `$PROFILE` at `<config root>/profile.ps1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkShellProfile;

impl Task for LinkShellProfile {
    fn name(&self) -> &'static str {
        "Link PowerShell profile"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let target = shell_profile_path(ctx)?;
        let link = SymlinkResource::new(ctx.settings.profile_path(), target);
        report_link(ctx, &link)
    }
}

/// Point `%LOCALAPPDATA%\nvim` at `<config root>/nvim`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkEditorConfig {
    selected: bool,
}

impl LinkEditorConfig {
    /// Create the task; it only runs when the editor package was selected.
    #[must_use]
    pub fn for_selection(selected: &[String]) -> Self {
        Self {
            selected: selected.iter().any(|id| id == EDITOR_PACKAGE),
        }
    }
}

impl Task for LinkEditorConfig {
    fn name(&self) -> &'static str {
        "Link Neovim config"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        self.selected
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let target = ctx.settings.local_app_data()?.join("nvim");
        let link = SymlinkResource::dir(ctx.settings.in_config_root("nvim"), target);
        report_link(ctx, &link)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::assets::EmbeddedStore;
    use crate::error::ConfigError;
    use crate::exec::Executor;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{context_with, settings_in};

    fn context(
        tmp: &std::path::Path,
        executor: Arc<MockExecutor>,
    ) -> (Context, crate::config::Settings) {
        let settings = settings_in(tmp);
        let (ctx, _log) = context_with(
            settings.clone(),
            executor as Arc<dyn Executor>,
            Arc::new(EmbeddedStore),
        );
        (ctx, settings)
    }

    #[test]
    fn prefers_pwsh_when_available() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::ok("C:\\profile.ps1\r\n").with_which(true));
        let (ctx, _) = context(tmp.path(), Arc::clone(&executor));
        let path = shell_profile_path(&ctx).unwrap();
        assert_eq!(path, PathBuf::from("C:\\profile.ps1"));
        assert_eq!(executor.calls()[0].0, "pwsh");
        assert_eq!(
            executor.calls()[0].1,
            vec!["-NoProfile", "-Command", "echo $PROFILE"]
        );
    }

    #[test]
    fn falls_back_to_windows_powershell() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockExecutor::ok("C:\\profile.ps1"));
        let (ctx, _) = context(tmp.path(), Arc::clone(&executor));
        shell_profile_path(&ctx).unwrap();
        assert_eq!(executor.calls()[0].0, "powershell");
    }

    #[test]
    fn empty_profile_output_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (ctx, _) = context(tmp.path(), Arc::new(MockExecutor::ok("  \n")));
        let err = shell_profile_path(&ctx).unwrap_err();
        assert!(
            err.downcast_ref::<SubprocessError>()
                .is_some_and(|e| matches!(e, SubprocessError::EmptyOutput(_)))
        );
    }

    #[test]
    fn shell_failure_fails_the_task() {
        let tmp = tempfile::tempdir().unwrap();
        let (ctx, _) = context(tmp.path(), Arc::new(MockExecutor::fail()));
        assert!(LinkShellProfile.run(&ctx).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn links_shell_profile_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let profile_target = tmp.path().join("Documents/PowerShell/Microsoft.PowerShell_profile.ps1");
        let stdout = profile_target.to_string_lossy().to_string();
        let executor = Arc::new(MockExecutor::with_responses(vec![
            (true, stdout.clone()),
            (true, stdout),
        ]));
        let (ctx, settings) = context(tmp.path(), executor);
        std::fs::create_dir_all(&settings.config_root).unwrap();
        std::fs::write(settings.profile_path(), "# profile").unwrap();

        assert_eq!(LinkShellProfile.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(std::fs::read_link(&profile_target).unwrap(), settings.profile_path());
        assert_eq!(LinkShellProfile.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(std::fs::read_to_string(&profile_target).unwrap(), "# profile");
    }

    #[test]
    fn editor_link_only_for_neovim_selection() {
        let tmp = tempfile::tempdir().unwrap();
        let (ctx, _) = context(tmp.path(), Arc::new(MockExecutor::with_responses(vec![])));
        assert!(!LinkEditorConfig::for_selection(&["Git.Git".to_string()]).should_run(&ctx));
        assert!(LinkEditorConfig::for_selection(&[EDITOR_PACKAGE.to_string()]).should_run(&ctx));
    }

    #[cfg(unix)]
    #[test]
    fn editor_link_replaces_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let (ctx, settings) = context(tmp.path(), Arc::new(MockExecutor::with_responses(vec![])));
        std::fs::create_dir_all(settings.in_config_root("nvim")).unwrap();
        std::fs::create_dir_all(tmp.path().join("local")).unwrap();
        std::fs::write(tmp.path().join("local/nvim"), "stray file").unwrap();

        let task = LinkEditorConfig::for_selection(&[EDITOR_PACKAGE.to_string()]);
        task.run(&ctx).unwrap();
        assert_eq!(
            std::fs::read_link(tmp.path().join("local/nvim")).unwrap(),
            settings.in_config_root("nvim")
        );
    }

    #[cfg(unix)]
    #[test]
    fn editor_link_created_before_config_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let (ctx, settings) = context(tmp.path(), Arc::new(MockExecutor::with_responses(vec![])));
        std::fs::create_dir_all(tmp.path().join("local")).unwrap();
        std::fs::write(tmp.path().join("local/nvim"), "stray file").unwrap();

        let task = LinkEditorConfig::for_selection(&[EDITOR_PACKAGE.to_string()]);
        assert_eq!(task.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(
            std::fs::read_link(tmp.path().join("local/nvim")).unwrap(),
            settings.in_config_root("nvim")
        );
        assert!(!settings.in_config_root("nvim").exists());
    }

    #[cfg(unix)]
    #[test]
    fn shell_profile_link_replaces_file_before_profile_is_written() {
        let tmp = tempfile::tempdir().unwrap();
        let profile_target = tmp.path().join("Documents/PowerShell/Microsoft.PowerShell_profile.ps1");
        std::fs::create_dir_all(profile_target.parent().unwrap()).unwrap();
        std::fs::write(&profile_target, "old hand-written profile").unwrap();
        let executor = Arc::new(MockExecutor::ok(&profile_target.to_string_lossy()));
        let (ctx, settings) = context(tmp.path(), executor);

        assert_eq!(LinkShellProfile.run(&ctx).unwrap(), TaskResult::Ok);
        assert!(std::fs::symlink_metadata(&profile_target).unwrap().is_symlink());
        assert_eq!(std::fs::read_link(&profile_target).unwrap(), settings.profile_path());
        assert!(!settings.profile_path().exists());
    }

    #[test]
    fn editor_link_without_local_app_data_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings_in(tmp.path()).with_var("LOCALAPPDATA", "");
        let (ctx, _log) = context_with(
            settings,
            Arc::new(MockExecutor::with_responses(vec![])),
            Arc::new(EmbeddedStore),
        );
        let err = LinkEditorConfig::for_selection(&[EDITOR_PACKAGE.to_string()])
            .run(&ctx)
            .unwrap_err();
        assert!(
            err.downcast_ref::<ConfigError>()
                .is_some_and(|e| matches!(e, ConfigError::MissingVariable(_)))
        );
    }
}
