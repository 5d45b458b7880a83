// Shared helpers for integration tests.
//
// Provides a temporary home with a directory-backed template store, a
// recording executor standing in for winget and PowerShell, and a fluent
// builder so each test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code, clippy::expect_used)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use wincfg_cli::assets::DirStore;
use wincfg_cli::config::{PackageDescriptor, Settings, SymlinkDeclaration};
use wincfg_cli::error::SubprocessError;
use wincfg_cli::exec::{ExecResult, Executor};
use wincfg_cli::logging::{Log, Logger};
use wincfg_cli::tasks::Context;

/// Base profile template written into every test template store.
pub const BASE_PROFILE: &str = "# base profile\n";

/// An [`Executor`] that replays queued `(success, stdout)` responses and
/// records every `(program, args)` it receives.
///
/// An exhausted queue answers with a failed exit.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    responses: Mutex<VecDeque<(bool, String)>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
    pwsh: bool,
}

impl RecordingExecutor {
    /// Replay `responses` in order.
    pub fn new(responses: &[(bool, &str)]) -> Self {
        Self {
            responses: Mutex::new(
                responses
                    .iter()
                    .map(|(ok, out)| (*ok, (*out).to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Report `pwsh` as present on PATH.
    pub fn with_pwsh(mut self) -> Self {
        self.pwsh = true;
        self
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// The package ids passed to each `winget install`.
    pub fn install_batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|(program, args)| {
                program == "winget" && args.first().is_some_and(|a| a == "install")
            })
            .map(|(_, args)| {
                args.into_iter()
                    .filter(|a| !a.starts_with("--") && a != "install")
                    .collect()
            })
            .collect()
    }

    fn next(&self, program: &str, args: &[&str]) -> ExecResult {
        self.calls.lock().expect("calls lock").push((
            program.to_string(),
            args.iter().map(ToString::to_string).collect(),
        ));
        let (success, stdout) = self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| (false, String::new()));
        ExecResult {
            stdout,
            stderr: String::new(),
            success,
            code: Some(i32::from(!success)),
        }
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let result = self.next(program, args);
        if !result.success {
            return Err(SubprocessError::Failed {
                program: program.to_string(),
                code: result.code,
                stderr: result.stderr,
            }
            .into());
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.next(program, args))
    }

    fn run_attached(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let result = self.next(program, args);
        Ok(ExecResult {
            stdout: String::new(),
            ..result
        })
    }

    fn which(&self, program: &str) -> bool {
        self.pwsh && program == "pwsh"
    }
}

/// A package descriptor with profile lines.
pub fn package(id: &str, profile: &[&str]) -> PackageDescriptor {
    PackageDescriptor {
        profile: profile.iter().map(ToString::to_string).collect(),
        ..PackageDescriptor::new(id)
    }
}

/// A small manifest covering profile lines, a config folder and a link.
pub fn sample_manifest() -> Vec<PackageDescriptor> {
    let mut k9s = package("Derailed.k9s", &[]);
    k9s.config_folder = Some("k9s".to_string());
    k9s.symlinks.push(SymlinkDeclaration {
        source: "k9s".to_string(),
        target: "LOCALAPPDATA".to_string(),
        name: None,
    });
    let mut neovim = package("Neovim.Neovim", &[]);
    neovim.config_folder = Some("nvim".to_string());
    vec![
        package(
            "Starship.Starship",
            &["Invoke-Expression (&starship init powershell)"],
        ),
        package("ajeetdsouza.zoxide", &["zoxide init"]),
        package("sharkdp.bat", &["$Env:BAT_CONFIG_DIR=\"$HOME\\.config\\bat\""]),
        neovim,
        k9s,
        package("Git.Git", &[]),
        package("GitHub.cli", &[]),
    ]
}

/// An isolated environment backed by a [`tempfile::TempDir`].
///
/// Layout: `<tmp>/home` (home, config root at `home/.config`),
/// `<tmp>/local` (`LOCALAPPDATA`) and `<tmp>/templates` (template store).
pub struct IntegrationTestContext {
    /// Temporary directory holding everything the run touches.
    pub root: tempfile::TempDir,
    /// Settings pointing into `root`.
    pub settings: Settings,
}

impl IntegrationTestContext {
    /// Path to the template directory.
    pub fn templates(&self) -> PathBuf {
        self.root.path().join("templates")
    }

    /// Path to `LOCALAPPDATA`.
    pub fn local_app_data(&self) -> PathBuf {
        self.root.path().join("local")
    }

    /// Build a task context over `executor`, returning the logger too.
    pub fn context(&self, executor: Arc<dyn Executor>) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::new("integration"));
        let ctx = Context::new(
            self.settings.clone(),
            Arc::clone(&log) as Arc<dyn Log>,
            executor,
            Arc::new(DirStore::new(self.templates())),
        );
        (ctx, log)
    }

    /// Contents of `<config root>/profile.ps1`.
    pub fn profile(&self) -> String {
        std::fs::read_to_string(self.settings.profile_path()).expect("read profile.ps1")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin with a template store holding only the base profile.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let settings = Settings::new(root.path().join("home"))
            .with_var("LOCALAPPDATA", root.path().join("local").to_string_lossy());
        let ctx = IntegrationTestContext { root, settings };
        write_file(&ctx.templates().join("profile.ps1"), BASE_PROFILE);
        std::fs::create_dir_all(ctx.local_app_data()).expect("create local app data");
        Self { ctx }
    }

    /// Add a template file at `relative` under the template directory.
    pub fn with_template(self, relative: &str, content: &str) -> Self {
        write_file(&self.ctx.templates().join(relative), content);
        self
    }

    /// Override an environment variable seen by the run.
    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.ctx.settings = self.ctx.settings.with_var(name, value);
        self
    }

    /// Point an environment variable at `<tmp>/<relative>`.
    pub fn with_dir_var(self, name: &str, relative: &str) -> Self {
        let dir = self.ctx.root.path().join(relative);
        self.with_var(name, &dir.to_string_lossy())
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
}
