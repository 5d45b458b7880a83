#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for configuration assembly and symlink handling.

mod common;

use std::sync::Arc;

use common::*;
use wincfg_cli::config::SymlinkDeclaration;
use wincfg_cli::resources::ResourceChange;
use wincfg_cli::resources::symlink::SymlinkResource;
use wincfg_cli::tasks::StepOutcome;
use wincfg_cli::tasks::configuration::AssembleConfiguration;

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(ToString::to_string).collect()
}

fn assemble(env: &IntegrationTestContext, selected: &[&str]) -> String {
    let (ctx, _log) = env.context(Arc::new(RecordingExecutor::default()));
    let report = AssembleConfiguration::new(ids(selected), sample_manifest()).assemble(&ctx);
    assert!(report.is_success(), "{:?}", report.steps());
    env.profile()
}

// ---------------------------------------------------------------------------
// Profile buffer
// ---------------------------------------------------------------------------

/// Only the selected package's block follows the base template.
#[test]
fn single_selection_appends_one_block() {
    let env = TestContextBuilder::new().build();
    assert_eq!(
        assemble(&env, &["ajeetdsouza.zoxide"]),
        "# base profile\n# ajeetdsouza.zoxide\nzoxide init\n\n"
    );
}

/// Blocks follow manifest order whatever order the ids were selected in.
#[test]
fn selection_order_does_not_change_output() {
    let forward = TestContextBuilder::new().build();
    let reverse = TestContextBuilder::new().build();
    let a = assemble(&forward, &["Starship.Starship", "ajeetdsouza.zoxide", "sharkdp.bat"]);
    let b = assemble(&reverse, &["sharkdp.bat", "ajeetdsouza.zoxide", "Starship.Starship"]);
    assert_eq!(a, b);
    insta::assert_snapshot!(a, @r#"
    # base profile
    # Starship.Starship
    Invoke-Expression (&starship init powershell)

    # ajeetdsouza.zoxide
    zoxide init

    # sharkdp.bat
    $Env:BAT_CONFIG_DIR="$HOME\.config\bat"
    "#);
}

/// Packages without profile lines contribute no block.
#[test]
fn packages_without_profile_lines_add_nothing() {
    let env = TestContextBuilder::new().build();
    assert_eq!(assemble(&env, &["Git.Git", "GitHub.cli"]), BASE_PROFILE);
}

/// Re-running with the same selection rewrites an identical file.
#[test]
fn assembly_is_idempotent() {
    let env = TestContextBuilder::new()
        .with_template("k9s/config.yaml", "k9s:\n  refreshRate: 2\n")
        .build();
    let selection = ["Starship.Starship", "Derailed.k9s", "ajeetdsouza.zoxide"];
    let first = assemble(&env, &selection);
    let second = assemble(&env, &selection);
    assert_eq!(first.as_bytes(), second.as_bytes());
}

// ---------------------------------------------------------------------------
// Folders and declared links
// ---------------------------------------------------------------------------

/// A config folder is copied and its declared link points at the copy.
#[cfg(unix)]
#[test]
fn config_folder_is_copied_and_linked() {
    let env = TestContextBuilder::new()
        .with_template("k9s/config.yaml", "k9s:\n  refreshRate: 2\n")
        .with_template("k9s/skins/dark.yaml", "k9s: {}\n")
        .build();
    assemble(&env, &["Derailed.k9s"]);

    let copied = env.settings.in_config_root("k9s");
    assert!(copied.join("config.yaml").is_file());
    assert!(copied.join("skins/dark.yaml").is_file());
    assert_eq!(
        std::fs::read_link(env.local_app_data().join("k9s")).unwrap(),
        copied
    );
}

/// A failing link is reported on its own; the profile is still written.
#[test]
fn missing_target_variable_fails_only_the_link() {
    let env = TestContextBuilder::new()
        .with_template("k9s/config.yaml", "k9s: {}\n")
        .with_var("LOCALAPPDATA", "")
        .build();
    let (ctx, _log) = env.context(Arc::new(RecordingExecutor::default()));
    let report =
        AssembleConfiguration::new(ids(&["Derailed.k9s", "ajeetdsouza.zoxide"]), sample_manifest())
            .assemble(&ctx);

    let failed: Vec<&str> = report
        .failures()
        .map(|s| s.description.as_str())
        .collect();
    assert_eq!(failed, vec!["Derailed.k9s: link $LOCALAPPDATA/k9s"]);
    assert!(env.profile().contains("# ajeetdsouza.zoxide"));
    assert!(env.settings.in_config_root("k9s/config.yaml").is_file());
}

/// A declared `name` overrides the link's file name.
#[cfg(unix)]
#[test]
fn declared_link_name_is_used() {
    let env = TestContextBuilder::new()
        .with_template("bat/config", "--theme=ansi\n")
        .with_dir_var("TOOLS", "tools")
        .build();
    let tools = env.root.path().join("tools");
    let mut manifest = sample_manifest();
    let bat = manifest
        .iter_mut()
        .find(|p| p.id == "sharkdp.bat")
        .unwrap();
    bat.config_folder = Some("bat".to_string());
    bat.symlinks.push(SymlinkDeclaration {
        source: "bat".to_string(),
        target: "TOOLS".to_string(),
        name: Some("bat-config".to_string()),
    });

    let (ctx, _log) = env.context(Arc::new(RecordingExecutor::default()));
    let report = AssembleConfiguration::new(ids(&["sharkdp.bat"]), manifest).assemble(&ctx);

    assert!(report.is_success(), "{:?}", report.steps());
    assert_eq!(
        std::fs::read_link(tools.join("bat-config")).unwrap(),
        env.settings.in_config_root("bat")
    );
}

/// A second run finds declared links already in place.
#[cfg(unix)]
#[test]
fn rerun_reports_links_already_correct() {
    let env = TestContextBuilder::new()
        .with_template("k9s/config.yaml", "k9s: {}\n")
        .build();
    assemble(&env, &["Derailed.k9s"]);

    let (ctx, _log) = env.context(Arc::new(RecordingExecutor::default()));
    let report =
        AssembleConfiguration::new(ids(&["Derailed.k9s"]), sample_manifest()).assemble(&ctx);
    let link_step = report
        .steps()
        .iter()
        .find(|s| s.description.contains("link $LOCALAPPDATA/k9s"))
        .unwrap();
    assert_eq!(link_step.outcome, StepOutcome::AlreadyOk);
}

// ---------------------------------------------------------------------------
// Symlink primitive
// ---------------------------------------------------------------------------

/// An existing file at the link location is replaced, and a second
/// ensure is a no-op.
#[cfg(unix)]
#[test]
fn symlink_replaces_file_then_reports_correct() {
    let env = TestContextBuilder::new().build();
    let source = env.root.path().join("source.ps1");
    let target = env.root.path().join("links/profile.ps1");
    std::fs::write(&source, "# profile").unwrap();
    std::fs::create_dir_all(target.parent().unwrap()).unwrap();
    std::fs::write(&target, "old contents").unwrap();

    let link = SymlinkResource::new(source.clone(), target.clone());
    assert_eq!(link.ensure().unwrap(), ResourceChange::Applied);
    assert_eq!(std::fs::read_link(&target).unwrap(), source);
    assert_eq!(link.ensure().unwrap(), ResourceChange::AlreadyCorrect);
}

/// A link pointing elsewhere is repointed.
#[cfg(unix)]
#[test]
fn symlink_repoints_stale_link() {
    let env = TestContextBuilder::new().build();
    let old = env.root.path().join("old");
    let new = env.root.path().join("new");
    std::fs::create_dir_all(&old).unwrap();
    std::fs::create_dir_all(&new).unwrap();
    let target = env.root.path().join("nvim");
    std::os::unix::fs::symlink(&old, &target).unwrap();

    let link = SymlinkResource::new(new.clone(), target.clone());
    assert_eq!(link.ensure().unwrap(), ResourceChange::Applied);
    assert_eq!(std::fs::read_link(&target).unwrap(), new);
}
