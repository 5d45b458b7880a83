//! Command: interactive bootstrap.
//!
//! Picks packages, installs the missing ones, then asks before writing the
//! configuration and linking the shell profile.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::PackageDescriptor;
use crate::logging::{Log, Logger};
use crate::prompt::{self, PresetPrompter, Prompter, TerminalPrompter};
use crate::tasks::configuration::AssembleConfiguration;
use crate::tasks::links::{LinkEditorConfig, LinkShellProfile};
use crate::tasks::packages::InstallPackages;
use crate::tasks::{self, Context, Task};

/// Question asked before the configuration assembler runs.
pub const CONFIGURE_PROMPT: &str = "Do you want to create initial configuration files?";
/// Question asked before the shell profile is linked.
pub const PROFILE_LINK_PROMPT: &str = "Do you want to add a symlink to your PowerShell profile?";

/// Run the install command.
///
/// # Errors
///
/// Returns an error if settings cannot be resolved or any task failed.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("wincfg {}", super::version_string()));

    let ctx = super::build_context(global, Arc::clone(log) as Arc<dyn Log>)?;
    let packages = super::load_packages(&ctx, global);

    let prompter: Box<dyn Prompter> = if opts.packages.is_empty() {
        Box::new(TerminalPrompter::new(opts.yes))
    } else {
        let (_, unknown) = prompt::partition_known(&opts.packages, &packages);
        for id in unknown {
            log.warn(&format!("unknown package id: {id}"));
        }
        Box::new(PresetPrompter::new(opts.packages.clone(), opts.yes))
    };

    bootstrap(&ctx, &packages, prompter.as_ref());
    super::finish(log)
}

/// Drive one bootstrap run: pick packages, install them, then write
/// configuration and links as confirmed.
///
/// Every step is recorded in the context's logger; nothing here aborts
/// the run.
pub fn bootstrap(ctx: &Context, packages: &[PackageDescriptor], prompter: &dyn Prompter) {
    ctx.log.stage("Selecting packages");
    let selected = match prompter.select_packages(packages) {
        Ok(selected) => selected,
        Err(e) => {
            ctx.log.error(&format!("{e:#}"));
            Vec::new()
        }
    };
    ctx.log.info(&format!("selected: {}", describe_selection(&selected)));

    tasks::execute(&InstallPackages::new(selected.clone()), ctx);

    let assemble = AssembleConfiguration::new(selected.clone(), packages.to_vec());
    run_if_confirmed(&assemble, CONFIGURE_PROMPT, ctx, prompter);
    run_if_confirmed(&LinkShellProfile, PROFILE_LINK_PROMPT, ctx, prompter);

    tasks::execute(&LinkEditorConfig::for_selection(&selected), ctx);
}

fn run_if_confirmed(task: &dyn Task, question: &str, ctx: &Context, prompter: &dyn Prompter) {
    let confirmed = prompter.confirm(question, false).unwrap_or_else(|e| {
        ctx.log.warn(&format!("{e:#}"));
        false
    });
    if confirmed {
        tasks::execute(task, ctx);
    } else {
        tasks::decline(task, ctx);
    }
}

fn describe_selection(selected: &[String]) -> String {
    if selected.is_empty() {
        "nothing".to_string()
    } else {
        selected.join(", ")
    }
}
