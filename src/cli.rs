//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the Windows environment bootstrapper.
#[derive(Parser, Debug)]
#[command(
    name = "wincfg",
    about = "Interactive bootstrapper for a Windows development environment",
    version
)]
pub struct Cli {
    /// Subcommand to run; `install` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Override the config root (default: ~/.config)
    #[arg(long, global = true)]
    pub config_root: Option<PathBuf>,

    /// Read templates from a directory instead of the bundled copy
    #[arg(long, global = true)]
    pub templates: Option<PathBuf>,

    /// Read the package manifest from a file instead of the bundled copy
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select packages, install them, and write their configuration
    Install(InstallOpts),
    /// List the packages in the manifest
    List,
    /// Print a shell completion script
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Select these package ids instead of prompting
    #[arg(long, value_delimiter = ',')]
    pub packages: Vec<String>,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,
}
