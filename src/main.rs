use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use wincfg_cli::cli::{self, Command, InstallOpts};
use wincfg_cli::commands;
use wincfg_cli::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let command = args
        .command
        .unwrap_or_else(|| Command::Install(InstallOpts::default()));

    match command {
        Command::Install(opts) => {
            logging::init_subscriber(args.verbose, "install");
            let log = Arc::new(Logger::new("install"));
            commands::install::run(&args.global, &opts, &log)
        }
        Command::List => {
            logging::init_subscriber(args.verbose, "list");
            let log = Arc::new(Logger::new("list"));
            commands::list::run(&args.global, &log)
        }
        Command::Completions { shell } => {
            commands::completions::run(shell);
            Ok(())
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
