//! Command: print a shell completion script.
use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

/// Write the completion script for `shell` to `out`.
pub fn generate(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

/// Print the completion script for `shell` to stdout.
pub fn run(shell: Shell) {
    generate(shell, &mut std::io::stdout());
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn powershell_script_registers_wincfg() {
        let mut out = Vec::new();
        generate(Shell::PowerShell, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("Register-ArgumentCompleter"));
        assert!(script.contains("wincfg"));
    }

    #[test]
    fn bash_script_lists_subcommands() {
        let mut out = Vec::new();
        generate(Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();
        for sub in ["install", "list", "completions", "version"] {
            assert!(script.contains(sub), "missing {sub}");
        }
    }
}
