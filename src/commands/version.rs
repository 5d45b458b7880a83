//! Command: print version information.

/// Print the wincfg version to stdout.
pub fn run() {
    println!("wincfg {}", super::version_string());
}
