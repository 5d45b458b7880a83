use std::process::Command;

fn main() {
    // Prefer WINCFG_VERSION env var if set (e.g., by CI release workflow),
    // otherwise fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("WINCFG_VERSION") {
        println!("cargo:rustc-env=WINCFG_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=WINCFG_VERSION={version}");
    }

    // Re-run if git HEAD changes, the bundled templates change, or the env var changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-changed=templates");
    println!("cargo:rerun-if-env-changed=WINCFG_VERSION");
}
