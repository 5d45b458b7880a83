//! winget package resource: installed-set query and batched install.
use std::collections::HashSet;

use anyhow::Result;

use crate::error::SubprocessError;
use crate::exec::Executor;
use crate::logging::Log;

/// The winget executable.
pub const WINGET: &str = "winget";

/// Arguments for listing installed packages.
const LIST_ARGS: &[&str] = &[
    "list",
    "--accept-source-agreements",
    "--disable-interactivity",
];

/// Flags passed ahead of the package ids on every install.
const INSTALL_FLAGS: &[&str] = &[
    "install",
    "--silent",
    "--accept-package-agreements",
    "--accept-source-agreements",
];

/// Snapshot of `winget list` output.
///
/// Membership is a case-sensitive substring test against the raw listing,
/// so `Git.Git` also matches a listing that only contains `Git.GitLFS`.
/// `winget list` truncates long ids with `…` and prints a table whose
/// columns shift with the console width, which makes token-level matching
/// no more reliable than a plain substring search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledSet {
    listing: String,
}

impl InstalledSet {
    /// Build a set from raw listing output.
    #[must_use]
    pub fn from_listing(listing: impl Into<String>) -> Self {
        Self {
            listing: listing.into(),
        }
    }

    /// An empty set; every id is reported as missing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `id` appears anywhere in the listing.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        !id.is_empty() && self.listing.contains(id)
    }

    /// Whether the listing is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.listing.is_empty()
    }
}

/// Query winget for the installed packages.
///
/// # Errors
///
/// Returns [`SubprocessError::Spawn`] if winget cannot be started and
/// [`SubprocessError::Failed`] if it exits unsuccessfully.
pub fn query_installed(executor: &dyn Executor) -> Result<InstalledSet> {
    let result = executor.run_unchecked(WINGET, LIST_ARGS)?;
    if !result.success {
        return Err(SubprocessError::Failed {
            program: format!("{WINGET} list"),
            code: result.code,
            stderr: result.stderr.trim().to_string(),
        }
        .into());
    }
    Ok(InstalledSet::from_listing(result.stdout))
}

/// Query the installed set, degrading to an empty set on failure.
///
/// An empty set means every requested package is handed to winget, which
/// skips packages it already has.
pub fn load_installed_set(executor: &dyn Executor, log: &dyn Log) -> InstalledSet {
    match query_installed(executor) {
        Ok(set) => set,
        Err(e) => {
            log.warn(&format!(
                "could not list installed packages, installing everything requested: {e:#}"
            ));
            InstalledSet::empty()
        }
    }
}

/// What happened to one requested package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// Present before the run; not passed to winget.
    AlreadyInstalled,
    /// Passed to winget and present afterwards.
    Installed,
    /// Passed to winget and not present afterwards, or winget could not run.
    Failed {
        /// Why the package is considered failed.
        reason: String,
    },
    /// winget succeeded but the installed set could not be re-queried.
    Unverified,
}

impl PackageOutcome {
    /// Whether the outcome counts as a failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-package result of an install request.
///
/// Already-installed ids come first, then the batched ids in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// `(id, outcome)` for every distinct requested id.
    pub outcomes: Vec<(String, PackageOutcome)>,
}

impl InstallReport {
    /// Ids that were handed to winget.
    #[must_use]
    pub fn batch(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o != PackageOutcome::AlreadyInstalled)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Ids whose outcome is a failure.
    #[must_use]
    pub fn failures(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.is_failure())
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// Install the packages in `requested` that are not in `installed`.
///
/// Runs a single `winget install` for the whole delta with the console
/// attached, then re-queries the installed set to give each batched id an
/// outcome.  Never fails: problems are recorded in the returned report.
pub fn install(
    requested: &[String],
    installed: &InstalledSet,
    executor: &dyn Executor,
    log: &dyn Log,
) -> InstallReport {
    let mut report = InstallReport::default();
    let mut to_install: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for id in requested {
        if !seen.insert(id.as_str()) {
            continue;
        }
        if installed.contains(id) {
            log.info(&format!("{id} is already installed"));
            report
                .outcomes
                .push((id.clone(), PackageOutcome::AlreadyInstalled));
        } else {
            to_install.push(id);
        }
    }

    if to_install.is_empty() {
        log.info("all packages already installed");
        return report;
    }

    log.info(&format!("installing {}", to_install.join(", ")));
    let mut args: Vec<&str> = INSTALL_FLAGS.to_vec();
    args.extend(&to_install);

    let batch = match executor.run_attached(WINGET, &args) {
        Ok(result) => {
            if !result.success {
                log.warn(&format!(
                    "winget install exited with code {}",
                    result.code.unwrap_or(-1)
                ));
            }
            result
        }
        Err(e) => {
            log.error(&format!("winget install could not run: {e:#}"));
            let reason = format!("{e:#}");
            report.outcomes.extend(to_install.iter().map(|id| {
                (
                    (*id).to_string(),
                    PackageOutcome::Failed {
                        reason: reason.clone(),
                    },
                )
            }));
            return report;
        }
    };

    let after = match query_installed(executor) {
        Ok(set) => Some(set),
        Err(e) => {
            log.warn(&format!("could not verify installed packages: {e:#}"));
            None
        }
    };

    for id in to_install {
        let outcome = match &after {
            Some(set) if set.contains(id) => PackageOutcome::Installed,
            Some(_) => PackageOutcome::Failed {
                reason: "not listed after install".to_string(),
            },
            None if batch.success => PackageOutcome::Unverified,
            None => PackageOutcome::Failed {
                reason: format!("winget exited with code {}", batch.code.unwrap_or(-1)),
            },
        };
        match &outcome {
            PackageOutcome::Installed => log.info(&format!("{id} installed")),
            PackageOutcome::Unverified => log.debug(&format!("{id} not verified")),
            PackageOutcome::Failed { reason } => {
                log.error(&format!("{id} failed to install: {reason}"));
            }
            PackageOutcome::AlreadyInstalled => {}
        }
        report.outcomes.push((id.to_string(), outcome));
    }

    report
}
