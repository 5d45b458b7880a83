//! User prompts behind an injectable [`Prompter`] trait.
use anyhow::{Context as _, Result};

use crate::config::PackageDescriptor;

/// Width the package id is padded to in picker labels.
const ID_WIDTH: usize = 30;

/// Source of user decisions during a run.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Ask which packages to install; returns the chosen ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown (e.g. no TTY).
    fn select_packages(&self, packages: &[PackageDescriptor]) -> Result<Vec<String>>;

    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown (e.g. no TTY).
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Label shown for a package in the picker: icon, padded id, description.
#[must_use]
pub fn option_label(package: &PackageDescriptor) -> String {
    format!(
        "{} {:<width$} {}",
        package.icon,
        package.id,
        package.description,
        width = ID_WIDTH
    )
}

/// Interactive prompts on the terminal.
///
/// With `assume_yes` the package picker is still shown but confirmations
/// are answered without asking.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    /// Create a terminal prompter.
    #[must_use]
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for TerminalPrompter {
    fn select_packages(&self, packages: &[PackageDescriptor]) -> Result<Vec<String>> {
        if packages.is_empty() {
            return Ok(Vec::new());
        }
        let labels: Vec<String> = packages.iter().map(option_label).collect();
        let chosen = dialoguer::MultiSelect::new()
            .with_prompt("Select packages to install")
            .items(&labels)
            .interact()
            .context("package selection prompt failed")?;
        Ok(chosen
            .into_iter()
            .filter_map(|i| packages.get(i))
            .map(|p| p.id.clone())
            .collect())
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .context("confirmation prompt failed")?;
        Ok(confirmed)
    }
}

/// Non-interactive answers for `--packages` and `--yes`.
///
/// Without `assume_yes` every confirmation takes its default.
#[derive(Debug, Clone, Default)]
pub struct PresetPrompter {
    selection: Vec<String>,
    assume_yes: bool,
}

impl PresetPrompter {
    /// Answer with a fixed package selection.
    #[must_use]
    pub const fn new(selection: Vec<String>, assume_yes: bool) -> Self {
        Self {
            selection,
            assume_yes,
        }
    }
}

impl Prompter for PresetPrompter {
    fn select_packages(&self, packages: &[PackageDescriptor]) -> Result<Vec<String>> {
        Ok(self
            .selection
            .iter()
            .filter(|id| packages.iter().any(|p| &p.id == *id))
            .cloned()
            .collect())
    }

    fn confirm(&self, _message: &str, default: bool) -> Result<bool> {
        Ok(self.assume_yes || default)
    }
}

/// Split a preset selection into ids found in the manifest and unknown ids.
#[must_use]
pub fn partition_known<'a>(
    selection: &'a [String],
    packages: &[PackageDescriptor],
) -> (Vec<&'a str>, Vec<&'a str>) {
    selection
        .iter()
        .map(String::as_str)
        .partition(|id| packages.iter().any(|p| p.id == *id))
}
