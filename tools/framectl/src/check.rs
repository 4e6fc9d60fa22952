//! `framectl check`
//!
//! Loads each profile document and runs the static frame format checks.

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::*;
use scale_codec::DeviceProfile;
use serde::Serialize;
use tracing::debug;

use crate::settings::{OutputFormat, Settings};

/// Check result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

/// Result for one profile file
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub path: PathBuf,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
}

/// Problems that only degrade decoding instead of breaking it
fn is_warning(problem: &str) -> bool {
    problem.ends_with("will be ignored") || problem.ends_with("will be skipped")
}

pub fn check_profile(path: &Path) -> CheckResult {
    let profile = match DeviceProfile::load(path) {
        Ok(profile) => profile,
        Err(e) => {
            return CheckResult {
                path: path.to_path_buf(),
                status: CheckStatus::Error,
                model: None,
                problems: vec![e.to_string()],
            }
        },
    };

    let problems = profile.frame.check();
    let status = if problems.is_empty() {
        CheckStatus::Ok
    } else if problems.iter().all(|p| is_warning(p)) {
        CheckStatus::Warning
    } else {
        CheckStatus::Error
    };
    debug!(path = %path.display(), ?status, "Profile checked");

    CheckResult {
        path: path.to_path_buf(),
        status,
        model: Some(profile.model),
        problems,
    }
}

fn print_results(results: &[CheckResult]) {
    for result in results {
        let (icon, label) = match result.status {
            CheckStatus::Ok => ("✓".green(), "ok".green()),
            CheckStatus::Warning => ("!".yellow(), "warning".yellow()),
            CheckStatus::Error => ("✗".red(), "error".red()),
        };
        let model = result.model.as_deref().unwrap_or("-");
        println!("{} {} ({}) {}", icon, result.path.display(), model.dimmed(), label);
        for problem in &result.problems {
            println!("    {}", problem);
        }
    }

    let failed = results.iter().filter(|r| r.status == CheckStatus::Error).count();
    println!();
    if failed == 0 {
        println!("{} {} profile(s) checked", "✓".green(), results.len());
    } else {
        println!("{} {} of {} profile(s) failed", "✗".red(), failed, results.len());
    }
}

pub fn run(settings: &Settings, paths: &[PathBuf]) -> Result<bool> {
    let results: Vec<CheckResult> = paths
        .iter()
        .map(|path| check_profile(&settings.resolve_profile(path)))
        .collect();

    match settings.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Text => print_results(&results),
    }

    Ok(results.iter().all(|r| r.status != CheckStatus::Error))
}
