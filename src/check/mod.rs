pub mod diskusage;
pub mod dummy;
pub mod oom;
pub mod output;
pub mod registry;
pub mod result;
pub mod systemload;

use std::collections::BTreeMap;
use std::fs;

use log::info;

use crate::utils::{FleetcheckError, Result};
use result::{CheckReport, CheckResult};

/// A named diagnostic suite. `name()` doubles as the registry key.
pub trait Checker {
    fn name(&self) -> &'static str;
    fn check(&self) -> Result<Vec<CheckResult>>;
}

pub fn run_check(suites: &[String], output_format: &str) -> Result<()> {
    let checkers = registry::registry();
    let results = run_checks(checkers, suites)?;

    let report = CheckReport {
        collected_at: chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S %z")
            .to_string(),
        hostname: local_hostname(),
        results,
    };

    output::display_report(&report, output_format)
}

pub fn list_suites() -> Result<()> {
    for name in registry::registry().keys() {
        println!("{}", name);
    }
    Ok(())
}

/// Run the selected suites against the local machine. An empty selection runs
/// every registered checker; an unknown name fails before anything executes.
/// A checker that errors out is captured as a failed result, not a crash.
pub fn run_checks(
    checkers: BTreeMap<&'static str, Box<dyn Checker>>,
    suites: &[String],
) -> Result<Vec<CheckResult>> {
    for name in suites {
        if !checkers.contains_key(name.as_str()) {
            return Err(FleetcheckError::UnknownSuite(name.clone()));
        }
    }

    let mut results = Vec::new();
    for (name, checker) in &checkers {
        if !suites.is_empty() && !suites.iter().any(|s| s == name) {
            continue;
        }
        info!("running checker {}", name);
        match checker.check() {
            Ok(mut r) => results.append(&mut r),
            Err(e) => results.push(CheckResult {
                checker: name.to_string(),
                error: e.to_string(),
                description: "checker failed to run".to_string(),
                ..Default::default()
            }),
        }
    }
    Ok(results)
}

fn local_hostname() -> String {
    if let Ok(s) = fs::read_to_string("/proc/sys/kernel/hostname") {
        let s = s.trim();
        if !s.is_empty() {
            return s.to_string();
        }
    }
    std::process::Command::new("hostname")
        .output()
        .ok()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
