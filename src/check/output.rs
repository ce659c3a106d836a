//! Output layer: renders a local CheckReport or a fleet BatchReport as text
//! or json.

use crate::batch::types::{BatchReport, MachineResult};
use crate::check::result::{CheckReport, CheckResult};
use crate::utils::{FleetcheckError, Result};

pub fn display_report(report: &CheckReport, format: &str) -> Result<()> {
    match format {
        "json" => display_json(report),
        "text" => {
            display_report_text(report);
            Ok(())
        }
        other => Err(FleetcheckError::System(format!("unknown format: {}", other))),
    }
}

pub fn display_batch(report: &BatchReport, format: &str) -> Result<()> {
    match format {
        "json" => display_json(report),
        "text" => {
            display_batch_text(report);
            Ok(())
        }
        other => Err(FleetcheckError::System(format!("unknown format: {}", other))),
    }
}

// ── JSON ────────────────────────────────────────────────────────────────────

fn display_json<T: serde::Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| FleetcheckError::System(format!("JSON serialize: {}", e)))?;
    println!("{}", json);
    Ok(())
}

// ── Text ────────────────────────────────────────────────────────────────────

fn display_report_text(report: &CheckReport) {
    print_section(&format!("CHECKS ON {}", report.hostname));
    println!("  Collected at : {}", report.collected_at);
    for result in &report.results {
        display_check_result(result);
    }
}

fn display_batch_text(report: &BatchReport) {
    print_section(&format!("BATCH REPORT ({} machines)", report.machines.len()));
    println!("  Collected at : {}", report.collected_at);

    for (i, mr) in report.machines.iter().enumerate() {
        println!("\n  [{}/{}] {}", i + 1, report.machines.len(), mr.machine.host);
        match &mr.dispatch_error {
            Some(err) => println!("      ⚠ unreachable: {}", err),
            None => {
                for result in &mr.results {
                    display_check_result(result);
                }
            }
        }
    }

    let (ok, check_failed, unreachable) = summarize(&report.machines);
    print_section("SUMMARY");
    println!(
        "  {} machines  {} ok  {} with failing checks  {} unreachable",
        report.machines.len(),
        ok,
        check_failed,
        unreachable
    );
}

fn display_check_result(result: &CheckResult) {
    let icon = if result.ok() { "●" } else { "⚠" };
    println!("      {} {:<12} {}", icon, result.checker, result.description);

    if !result.ok() {
        for line in result.error.lines() {
            println!("          {}", line);
        }
    }
    for rec in &result.recommendations {
        println!("          fix: {}", rec);
    }
    for log in &result.logs {
        println!("          log: {}", log);
    }
    for link in &result.help_links {
        println!("          see: {}", link);
    }
}

/// (ok, with failing checks, unreachable) machine counts
fn summarize(machines: &[MachineResult]) -> (usize, usize, usize) {
    let unreachable = machines.iter().filter(|m| m.dispatch_error.is_some()).count();
    let check_failed = machines
        .iter()
        .filter(|m| m.dispatch_error.is_none() && m.results.iter().any(|r| !r.ok()))
        .count();
    let ok = machines.len() - unreachable - check_failed;
    (ok, check_failed, unreachable)
}

fn print_section(title: &str) {
    println!("\n{}", "─".repeat(60));
    println!("  {}", title);
    println!("{}", "─".repeat(60));
}
