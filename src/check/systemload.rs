//! System load checker
//! Source: /proc/loadavg, /proc/cpuinfo

use std::fs;

use crate::check::result::CheckResult;
use crate::check::Checker;
use crate::utils::Result;

pub struct SystemLoadChecker;

impl Checker for SystemLoadChecker {
    fn name(&self) -> &'static str {
        "systemload"
    }

    fn check(&self) -> Result<Vec<CheckResult>> {
        let mut result = CheckResult {
            checker: self.name().to_string(),
            ..Default::default()
        };

        let loadavg = match fs::read_to_string("/proc/loadavg") {
            Ok(s) => s,
            Err(_) => {
                result.description = "skip: /proc/loadavg not available on this system".to_string();
                return Ok(vec![result]);
            }
        };

        let (load1, load5, load15) = parse_loadavg(&loadavg);
        let cores = logical_cores(&fs::read_to_string("/proc/cpuinfo").unwrap_or_default());

        result.logs = vec![format!(
            "load average: {:.2} {:.2} {:.2} (1/5/15 min), {} logical cores",
            load1, load5, load15, cores
        )];

        if cores > 0 && load1 > cores as f64 {
            result.error = format!("1-minute load {:.2} exceeds {} logical cores", load1, cores);
            result.description = "System is overloaded".to_string();
            result.recommendations = vec![
                "Inspect runaway processes with top or ps aux --sort=-pcpu".to_string(),
            ];
        } else {
            result.description = "System load is within capacity.".to_string();
        }
        Ok(vec![result])
    }
}

fn parse_loadavg(s: &str) -> (f64, f64, f64) {
    let mut parts = s.split_whitespace();
    let v1 = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
    let v5 = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
    let v15 = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
    (v1, v5, v15)
}

fn logical_cores(cpuinfo: &str) -> u32 {
    cpuinfo
        .lines()
        .filter(|l| l.starts_with("processor"))
        .count() as u32
}
