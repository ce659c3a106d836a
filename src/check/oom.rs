//! OOM-kill detection
//! Scans the kernel log for oom-killer records and extracts the victim
//! process, its resident set size and oom_score_adj.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use regex::Regex;

use crate::check::result::CheckResult;
use crate::check::Checker;
use crate::utils::{FleetcheckError, Result};

const KERN_LOG_PATH: &str = "/var/log/kern.log";
const CGROUP_OOM_KEY: &str = "Memory cgroup out of memory";
const OUT_OF_MEMORY_KEY: &str = "Out of memory";

const OOM_PATTERN: &str =
    r"^(.*:.{2}:.{2}) .* process (.*) \((.*)\) .* anon-rss:(.*), file-rss.* oom_score_adj:(.*)";

const HELP_LINKS: [&str; 3] = [
    "https://www.kernel.org/doc/gorman/html/understand/understand016.html",
    "https://stackoverflow.com/questions/18845857/what-does-anon-rss-and-total-vm-mean",
    "https://medium.com/tailwinds-navigator/kubernetes-tip-how-does-oomkilled-work-ba71b135993b",
];

pub struct OomChecker {
    kern_log_path: String,
}

impl OomChecker {
    pub fn new() -> Self {
        Self {
            kern_log_path: KERN_LOG_PATH.to_string(),
        }
    }

    #[cfg(test)]
    fn with_log_path(path: &str) -> Self {
        Self {
            kern_log_path: path.to_string(),
        }
    }

    fn scan_kern_log(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.kern_log_path)?;
        let re = Regex::new(OOM_PATTERN)
            .map_err(|e| FleetcheckError::Parse(format!("oom pattern: {}", e)))?;

        let mut infos = Vec::new();
        for line in content.lines() {
            if line.contains(CGROUP_OOM_KEY) || line.contains(OUT_OF_MEMORY_KEY) {
                infos.push(parse_oom_line(&re, line)?);
            }
        }
        Ok(infos)
    }
}

impl Checker for OomChecker {
    fn name(&self) -> &'static str {
        "oom"
    }

    fn check(&self) -> Result<Vec<CheckResult>> {
        let mut result = CheckResult {
            checker: self.name().to_string(),
            ..Default::default()
        };

        if !Path::new(&self.kern_log_path).exists() {
            result.description = "skip: kernel log not available on this system".to_string();
            return Ok(vec![result]);
        }

        match self.scan_kern_log() {
            Ok(infos) if infos.is_empty() => {
                result.description = "No OOM found in recent kernel log.".to_string();
            }
            Ok(infos) => {
                result.error = infos.join("\n");
                result.description = "Detected OOM-killed processes".to_string();
                result.help_links = HELP_LINKS.iter().map(|s| s.to_string()).collect();
            }
            // log rotated away between the exists() probe and the read
            Err(FleetcheckError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                result.description = "skip: kernel log not available on this system".to_string();
            }
            Err(e) => return Err(e),
        }
        Ok(vec![result])
    }
}

fn parse_oom_line(re: &Regex, line: &str) -> Result<String> {
    let caps = re
        .captures(line)
        .ok_or_else(|| FleetcheckError::Parse(format!("cannot parse oom record: {}", line)))?;
    Ok(format!(
        "process [{} {}] was OOM killed at [{}] [anon-rss:{}] [oom_score_adj:{}]",
        &caps[2], &caps[3], &caps[1], &caps[4], &caps[5]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_LINE: &str = "Mar  4 10:21:02 node-1 kernel: [812411.123] Memory cgroup out of memory: Killed process 31337 (java) total-vm:901234kB, anon-rss:612304kB, file-rss:1024kB, shmem-rss:0kB, UID:1000 pgtables:1540kB oom_score_adj:984";

    #[test]
    fn parses_oom_record() {
        let re = Regex::new(OOM_PATTERN).unwrap();
        let info = parse_oom_line(&re, SAMPLE_LINE).unwrap();
        assert!(info.contains("31337"));
        assert!(info.contains("java"));
        assert!(info.contains("oom_score_adj:984"));
    }

    #[test]
    fn unparsable_record_is_an_error() {
        let re = Regex::new(OOM_PATTERN).unwrap();
        assert!(parse_oom_line(&re, "Out of memory but not a real record").is_err());
    }

    #[test]
    fn missing_log_is_a_skip_not_a_failure() {
        let checker = OomChecker::with_log_path("/definitely/not/a/kern.log");
        let results = checker.check().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].ok());
        assert!(results[0].description.starts_with("skip"));
    }

    #[test]
    fn flags_oom_kill_and_attaches_help_links() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Mar  4 10:20:59 node-1 kernel: usb 1-1: reset").unwrap();
        writeln!(file, "{}", SAMPLE_LINE).unwrap();
        let checker = OomChecker::with_log_path(file.path().to_str().unwrap());

        let results = checker.check().unwrap();
        assert_eq!(results.len(), 1);
        assert!(!results[0].ok());
        assert!(results[0].error.contains("java"));
        assert_eq!(results[0].help_links.len(), 3);
    }

    #[test]
    fn clean_log_reports_nothing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Mar  4 10:20:59 node-1 kernel: usb 1-1: reset").unwrap();
        let checker = OomChecker::with_log_path(file.path().to_str().unwrap());

        let results = checker.check().unwrap();
        assert!(results[0].ok());
        assert!(results[0].description.contains("No OOM"));
    }
}
