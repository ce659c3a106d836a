//! Disk usage checker
//! Source: df -Pk (space) and df -Pi (inodes)

use std::collections::HashMap;
use std::process::Command;

use crate::check::result::CheckResult;
use crate::check::Checker;
use crate::utils::{FleetcheckError, Result};

const USAGE_THRESHOLD_PERCENT: f64 = 85.0;

pub struct DiskUsageChecker {
    threshold_percent: f64,
}

struct MountUsage {
    mount: String,
    filesystem: String,
    used_percent: f64,
    inode_used_percent: f64,
}

impl DiskUsageChecker {
    pub fn new() -> Self {
        Self {
            threshold_percent: USAGE_THRESHOLD_PERCENT,
        }
    }
}

impl Checker for DiskUsageChecker {
    fn name(&self) -> &'static str {
        "diskusage"
    }

    fn check(&self) -> Result<Vec<CheckResult>> {
        let space = run_df("-Pk")?;
        let inodes = run_df("-Pi").unwrap_or_default();
        let mounts = parse_df(&space, &parse_inode_percents(&inodes));

        let mut result = CheckResult {
            checker: self.name().to_string(),
            ..Default::default()
        };

        let over: Vec<String> = mounts
            .iter()
            .filter(|m| {
                m.used_percent > self.threshold_percent
                    || m.inode_used_percent > self.threshold_percent
            })
            .map(|m| {
                format!(
                    "{} ({}) is {:.1}% full, {:.1}% of inodes used",
                    m.mount, m.filesystem, m.used_percent, m.inode_used_percent
                )
            })
            .collect();

        if over.is_empty() {
            result.description = format!("{} mounts below {:.0}% usage", mounts.len(), self.threshold_percent);
        } else {
            result.error = over.join("\n");
            result.description = "Detected filesystems running out of space or inodes".to_string();
            result.recommendations = vec![
                "Remove unused files or grow the affected filesystem".to_string(),
            ];
        }
        Ok(vec![result])
    }
}

fn run_df(flag: &str) -> Result<String> {
    let out = Command::new("df")
        .args(&[flag])
        .output()
        .map_err(|e| FleetcheckError::System(format!("df failed: {}", e)))?;

    if !out.status.success() {
        return Err(FleetcheckError::System("df command failed".to_string()));
    }
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

// Skip tmpfs / devtmpfs / overlay pseudo filesystems, keep real mounts only
fn parse_df(space_output: &str, inode_map: &HashMap<String, f64>) -> Vec<MountUsage> {
    let mut mounts = Vec::new();
    for line in space_output.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            continue;
        }

        let fs = parts[0];
        if fs.starts_with("tmpfs") || fs.starts_with("devtmpfs") || fs.starts_with("overlay") {
            continue;
        }

        let used_percent: f64 = parts[4].trim_end_matches('%').parse().unwrap_or(0.0);
        let mount = parts[5].to_string();
        let inode_used_percent = inode_map.get(&mount).copied().unwrap_or(0.0);

        mounts.push(MountUsage {
            mount,
            filesystem: fs.to_string(),
            used_percent,
            inode_used_percent,
        });
    }
    mounts
}

fn parse_inode_percents(output: &str) -> HashMap<String, f64> {
    let mut map = HashMap::new();
    for line in output.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() >= 6 {
            let pct: f64 = parts[4].trim_end_matches('%').parse().unwrap_or(0.0);
            map.insert(parts[5].to_string(), pct);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACE: &str = "\
Filesystem     1024-blocks     Used Available Capacity Mounted on
/dev/sda1        102400000 92160000  10240000      90% /
/dev/sdb1        204800000 10240000 194560000       5% /data
tmpfs              8192000        0   8192000       0% /dev/shm
";

    const INODES: &str = "\
Filesystem       Inodes   IUsed    IFree IUse% Mounted on
/dev/sda1       6553600  655360  5898240   10% /
/dev/sdb1      13107200 12976128   131072   99% /data
";

    #[test]
    fn skips_pseudo_filesystems() {
        let mounts = parse_df(SPACE, &HashMap::new());
        assert_eq!(mounts.len(), 2);
        assert!(mounts.iter().all(|m| m.mount != "/dev/shm"));
    }

    #[test]
    fn joins_inode_usage_by_mount() {
        let mounts = parse_df(SPACE, &parse_inode_percents(INODES));
        let data = mounts.iter().find(|m| m.mount == "/data").unwrap();
        assert_eq!(data.inode_used_percent, 99.0);
        assert_eq!(data.used_percent, 5.0);
    }

    #[test]
    fn flags_mounts_over_threshold() {
        let mounts = parse_df(SPACE, &parse_inode_percents(INODES));
        let over: Vec<&MountUsage> = mounts
            .iter()
            .filter(|m| m.used_percent > 85.0 || m.inode_used_percent > 85.0)
            .collect();
        // "/" is over on space, "/data" on inodes
        assert_eq!(over.len(), 2);
    }
}
