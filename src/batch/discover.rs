//! Machine discovery
//! Sources: a caller-supplied list, a machines file, or cluster nodes matching
//! a label selector (via kubectl).

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::batch::types::Machine;
use crate::utils::{FleetcheckError, Result};

pub trait Discoverer {
    fn discover(&self) -> Result<Vec<Machine>>;
}

// ── Static list ─────────────────────────────────────────────────────────────

/// Returns the caller-supplied hosts unchanged. Order is preserved and no
/// deduplication is performed.
pub struct StaticDiscoverer {
    pub machines: Vec<String>,
}

impl Discoverer for StaticDiscoverer {
    fn discover(&self) -> Result<Vec<Machine>> {
        Ok(self.machines.iter().map(|h| Machine::new(h.as_str())).collect())
    }
}

// ── Machines file ───────────────────────────────────────────────────────────

/// One host per line; blank and whitespace-only lines are skipped. No comment
/// syntax.
pub struct FileDiscoverer {
    pub path: PathBuf,
}

impl Discoverer for FileDiscoverer {
    fn discover(&self) -> Result<Vec<Machine>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            FleetcheckError::Discovery(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(Machine::new)
            .collect())
    }
}

// ── Label selector ──────────────────────────────────────────────────────────

/// Queries cluster nodes matching a label selector. An empty selector matches
/// all nodes; `unready_only` keeps only nodes whose Ready condition is not
/// "True". Zero matches is an empty list, not an error.
pub struct KubeDiscoverer {
    selector: String,
    unready_only: bool,
}

impl KubeDiscoverer {
    pub fn new(selector: impl Into<String>, unready_only: bool) -> Self {
        Self {
            selector: selector.into(),
            unready_only,
        }
    }
}

impl Discoverer for KubeDiscoverer {
    fn discover(&self) -> Result<Vec<Machine>> {
        let mut cmd = Command::new("kubectl");
        cmd.args(&["get", "nodes", "-o", "json"]);
        if !self.selector.is_empty() {
            cmd.arg("-l").arg(&self.selector);
        }
        debug!("querying cluster nodes with selector {:?}", self.selector);

        let out = cmd
            .output()
            .map_err(|e| FleetcheckError::Discovery(format!("kubectl failed: {}", e)))?;

        if !out.status.success() {
            return Err(FleetcheckError::Discovery(format!(
                "kubectl get nodes failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let node_list: serde_json::Value = serde_json::from_slice(&out.stdout)
            .map_err(|e| FleetcheckError::Discovery(format!("node list JSON: {}", e)))?;

        parse_node_list(&node_list, self.unready_only)
    }
}

fn parse_node_list(node_list: &serde_json::Value, unready_only: bool) -> Result<Vec<Machine>> {
    let items = node_list["items"]
        .as_array()
        .ok_or_else(|| FleetcheckError::Discovery("node list has no items array".to_string()))?;

    let mut machines = Vec::new();
    for item in items {
        let host = item["metadata"]["name"].as_str().ok_or_else(|| {
            FleetcheckError::Discovery("node without metadata.name".to_string())
        })?;

        if unready_only && node_is_ready(item) {
            continue;
        }

        let labels = item["metadata"]["labels"]
            .as_object()
            .map(|obj| {
                obj.iter()
                    .map(|(k, v)| (k.clone(), v.as_str().unwrap_or("").to_string()))
                    .collect()
            })
            .unwrap_or_default();

        machines.push(Machine {
            host: host.to_string(),
            labels,
        });
    }
    Ok(machines)
}

fn node_is_ready(node: &serde_json::Value) -> bool {
    node["status"]["conditions"]
        .as_array()
        .map(|conds| {
            conds.iter().any(|c| {
                c["type"].as_str() == Some("Ready") && c["status"].as_str() == Some("True")
            })
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn static_list_preserves_order_without_dedup() {
        let d = StaticDiscoverer {
            machines: vec!["b".to_string(), "a".to_string(), "b".to_string()],
        };
        let machines = d.discover().unwrap();
        let hosts: Vec<&str> = machines.iter().map(|m| m.host.as_str()).collect();
        assert_eq!(hosts, vec!["b", "a", "b"]);
    }

    #[test]
    fn file_skips_blank_and_whitespace_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "host1\n\n  \nhost2\n").unwrap();
        let d = FileDiscoverer {
            path: file.path().to_path_buf(),
        };
        let machines = d.discover().unwrap();
        let hosts: Vec<&str> = machines.iter().map(|m| m.host.as_str()).collect();
        assert_eq!(hosts, vec!["host1", "host2"]);
    }

    #[test]
    fn unreadable_file_is_a_discovery_error() {
        let d = FileDiscoverer {
            path: PathBuf::from("/no/such/machines/file"),
        };
        assert!(matches!(
            d.discover(),
            Err(FleetcheckError::Discovery(_))
        ));
    }

    fn node(name: &str, ready: &str) -> serde_json::Value {
        serde_json::json!({
            "metadata": { "name": name, "labels": { "role": "worker" } },
            "status": { "conditions": [ { "type": "Ready", "status": ready } ] }
        })
    }

    #[test]
    fn zero_matching_nodes_is_empty_not_an_error() {
        let list = serde_json::json!({ "items": [] });
        assert!(parse_node_list(&list, false).unwrap().is_empty());
    }

    #[test]
    fn parses_node_names_and_labels() {
        let list = serde_json::json!({ "items": [ node("node-1", "True") ] });
        let machines = parse_node_list(&list, false).unwrap();
        assert_eq!(machines[0].host, "node-1");
        assert_eq!(machines[0].labels.get("role").map(String::as_str), Some("worker"));
    }

    #[test]
    fn unready_only_filters_ready_nodes() {
        let list = serde_json::json!({
            "items": [ node("ready-1", "True"), node("broken-1", "False"), node("broken-2", "Unknown") ]
        });
        let machines = parse_node_list(&list, true).unwrap();
        let hosts: Vec<&str> = machines.iter().map(|m| m.host.as_str()).collect();
        assert_eq!(hosts, vec!["broken-1", "broken-2"]);
    }

    #[test]
    fn malformed_node_list_is_a_discovery_error() {
        let list = serde_json::json!({ "kind": "Status" });
        assert!(parse_node_list(&list, false).is_err());
    }
}
