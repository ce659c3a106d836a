//! Batch run data model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::check::result::CheckResult;

/// An addressable target machine. Identity is the host string; `labels` is
/// only populated by label-selector discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub host: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl Machine {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            labels: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub machines: Vec<Machine>,
    pub suites: Vec<String>,
    pub concurrency: usize,
}

/// One machine's outcome. `dispatch_error` is set when the machine could not
/// be reached or executed at all; a per-check `error` means the check ran and
/// reported a problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineResult {
    pub machine: Machine,
    #[serde(default)]
    pub results: Vec<CheckResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_error: Option<String>,
}

/// Ordered to match discovery order, regardless of completion order.
pub type BatchResult = Vec<MachineResult>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub collected_at: String,
    pub machines: BatchResult,
}
