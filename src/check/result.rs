//! Check result wire types
//! A remote `fleetcheck check --output json` emits a CheckReport; the batch
//! layer decodes it back into these structs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub checker: String,
    #[serde(default)]
    pub error: String,                // empty = success
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub help_links: Vec<String>,
}

impl CheckResult {
    pub fn ok(&self) -> bool {
        self.error.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub collected_at: String,
    pub hostname: String,
    pub results: Vec<CheckResult>,
}
