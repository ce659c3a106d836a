//! Remote suite invocation over ssh
//! Runs the diagnostic command on one machine and decodes its JSON report.

use std::process::Command;

use log::debug;
use thiserror::Error;

use crate::batch::types::Machine;
use crate::check::result::{CheckReport, CheckResult};

/// Per-machine invocation failures. These are recorded as that machine's
/// `dispatch_error` and never abort the batch.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("connect error: {0}")]
    Connect(String),

    #[error("auth error: {0}")]
    Auth(String),

    #[error("remote exec error: {0}")]
    RemoteExec(String),
}

pub trait RemoteInvoker: Sync {
    fn invoke(
        &self,
        machine: &Machine,
        suites: &[String],
    ) -> std::result::Result<Vec<CheckResult>, InvokeError>;
}

// ── ssh ─────────────────────────────────────────────────────────────────────

// ssh itself exits 255 on transport/auth failures; anything else is the
// remote command's own exit code.
const SSH_TRANSPORT_EXIT: i32 = 255;

pub struct SshInvoker {
    pub user: Option<String>,
    pub remote_command: String,
    pub connect_timeout_secs: u64,
}

impl SshInvoker {
    fn target(&self, machine: &Machine) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, machine.host),
            None => machine.host.clone(),
        }
    }
}

impl RemoteInvoker for SshInvoker {
    fn invoke(
        &self,
        machine: &Machine,
        suites: &[String],
    ) -> std::result::Result<Vec<CheckResult>, InvokeError> {
        let connect_timeout = format!("ConnectTimeout={}", self.connect_timeout_secs);
        let mut cmd = Command::new("ssh");
        cmd.args(&["-o", "BatchMode=yes", "-o", "StrictHostKeyChecking=no"])
            .arg("-o")
            .arg(connect_timeout)
            .arg(self.target(machine))
            .arg("--")
            .arg(&self.remote_command)
            .args(&["check", "--output", "json"]);
        if !suites.is_empty() {
            cmd.arg("--suites").arg(suites.join(","));
        }
        debug!("invoking {} on {}", self.remote_command, machine.host);

        // output() always reaps the child, so the session is released on
        // every exit path
        let out = cmd
            .output()
            .map_err(|e| InvokeError::Connect(format!("cannot spawn ssh: {}", e)))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(classify_failure(out.status.code(), &stderr));
        }

        decode_remote_report(&out.stdout)
    }
}

fn decode_remote_report(stdout: &[u8]) -> std::result::Result<Vec<CheckResult>, InvokeError> {
    serde_json::from_slice::<CheckReport>(stdout)
        .map(|report| report.results)
        .map_err(|e| InvokeError::RemoteExec(format!("cannot decode remote output: {}", e)))
}

fn classify_failure(code: Option<i32>, stderr: &str) -> InvokeError {
    let detail = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .unwrap_or("no error output")
        .to_string();

    match code {
        Some(SSH_TRANSPORT_EXIT) => {
            let lower = stderr.to_lowercase();
            if lower.contains("permission denied") || lower.contains("authentication") {
                InvokeError::Auth(detail)
            } else {
                InvokeError::Connect(detail)
            }
        }
        Some(code) => InvokeError::RemoteExec(format!("remote exited {}: {}", code, detail)),
        None => InvokeError::RemoteExec(format!("remote killed by signal: {}", detail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failure_is_a_connect_error() {
        let err = classify_failure(
            Some(255),
            "ssh: connect to host node-1 port 22: Connection refused\n",
        );
        assert!(matches!(err, InvokeError::Connect(_)));
        assert!(err.to_string().contains("Connection refused"));
    }

    #[test]
    fn rejected_credentials_are_an_auth_error() {
        let err = classify_failure(
            Some(255),
            "user@node-1: Permission denied (publickey,password).\n",
        );
        assert!(matches!(err, InvokeError::Auth(_)));
    }

    #[test]
    fn nonzero_remote_exit_is_a_remote_exec_error() {
        let err = classify_failure(Some(1), "Error: Unknown suite: dnss\n");
        assert!(matches!(err, InvokeError::RemoteExec(_)));
        assert!(err.to_string().contains("Unknown suite"));
    }

    #[test]
    fn signal_death_is_a_remote_exec_error() {
        assert!(matches!(
            classify_failure(None, ""),
            InvokeError::RemoteExec(_)
        ));
    }

    #[test]
    fn decodes_remote_report_into_results() {
        let json = br#"{
            "collected_at": "2026-01-01 00:00:00 +0000",
            "hostname": "node-1",
            "results": [
                {"checker": "dummy", "description": "dummy check passed"},
                {"checker": "oom", "error": "process [1 java] was OOM killed"}
            ]
        }"#;
        let results = decode_remote_report(json).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].ok());
        assert!(!results[1].ok());
    }

    #[test]
    fn garbage_remote_output_is_a_remote_exec_error() {
        assert!(matches!(
            decode_remote_report(b"Segmentation fault"),
            Err(InvokeError::RemoteExec(_))
        ));
    }

    #[test]
    fn target_includes_login_user_when_configured() {
        let invoker = SshInvoker {
            user: Some("diag".to_string()),
            remote_command: "fleetcheck".to_string(),
            connect_timeout_secs: 10,
        };
        assert_eq!(invoker.target(&Machine::new("node-1")), "diag@node-1");

        let bare = SshInvoker {
            user: None,
            remote_command: "fleetcheck".to_string(),
            connect_timeout_secs: 10,
        };
        assert_eq!(bare.target(&Machine::new("node-1")), "node-1");
    }
}
