pub mod discover;
pub mod executor;
pub mod invoker;
pub mod types;

use std::path::PathBuf;

use log::info;

use crate::check::output;
use crate::utils::Result;
use discover::{Discoverer, FileDiscoverer, KubeDiscoverer, StaticDiscoverer};
use executor::BatchExecutor;
use invoker::SshInvoker;
use types::{BatchOptions, BatchReport};

/// Batch run inputs as the CLI layer hands them over. The three machine
/// sources are mutually exclusive by configuration; selection order is
/// label selector, then machines file, then static list.
pub struct BatchRun {
    pub machines: Vec<String>,
    pub machines_file: Option<String>,
    pub kube_machines: bool,
    pub kube_selector: Option<String>,
    pub kube_unready: bool,
    pub suites: Vec<String>,
    pub concurrency: usize,
    pub ssh_user: Option<String>,
    pub remote_command: String,
    pub connect_timeout: u64,
    pub output: String,
}

pub fn run_batch(run: BatchRun) -> Result<()> {
    let discoverer = select_discoverer(&run);
    let machines = discoverer.discover()?;
    info!("discovered {} machines", machines.len());

    let executor = BatchExecutor::new(SshInvoker {
        user: run.ssh_user.clone(),
        remote_command: run.remote_command.clone(),
        connect_timeout_secs: run.connect_timeout,
    });

    // zero machines still goes through execute so downstream reporting
    // always sees a well-formed (possibly empty) result set
    let results = executor.execute(&BatchOptions {
        machines,
        suites: run.suites.clone(),
        concurrency: run.concurrency,
    })?;

    let report = BatchReport {
        collected_at: chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S %z")
            .to_string(),
        machines: results,
    };

    output::display_batch(&report, &run.output)
}

fn select_discoverer(run: &BatchRun) -> Box<dyn Discoverer> {
    if run.kube_machines || run.kube_unready || run.kube_selector.is_some() {
        Box::new(KubeDiscoverer::new(
            run.kube_selector.clone().unwrap_or_default(),
            run.kube_unready,
        ))
    } else if let Some(path) = &run.machines_file {
        Box::new(FileDiscoverer {
            path: PathBuf::from(path),
        })
    } else {
        Box::new(StaticDiscoverer {
            machines: run.machines.clone(),
        })
    }
}
