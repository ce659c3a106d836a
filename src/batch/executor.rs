//! Bounded-concurrency dispatch across the fleet
//! One invocation task per machine on a fixed-size worker pool; a failing
//! machine is recorded, never fatal, and the result order is the discovery
//! order no matter which task finishes first.

use log::{debug, warn};

use crate::batch::invoker::RemoteInvoker;
use crate::batch::types::{BatchOptions, BatchResult, MachineResult};
use crate::utils::{FleetcheckError, Result};

pub struct BatchExecutor<I: RemoteInvoker> {
    invoker: I,
}

impl<I: RemoteInvoker> BatchExecutor<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    pub fn execute(&self, options: &BatchOptions) -> Result<BatchResult> {
        if options.machines.is_empty() {
            return Ok(Vec::new());
        }

        let concurrency = options.concurrency.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .build()
            .map_err(|e| FleetcheckError::Batch(format!("cannot build worker pool: {}", e)))?;

        // par_iter keeps each machine's slot at its input index, so the
        // collected Vec is already in discovery order
        let results = pool.install(|| {
            use rayon::prelude::*;

            options
                .machines
                .par_iter()
                .map(|machine| match self.invoker.invoke(machine, &options.suites) {
                    Ok(results) => {
                        debug!("{}: {} check results", machine.host, results.len());
                        MachineResult {
                            machine: machine.clone(),
                            results,
                            dispatch_error: None,
                        }
                    }
                    Err(e) => {
                        warn!("{}: dispatch failed: {}", machine.host, e);
                        MachineResult {
                            machine: machine.clone(),
                            results: Vec::new(),
                            dispatch_error: Some(e.to_string()),
                        }
                    }
                })
                .collect()
        });

        Ok(results)
    }
}
