mod batch;
mod check;
mod cli;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { suites, output } => check::run_check(&suites, &output),
        Commands::Batch {
            machines,
            machines_file,
            kube_machines,
            kube_selector,
            kube_unready,
            suites,
            concurrency,
            ssh_user,
            remote_command,
            connect_timeout,
            output,
        } => batch::run_batch(batch::BatchRun {
            machines,
            machines_file,
            kube_machines,
            kube_selector,
            kube_unready,
            suites,
            concurrency,
            ssh_user,
            remote_command,
            connect_timeout,
            output,
        }),
        Commands::Suites => check::list_suites(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
