use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fleetcheck")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIME"), ")"))]
#[command(about = "Fleet-wide diagnostic runner", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run diagnostic suites on this machine
    Check {
        /// Suite names to run (comma separated, empty = all)
        #[arg(short, long, value_delimiter = ',')]
        suites: Vec<String>,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Run diagnostic suites across a fleet of machines
    Batch {
        /// Target machine (repeatable)
        #[arg(short, long = "machine")]
        machines: Vec<String>,

        /// File with one target machine per line
        #[arg(long)]
        machines_file: Option<String>,

        /// Discover machines from all cluster nodes
        #[arg(long)]
        kube_machines: bool,

        /// Discover machines from cluster nodes matching a label selector
        #[arg(long)]
        kube_selector: Option<String>,

        /// Restrict label-selector discovery to not-ready nodes
        #[arg(long)]
        kube_unready: bool,

        /// Suite names to run on each machine (comma separated, empty = all)
        #[arg(short, long, value_delimiter = ',')]
        suites: Vec<String>,

        /// Maximum concurrent machine invocations
        #[arg(short, long, default_value = "1")]
        concurrency: usize,

        /// Remote login user
        #[arg(long)]
        ssh_user: Option<String>,

        /// Diagnostic command to invoke on each machine
        #[arg(long, default_value = "fleetcheck")]
        remote_command: String,

        /// SSH connect timeout in seconds
        #[arg(long, default_value = "10")]
        connect_timeout: u64,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// List all registered suite names
    Suites,
}
