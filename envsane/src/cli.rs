//! CLI argument parsing for envsane.
//!
//! A flat one-shot tool: no subcommands, run it and read the transcript.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "envsane")]
#[command(about = "🧪 envsane - runtime environment sanity checker")]
#[command(long_about = "🧪 envsane - runtime environment sanity checker\n\n\
    Probes whether this host can spawn subprocesses, whether $PATH carries\n\
    the standard system directories, and whether the expected system\n\
    administration executables are present and responsive. Intended to run\n\
    once at provisioning or boot time.")]
pub struct Cli {
    /// Treat any missing or non-functional tracked executable as fatal
    #[arg(long)]
    pub strict: bool,

    /// Write a machine-readable JSON report to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Upper bound, in seconds, on any single probed child process
    #[arg(long, default_value_t = 30)]
    pub probe_timeout_secs: u64,
}
