use clap::Parser;
use envsane::checker::{self, CheckOptions, Strictness};
use envsane::cli::Cli;
use envsane::logging;
use envsane::report::Sanity;
use envsane_hal::LinuxHal;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    logging::init();

    let opts = CheckOptions {
        strictness: if cli.strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        },
        probe_timeout: Duration::from_secs(cli.probe_timeout_secs),
        report_path: cli.report,
    };

    let hal = LinuxHal::new();
    match checker::run(&hal, &opts) {
        Ok(_) => {}
        Err(err) => {
            println!("Conclusion: {}", Sanity::Unusable);
            eprintln!("FATAL: {}", err);
            std::process::exit(1);
        }
    }
}
