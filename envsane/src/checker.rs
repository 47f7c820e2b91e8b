//! Top-level check sequence.
//!
//! Runs once, sequentially: spawn self-test, search-path normalization, then
//! locate + probe for every tracked tool, with the fatal gates applied after
//! probing. Fatal conditions surface as a typed error so `main` can print the
//! `FATAL:` line on stderr and exit non-zero.

use crate::locate::{self, LocateStatus};
use crate::path_env;
use crate::probe;
use crate::report::{ProbeResult, RunReport};
use crate::tools::Tool;
use envsane_hal::SystemHal;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// How hard the checker fails.
///
/// The lenient policy mirrors the reference behavior; strict mode promotes
/// any unusable tracked tool to a fatal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub strictness: Strictness,
    pub probe_timeout: Duration,
    pub report_path: Option<PathBuf>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::Lenient,
            probe_timeout: Duration::from_secs(30),
            report_path: None,
        }
    }
}

/// Conditions that make the environment unusable as a shell substitute.
#[derive(Error, Debug)]
pub enum FatalError {
    #[error("process spawning is broken: {0}")]
    SpawnBroken(String),

    #[error("no service management tool is usable (need systemctl or service)")]
    NoServiceManager,

    #[error("no runlevel control tool is usable (need systemctl or telinit)")]
    NoRunlevelControl,

    #[error("required executable '{0}' is missing or not functional")]
    RequiredToolUnusable(&'static str),
}

/// Run the full check sequence. `Ok` carries the report of a survivable run
/// (SANE or POSSIBLY_SANE); `Err` is a fatal condition hit mid-run.
pub fn run(hal: &impl SystemHal, opts: &CheckOptions) -> Result<RunReport, FatalError> {
    let mut report = RunReport::new();
    banner();

    spawn_self_test(hal, opts)?;
    println!();

    path_env::normalize(hal, &mut report);
    println!("$PATH valid.");
    println!();

    for tool in Tool::ALL {
        check_tool(hal, opts, tool, &mut report);
        println!("--------------");

        if opts.strictness == Strictness::Strict {
            let usable = report.result(tool).is_some_and(|r| r.functional);
            if !usable {
                return Err(FatalError::RequiredToolUnusable(tool.name()));
            }
        }
    }

    if !report.any_usable(Tool::is_service_manager) {
        return Err(FatalError::NoServiceManager);
    }
    if !report.any_usable(Tool::is_runlevel_control) {
        return Err(FatalError::NoRunlevelControl);
    }

    report.print_summary();

    if let Some(path) = &opts.report_path {
        let conclusion = report.conclusion();
        if let Err(err) = report.write_json(path, conclusion) {
            report.warning(format!("could not write report artifact: {:#}", err));
        } else {
            log::info!("report written to {}", path.display());
        }
    }

    Ok(report)
}

fn banner() {
    println!("envsane {} - runtime environment test", env!("CARGO_PKG_VERSION"));
    println!("========================================");
    println!();
}

/// Verify the process-spawn primitive itself before trusting any probe.
///
/// Exercises exit code 0, exit code 1, stdout capture, and stderr capture.
/// Any failure here is fatal: every later probe depends on this capability.
fn spawn_self_test(hal: &impl SystemHal, opts: &CheckOptions) -> Result<(), FatalError> {
    let t = opts.probe_timeout;

    println!("Test: exec returning zero.");
    match hal.invoke("/bin/true", &[], t) {
        Ok(inv) if inv.exit_code == Some(0) => {}
        Ok(inv) => {
            return Err(FatalError::SpawnBroken(format!(
                "/bin/true exited with {:?}",
                inv.exit_code
            )))
        }
        Err(err) => return Err(FatalError::SpawnBroken(err.to_string())),
    }

    println!("Test: exec returning non-zero.");
    match hal.invoke("/bin/false", &[], t) {
        Ok(inv) if inv.exit_code == Some(1) => {}
        Ok(inv) => {
            return Err(FatalError::SpawnBroken(format!(
                "/bin/false exited with {:?}",
                inv.exit_code
            )))
        }
        Err(err) => return Err(FatalError::SpawnBroken(err.to_string())),
    }

    println!("Test: exec writing to stdout.");
    match hal.invoke("/bin/echo", &["-n", "HELLO"], t) {
        Ok(inv) if inv.stdout == "HELLO" => {}
        Ok(inv) => {
            return Err(FatalError::SpawnBroken(format!(
                "stdout capture returned {:?}",
                inv.stdout
            )))
        }
        Err(err) => return Err(FatalError::SpawnBroken(err.to_string())),
    }

    println!("Test: exec writing to stderr.");
    match hal.invoke("/bin/sh", &["-c", "printf HELLO>&2"], t) {
        Ok(inv) if inv.stderr == "HELLO" => {}
        Ok(inv) => {
            return Err(FatalError::SpawnBroken(format!(
                "stderr capture returned {:?}",
                inv.stderr
            )))
        }
        Err(err) => return Err(FatalError::SpawnBroken(err.to_string())),
    }

    println!("Process spawning valid.");
    Ok(())
}

/// Locate one tool, probe it if found, and record the outcome.
fn check_tool(hal: &impl SystemHal, opts: &CheckOptions, tool: Tool, report: &mut RunReport) {
    let name = tool.name();
    let located = locate::locate(hal, name, opts.probe_timeout);

    for (path, err) in &located.unresolved {
        report.warning(format!("{}: {} unresolvable: {}", name, path.display(), err));
    }

    match located.status {
        LocateStatus::NotFound => {
            println!("❌ {} invalid.", name);
            report.record(tool, ProbeResult::missing());
            return;
        }
        LocateStatus::FoundUnique => {
            let aliases = located.traces.len();
            let real = located
                .real_paths
                .iter()
                .next()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            if aliases > 1 {
                println!("✅ {} valid at {} ({} aliased entries)", name, real, aliases);
            } else {
                println!("✅ {} valid at {}", name, real);
            }
        }
        LocateStatus::FoundDuplicate => {
            let paths: Vec<String> = located
                .real_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            report.warning(format!(
                "{} is found multiple times at [{}]",
                name,
                paths.join(", ")
            ));
        }
    }

    let (functional, probed) = match tool.probe_args() {
        None => {
            println!("{} does not support a dry run (which is expected), skipping.", name);
            (true, false)
        }
        Some(args) => {
            let p = probe::probe(hal, name, args, opts.probe_timeout);
            if p.functional {
                if !p.detail.is_empty() {
                    println!("{}", p.detail);
                }
                (true, true)
            } else {
                report.warning(format!(
                    "{} does not function as expected ({})",
                    name, p.detail
                ));
                (false, true)
            }
        }
    };

    report.record(
        tool,
        ProbeResult {
            status: located.status,
            real_paths: located.real_paths.into_iter().collect(),
            functional,
            probed,
        },
    );
}
