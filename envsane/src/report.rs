//! Run report: per-tool results, workaround/warning logs, conclusion.
//!
//! One `RunReport` is created per invocation and threaded through every
//! component; there is no global mutable state. Workarounds and warnings are
//! append-only and echoed to the transcript as they are recorded.

use crate::locate::LocateStatus;
use crate::tools::Tool;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Final classification of the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sanity {
    Sane,
    PossiblySane,
    Unusable,
}

impl fmt::Display for Sanity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sanity::Sane => f.write_str("SANE"),
            Sanity::PossiblySane => f.write_str("POSSIBLY_SANE"),
            Sanity::Unusable => f.write_str("UNUSABLE"),
        }
    }
}

/// Outcome of one tool's locate + probe sequence.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub status: LocateStatus,
    pub real_paths: Vec<PathBuf>,
    /// Present and responsive (or present and deliberately unprobed).
    pub functional: bool,
    /// Whether an info-flag probe was actually run.
    pub probed: bool,
}

impl ProbeResult {
    pub fn missing() -> Self {
        Self {
            status: LocateStatus::NotFound,
            real_paths: Vec::new(),
            functional: false,
            probed: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    results: BTreeMap<Tool, ProbeResult>,
    workarounds: Vec<String>,
    warnings: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tool: Tool, result: ProbeResult) {
        self.results.insert(tool, result);
    }

    pub fn result(&self, tool: Tool) -> Option<&ProbeResult> {
        self.results.get(&tool)
    }

    /// True when at least one tool matching `pred` is usable.
    pub fn any_usable(&self, pred: impl Fn(Tool) -> bool) -> bool {
        self.results
            .iter()
            .any(|(tool, result)| pred(*tool) && result.functional)
    }

    pub fn workaround(&mut self, message: String) {
        println!("Workaround: {}", message);
        self.workarounds.push(message);
    }

    pub fn warning(&mut self, message: String) {
        println!("⚠️  {}", message);
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn workarounds(&self) -> &[String] {
        &self.workarounds
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Conclusion for a run that survived all fatal gates.
    pub fn conclusion(&self) -> Sanity {
        if self.warnings.is_empty() {
            Sanity::Sane
        } else {
            Sanity::PossiblySane
        }
    }

    /// Workarounds and warnings were already echoed when recorded; the
    /// summary reports the tallies and the conclusion.
    pub fn print_summary(&self) {
        println!();
        println!(
            "Summary: {} workaround(s), {} warning(s).",
            self.workarounds.len(),
            self.warnings.len()
        );
        println!("Conclusion: {}", self.conclusion());
    }

    /// Write the machine-readable report artifact. Best effort: callers
    /// downgrade failures to a warning.
    pub fn write_json(&self, path: &Path, conclusion: Sanity) -> anyhow::Result<()> {
        let artifact = ReportArtifact {
            checker_version: env!("CARGO_PKG_VERSION"),
            generated_unix_ms: now_unix_ms(),
            conclusion,
            results: &self.results,
            workarounds: &self.workarounds,
            warnings: &self.warnings,
        };
        let json = serde_json::to_string_pretty(&artifact).context("serialize report")?;
        fs::write(path, json).with_context(|| format!("write report to {}", path.display()))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ReportArtifact<'a> {
    checker_version: &'static str,
    generated_unix_ms: u64,
    conclusion: Sanity,
    results: &'a BTreeMap<Tool, ProbeResult>,
    workarounds: &'a [String],
    warnings: &'a [String],
}

fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
