//! Search-path normalization.
//!
//! Minimal images sometimes boot with a truncated `$PATH`; every standard
//! system directory the probes rely on is appended if missing, before any
//! probing starts.

use crate::report::RunReport;
use envsane_hal::EnvOps;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Directories every probe run expects to be able to search.
pub const REQUIRED_DIRS: [&str; 6] = [
    "/usr/local/sbin",
    "/usr/local/bin",
    "/usr/sbin",
    "/usr/bin",
    "/sbin",
    "/bin",
];

/// Append any missing required directory to the search path, preserving the
/// order and priority of pre-existing entries. One workaround is recorded per
/// appended directory.
pub fn normalize(env_ops: &dyn EnvOps, report: &mut RunReport) {
    let current = env_ops.search_path().unwrap_or_else(OsString::new);
    let mut entries: Vec<PathBuf> = env::split_paths(&current).collect();

    let mut appended = false;
    for dir in REQUIRED_DIRS {
        // Exact entry match; no lexical normalization of existing entries.
        if entries.iter().any(|entry| entry.as_os_str() == dir) {
            continue;
        }
        entries.push(PathBuf::from(dir));
        report.workaround(format!("appending {} to $PATH", dir));
        appended = true;
    }

    if !appended {
        return;
    }
    match env::join_paths(&entries) {
        Ok(joined) => env_ops.set_search_path(&joined),
        // Only possible if an existing entry embeds a separator; leave the
        // path untouched rather than corrupting it.
        Err(err) => report.warning(format!("could not rewrite $PATH: {}", err)),
    }
}
