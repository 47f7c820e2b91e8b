//! Executable discovery over the search path.
//!
//! Runs `which -a <name>` through the HAL, resolves every hit through the
//! symlink resolver, and deduplicates by real path. Several search-path hits
//! that alias one real file are a single executable; distinct real files for
//! the same name are an ambiguity worth warning about.

use crate::symlink::{self, ResolveError, SymlinkTrace};
use envsane_hal::ProcessOps;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateStatus {
    NotFound,
    FoundUnique,
    FoundDuplicate,
}

/// Outcome of locating one executable name.
#[derive(Debug)]
pub struct Located {
    pub status: LocateStatus,
    /// One trace per `which -a` hit, in reported order.
    pub traces: Vec<SymlinkTrace>,
    /// Distinct real paths behind the hits.
    pub real_paths: BTreeSet<PathBuf>,
    /// Hits whose chains could not be resolved (cycles); each keeps its raw
    /// path in `real_paths` so a cyclic alias still counts as distinct.
    pub unresolved: Vec<(PathBuf, ResolveError)>,
}

impl Located {
    fn not_found() -> Self {
        Self {
            status: LocateStatus::NotFound,
            traces: Vec::new(),
            real_paths: BTreeSet::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn found(&self) -> bool {
        self.status != LocateStatus::NotFound
    }

    /// The single real path of a uniquely located executable.
    pub fn unique_path(&self) -> Option<&Path> {
        if self.status == LocateStatus::FoundUnique {
            self.real_paths.iter().next().map(PathBuf::as_path)
        } else {
            None
        }
    }
}

/// Locate all instances of `name` on the search path.
///
/// A `which` spawn failure, non-zero exit, or empty output all classify as
/// NotFound; locating never fails the checker itself.
pub fn locate(proc: &dyn ProcessOps, name: &str, timeout: Duration) -> Located {
    let inv = match proc.invoke("which", &["-a", name], timeout) {
        Ok(inv) => inv,
        Err(err) => {
            log::warn!("which -a {} could not run: {}", name, err);
            return Located::not_found();
        }
    };
    if !inv.success() {
        return Located::not_found();
    }

    let hits: Vec<&str> = inv
        .stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if hits.is_empty() {
        return Located::not_found();
    }

    let mut traces = Vec::new();
    let mut real_paths = BTreeSet::new();
    let mut unresolved = Vec::new();

    for hit in hits {
        let hit_path = PathBuf::from(hit);
        match symlink::resolve(&hit_path) {
            Ok(trace) => {
                real_paths.insert(trace.real_path().to_path_buf());
                traces.push(trace);
            }
            Err(err) => {
                real_paths.insert(hit_path.clone());
                unresolved.push((hit_path, err));
            }
        }
    }

    let status = if real_paths.len() == 1 {
        LocateStatus::FoundUnique
    } else {
        LocateStatus::FoundDuplicate
    };

    Located {
        status,
        traces,
        real_paths,
        unresolved,
    }
}
