//! Symlink chain resolution.
//!
//! `which -a` reports search-path hits, but two hits are only genuinely
//! distinct executables if they resolve to different real files. This module
//! follows symlink chains iteratively and keeps the full hop trace so the
//! report can show how a hit reached its real path.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Ceiling on hops while following a chain. The kernel uses 40 for ELOOP;
/// anything deeper is treated as a cycle or a pathological chain.
pub const MAX_HOPS: usize = 40;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("too many levels of symbolic links starting at {} (ceiling {MAX_HOPS})", .0.display())]
    TooManyLinks(PathBuf),

    #[error("failed to read link {}: {source}", .path.display())]
    ReadLink {
        path: PathBuf,
        source: io::Error,
    },
}

/// Ordered chain of paths from the queried path to the first non-link target.
///
/// Invariant: each hop after the first is the direct link target of its
/// predecessor, joined against the predecessor's directory when relative and
/// lexically normalized. Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkTrace {
    hops: Vec<PathBuf>,
}

impl SymlinkTrace {
    pub fn hops(&self) -> &[PathBuf] {
        &self.hops
    }

    /// The final, fully resolved path. It may not exist (dangling link).
    pub fn real_path(&self) -> &Path {
        // hops is never empty: resolve() seeds it with the queried path.
        self.hops.last().expect("trace has at least one hop")
    }

    pub fn is_link(&self) -> bool {
        self.hops.len() > 1
    }
}

/// Follow `path` through symbolic links to its real path.
///
/// A path that is not a symlink (including one that does not exist) yields a
/// single-hop trace. Cycles and over-long chains error out instead of
/// looping.
pub fn resolve(path: &Path) -> Result<SymlinkTrace, ResolveError> {
    let mut hops = vec![path.to_path_buf()];

    loop {
        let current = hops.last().expect("trace has at least one hop").clone();
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {}
            // Not a link, or gone entirely: the chain ends here.
            _ => return Ok(SymlinkTrace { hops }),
        }

        if hops.len() >= MAX_HOPS {
            return Err(ResolveError::TooManyLinks(path.to_path_buf()));
        }

        let target = fs::read_link(&current).map_err(|source| ResolveError::ReadLink {
            path: current.clone(),
            source,
        })?;

        let next = if target.is_absolute() {
            lexical_normalize(&target)
        } else {
            let base = current.parent().unwrap_or_else(|| Path::new(""));
            lexical_normalize(&base.join(target))
        };
        hops.push(next);
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep a leading ".." only when there is nothing to pop.
                let popped = out.pop();
                if !popped && !matches!(out.components().next(), Some(Component::RootDir)) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs::File;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    #[test]
    fn regular_file_yields_single_hop_trace() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("mount");
        File::create(&file).unwrap();

        let trace = resolve(&file).unwrap();
        assert_eq!(trace.hops(), &[file.clone()]);
        assert_eq!(trace.real_path(), file);
        assert!(!trace.is_link());
    }

    #[test]
    fn missing_path_yields_single_hop_trace() {
        let dir = tempdir().unwrap();
        let ghost = dir.path().join("no-such-file");
        let trace = resolve(&ghost).unwrap();
        assert_eq!(trace.hops(), &[ghost]);
    }

    #[test]
    fn chain_of_links_records_every_hop() {
        let dir = tempdir().unwrap();
        let c = dir.path().join("c");
        let b = dir.path().join("b");
        let a = dir.path().join("a");
        File::create(&c).unwrap();
        symlink(&c, &b).unwrap();
        symlink(&b, &a).unwrap();

        let trace = resolve(&a).unwrap();
        assert_eq!(trace.hops(), &[a, b, c.clone()]);
        assert_eq!(trace.real_path(), c);
        assert!(trace.is_link());
    }

    #[test]
    fn relative_target_resolves_against_link_directory() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sbin");
        std::fs::create_dir(&sub).unwrap();
        let real = dir.path().join("busybox");
        File::create(&real).unwrap();
        let link = sub.join("mount");
        symlink("../busybox", &link).unwrap();

        let trace = resolve(&link).unwrap();
        assert_eq!(trace.real_path(), real);
    }

    #[test]
    fn cyclic_links_error_within_the_hop_ceiling() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        symlink(&b, &a).unwrap();
        symlink(&a, &b).unwrap();

        let err = resolve(&a).unwrap_err();
        assert!(matches!(err, ResolveError::TooManyLinks(_)));
    }

    #[test]
    fn lexical_normalize_collapses_dot_segments() {
        assert_eq!(
            lexical_normalize(Path::new("/usr/bin/../sbin/./init")),
            PathBuf::from("/usr/sbin/init")
        );
        assert_eq!(
            lexical_normalize(Path::new("/../bin/sh")),
            PathBuf::from("/bin/sh")
        );
    }
}
