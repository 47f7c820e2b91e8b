//! Runtime environment sanity checker.
//!
//! A one-shot probe intended to run at provisioning/boot time: verifies that
//! the host can spawn subprocesses, that `$PATH` carries the standard system
//! directories, and that a fixed set of system-administration executables is
//! present and responsive, then classifies the environment as SANE,
//! POSSIBLY_SANE, or UNUSABLE.

pub mod checker;
pub mod cli;
pub mod locate;
pub mod logging;
pub mod path_env;
pub mod probe;
pub mod report;
pub mod symlink;
pub mod tools;
