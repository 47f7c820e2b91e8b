//! HAL trait definitions and implementations.
//!
//! `LinuxHal` is the real implementation; `FakeHal` records invocations and
//! replays scripted results for tests.

pub mod fake_hal;
pub mod linux_hal;

pub use fake_hal::{FakeHal, FakeResponse, InvocationRecord};
pub use linux_hal::LinuxHal;

use crate::HalResult;
use std::ffi::{OsStr, OsString};
use std::time::Duration;

/// Result of one completed child process.
///
/// A non-zero exit code is a normal, successful invocation whose exit code
/// reports failure of the *invoked* program; it is never surfaced as a
/// `HalError`. `exit_code` is `None` when the child was killed by a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Process execution trait (external command runner).
///
/// Errors only when the program cannot be spawned at all (missing binary,
/// permission denied) or exceeds the timeout; stdin is always null.
pub trait ProcessOps {
    fn invoke(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<Invocation>;
}

/// Search-path environment access.
///
/// Kept behind a trait so tests never mutate the test runner's own
/// environment.
pub trait EnvOps {
    fn search_path(&self) -> Option<OsString>;
    fn set_search_path(&self, value: &OsStr);
}
