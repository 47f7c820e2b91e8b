//! envsane system abstraction layer.
//!
//! Everything "world-touching" that the checker does — spawning child
//! processes and reading or rewriting the search-path environment variable —
//! goes through the traits in this crate, so the checker itself can be
//! exercised in CI without a real Linux userland.

pub mod error;
pub mod hal;

pub use error::{HalError, HalResult};
pub use hal::{EnvOps, FakeHal, FakeResponse, Invocation, InvocationRecord, LinuxHal, ProcessOps};

/// Complete system interface used by the checker.
pub trait SystemHal: ProcessOps + EnvOps + Send + Sync {}

/// Automatically implement [`SystemHal`] for any type implementing both traits.
impl<T> SystemHal for T where T: ProcessOps + EnvOps + Send + Sync {}
