//! Real HAL implementation using std::process and the process environment.

use super::{EnvOps, Invocation, ProcessOps};
use crate::{HalError, HalResult};
use std::env;
use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Real HAL implementation for Linux-like systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxHal;

impl LinuxHal {
    pub fn new() -> Self {
        Self
    }
}

fn map_spawn_err(program: &str, err: std::io::Error) -> HalError {
    match err.kind() {
        std::io::ErrorKind::NotFound => HalError::CommandNotFound(program.to_string()),
        std::io::ErrorKind::PermissionDenied => HalError::SpawnFailed {
            program: program.to_string(),
            reason: "permission denied".to_string(),
        },
        _ => HalError::Io(err),
    }
}

impl ProcessOps for LinuxHal {
    fn invoke(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<Invocation> {
        log::debug!("exec: {} {:?} (timeout {}s)", program, args, timeout.as_secs());
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| map_spawn_err(program, e))?;

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();

        // Drain pipes concurrently to avoid deadlocks on large output.
        let stdout_handle = std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout.take() {
                let _ = out.read_to_end(&mut buf);
            }
            buf
        });
        let stderr_handle = std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut err) = stderr.take() {
                let _ = err.read_to_end(&mut buf);
            }
            buf
        });

        let status = match child.wait_timeout(timeout).map_err(HalError::Io)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = stdout_handle.join();
                let _ = stderr_handle.join();
                return Err(HalError::CommandTimeout {
                    program: program.to_string(),
                    timeout_secs: timeout.as_secs(),
                });
            }
        };

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();

        Ok(Invocation {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

impl EnvOps for LinuxHal {
    fn search_path(&self) -> Option<OsString> {
        env::var_os("PATH")
    }

    fn set_search_path(&self, value: &OsStr) {
        env::set_var("PATH", value);
    }
}
