//! Fake HAL implementation for testing.
//!
//! Records every invocation without spawning anything and replays scripted
//! results, so checker logic can be tested in CI on hosts that lack the
//! probed tools entirely.

use super::{EnvOps, Invocation, ProcessOps};
use crate::{HalError, HalResult};
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded invocation, for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRecord {
    pub program: String,
    pub args: Vec<String>,
}

/// Scripted outcome for one command line.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// The program cannot be spawned at all.
    NotFound,
    Timeout,
}

impl FakeResponse {
    pub fn ok(stdout: &str) -> Self {
        FakeResponse::Exit {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn exit(code: i32) -> Self {
        FakeResponse::Exit {
            code,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct FakeHalState {
    invocations: Vec<InvocationRecord>,
    responses: HashMap<String, FakeResponse>,
    default_response: Option<FakeResponse>,
    search_path: Option<OsString>,
}

/// Fake HAL that records operations and replays scripted results.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

fn command_key(program: &str, args: &[&str]) -> String {
    let mut key = program.to_string();
    for arg in args {
        key.push(' ');
        key.push_str(arg);
    }
    key
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for an exact command line.
    pub fn script(&self, program: &str, args: &[&str], response: FakeResponse) {
        let mut state = self.state.lock().unwrap();
        state.responses.insert(command_key(program, args), response);
    }

    /// Response used for any command line that was not scripted explicitly.
    /// Unscripted commands with no default behave as not-found.
    pub fn script_default(&self, response: FakeResponse) {
        self.state.lock().unwrap().default_response = Some(response);
    }

    pub fn set_search_path_value(&self, value: &str) {
        self.state.lock().unwrap().search_path = Some(OsString::from(value));
    }

    /// All recorded invocations, in order.
    pub fn invocations(&self) -> Vec<InvocationRecord> {
        self.state.lock().unwrap().invocations.clone()
    }
}

impl ProcessOps for FakeHal {
    fn invoke(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<Invocation> {
        let mut state = self.state.lock().unwrap();
        state.invocations.push(InvocationRecord {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        let response = state
            .responses
            .get(&command_key(program, args))
            .or(state.default_response.as_ref())
            .cloned();

        match response {
            Some(FakeResponse::Exit {
                code,
                stdout,
                stderr,
            }) => Ok(Invocation {
                exit_code: Some(code),
                stdout,
                stderr,
            }),
            Some(FakeResponse::Timeout) => Err(HalError::CommandTimeout {
                program: program.to_string(),
                timeout_secs: timeout.as_secs(),
            }),
            Some(FakeResponse::NotFound) | None => {
                Err(HalError::CommandNotFound(program.to_string()))
            }
        }
    }
}

impl EnvOps for FakeHal {
    fn search_path(&self) -> Option<OsString> {
        self.state.lock().unwrap().search_path.clone()
    }

    fn set_search_path(&self, value: &OsStr) {
        self.state.lock().unwrap().search_path = Some(value.to_os_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn records_invocations_in_order() {
        let hal = FakeHal::new();
        hal.script_default(FakeResponse::exit(0));
        hal.invoke("systemctl", &["--version"], TIMEOUT).unwrap();
        hal.invoke("which", &["-a", "cp"], TIMEOUT).unwrap();

        let recorded = hal.invocations();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].program, "systemctl");
        assert_eq!(recorded[1].args, vec!["-a", "cp"]);
    }

    #[test]
    fn scripted_response_wins_over_default() {
        let hal = FakeHal::new();
        hal.script_default(FakeResponse::exit(0));
        hal.script("curl", &["--version"], FakeResponse::exit(2));

        let inv = hal.invoke("curl", &["--version"], TIMEOUT).unwrap();
        assert_eq!(inv.exit_code, Some(2));
    }

    #[test]
    fn unscripted_command_without_default_is_not_found() {
        let hal = FakeHal::new();
        let err = hal.invoke("mount", &["--version"], TIMEOUT).unwrap_err();
        assert!(matches!(err, HalError::CommandNotFound(_)));
    }

    #[test]
    fn search_path_round_trips_in_memory() {
        let hal = FakeHal::new();
        assert!(hal.search_path().is_none());
        hal.set_search_path(OsStr::new("/bin:/sbin"));
        assert_eq!(hal.search_path(), Some(OsString::from("/bin:/sbin")));
    }
}
