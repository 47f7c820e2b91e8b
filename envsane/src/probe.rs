//! Capability probing.
//!
//! A located executable is only trusted once it answers a conventional info
//! flag with exit code 0. Spawn failures and non-zero exits are reported to
//! the caller, never raised.

use envsane_hal::ProcessOps;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Probe {
    pub functional: bool,
    /// First line of the probe's stdout on success, or a failure note.
    pub detail: String,
}

pub fn probe(proc: &dyn ProcessOps, name: &str, args: &[&str], timeout: Duration) -> Probe {
    match proc.invoke(name, args, timeout) {
        Ok(inv) if inv.success() => {
            let detail = inv
                .stdout
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            Probe {
                functional: true,
                detail,
            }
        }
        Ok(inv) => Probe {
            functional: false,
            detail: match inv.exit_code {
                Some(code) => format!("exit code {}", code),
                None => "killed by signal".to_string(),
            },
        },
        Err(err) => Probe {
            functional: false,
            detail: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envsane_hal::{FakeHal, FakeResponse};

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn exit_zero_is_functional_and_keeps_the_version_line() {
        let hal = FakeHal::new();
        hal.script(
            "mount",
            &["--version"],
            FakeResponse::ok("mount from util-linux 2.39.1\nextra noise\n"),
        );

        let p = probe(&hal, "mount", &["--version"], TIMEOUT);
        assert!(p.functional);
        assert_eq!(p.detail, "mount from util-linux 2.39.1");
    }

    #[test]
    fn nonzero_exit_is_nonfunctional_without_raising() {
        let hal = FakeHal::new();
        hal.script("sync", &["--version"], FakeResponse::exit(1));

        let p = probe(&hal, "sync", &["--version"], TIMEOUT);
        assert!(!p.functional);
    }

    #[test]
    fn spawn_failure_is_nonfunctional_without_raising() {
        let hal = FakeHal::new();
        let p = probe(&hal, "curl", &["--version"], TIMEOUT);
        assert!(!p.functional);
        assert!(p.detail.contains("not found"));
    }
}
