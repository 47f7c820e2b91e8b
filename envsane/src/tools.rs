//! The fixed set of executables the checker tracks.

use serde::Serialize;
use std::fmt;

/// Tracked system-administration executables.
///
/// A closed enum rather than ad hoc strings: every tool the checker knows
/// about is enumerated here, and match arms over `Tool` are checked at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Which,
    Curl,
    Sync,
    Modprobe,
    Sysctl,
    Mkdir,
    Mount,
    Cp,
    Chroot,
    Systemctl,
    Service,
    Telinit,
}

impl Tool {
    /// Probe order matches the reference transcript: `which` first, service
    /// management tools last.
    pub const ALL: [Tool; 12] = [
        Tool::Which,
        Tool::Curl,
        Tool::Sync,
        Tool::Modprobe,
        Tool::Sysctl,
        Tool::Mkdir,
        Tool::Mount,
        Tool::Cp,
        Tool::Chroot,
        Tool::Systemctl,
        Tool::Service,
        Tool::Telinit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Which => "which",
            Tool::Curl => "curl",
            Tool::Sync => "sync",
            Tool::Modprobe => "modprobe",
            Tool::Sysctl => "sysctl",
            Tool::Mkdir => "mkdir",
            Tool::Mount => "mount",
            Tool::Cp => "cp",
            Tool::Chroot => "chroot",
            Tool::Systemctl => "systemctl",
            Tool::Service => "service",
            Tool::Telinit => "telinit",
        }
    }

    /// Info-flag arguments for the capability probe.
    ///
    /// `telinit` has no safe dry-run flag and is never probed.
    pub fn probe_args(self) -> Option<&'static [&'static str]> {
        match self {
            Tool::Telinit => None,
            _ => Some(&["--version"]),
        }
    }

    /// Tools that can manage services; at least one must be usable.
    pub fn is_service_manager(self) -> bool {
        matches!(self, Tool::Systemctl | Tool::Service)
    }

    /// Tools that can change runlevels; at least one must be usable.
    pub fn is_runlevel_control(self) -> bool {
        matches!(self, Tool::Systemctl | Tool::Telinit)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
