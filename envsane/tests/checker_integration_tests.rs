//! End-to-end runs of the envsane binary against a stubbed userland.
//!
//! The binary gets a PATH whose first entry is a directory of shell-script
//! stand-ins for `which` and every tracked tool, so the transcript and exit
//! behavior can be asserted without relying on the host's real toolset.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const REQUIRED_DIRS: [&str; 6] = [
    "/usr/local/sbin",
    "/usr/local/bin",
    "/usr/sbin",
    "/usr/bin",
    "/sbin",
    "/bin",
];

const TOOLS: [&str; 12] = [
    "which",
    "curl",
    "sync",
    "modprobe",
    "sysctl",
    "mkdir",
    "mount",
    "cp",
    "chroot",
    "systemctl",
    "service",
    "telinit",
];

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).expect("write script");
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("set perms");
}

/// Stub `which -a NAME`: report the stub directory's copy when it exists.
fn stub_which(bin_dir: &Path) {
    let script = format!(
        "#!/bin/sh\n\
         name=\"$2\"\n\
         if [ -x \"{dir}/$name\" ]; then\n\
         \techo \"{dir}/$name\"\n\
         \texit 0\n\
         fi\n\
         exit 1\n",
        dir = bin_dir.display()
    );
    write_executable(&bin_dir.join("which"), &script);
}

fn stub_tool(bin_dir: &Path, name: &str) {
    let script = format!("#!/bin/sh\necho \"{} 1.0 (stub)\"\nexit 0\n", name);
    write_executable(&bin_dir.join(name), &script);
}

fn stub_full_userland(bin_dir: &Path) {
    stub_which(bin_dir);
    for tool in TOOLS.iter().filter(|t| **t != "which") {
        stub_tool(bin_dir, tool);
    }
}

fn run_envsane(bin_dir: &Path, extra_path: &[&str], args: &[&str]) -> Output {
    let mut path = bin_dir.display().to_string();
    for dir in extra_path {
        path.push(':');
        path.push_str(dir);
    }
    Command::new(env!("CARGO_BIN_EXE_envsane"))
        .args(args)
        .env("PATH", path)
        .output()
        .expect("failed to run envsane binary")
}

#[test]
fn full_userland_concludes_sane_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    stub_full_userland(dir.path());

    let output = run_envsane(dir.path(), &REQUIRED_DIRS, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout:\n{}", stdout);
    assert!(stdout.contains("Process spawning valid."));
    assert!(stdout.contains("$PATH valid."));
    assert!(stdout.contains("systemctl valid at"));
    assert!(stdout.contains("telinit does not support a dry run"));
    assert!(stdout.contains("Conclusion: SANE"));
}

#[test]
fn missing_usr_bin_is_worked_around_exactly_once() {
    let dir = TempDir::new().unwrap();
    stub_full_userland(dir.path());

    let path_without_usr_bin: Vec<&str> = REQUIRED_DIRS
        .iter()
        .copied()
        .filter(|d| *d != "/usr/bin")
        .collect();
    let output = run_envsane(dir.path(), &path_without_usr_bin, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout:\n{}", stdout);
    assert_eq!(
        stdout
            .matches("Workaround: appending /usr/bin to $PATH")
            .count(),
        1,
        "stdout:\n{}",
        stdout
    );
    assert!(!stdout.contains("appending /sbin"));
    assert!(stdout.contains("Summary: 1 workaround(s), 0 warning(s)."));
    // Workarounds alone never downgrade the conclusion.
    assert!(stdout.contains("Conclusion: SANE"));
}

#[test]
fn absent_service_management_is_fatal() {
    let dir = TempDir::new().unwrap();
    stub_full_userland(dir.path());
    for tool in ["systemctl", "service", "telinit"] {
        fs::remove_file(dir.path().join(tool)).unwrap();
    }

    let output = run_envsane(dir.path(), &REQUIRED_DIRS, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("FATAL: no service management tool is usable"),
        "stderr:\n{}",
        stderr
    );
    assert!(stdout.contains("Conclusion: UNUSABLE"));
}

#[test]
fn strict_mode_fails_on_a_single_missing_tool() {
    let dir = TempDir::new().unwrap();
    stub_full_userland(dir.path());
    fs::remove_file(dir.path().join("curl")).unwrap();

    let strict = run_envsane(dir.path(), &REQUIRED_DIRS, &["--strict"]);
    assert!(!strict.status.success());
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("FATAL: required executable 'curl'"));

    // The same userland survives a lenient run.
    let lenient = run_envsane(dir.path(), &REQUIRED_DIRS, &[]);
    assert!(lenient.status.success());
}

#[test]
fn duplicate_real_executables_warn_but_do_not_fail() {
    let dir = TempDir::new().unwrap();
    stub_full_userland(dir.path());

    // A second, distinct sysctl the stub `which` reports alongside the first.
    let alt_dir = dir.path().join("alt");
    fs::create_dir(&alt_dir).unwrap();
    stub_tool(&alt_dir, "sysctl");
    let script = format!(
        "#!/bin/sh\n\
         name=\"$2\"\n\
         if [ \"$name\" = sysctl ]; then\n\
         \techo \"{dir}/sysctl\"\n\
         \techo \"{alt}/sysctl\"\n\
         \texit 0\n\
         fi\n\
         if [ -x \"{dir}/$name\" ]; then\n\
         \techo \"{dir}/$name\"\n\
         \texit 0\n\
         fi\n\
         exit 1\n",
        dir = dir.path().display(),
        alt = alt_dir.display()
    );
    write_executable(&dir.path().join("which"), &script);

    let output = run_envsane(dir.path(), &REQUIRED_DIRS, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout:\n{}", stdout);
    assert!(stdout.contains("sysctl is found multiple times"));
    assert!(stdout.contains("Conclusion: POSSIBLY_SANE"));
}

#[test]
fn json_report_is_written_when_requested() {
    let dir = TempDir::new().unwrap();
    stub_full_userland(dir.path());
    let report_path = dir.path().join("report.json");

    let output = run_envsane(
        dir.path(),
        &REQUIRED_DIRS,
        &["--report", report_path.to_str().unwrap()],
    );
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(value["conclusion"], "SANE");
    assert_eq!(value["results"]["curl"]["status"], "found_unique");
    assert_eq!(value["results"]["telinit"]["probed"], false);
}
