//! Process-level checks for the terminating entry points.
//!
//! Each test re-runs this test binary filtered to itself with
//! `QUARTZ_FATAL_CHILD` set. The child takes the fatal path and the parent
//! inspects its exit status and stderr.

use std::process::{Command, Output};

use quartz_utils::{
    fail, fail_at, set_render_options, translate_syscall, translate_syscall_for, Location, RenderOptions, Target,
    FATAL_EXIT_CODE,
};

const CHILD_ENV: &str = "QUARTZ_FATAL_CHILD";

fn in_child() -> bool {
    std::env::var_os(CHILD_ENV).is_some()
}

fn run_child(test_name: &str) -> Output {
    let exe = std::env::current_exe().expect("Failed to locate test binary");
    Command::new(exe)
        .args(["--exact", test_name, "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .output()
        .expect("Failed to spawn child test process")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_fail_terminates_with_message() {
    if in_child() {
        fail!("register r{} is out of range", 17);
    }

    let output = run_child("test_fail_terminates_with_message");
    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("error: register r17 is out of range"), "stderr: {}", stderr);
}

#[test]
fn test_fail_at_reports_location() {
    if in_child() {
        let location = Location::new("a.s", 3, 5);
        fail_at!(location, "bad token");
    }

    let output = run_child("test_fail_at_reports_location");
    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
    let stderr = stderr_of(&output);
    for needle in ["a.s", "3", "5", "bad token"] {
        assert!(stderr.contains(needle), "{:?} missing from stderr: {}", needle, stderr);
    }
    assert!(stderr.contains("a.s:3:5: error: bad token"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_syscall_terminates() {
    if in_child() {
        translate_syscall(9999);
        unreachable!("translate_syscall returned for an unknown id");
    }

    let output = run_child("test_unknown_syscall_terminates");
    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
    let stderr = stderr_of(&output);
    assert!(!stderr.trim().is_empty());
    assert!(stderr.contains("unknown syscall number 9999"), "stderr: {}", stderr);
}

#[test]
fn test_unsupported_syscall_terminates() {
    if in_child() {
        // fork has no aarch64 Linux entry point
        translate_syscall_for(Target::LinuxAarch64, 57);
        unreachable!("translate_syscall_for returned for an unsupported id");
    }

    let output = run_child("test_unsupported_syscall_terminates");
    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("`fork`"), "stderr: {}", stderr);
    assert!(stderr.contains("linux-aarch64"), "stderr: {}", stderr);
}

#[test]
fn test_configured_options_reach_translator() {
    if in_child() {
        assert!(set_render_options(RenderOptions { color: false, show_origin: true }));
        assert!(!set_render_options(RenderOptions::default()));
        translate_syscall(9999);
        unreachable!("translate_syscall returned for an unknown id");
    }

    let output = run_child("test_configured_options_reach_translator");
    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
    let stderr = stderr_of(&output);
    assert!(stderr.starts_with("error: unknown syscall number 9999\n"), "stderr: {}", stderr);
    assert!(stderr.contains("note: raised from "), "stderr: {}", stderr);
    assert!(stderr.contains("syscall.rs:"), "stderr: {}", stderr);
}

#[test]
fn test_fail_without_configured_options_has_no_note() {
    if in_child() {
        fail!("out of registers");
    }

    let output = run_child("test_fail_without_configured_options_has_no_note");
    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
    assert_eq!(stderr_of(&output), "error: out of registers\n");
}

#[test]
fn test_known_syscall_returns() {
    assert_eq!(translate_syscall_for(Target::MacosAarch64, 1), 4);
    assert_eq!(translate_syscall_for(Target::LinuxX86_64, 1), 1);
}
