//! Integration Test: Production Hygiene
//!
//! **Policy**: production code waits on I/O, never on the clock, and the
//! core propagates errors instead of panicking.
//! **Exceptions**: `tokio::time::interval` for the frame tick, test code.

use architectural_enforcement::{assert_no_violations, rust_files, scan_production_code};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let mut files = rust_files("editor/core/src");
    files.extend(rust_files("tui/src"));

    let violations = scan_production_code(&files, |code| {
        code.contains("::sleep(") || code.contains(".sleep(")
    });
    assert_no_violations("no sleep in production code", &violations);
}

/// Test that the core has no unwrap()/expect() outside tests
#[test]
fn test_no_panicking_unwrap_in_core() {
    let files: Vec<_> = rust_files("editor/core/src")
        .into_iter()
        .filter(|path| !path.ends_with("test_utils.rs"))
        .collect();

    let violations = scan_production_code(&files, |code| {
        code.contains(".unwrap()") || code.contains(".expect(")
    });
    assert_no_violations("core propagates errors", &violations);
}
