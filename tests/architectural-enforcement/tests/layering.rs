//! Integration Test: Layering
//!
//! **Policy**: `editor/core` is headless. Terminal code maps input and draws;
//! it never edits the bill directly.

use std::fs;

use architectural_enforcement::{
    assert_no_violations, mutates_store, rust_files, scan_production_code, workspace_root,
};

/// The core must build without any UI framework
#[test]
fn test_core_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("editor/core/Cargo.toml"))
        .expect("core manifest must exist");
    for ui_crate in ["ratatui", "crossterm"] {
        assert!(
            !manifest.contains(ui_crate),
            "editor/core/Cargo.toml must not depend on {ui_crate}"
        );
    }

    let violations = scan_production_code(&rust_files("editor/core/src"), |code| {
        code.contains("ratatui::") || code.contains("crossterm::")
    });
    assert_no_violations("core is UI-agnostic", &violations);
}

/// Store mutation happens inside the editor only
#[test]
fn test_tui_never_mutates_store() {
    let violations = scan_production_code(&rust_files("tui/src"), mutates_store);
    assert_no_violations("surface goes through the dispatcher", &violations);
}

/// Sanity check that the scan actually sees the sources
#[test]
fn test_sources_are_found() {
    assert!(!rust_files("editor/core/src").is_empty());
    assert!(!rust_files("tui/src").is_empty());
}
