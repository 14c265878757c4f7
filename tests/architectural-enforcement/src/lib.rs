//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The editor core stays free of UI frameworks
//! - Only the editor mutates the line store
//! - No sleep() calls in production code
//! - No unwrap()/expect() on fallible paths in the core
//!
//! The helpers below walk the workspace sources; the rules live in `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, resolved from this package's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Every `.rs` file under `dir` (relative to the workspace root)
#[must_use]
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// A source line that breaks a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the line
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// The offending line, trimmed
    pub line: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line_number, self.line)
    }
}

/// Scan production code in `files` for lines matching `is_violation`.
///
/// Comments are stripped. Scanning of a file stops at its first
/// `#[cfg(test)]`; test modules sit at the end of each file.
pub fn scan_production_code(
    files: &[PathBuf],
    is_violation: impl Fn(&str) -> bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for path in files {
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };

        for (idx, line) in content.lines().enumerate() {
            if line.trim_start().starts_with("#[cfg(test)]") {
                break;
            }
            let code_part = line.split("//").next().unwrap_or(line);
            if is_violation(code_part) {
                violations.push(Violation {
                    path: path.clone(),
                    line_number: idx + 1,
                    line: line.trim().to_string(),
                });
            }
        }
    }

    violations
}

/// Line store mutators the surface must not call
const STORE_MUTATORS: [&str; 4] = ["append", "replace_at", "remove_at", "clear"];

/// Whether `code` calls a line store mutator on a `store` receiver.
///
/// Only receivers named `store` (field, binding or `store()` accessor) count,
/// so unrelated builders such as `OpenOptions::append` pass.
#[must_use]
pub fn mutates_store(code: &str) -> bool {
    STORE_MUTATORS.iter().any(|method| {
        let call = format!(".{method}(");
        code.match_indices(&call).any(|(at, _)| {
            let receiver = code[..at].trim_end();
            receiver.ends_with("store") || receiver.ends_with("store()")
        })
    })
}

/// Fail with a readable report if `violations` is not empty
pub fn assert_no_violations(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\nViolations of rule: {rule}\n");
    for violation in violations {
        eprintln!("  {violation}");
    }
    panic!("\nFound {} violation(s) of: {rule}", violations.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_receivers_are_flagged() {
        assert!(mutates_store("self.store.append(lines);"));
        assert!(mutates_store("app.editor().store().remove_at(0)?;"));
        assert!(mutates_store("store.replace_at(index, lines)"));
        assert!(mutates_store("editor.store()\n    .clear()"));
    }

    #[test]
    fn test_other_receivers_pass() {
        assert!(!mutates_store("OpenOptions::new().create(true).append(true)"));
        assert!(!mutates_store("state.hit_regions.clear();"));
        assert!(!mutates_store("let totals = editor.store().totals();"));
    }
}
