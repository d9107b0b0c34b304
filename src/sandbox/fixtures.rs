//! Fixture comparison primitives.
//!
//! `ResultIsLikeFile` and `ResultIsLikeGlobalFile` compare a response body
//! against a fixture file and hand an observation string back to the script.
//! They never fail the test themselves; the script decides whether a
//! mismatch (or a missing fixture) is worth a `throw`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::output::RunEvent;

use super::Sandbox;

/// Shared fixture directory under the test root, used by
/// `ResultIsLikeGlobalFile`.
pub const GLOBAL_FIXTURES_DIR: &str = "globalTestFiles/results";

/// Sentinel returned when fixture contents equal the actual text exactly.
pub const MATCH_MESSAGE: &str = "Response matches the file content";

/// Sentinel returned when fixture contents differ from the actual text.
pub const MISMATCH_MESSAGE: &str = "Response does not match the file content";

/// Bind both comparison primitives. Local fixtures resolve under the test
/// case's own folder, global fixtures under the shared directory.
pub(crate) fn bind(sandbox: &mut Sandbox, test_case_dir: &Path, root: &Path) {
    let local_base = test_case_dir.to_path_buf();
    let sink = sandbox.sink();
    sandbox.engine_mut().register_fn(
        "ResultIsLikeFile",
        move |actual: &str, relative: &str| -> String {
            let message = compare_with_file(actual, &local_base.join(relative));
            sink.emit(RunEvent::Observation(message.clone()));
            message
        },
    );

    let global_base: PathBuf = root.join(GLOBAL_FIXTURES_DIR);
    let sink = sandbox.sink();
    sandbox.engine_mut().register_fn(
        "ResultIsLikeGlobalFile",
        move |actual: &str, relative: &str| -> String {
            let message = compare_with_file(actual, &global_base.join(relative));
            sink.emit(RunEvent::Observation(message.clone()));
            message
        },
    );
}

/// Exact-text comparison against a fixture file, reported as an observation
/// string: a fixed sentinel for match/mismatch, a descriptive message when
/// the fixture is missing or unreadable.
pub fn compare_with_file(actual: &str, fixture: &Path) -> String {
    if !fixture.exists() {
        return format!("Expected result file does not exist: {}", fixture.display());
    }

    match fs::read_to_string(fixture) {
        Ok(content) if content == actual => MATCH_MESSAGE.to_string(),
        Ok(_) => MISMATCH_MESSAGE.to_string(),
        Err(err) => format!("Error reading file {}: {err}", fixture.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_exact_match() {
        let dir = TempDir::new().unwrap();
        let fixture = dir.path().join("expected.txt");
        fs::write(&fixture, "ok").unwrap();

        assert_eq!(compare_with_file("ok", &fixture), MATCH_MESSAGE);
    }

    #[test]
    fn test_mismatch() {
        let dir = TempDir::new().unwrap();
        let fixture = dir.path().join("expected.txt");
        fs::write(&fixture, "ok").unwrap();

        assert_eq!(compare_with_file("nope", &fixture), MISMATCH_MESSAGE);
        // Trailing whitespace counts; the comparison is exact.
        assert_eq!(compare_with_file("ok\n", &fixture), MISMATCH_MESSAGE);
    }

    #[test]
    fn test_missing_fixture_is_observable_not_fatal() {
        let dir = TempDir::new().unwrap();
        let fixture = dir.path().join("absent.txt");

        let message = compare_with_file("ok", &fixture);
        assert!(message.starts_with("Expected result file does not exist:"));
        assert!(message.contains("absent.txt"));
    }

    #[test]
    fn test_unreadable_fixture_reports_read_error() {
        let dir = TempDir::new().unwrap();
        let fixture = dir.path().join("binary.bin");
        fs::write(&fixture, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let message = compare_with_file("ok", &fixture);
        assert!(message.starts_with("Error reading file"));
    }
}
