//! Test case discovery using walkdir.
//!
//! A test case is any `.rhai` file under the test root, except the global
//! configuration script, which runs before every test case and is never a
//! test case itself.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::HarnessError;

/// File extension for test and configuration scripts.
pub const SCRIPT_EXTENSION: &str = ".rhai";

/// The shared configuration script, excluded from discovery wherever it
/// appears in the tree.
pub const GLOBAL_SCRIPT_NAME: &str = "globalScript.rhai";

/// One discovered script file, and later its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Parent folder of the script, relative to the test root (`.` for files
    /// directly under the root). Relative to the root even when discovery was
    /// scoped to a subset, so report grouping stays stable.
    pub relative_parent: PathBuf,
    /// Script file name.
    pub file_name: String,
    /// `None` until the case has executed; set exactly once by the runner.
    pub outcome: Option<TestOutcome>,
}

impl TestCase {
    /// Absolute path of the script given the test root.
    pub fn script_path(&self, root: &Path) -> PathBuf {
        root.join(&self.relative_parent).join(&self.file_name)
    }

    /// Absolute path of the folder holding the script and its local fixtures.
    pub fn parent_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.relative_parent)
    }
}

/// Terminal outcome of one executed test case. The enum makes the
/// "exactly one of passed / error detail" invariant structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed { reason: String },
}

/// Recursively discover test cases under `root`, or under `root/subset` when
/// a subset is given. The caller validates that the paths exist.
///
/// Order follows the directory traversal and affects progress output only.
pub fn discover(root: &Path, subset: Option<&Path>) -> Result<Vec<TestCase>, HarnessError> {
    let effective_root = match subset {
        Some(subset) => root.join(subset),
        None => root.to_path_buf(),
    };

    let mut cases = Vec::new();

    for entry in WalkDir::new(&effective_root) {
        let entry = entry.map_err(|source| HarnessError::Discovery {
            path: effective_root.clone(),
            source,
        })?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_test_script(file_name) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        cases.push(TestCase {
            relative_parent: relative_parent_of(relative),
            file_name: file_name.to_string(),
            outcome: None,
        });
    }

    Ok(cases)
}

/// Selection rule: `.rhai` files are test scripts, except the global
/// configuration script.
fn is_test_script(file_name: &str) -> bool {
    file_name.ends_with(SCRIPT_EXTENSION) && file_name != GLOBAL_SCRIPT_NAME
}

/// Parent of a root-relative path, normalized to `.` for top-level files.
fn relative_parent_of(relative: &Path) -> PathBuf {
    match relative.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
