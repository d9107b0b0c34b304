//! Result aggregation.
//!
//! A pure grouping over the final test case list; rendering is owned by the
//! event sink so the report itself stays side-effect free.

use std::collections::BTreeMap;

use crate::discovery::{TestCase, TestOutcome};

/// Grouped view over a finished run: file names partitioned into passed and
/// failed buckets per parent folder. BTreeMap keeps summary output stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub total: usize,
    pub passed: BTreeMap<String, Vec<String>>,
    pub failed: BTreeMap<String, Vec<String>>,
}

impl RunReport {
    /// Partition the final case list by parent folder.
    pub fn from_cases(cases: &[TestCase]) -> Self {
        let mut report = RunReport {
            total: cases.len(),
            ..RunReport::default()
        };

        for case in cases {
            let group = case.relative_parent.display().to_string();
            let bucket = match case.outcome {
                Some(TestOutcome::Passed) => &mut report.passed,
                // Cases that never reached a terminal state count as failed.
                _ => &mut report.failed,
            };
            bucket.entry(group).or_default().push(case.file_name.clone());
        }

        report
    }

    /// Number of folders containing at least one failed test.
    pub fn failed_group_count(&self) -> usize {
        self.failed.len()
    }

    /// Whether any test failed; drives the CLI exit code.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn case(parent: &str, name: &str, outcome: Option<TestOutcome>) -> TestCase {
        TestCase {
            relative_parent: PathBuf::from(parent),
            file_name: name.to_string(),
            outcome,
        }
    }

    #[test]
    fn test_grouping_by_parent() {
        let cases = vec![
            case("a", "one.rhai", Some(TestOutcome::Passed)),
            case("a", "two.rhai", Some(TestOutcome::Passed)),
            case(
                "b",
                "three.rhai",
                Some(TestOutcome::Failed {
                    reason: "boom".to_string(),
                }),
            ),
        ];

        let report = RunReport::from_cases(&cases);
        assert_eq!(report.total, 3);
        assert_eq!(report.passed["a"], vec!["one.rhai", "two.rhai"]);
        assert_eq!(report.failed["b"], vec!["three.rhai"]);
        assert_eq!(report.failed_group_count(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_all_passed() {
        let cases = vec![case(".", "t.rhai", Some(TestOutcome::Passed))];
        let report = RunReport::from_cases(&cases);

        assert!(!report.has_failures());
        assert_eq!(report.failed_group_count(), 0);
        assert_eq!(report.passed["."], vec!["t.rhai"]);
    }

    #[test]
    fn test_unexecuted_case_counts_as_failed() {
        let cases = vec![case("a", "t.rhai", None)];
        let report = RunReport::from_cases(&cases);

        assert!(report.has_failures());
        assert_eq!(report.failed["a"], vec!["t.rhai"]);
    }

    #[test]
    fn test_same_folder_split_across_buckets() {
        let cases = vec![
            case("a", "ok.rhai", Some(TestOutcome::Passed)),
            case(
                "a",
                "bad.rhai",
                Some(TestOutcome::Failed {
                    reason: "x".to_string(),
                }),
            ),
        ];
        let report = RunReport::from_cases(&cases);

        assert_eq!(report.passed["a"], vec!["ok.rhai"]);
        assert_eq!(report.failed["a"], vec!["bad.rhai"]);
    }
}
