//! Sequential test orchestration.
//!
//! One sandbox per test case, one case at a time, in discovery order.
//! Script faults are contained per case; a sandbox initialization failure
//! aborts the whole run (a broken global script would fail every remaining
//! case the same way).

use std::path::Path;
use std::rc::Rc;

use crate::discovery::{discover, TestOutcome, GLOBAL_SCRIPT_NAME};
use crate::error::HarnessError;
use crate::extensions::ExtensionRegistry;
use crate::http::HttpClient;
use crate::output::{RunEvent, SharedSink};
use crate::report::RunReport;
use crate::sandbox::Sandbox;

/// Runs a discovered suite to completion and aggregates the results.
pub struct Runner {
    http: Rc<dyn HttpClient>,
    sink: SharedSink,
    extensions: ExtensionRegistry,
}

impl Runner {
    pub fn new(http: Rc<dyn HttpClient>, sink: SharedSink) -> Self {
        Self {
            http,
            sink,
            extensions: ExtensionRegistry::new(),
        }
    }

    /// Attach extension hooks, installed into every sandbox.
    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    /// Run every test case under `root` (restricted to `root/subset` when a
    /// subset is given; the caller has validated both paths).
    ///
    /// Returns the aggregated report, or the fatal error that aborted the
    /// run before all cases reached a terminal state.
    pub fn run(&self, root: &Path, subset: Option<&Path>) -> Result<RunReport, HarnessError> {
        let mut cases = discover(root, subset)?;
        self.sink.emit(RunEvent::SuiteStarted { total: cases.len() });

        let global_script = root.join(GLOBAL_SCRIPT_NAME);

        for case in cases.iter_mut() {
            let script_path = case.script_path(root);
            let test_case_dir = case.parent_dir(root);

            self.sink.emit(RunEvent::TestStarted {
                path: script_path.display().to_string(),
            });

            let mut sandbox = match Sandbox::initialize(
                &global_script,
                &test_case_dir,
                root,
                Rc::clone(&self.http),
                &self.extensions,
                Rc::clone(&self.sink),
            ) {
                Ok(sandbox) => sandbox,
                Err(err) => {
                    // Deliberate asymmetry with script faults below: an init
                    // failure marks this case failed and aborts the run.
                    case.outcome = Some(TestOutcome::Failed {
                        reason: format!("error initializing sandbox: {err}"),
                    });
                    return Err(err);
                }
            };

            self.sink.emit(RunEvent::GlobalScriptRan);

            match sandbox.run_script(&script_path) {
                Ok(()) => {
                    case.outcome = Some(TestOutcome::Passed);
                    self.sink.emit(RunEvent::TestPassed);
                }
                Err(err) => {
                    let reason = err.to_string();
                    self.sink.emit(RunEvent::TestFailed {
                        reason: reason.clone(),
                    });
                    case.outcome = Some(TestOutcome::Failed { reason });
                }
            }
        }

        let report = RunReport::from_cases(&cases);
        self.sink.emit(RunEvent::Summary(report.clone()));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::testutil::{RecordingClient, RecordingSink};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn runner(client: &Rc<RecordingClient>, sink: &Rc<RecordingSink>) -> Runner {
        Runner::new(
            Rc::clone(client) as Rc<dyn HttpClient>,
            Rc::clone(sink) as SharedSink,
        )
    }

    #[test]
    fn test_failed_case_does_not_stop_the_run() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "globalScript.rhai", "let Settings = #{};");
        write(root, "a/bad.rhai", r#"throw "deliberate";"#);
        write(root, "b/good.rhai", "let x = 1;");

        let client = Rc::new(RecordingClient::default());
        let sink = Rc::new(RecordingSink::default());
        let report = runner(&client, &sink).run(root, None).unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.failed["a"], vec!["bad.rhai"]);
        assert_eq!(report.passed["b"], vec!["good.rhai"]);
    }

    #[test]
    fn test_init_failure_aborts_run() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "globalScript.rhai", "this is not rhai {{{");
        write(root, "a/one.rhai", "let x = 1;");
        write(root, "b/two.rhai", "let x = 1;");

        let client = Rc::new(RecordingClient::default());
        let sink = Rc::new(RecordingSink::default());
        let err = runner(&client, &sink).run(root, None).unwrap_err();

        assert!(matches!(err, HarnessError::GlobalScript { .. }));
        // No summary is emitted for an aborted run.
        assert!(!sink
            .0
            .borrow()
            .iter()
            .any(|e| matches!(e, RunEvent::Summary(_))));
    }

    #[test]
    fn test_state_does_not_leak_between_cases() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "globalScript.rhai", "let Settings = #{};");
        write(
            root,
            "a_writer.rhai",
            "let leaked = 42; Settings.extra = true;",
        );
        // Fails only if it can see state from the other case's sandbox.
        write(
            root,
            "b_checker.rhai",
            r#"
            try {
                print(leaked);
                throw "leaked variable visible";
            } catch (err) {
                if err == "leaked variable visible" { throw err; }
            }
            if "extra" in Settings { throw "settings leaked"; }
            "#,
        );

        let client = Rc::new(RecordingClient::default());
        let sink = Rc::new(RecordingSink::default());
        let report = runner(&client, &sink).run(root, None).unwrap();

        assert!(!report.has_failures(), "failed: {:?}", report.failed);
    }

    #[test]
    fn test_idempotent_over_immutable_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "globalScript.rhai", "let Settings = #{};");
        write(root, "a/pass.rhai", "let x = 1;");
        write(root, "a/fail.rhai", r#"throw "always";"#);

        let client = Rc::new(RecordingClient::default());
        let sink = Rc::new(RecordingSink::default());
        let runner = runner(&client, &sink);

        let first = runner.run(root, None).unwrap();
        let second = runner.run(root, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_subset_limits_execution_but_not_grouping() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "globalScript.rhai", "let Settings = #{};");
        write(root, "a/one.rhai", "let x = 1;");
        write(root, "b/nested/two.rhai", "let x = 1;");

        let client = Rc::new(RecordingClient::default());
        let sink = Rc::new(RecordingSink::default());
        let report = runner(&client, &sink)
            .run(root, Some(&PathBuf::from("b")))
            .unwrap();

        assert_eq!(report.total, 1);
        assert_eq!(report.passed["b/nested"], vec!["two.rhai"]);
    }

    #[test]
    fn test_events_narrate_lifecycle() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "globalScript.rhai", "let Settings = #{};");
        write(root, "one.rhai", "let x = 1;");

        let client = Rc::new(RecordingClient::default());
        let sink = Rc::new(RecordingSink::default());
        runner(&client, &sink).run(root, None).unwrap();

        let events = sink.0.borrow();
        assert!(matches!(events[0], RunEvent::SuiteStarted { total: 1 }));
        assert!(matches!(events[1], RunEvent::TestStarted { .. }));
        assert!(matches!(events[2], RunEvent::GlobalScriptRan));
        assert!(matches!(events[3], RunEvent::TestPassed));
        assert!(matches!(events[4], RunEvent::Summary(_)));
    }
}
