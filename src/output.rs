//! Structured run events and console rendering.
//!
//! The core narrates a run as [`RunEvent`]s through an [`EventSink`];
//! formatting and coloring live entirely in the sink implementations.

use std::rc::Rc;

use crate::report::RunReport;

// ANSI color codes
const MAGENTA: &str = "\x1b[35m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const BLUE: &str = "\x1b[94m";
const RESET: &str = "\x1b[0m";

/// Everything the core reports about a run, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    SuiteStarted { total: usize },
    TestStarted { path: String },
    /// The global configuration script ran inside a fresh sandbox.
    GlobalScriptRan,
    /// A script called the logging primitive.
    ConsoleLog(String),
    /// An extension primitive logged a message.
    ExtensionLog(String),
    RequestCompleted { method: &'static str },
    RequestFailed { method: &'static str, error: String },
    /// Settings were absent or malformed when a request resolved them.
    SettingsWarning(String),
    /// A fixture comparison primitive produced an observation string.
    Observation(String),
    TestPassed,
    TestFailed { reason: String },
    Summary(RunReport),
}

/// Receives run events. Implementations must be cheap; the runner emits
/// inline with test execution.
pub trait EventSink {
    fn emit(&self, event: RunEvent);
}

/// Shared handle to a sink, cloned into sandbox bindings.
pub type SharedSink = Rc<dyn EventSink>;

/// Discards all events. Useful in tests and for embedding.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: RunEvent) {}
}

/// Renders events to stdout with inline ANSI colors.
pub struct ConsoleSink {
    colors_enabled: bool,
}

impl ConsoleSink {
    pub fn new(colors_enabled: bool) -> Self {
        Self { colors_enabled }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colors_enabled {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_summary(&self, report: &RunReport) {
        println!("\n\n\n####### Test results: #######");
        println!("Total tests: {}", report.total);

        println!("\n{}", self.paint(GREEN, "Passed tests by path:"));
        for (path, files) in &report.passed {
            println!("{}", self.paint(GREEN, &format!("{path}:")));
            for file in files {
                println!("{}", self.paint(GREEN, &format!("  - {file}")));
            }
        }

        println!("\n{}", self.paint(RED, "Failed tests by path:"));
        if report.failed.is_empty() {
            println!("{}", self.paint(GREEN, "  No failed tests"));
        }
        for (path, files) in &report.failed {
            println!("{}", self.paint(RED, &format!("{path}:")));
            for file in files {
                println!("{}", self.paint(RED, &format!("  - {file}")));
            }
        }

        println!();
        if report.has_failures() {
            println!(
                "{}",
                self.paint(
                    RED,
                    &format!("!!! {} tests failed !!!", report.failed_group_count())
                )
            );
        } else {
            println!("{}", self.paint(GREEN, "All tests passed"));
        }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: RunEvent) {
        match event {
            RunEvent::SuiteStarted { total } => {
                println!("Found {total} test case(s)");
            }
            RunEvent::TestStarted { path } => {
                println!(
                    "\n\n{}",
                    self.paint(MAGENTA, &format!("Running test case: {path}"))
                );
            }
            RunEvent::GlobalScriptRan => {
                println!(
                    "{}",
                    self.paint(MAGENTA, "\tGlobalScript was run now Executing test case...")
                );
            }
            RunEvent::ConsoleLog(message) => {
                println!("{}", self.paint(BLUE, &format!("\tconsole.log: {message}")));
            }
            RunEvent::ExtensionLog(message) => {
                println!("{}", self.paint(CYAN, &format!("\tExtension: {message}")));
            }
            RunEvent::RequestCompleted { method } => {
                println!("{}", self.paint(CYAN, &format!("\t{method} request successful")));
            }
            RunEvent::RequestFailed { method, error } => {
                println!(
                    "{}",
                    self.paint(CYAN, &format!("\t{method} request failed: {error}"))
                );
            }
            RunEvent::SettingsWarning(message) => {
                println!("{}", self.paint(RED, &format!("\tWarning: {message}")));
            }
            RunEvent::Observation(message) => {
                println!("{}", self.paint(CYAN, &format!("\t{message}")));
            }
            RunEvent::TestPassed => {
                println!("{}", self.paint(GREEN, "\t-- Passed --"));
            }
            RunEvent::TestFailed { reason } => {
                println!("{}", self.paint(RED, &format!("\t{reason}")));
            }
            RunEvent::Summary(report) => {
                self.print_summary(&report);
            }
        }
    }
}
