//! # apitest
//!
//! A declarative API-testing harness. Test cases are rhai scripts that issue
//! HTTP requests and assert on responses; each runs in a fresh sandbox with
//! host-bound primitives, so no state crosses the test-case boundary.
//!
//! ## Layout of a test root
//!
//! ```text
//! tests/
//! ├── globalScript.rhai          # shared settings, run before every case
//! ├── globalTestFiles/results/   # fixtures for ResultIsLikeGlobalFile
//! └── users/
//!     ├── create.rhai            # one test case
//!     └── expected.txt           # local fixture for ResultIsLikeFile
//! ```
//!
//! ## A test case
//!
//! ```rhai,ignore
//! let r = Post("/users", #{ name: "a" });
//! let outcome = ResultIsLikeFile(r.body, "expected.txt");
//! if outcome != "Response matches the file content" {
//!     throw outcome;
//! }
//! ```
//!
//! A test case fails exactly when its script raises a fault; the comparison
//! primitives only return observation strings.
//!
//! ## Embedding
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use apitest::{ConsoleSink, ReqwestClient, Runner};
//!
//! let runner = Runner::new(Rc::new(ReqwestClient::new()), Rc::new(ConsoleSink::new(true)));
//! let report = runner.run(root.as_ref(), None)?;
//! std::process::exit(if report.has_failures() { 1 } else { 0 });
//! ```

pub mod discovery;
pub mod error;
pub mod extensions;
pub mod http;
pub mod output;
pub mod report;
pub mod runner;
pub mod sandbox;
pub mod settings;

// Core types
pub use discovery::{discover, TestCase, TestOutcome, GLOBAL_SCRIPT_NAME, SCRIPT_EXTENSION};
pub use error::HarnessError;
pub use report::RunReport;
pub use runner::Runner;

// Sandbox surface
pub use extensions::{Extension, ExtensionRegistry};
pub use sandbox::{Sandbox, GLOBAL_FIXTURES_DIR, MATCH_MESSAGE, MISMATCH_MESSAGE};
pub use settings::{Settings, SettingsError, SETTINGS_GLOBAL};

// Transport seam
pub use http::{HttpClient, HttpRequest, HttpResponse, Method, ReqwestClient, TransportError};

// Observability
pub use output::{ConsoleSink, EventSink, NullSink, RunEvent, SharedSink};
