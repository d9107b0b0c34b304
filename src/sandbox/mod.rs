//! Per-test-case script sandbox.
//!
//! One [`Sandbox`] is built for every test case and discarded afterwards;
//! nothing a script does in one sandbox is visible to the next. A sandbox is
//! a rhai engine plus a scope holding the global state the configuration and
//! test scripts populate, with the host primitives (logging, HTTP verbs,
//! fixture comparison, extension-registered functions) bound to the engine.

mod bridge;
mod fixtures;

pub use fixtures::{GLOBAL_FIXTURES_DIR, MATCH_MESSAGE, MISMATCH_MESSAGE};

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use rhai::{Dynamic, Engine, Scope};

use crate::error::HarnessError;
use crate::extensions::ExtensionRegistry;
use crate::http::HttpClient;
use crate::output::{RunEvent, SharedSink};
use crate::settings::SETTINGS_GLOBAL;

/// Handle to the live `Settings` value, shared between the scope and the
/// HTTP bridge so per-request resolution observes script mutations.
pub(crate) type SettingsHandle = Rc<RefCell<Dynamic>>;

/// An isolated execution context for one test case's script.
pub struct Sandbox {
    engine: Engine,
    scope: Scope<'static>,
    settings: SettingsHandle,
    sink: SharedSink,
}

impl Sandbox {
    /// Build a sandbox for one test case: bind the host primitives, run the
    /// extension hooks, then execute the global configuration script.
    ///
    /// Any failure here is fatal to the whole run, not just this test case.
    pub fn initialize(
        global_script: &Path,
        test_case_dir: &Path,
        root: &Path,
        http: Rc<dyn HttpClient>,
        extensions: &ExtensionRegistry,
        sink: SharedSink,
    ) -> Result<Self, HarnessError> {
        let mut engine = Engine::new();

        {
            let sink = Rc::clone(&sink);
            engine.on_print(move |text| sink.emit(RunEvent::ConsoleLog(text.to_string())));
        }
        {
            let sink = Rc::clone(&sink);
            engine.on_debug(move |text, _source, pos| {
                sink.emit(RunEvent::ConsoleLog(format!("{text} @ {pos}")));
            });
        }

        let mut sandbox = Sandbox {
            engine,
            scope: Scope::new(),
            settings: Rc::new(RefCell::new(Dynamic::UNIT)),
            sink,
        };

        bridge::bind(&mut sandbox, http);
        fixtures::bind(&mut sandbox, test_case_dir, root);
        extensions.install_all(&mut sandbox, test_case_dir, root)?;

        sandbox.run_global_script(global_script)?;
        Ok(sandbox)
    }

    /// Execute a test script in this sandbox. A returned error is the test
    /// case's failure detail; it never aborts the run.
    pub fn run_script(&mut self, path: &Path) -> Result<()> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("error reading {}", path.display()))?;
        self.run_source(&source)
            .map_err(|err| anyhow!("error executing {}: {err}", path.display()))
    }

    /// Execute raw script source against the sandbox scope.
    pub fn run_source(&mut self, source: &str) -> Result<()> {
        self.engine
            .run_with_scope(&mut self.scope, source)
            .map_err(|err| anyhow!("{err}"))
    }

    /// Registration surface for host primitives: extensions (and the built-in
    /// bindings) register typed functions on the underlying engine, which
    /// marshals script values at the call boundary.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Read a global variable from the sandbox scope, if set.
    pub fn get_global(&self, name: &str) -> Option<Dynamic> {
        self.scope.get_value::<Dynamic>(name)
    }

    /// Emit a run event through the sandbox's sink.
    pub fn emit(&self, event: RunEvent) {
        self.sink.emit(event);
    }

    pub(crate) fn sink(&self) -> SharedSink {
        Rc::clone(&self.sink)
    }

    pub(crate) fn settings_handle(&self) -> SettingsHandle {
        Rc::clone(&self.settings)
    }

    fn run_global_script(&mut self, path: &Path) -> Result<(), HarnessError> {
        let source = fs::read_to_string(path).map_err(|source| HarnessError::ScriptRead {
            path: path.to_path_buf(),
            source,
        })?;

        self.run_source(&source)
            .map_err(|err| HarnessError::GlobalScript {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        self.share_settings();
        Ok(())
    }

    /// Convert the `Settings` global into a rhai shared value and hold a
    /// clone of it, so field mutations made by the test script later are
    /// observed when the bridge re-resolves settings per request.
    fn share_settings(&mut self) {
        if let Some(value) = self.scope.get_value::<Dynamic>(SETTINGS_GLOBAL) {
            let shared = value.into_shared();
            self.scope.set_value(SETTINGS_GLOBAL, shared.clone());
            *self.settings.borrow_mut() = shared;
        }
    }
}
