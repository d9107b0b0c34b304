//! Extension hooks.
//!
//! Extra sandbox primitives come from [`Extension`] implementations collected
//! in an [`ExtensionRegistry`] at startup. A hook receives the live sandbox
//! plus the test case folder and root, and may register further host
//! functions before the global configuration script runs. A failing hook
//! fails sandbox construction, which is fatal to the run.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;

use crate::error::HarnessError;
use crate::sandbox::Sandbox;

/// An externally supplied set of sandbox primitives.
pub trait Extension {
    /// Unique name, used for registry ordering and error reporting.
    fn name(&self) -> &'static str;

    /// Register primitives into the sandbox. Called once per test case with
    /// that case's folder and the test root.
    fn install(&self, sandbox: &mut Sandbox, test_case_dir: &Path, root: &Path) -> Result<()>;
}

/// Named registry of extension hooks, installed into every sandbox in name
/// order.
#[derive(Default)]
pub struct ExtensionRegistry {
    hooks: BTreeMap<&'static str, Rc<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook, replacing any previous hook with the same name.
    pub fn register(&mut self, extension: Rc<dyn Extension>) {
        self.hooks.insert(extension.name(), extension);
    }

    /// Names of all registered hooks, in install order.
    pub fn names(&self) -> Vec<&'static str> {
        self.hooks.keys().copied().collect()
    }

    pub(crate) fn install_all(
        &self,
        sandbox: &mut Sandbox,
        test_case_dir: &Path,
        root: &Path,
    ) -> Result<(), HarnessError> {
        for (name, hook) in &self.hooks {
            hook.install(sandbox, test_case_dir, root)
                .map_err(|err| HarnessError::Extension {
                    name: (*name).to_string(),
                    message: err.to_string(),
                })?;
        }
        Ok(())
    }
}
