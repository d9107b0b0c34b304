//! Typed settings decoded from the sandbox's `Settings` global.
//!
//! The global configuration script declares a `Settings` object map; the
//! HTTP bridge re-reads and decodes it on every request so scripts can change
//! settings between requests and have the change observed immediately.

use std::collections::HashMap;

use rhai::Dynamic;
use serde::Deserialize;
use thiserror::Error;

/// Name of the global variable the configuration script must declare.
pub const SETTINGS_GLOBAL: &str = "Settings";

/// Settings recognized by the HTTP bridge. Both keys are optional; unknown
/// keys are ignored so scripts may stash extra state in the same map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix for every request URL. Empty when not declared.
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    /// Headers attached to every request.
    pub headers: HashMap<String, String>,
}

/// The `Settings` global had the wrong shape (e.g. `headers` not a string
/// map). Returned to the calling script as a value, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid Settings shape: {0}")]
pub struct SettingsError(pub String);

impl Settings {
    /// Decode settings from the current value of the `Settings` global.
    ///
    /// An absent global (unit value) decodes to empty defaults, matching the
    /// optional contract; a present global with a wrong shape is an error.
    pub fn from_global(value: &Dynamic) -> Result<Self, SettingsError> {
        if value.is_unit() {
            return Ok(Self::default());
        }

        // The global is stored as a rhai shared value so in-place script
        // mutations are visible here; flatten to a plain clone for decoding.
        let snapshot = value.clone().flatten();
        rhai::serde::from_dynamic(&snapshot).map_err(|err| SettingsError(err.to_string()))
    }
}
