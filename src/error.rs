//! Fatal errors that abort a run before all cases reach a terminal state.

use std::io;
use std::path::PathBuf;

/// Error type for failures the runner cannot contain to a single test case.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to walk test root {path:?}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read script {path:?}: {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("global script {path:?} failed: {message}")]
    GlobalScript { path: PathBuf, message: String },

    #[error("extension {name:?} failed to install: {message}")]
    Extension { name: String, message: String },
}
