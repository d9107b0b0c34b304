//! HTTP primitives bound into the sandbox.
//!
//! Each verb re-resolves the `Settings` global at call time, so a script may
//! change settings between requests. A malformed settings shape comes back to
//! the script as an `"Error: …"` string value it can inspect; a transport
//! failure is raised as a script fault because it means the test environment
//! is broken, not the assertion.

use std::rc::Rc;

use rhai::{Dynamic, EvalAltResult, Map};

use crate::http::{HttpClient, HttpRequest, Method};
use crate::output::{RunEvent, SharedSink};
use crate::settings::Settings;

use super::{Sandbox, SettingsHandle};

/// Bind `Post`, `Get`, `Patch` and `Delete` into the sandbox.
pub(crate) fn bind(sandbox: &mut Sandbox, http: Rc<dyn HttpClient>) {
    bind_with_body(sandbox, Method::Post, "Post", Rc::clone(&http));
    bind_with_body(sandbox, Method::Patch, "Patch", Rc::clone(&http));
    bind_bodyless(sandbox, Method::Get, "Get", Rc::clone(&http));
    bind_bodyless(sandbox, Method::Delete, "Delete", http);
}

fn bind_with_body(sandbox: &mut Sandbox, method: Method, name: &str, http: Rc<dyn HttpClient>) {
    let settings = sandbox.settings_handle();
    let sink = sandbox.sink();
    sandbox.engine_mut().register_fn(
        name,
        move |path: &str, body: Dynamic| -> Result<Dynamic, Box<EvalAltResult>> {
            let body = decode_body(&body)?;
            dispatch(method, path, body, &settings, &sink, &http)
        },
    );
}

fn bind_bodyless(sandbox: &mut Sandbox, method: Method, name: &str, http: Rc<dyn HttpClient>) {
    let settings = sandbox.settings_handle();
    let sink = sandbox.sink();
    sandbox.engine_mut().register_fn(
        name,
        move |path: &str| -> Result<Dynamic, Box<EvalAltResult>> {
            dispatch(method, path, None, &settings, &sink, &http)
        },
    );
}

/// Marshal a script-side body into JSON. Unit means "no body".
fn decode_body(body: &Dynamic) -> Result<Option<serde_json::Value>, Box<EvalAltResult>> {
    if body.is_unit() {
        return Ok(None);
    }
    rhai::serde::from_dynamic::<serde_json::Value>(body).map(Some)
}

fn dispatch(
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
    settings: &SettingsHandle,
    sink: &SharedSink,
    http: &Rc<dyn HttpClient>,
) -> Result<Dynamic, Box<EvalAltResult>> {
    let current = settings.borrow().clone();
    if current.is_unit() {
        sink.emit(RunEvent::SettingsWarning("Settings not found".to_string()));
    }

    let resolved = match Settings::from_global(&current) {
        Ok(resolved) => resolved,
        Err(err) => {
            sink.emit(RunEvent::SettingsWarning(err.to_string()));
            return Ok(Dynamic::from(format!("Error: {err}")));
        }
    };

    let request = HttpRequest {
        method,
        url: format!("{}{}", resolved.base_url, path),
        headers: resolved.headers,
        body,
    };

    match http.send(&request) {
        Ok(response) => {
            sink.emit(RunEvent::RequestCompleted {
                method: method.as_str(),
            });
            let mut result = Map::new();
            result.insert("response".into(), response.status_line.into());
            result.insert("body".into(), response.body.into());
            Ok(Dynamic::from_map(result))
        }
        Err(err) => {
            sink.emit(RunEvent::RequestFailed {
                method: method.as_str(),
                error: err.to_string(),
            });
            Err(err.to_string().into())
        }
    }
}
