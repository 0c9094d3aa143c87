//! Turn requests and the adapter that normalizes request bodies into one.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// One turn as sent by the game server. Only the top level is known here,
/// the engine decides what `infos`, `map` and `state` mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub infos: Value,
    #[serde(default)]
    pub map: Value,
    #[serde(default)]
    pub state: Value,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("Method must be POST. Got `{0}`.")]
    Method(String),
    #[error("Unsupported content type `{0}`.")]
    ContentType(String),
}

/// Whether a request with this method and content type can carry a turn.
/// Needs no body, so transports can refuse before reading one.
pub fn check(method: &str, content_type: Option<&str>) -> Result<(), InvalidRequest> {
    if method != "POST" {
        return Err(InvalidRequest::Method(method.to_owned()));
    }
    match content_type.unwrap_or_default() {
        CONTENT_TYPE_JSON | CONTENT_TYPE_FORM => Ok(()),
        other => Err(InvalidRequest::ContentType(other.to_owned())),
    }
}

/// Turns a request body into a single JSON document for the engine.
///
/// JSON bodies are passed through untouched. Form bodies are spliced into a
/// JSON object as text: `infos`, `map` and `state` must already be JSON and
/// `action` is inserted without escaping. Some game servers post turns as
/// form fields, and they only ever send values that survive this.
pub fn adapt<'a>(
    method: &str,
    content_type: Option<&str>,
    query: Option<&str>,
    body: &'a [u8],
) -> Result<Cow<'a, [u8]>, InvalidRequest> {
    check(method, content_type)?;
    if content_type != Some(CONTENT_TYPE_FORM) {
        return Ok(Cow::Borrowed(body));
    }
    let form = Form::parse(body, query);
    Ok(Cow::Owned(splice(
        form.get("action"),
        form.get("infos"),
        form.get("map"),
        form.get("state"),
    )))
}

fn splice(action: &str, infos: &str, map: &str, state: &str) -> Vec<u8> {
    format!(
        r#"{{"action": "{}", "infos": {}, "map": {}, "state": {}}}"#,
        action, infos, map, state
    )
    .into_bytes()
}

/// Decoded form fields, body first then query string.
struct Form {
    fields: Vec<(String, String)>,
}

impl Form {
    fn parse(body: &[u8], query: Option<&str>) -> Self {
        // Undecodable input counts as an empty form.
        let mut fields: Vec<(String, String)> =
            serde_urlencoded::from_bytes(body).unwrap_or_default();
        if let Some(query) = query {
            let query: Vec<(String, String)> =
                serde_urlencoded::from_str(query).unwrap_or_default();
            fields.extend(query);
        }
        Self { fields }
    }

    /// First value for `key`, or empty.
    fn get(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }
}
