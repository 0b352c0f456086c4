use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{ApiError, FieldError, ValidationErrors};
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A file attachment referenced by path; read only at send time and
/// transmitted as a binary multipart part, never base64 over JSON.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub enum ApiBody {
    Empty,
    Json(Value),
    Multipart {
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    },
}

/// The single seam between collection logic and the wire. Controllers and
/// auth handlers only ever see this trait; tests substitute a canned
/// implementation.
pub trait Backend {
    fn send(&self, method: Method, path: &str, body: ApiBody) -> Result<Value, ApiError>;
}

/// Extract a human-readable message from whatever error payload the backend
/// produced: an `errors` array of `{message}` entries, then a single
/// `message`/`error`/`msg` field, then a raw string body, then the HTTP
/// status text.
pub fn error_message_from(payload: &Value, status_text: &str) -> String {
    if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            return errors
                .iter()
                .map(|e| match e.get("message").and_then(Value::as_str) {
                    Some(m) => m.to_string(),
                    None => e.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; ");
        }
    }

    for key in ["message", "error", "msg"] {
        if let Some(m) = payload.get(key).and_then(Value::as_str) {
            if !m.is_empty() {
                return m.to_string();
            }
        }
    }

    if let Some(s) = payload.as_str() {
        return s.to_string();
    }

    status_text.to_string()
}

/// One blocking HTTP attempt per call: no retries, no caching. The session
/// context is handed in at construction; a present token rides along as a
/// bearer header.
pub struct HttpGateway {
    client: Client,
    base: String,
    session: Rc<SessionContext>,
}

impl HttpGateway {
    pub fn new(config: &Config, session: Rc<SessionContext>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base: config.api_base.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl Backend for HttpGateway {
    fn send(&self, method: Method, path: &str, body: ApiBody) -> Result<Value, ApiError> {
        let url = self.url(path);
        let mut req = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }

        req = match body {
            ApiBody::Empty => req,
            ApiBody::Json(v) => req.json(&v),
            ApiBody::Multipart { fields, file } => {
                let mut form = multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                if let Some(part) = file {
                    // An unreadable attachment is a local input problem,
                    // not a transport failure.
                    form = form.file(part.field.clone(), &part.path).map_err(|e| {
                        ApiError::Validation(ValidationErrors(vec![FieldError::new(
                            part.field,
                            format!("could not read attached file: {e}"),
                        )]))
                    })?;
                }
                req.multipart(form)
            }
        };

        let response = req.send().map_err(|e| {
            error!("request to {url} failed: {e}");
            ApiError::Network
        })?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("request failed").to_string();
        let text = response.text().map_err(|e| {
            error!("reading response from {url} failed: {e}");
            ApiError::Network
        })?;

        // Non-JSON bodies still flow through as `{message}`.
        let payload: Value =
            serde_json::from_str(&text).unwrap_or_else(|_| json!({ "message": text }));

        if !status.is_success() {
            error!("api error payload for {path}: {payload}");
            return Err(ApiError::request(
                status.as_u16(),
                error_message_from(&payload, &status_text),
            ));
        }

        debug!("{path} responded {status}");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_array_messages_are_concatenated() {
        let payload = json!({
            "errors": [{ "message": "title is required" }, { "message": "price must be positive" }]
        });
        assert_eq!(
            error_message_from(&payload, "Bad Request"),
            "title is required; price must be positive"
        );
    }

    #[test]
    fn single_message_fields_resolve_in_priority_order() {
        assert_eq!(
            error_message_from(&json!({ "message": "nope" }), "Bad Request"),
            "nope"
        );
        assert_eq!(
            error_message_from(&json!({ "error": "broken" }), "Bad Request"),
            "broken"
        );
        assert_eq!(
            error_message_from(&json!({ "msg": "sad" }), "Bad Request"),
            "sad"
        );
    }

    #[test]
    fn fallbacks_are_raw_string_then_status_text() {
        assert_eq!(error_message_from(&json!("plain text"), "Bad Request"), "plain text");
        assert_eq!(error_message_from(&json!({}), "Not Found"), "Not Found");
    }
}
