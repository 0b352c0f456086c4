use serde_json::json;

use crate::error::ApiError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Map the console error taxonomy onto wire error codes. Validation errors
/// carry their field breakdown so the UI can mark individual inputs.
pub fn api_err(id: &str, e: &ApiError) -> serde_json::Value {
    match e {
        ApiError::Network => err(id, "network_error", e.to_string(), None),
        ApiError::Request { status, .. } => err(
            id,
            "request_failed",
            e.to_string(),
            Some(json!({ "status": status })),
        ),
        ApiError::Validation(errors) => {
            let fields: Vec<serde_json::Value> = errors
                .0
                .iter()
                .map(|f| json!({ "field": f.field, "message": f.message }))
                .collect();
            err(
                id,
                "validation_failed",
                errors.to_string(),
                Some(json!({ "fields": fields })),
            )
        }
    }
}
