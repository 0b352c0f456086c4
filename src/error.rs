use std::fmt;

use thiserror::Error;

/// One failed form field. `field` is the canonical field name the UI knows
/// ("title", "password", ...); `message` is shown next to the input.
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ApiError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

/// Everything that can go wrong between a user action and the backend.
/// Validation never reaches the network; Network means no usable response
/// came back at all; Request carries whatever message the server supplied.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no response received from server (check your connection)")]
    Network,

    #[error("request failed ({status}): {message}")]
    Request { status: u16, message: String },

    #[error("{0}")]
    Validation(ValidationErrors),
}

impl ApiError {
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        ApiError::Request {
            status,
            message: message.into(),
        }
    }
}
