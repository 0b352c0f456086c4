//! Draft parsing and local validation for every create/edit surface.
//! Validation failures never reach the gateway; a valid draft becomes a
//! `Payload` ready to submit (JSON with empty optionals dropped, or
//! multipart with the backend's field names and an optional file part).

use std::path::PathBuf;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{ApiError, ValidationErrors};
use crate::gateway::{ApiBody, FilePart};
use crate::model::{CatalogStatus, InvoiceStatus};

const MIN_PASSWORD_LEN: usize = 8;

fn param_str(params: &Value, key: &str) -> String {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("")
        .to_string()
}

fn param_opt_str(params: &Value, key: &str) -> Option<String> {
    let s = param_str(params, key);
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn param_path(params: &Value, key: &str) -> Option<PathBuf> {
    param_opt_str(params, key).map(PathBuf::from)
}

fn require(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(field, "is required");
    }
}

fn require_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(field, "is required");
        return;
    }
    let ok = matches!(value.split_once('@'), Some((local, domain))
        if !local.is_empty() && domain.contains('.'));
    if !ok {
        errors.push(field, "must be a valid email address");
    }
}

fn require_password(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(field, "is required");
    } else if value.len() < MIN_PASSWORD_LEN {
        errors.push(field, "must be at least 8 characters");
    }
}

/// Numbers arrive from the UI as strings or JSON numbers. Empty means
/// absent; anything else must parse and be non-negative.
fn optional_amount(errors: &mut ValidationErrors, params: &Value, field: &str) -> Option<f64> {
    let raw = match params.get(field) {
        Some(Value::Number(n)) => return validate_amount(errors, field, n.as_f64()),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return None,
    };
    validate_amount(errors, field, raw.parse::<f64>().ok())
}

fn validate_amount(errors: &mut ValidationErrors, field: &str, parsed: Option<f64>) -> Option<f64> {
    match parsed.filter(|v| v.is_finite()) {
        Some(v) if v >= 0.0 => Some(v),
        Some(_) => {
            errors.push(field, "must not be negative");
            None
        }
        None => {
            errors.push(field, "must be a number");
            None
        }
    }
}

fn optional_date(errors: &mut ValidationErrors, params: &Value, field: &str) -> Option<String> {
    let raw = param_opt_str(params, field)?;
    if NaiveDate::parse_from_str(&raw, "%Y-%m-%d").is_err() {
        errors.push(field, "must be a date in YYYY-MM-DD format");
        return None;
    }
    Some(raw)
}

fn json_body(entries: Vec<(&str, Value)>) -> ApiBody {
    let mut map = Map::new();
    for (key, value) in entries {
        match &value {
            Value::Null => continue,
            Value::String(s) if s.is_empty() => continue,
            _ => {
                map.insert(key.to_string(), value);
            }
        }
    }
    ApiBody::Json(Value::Object(map))
}

/* ---------- catalog forms ---------- */

/// Course create/edit draft. Courses always travel as multipart because the
/// picture rides along as a binary part.
#[derive(Debug, Clone)]
pub struct CourseForm {
    pub title: String,
    pub author: String,
    pub track: String,
    pub description: String,
    pub status: Option<String>,
    pub picture: Option<PathBuf>,
}

impl CourseForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            title: param_str(params, "title"),
            author: param_str(params, "author"),
            track: param_str(params, "track"),
            description: param_str(params, "description"),
            status: param_opt_str(params, "status"),
            picture: param_path(params, "picturePath"),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "title", &self.title);
        require(&mut errors, "author", &self.author);
        require(&mut errors, "track", &self.track);
        require(&mut errors, "description", &self.description);

        let status = match &self.status {
            Some(raw) => match CatalogStatus::from_raw(raw) {
                Some(s) => s,
                None => {
                    errors.push("status", "must be one of active, inactive, draft");
                    CatalogStatus::Draft
                }
            },
            None => CatalogStatus::Draft,
        };

        let fields = vec![
            ("title".to_string(), self.title.clone()),
            ("author".to_string(), self.author.clone()),
            ("track".to_string(), self.track.clone()),
            ("description".to_string(), self.description.clone()),
            ("status".to_string(), status.as_str().to_string()),
        ];
        let file = self.picture.clone().map(|path| FilePart {
            field: "picture".to_string(),
            path,
        });

        errors.into_result(ApiBody::Multipart { fields, file })
    }
}

/// Track create/edit draft. The backend's multipart contract names the
/// title field `name` and takes technologies as one comma-joined string.
#[derive(Debug, Clone)]
pub struct TrackForm {
    pub title: String,
    pub description: String,
    pub price: Value,
    pub duration: String,
    pub instructor: String,
    pub technologies: String,
    pub status: Option<String>,
    pub image: Option<PathBuf>,
}

impl TrackForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            title: param_str(params, "title"),
            description: param_str(params, "description"),
            price: params.get("price").cloned().unwrap_or(Value::Null),
            duration: param_str(params, "duration"),
            instructor: param_str(params, "instructor"),
            technologies: param_str(params, "technologies"),
            status: param_opt_str(params, "status"),
            image: param_path(params, "imagePath"),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "title", &self.title);
        require(&mut errors, "description", &self.description);
        require(&mut errors, "duration", &self.duration);
        require(&mut errors, "instructor", &self.instructor);

        let price = match &self.price {
            Value::Null => {
                errors.push("price", "is required");
                0.0
            }
            Value::Number(n) => validate_amount(&mut errors, "price", n.as_f64()).unwrap_or(0.0),
            Value::String(s) if !s.trim().is_empty() => {
                validate_amount(&mut errors, "price", s.trim().parse::<f64>().ok()).unwrap_or(0.0)
            }
            _ => {
                errors.push("price", "is required");
                0.0
            }
        };

        if let Some(raw) = &self.status {
            if CatalogStatus::from_raw(raw).is_none() {
                errors.push("status", "must be one of active, inactive, draft");
            }
        }

        let mut fields = vec![
            ("name".to_string(), self.title.clone()),
            ("description".to_string(), self.description.clone()),
            ("price".to_string(), price.to_string()),
            ("duration".to_string(), self.duration.clone()),
            ("instructor".to_string(), self.instructor.clone()),
            ("technologies".to_string(), self.technologies.clone()),
        ];
        if let Some(status) = &self.status {
            fields.push(("status".to_string(), status.to_lowercase()));
        }
        let file = self.image.clone().map(|path| FilePart {
            field: "image".to_string(),
            path,
        });

        errors.into_result(ApiBody::Multipart { fields, file })
    }
}

/* ---------- invoice forms ---------- */

#[derive(Debug, Clone)]
pub struct InvoiceCreateForm {
    pub learner: String,
    pub paystack_callback_url: String,
    pub track: Option<String>,
    params: Value,
}

impl InvoiceCreateForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            learner: param_str(params, "learner"),
            paystack_callback_url: param_str(params, "paystackCallbackUrl"),
            track: param_opt_str(params, "track"),
            params: params.clone(),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "learner", &self.learner);
        require(&mut errors, "paystackCallbackUrl", &self.paystack_callback_url);

        let amount = optional_amount(&mut errors, &self.params, "amount");
        let due_date = optional_date(&mut errors, &self.params, "dueDate");

        errors.into_result(json_body(vec![
            ("learner", Value::String(self.learner.clone())),
            (
                "paystackCallbackUrl",
                Value::String(self.paystack_callback_url.clone()),
            ),
            ("amount", amount.map(Value::from).unwrap_or(Value::Null)),
            ("dueDate", due_date.map(Value::String).unwrap_or(Value::Null)),
            (
                "paymentDetails",
                param_opt_str(&self.params, "paymentDetails")
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            ),
            (
                "track",
                self.track.clone().map(Value::String).unwrap_or(Value::Null),
            ),
        ]))
    }
}

#[derive(Debug, Clone)]
pub struct InvoiceUpdateForm {
    params: Value,
}

impl InvoiceUpdateForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();

        let amount = optional_amount(&mut errors, &self.params, "amount");
        let due_date = optional_date(&mut errors, &self.params, "dueDate");

        let status = param_opt_str(&self.params, "status");
        if let Some(raw) = &status {
            if InvoiceStatus::from_raw(raw).is_none() {
                errors.push("status", "must be one of paid, pending, overdue");
            }
        }

        errors.into_result(json_body(vec![
            ("amount", amount.map(Value::from).unwrap_or(Value::Null)),
            ("dueDate", due_date.map(Value::String).unwrap_or(Value::Null)),
            (
                "status",
                status.map(|s| Value::String(s.to_lowercase())).unwrap_or(Value::Null),
            ),
            (
                "paymentDetails",
                param_opt_str(&self.params, "paymentDetails")
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            ),
        ]))
    }
}

/* ---------- learner form ---------- */

/// Learner profile edit. All fields optional; present fields travel as
/// multipart text parts alongside an optional profile image.
#[derive(Debug, Clone)]
pub struct LearnerUpdateForm {
    params: Value,
}

impl LearnerUpdateForm {
    const TEXT_FIELDS: &'static [&'static str] = &[
        "firstName",
        "lastName",
        "contact",
        "location",
        "description",
        "gender",
        "country",
        "paidStatus",
        "program",
    ];

    pub fn from_params(params: &Value) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();

        let mut fields = Vec::new();
        for key in Self::TEXT_FIELDS {
            if let Some(value) = param_opt_str(&self.params, key) {
                fields.push((key.to_string(), value));
            }
        }
        if let Some(disabled) = self.params.get("disabled").and_then(Value::as_bool) {
            fields.push(("disabled".to_string(), disabled.to_string()));
        }

        if fields.is_empty() && self.params.get("profileImagePath").is_none() {
            errors.push("form", "nothing to update");
        }

        let file = param_path(&self.params, "profileImagePath").map(|path| FilePart {
            field: "profileImage".to_string(),
            path,
        });

        errors.into_result(ApiBody::Multipart { fields, file })
    }
}

/* ---------- auth forms ---------- */

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub contact: String,
}

impl RegisterForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            first_name: param_str(params, "firstName"),
            last_name: param_str(params, "lastName"),
            email: param_str(params, "email"),
            password: param_str(params, "password"),
            confirm_password: param_str(params, "confirmPassword"),
            contact: param_str(params, "contact"),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "firstName", &self.first_name);
        require(&mut errors, "lastName", &self.last_name);
        require_email(&mut errors, "email", &self.email);
        require_password(&mut errors, "password", &self.password);
        if self.confirm_password != self.password {
            errors.push("confirmPassword", "does not match password");
        }
        require(&mut errors, "contact", &self.contact);

        errors.into_result(json_body(vec![
            ("firstName", Value::String(self.first_name.clone())),
            ("lastName", Value::String(self.last_name.clone())),
            ("email", Value::String(self.email.clone())),
            ("password", Value::String(self.password.clone())),
            ("confirmPassword", Value::String(self.confirm_password.clone())),
            ("contact", Value::String(self.contact.clone())),
        ]))
    }
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            email: param_str(params, "email"),
            password: param_str(params, "password"),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password);

        errors.into_result(json_body(vec![
            ("email", Value::String(self.email.clone())),
            ("password", Value::String(self.password.clone())),
        ]))
    }
}

#[derive(Debug, Clone)]
pub struct OtpForm {
    pub email: String,
    pub otp: String,
}

impl OtpForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            email: param_str(params, "email"),
            otp: param_str(params, "otp"),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();
        require_email(&mut errors, "email", &self.email);
        if self.otp.is_empty() {
            errors.push("otp", "is required");
        } else if !self.otp.chars().all(|c| c.is_ascii_digit()) {
            errors.push("otp", "must contain only digits");
        }

        errors.into_result(json_body(vec![
            ("email", Value::String(self.email.clone())),
            ("otp", Value::String(self.otp.clone())),
        ]))
    }
}

#[derive(Debug, Clone)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            email: param_str(params, "email"),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();
        require_email(&mut errors, "email", &self.email);
        errors.into_result(json_body(vec![(
            "email",
            Value::String(self.email.clone()),
        )]))
    }
}

#[derive(Debug, Clone)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            token: param_str(params, "token"),
            password: param_str(params, "password"),
            confirm_password: param_str(params, "confirmPassword"),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "token", &self.token);
        require_password(&mut errors, "password", &self.password);
        if self.confirm_password != self.password {
            errors.push("confirmPassword", "does not match password");
        }

        errors.into_result(json_body(vec![
            ("password", Value::String(self.password.clone())),
            ("confirmPassword", Value::String(self.confirm_password.clone())),
        ]))
    }
}

#[derive(Debug, Clone)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordForm {
    pub fn from_params(params: &Value) -> Self {
        Self {
            old_password: param_str(params, "oldPassword"),
            new_password: param_str(params, "newPassword"),
        }
    }

    pub fn validate(&self) -> Result<ApiBody, ApiError> {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "oldPassword", &self.old_password);
        require_password(&mut errors, "newPassword", &self.new_password);

        errors.into_result(json_body(vec![
            ("oldPassword", Value::String(self.old_password.clone())),
            ("newPassword", Value::String(self.new_password.clone())),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_names(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation(errors) => errors.0.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn register_rejects_short_password_and_mismatch() {
        let form = RegisterForm::from_params(&json!({
            "firstName": "Ama",
            "lastName": "Mensah",
            "email": "ama@lms.test",
            "password": "short",
            "confirmPassword": "different",
            "contact": "0244000000"
        }));
        let fields = field_names(form.validate().expect_err("should fail"));
        assert!(fields.contains(&"password".to_string()));
        assert!(fields.contains(&"confirmPassword".to_string()));
    }

    #[test]
    fn register_valid_draft_builds_json_payload() {
        let form = RegisterForm::from_params(&json!({
            "firstName": "Ama",
            "lastName": "Mensah",
            "email": "ama@lms.test",
            "password": "longenough",
            "confirmPassword": "longenough",
            "contact": "0244000000"
        }));
        match form.validate().expect("valid") {
            ApiBody::Json(payload) => {
                assert_eq!(payload["email"], "ama@lms.test");
                assert_eq!(payload["confirmPassword"], "longenough");
            }
            other => panic!("expected json body, got {other:?}"),
        }
    }

    #[test]
    fn login_rejects_malformed_email() {
        let form = LoginForm::from_params(&json!({ "email": "not-an-email", "password": "x" }));
        let fields = field_names(form.validate().expect_err("should fail"));
        assert_eq!(fields, vec!["email".to_string()]);
    }

    #[test]
    fn invoice_create_drops_empty_optionals() {
        let form = InvoiceCreateForm::from_params(&json!({
            "learner": "L1",
            "paystackCallbackUrl": "https://console.lms.test/pay",
            "paymentDetails": ""
        }));
        match form.validate().expect("valid") {
            ApiBody::Json(payload) => {
                let obj = payload.as_object().expect("object");
                assert_eq!(obj.len(), 2);
                assert!(obj.contains_key("learner"));
                assert!(obj.contains_key("paystackCallbackUrl"));
            }
            other => panic!("expected json body, got {other:?}"),
        }
    }

    #[test]
    fn invoice_rejects_negative_amount_and_bad_date() {
        let form = InvoiceUpdateForm::from_params(&json!({
            "amount": -5,
            "dueDate": "31/01/2026"
        }));
        let fields = field_names(form.validate().expect_err("should fail"));
        assert!(fields.contains(&"amount".to_string()));
        assert!(fields.contains(&"dueDate".to_string()));
    }

    #[test]
    fn invoice_update_rejects_unknown_status() {
        let form = InvoiceUpdateForm::from_params(&json!({ "status": "archived" }));
        let fields = field_names(form.validate().expect_err("should fail"));
        assert_eq!(fields, vec!["status".to_string()]);
    }

    #[test]
    fn track_multipart_uses_backend_field_names() {
        let form = TrackForm::from_params(&json!({
            "title": "Cloud Computing",
            "description": "All the clouds",
            "price": "350",
            "duration": "12 weeks",
            "instructor": "Kofi",
            "technologies": "Azure, AWS, Docker"
        }));
        match form.validate().expect("valid") {
            ApiBody::Multipart { fields, file } => {
                assert!(fields.contains(&("name".to_string(), "Cloud Computing".to_string())));
                assert!(fields.contains(&("price".to_string(), "350".to_string())));
                assert!(fields
                    .contains(&("technologies".to_string(), "Azure, AWS, Docker".to_string())));
                assert!(file.is_none());
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[test]
    fn course_rejects_missing_required_fields_and_bad_status() {
        let form = CourseForm::from_params(&json!({ "title": "ReactJS", "status": "retired" }));
        let fields = field_names(form.validate().expect_err("should fail"));
        assert!(fields.contains(&"author".to_string()));
        assert!(fields.contains(&"track".to_string()));
        assert!(fields.contains(&"description".to_string()));
        assert!(fields.contains(&"status".to_string()));
    }

    #[test]
    fn learner_update_with_nothing_to_send_is_rejected() {
        let form = LearnerUpdateForm::from_params(&json!({}));
        let fields = field_names(form.validate().expect_err("should fail"));
        assert_eq!(fields, vec!["form".to_string()]);
    }

    #[test]
    fn learner_update_collects_present_fields_only() {
        let form = LearnerUpdateForm::from_params(&json!({
            "firstName": "Ama",
            "disabled": true,
            "contact": ""
        }));
        match form.validate().expect("valid") {
            ApiBody::Multipart { fields, .. } => {
                assert!(fields.contains(&("firstName".to_string(), "Ama".to_string())));
                assert!(fields.contains(&("disabled".to_string(), "true".to_string())));
                assert!(!fields.iter().any(|(k, _)| k == "contact"));
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }
}
