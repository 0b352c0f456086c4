use serde_json::{json, Value};
use tracing::warn;

use crate::db;
use crate::forms::{
    ChangePasswordForm, ForgotPasswordForm, LoginForm, OtpForm, RegisterForm, ResetPasswordForm,
};
use crate::gateway::{ApiBody, Backend, Method};
use crate::ipc::error::{api_err, err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session::{AuthUser, Session};

/// Send a validated auth payload and pass the backend envelope through as
/// the result.
fn forward(state: &AppState, req: &Request, path: &str, body: ApiBody) -> serde_json::Value {
    match state.gateway.send(Method::Post, path, body) {
        Ok(payload) => ok(&req.id, payload),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let body = match LoginForm::from_params(&req.params).validate() {
        Ok(body) => body,
        Err(e) => return api_err(&req.id, &e),
    };

    let payload = match state.gateway.send(Method::Post, "/auth/login", body) {
        Ok(payload) => payload,
        Err(e) => return api_err(&req.id, &e),
    };

    // Token and user live under `data` or at the top level depending on the
    // backend version.
    let data = match payload.get("data") {
        Some(d) if d.is_object() => d,
        _ => &payload,
    };
    let token = data
        .get("token")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    if token.is_empty() {
        return err(&req.id, "bad_response", "login response missing token", None);
    }
    let user: AuthUser = data
        .get("user")
        .cloned()
        .and_then(|u| serde_json::from_value(u).ok())
        .unwrap_or_default();

    let session = Session { token, user };
    if let Some(conn) = state.db.as_ref() {
        if let Err(e) = db::save_session(conn, &session) {
            warn!("failed to persist session: {e}");
        }
    }
    let user = session.user.clone();
    state.session.begin(session);

    ok(
        &req.id,
        json!({
            "user": user,
            "message": payload.get("message").and_then(Value::as_str).unwrap_or("login successful"),
        }),
    )
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    let result = state
        .gateway
        .send(Method::Post, "/auth/logout", ApiBody::Empty);

    // The local session ends whether or not the backend call succeeded.
    state.session.end();
    if let Some(conn) = state.db.as_ref() {
        if let Err(e) = db::clear_session(conn) {
            warn!("failed to clear persisted session: {e}");
        }
    }

    match result {
        Ok(_) => ok(&req.id, json!({ "loggedOut": true })),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_signup(state: &AppState, req: &Request, path: &str) -> serde_json::Value {
    match RegisterForm::from_params(&req.params).validate() {
        Ok(body) => forward(state, req, path, body),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_verify_email(state: &AppState, req: &Request) -> serde_json::Value {
    match OtpForm::from_params(&req.params).validate() {
        Ok(body) => forward(state, req, "/auth/verify-email", body),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_forgot_password(state: &AppState, req: &Request) -> serde_json::Value {
    match ForgotPasswordForm::from_params(&req.params).validate() {
        Ok(body) => forward(state, req, "/auth/forgot-password", body),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_reset_password(state: &AppState, req: &Request) -> serde_json::Value {
    let form = ResetPasswordForm::from_params(&req.params);
    match form.validate() {
        Ok(body) => forward(
            state,
            req,
            &format!("/auth/reset-password/{}", form.token),
            body,
        ),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_change_password(state: &AppState, req: &Request) -> serde_json::Value {
    match ChangePasswordForm::from_params(&req.params).validate() {
        Ok(body) => forward(state, req, "/auth/change-password", body),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_check(state: &AppState, req: &Request) -> serde_json::Value {
    match state
        .gateway
        .send(Method::Get, "/auth/check-auth", ApiBody::Empty)
    {
        Ok(payload) => ok(&req.id, payload),
        Err(e) => api_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.logout" => Some(handle_logout(state, req)),
        "auth.signupAdmin" => Some(handle_signup(state, req, "/auth/signup/admin")),
        "auth.signupLearner" => Some(handle_signup(state, req, "/auth/signup/learner")),
        "auth.verifyEmail" => Some(handle_verify_email(state, req)),
        "auth.resendToken" => Some(forward(state, req, "/auth/resend-token", ApiBody::Empty)),
        "auth.forgotPassword" => Some(handle_forgot_password(state, req)),
        "auth.resetPassword" => Some(handle_reset_password(state, req)),
        "auth.changePassword" => Some(handle_change_password(state, req)),
        "auth.check" => Some(handle_check(state, req)),
        _ => None,
    }
}
