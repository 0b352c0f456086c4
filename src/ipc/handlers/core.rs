use std::path::PathBuf;

use serde_json::json;
use tracing::info;

use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

fn handle_ping(req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "pong": true }))
}

/// Open (or create) the workspace database and restore any persisted auth
/// session into the session context.
fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(path) = req.params.get("path").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing path", None);
    };

    let workspace = PathBuf::from(path);
    let conn = match db::open_db(&workspace) {
        Ok(c) => c,
        Err(e) => return err(&req.id, "db_open_failed", e.to_string(), None),
    };

    let restored = match db::load_session(&conn) {
        Ok(Some(session)) => {
            info!("restored persisted session for {}", session.user.email);
            state.session.begin(session);
            true
        }
        Ok(None) => {
            state.session.end();
            false
        }
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    state.workspace = Some(workspace);
    state.db = Some(conn);

    ok(&req.id, json!({ "sessionRestored": restored }))
}

fn handle_session(state: &AppState, req: &Request) -> serde_json::Value {
    match state.session.current() {
        Some(session) => ok(
            &req.id,
            json!({ "authenticated": true, "user": session.user }),
        ),
        None => ok(&req.id, json!({ "authenticated": false })),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "core.ping" => Some(handle_ping(req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "core.session" => Some(handle_session(state, req)),
        _ => None,
    }
}
