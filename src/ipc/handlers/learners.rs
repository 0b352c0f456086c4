use super::resources;
use crate::forms::LearnerUpdateForm;
use crate::ipc::error::api_err;
use crate::ipc::types::{AppState, Request};

// No learners.create: registration is the only way learners come into
// existence, so the dashboard wires load/update/delete only.

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match resources::entity_id(req) {
        Ok(id) => id.to_string(),
        Err(resp) => return resp,
    };
    let body = match LearnerUpdateForm::from_params(&req.params).validate() {
        Ok(body) => body,
        Err(e) => return api_err(&req.id, &e),
    };
    resources::handle_update(&mut state.learners, &state.gateway, req, &id, body)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "learners.load" => Some(resources::handle_load(
            &mut state.learners,
            &state.gateway,
            req,
        )),
        "learners.list" => Some(resources::handle_list(&state.learners, req)),
        "learners.search" => Some(resources::handle_search(&mut state.learners, req)),
        "learners.setPage" => Some(resources::handle_set_page(&mut state.learners, req)),
        "learners.update" => Some(handle_update(state, req)),
        "learners.delete" => Some(resources::handle_delete(
            &mut state.learners,
            &state.gateway,
            req,
        )),
        _ => None,
    }
}
