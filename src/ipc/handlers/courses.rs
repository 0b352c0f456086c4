use super::resources;
use crate::forms::CourseForm;
use crate::ipc::error::api_err;
use crate::ipc::types::{AppState, Request};

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let body = match CourseForm::from_params(&req.params).validate() {
        Ok(body) => body,
        Err(e) => return api_err(&req.id, &e),
    };
    resources::handle_create(&mut state.courses, &state.gateway, req, body)
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match resources::entity_id(req) {
        Ok(id) => id.to_string(),
        Err(resp) => return resp,
    };
    let body = match CourseForm::from_params(&req.params).validate() {
        Ok(body) => body,
        Err(e) => return api_err(&req.id, &e),
    };
    resources::handle_update(&mut state.courses, &state.gateway, req, &id, body)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.load" => Some(resources::handle_load(
            &mut state.courses,
            &state.gateway,
            req,
        )),
        "courses.list" => Some(resources::handle_list(&state.courses, req)),
        "courses.search" => Some(resources::handle_search(&mut state.courses, req)),
        "courses.setPage" => Some(resources::handle_set_page(&mut state.courses, req)),
        "courses.create" => Some(handle_create(state, req)),
        "courses.update" => Some(handle_update(state, req)),
        "courses.delete" => Some(resources::handle_delete(
            &mut state.courses,
            &state.gateway,
            req,
        )),
        _ => None,
    }
}
