use super::resources;
use crate::forms::TrackForm;
use crate::ipc::error::api_err;
use crate::ipc::types::{AppState, Request};

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let body = match TrackForm::from_params(&req.params).validate() {
        Ok(body) => body,
        Err(e) => return api_err(&req.id, &e),
    };
    resources::handle_create(&mut state.tracks, &state.gateway, req, body)
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match resources::entity_id(req) {
        Ok(id) => id.to_string(),
        Err(resp) => return resp,
    };
    let body = match TrackForm::from_params(&req.params).validate() {
        Ok(body) => body,
        Err(e) => return api_err(&req.id, &e),
    };
    resources::handle_update(&mut state.tracks, &state.gateway, req, &id, body)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "tracks.load" => Some(resources::handle_load(
            &mut state.tracks,
            &state.gateway,
            req,
        )),
        "tracks.list" => Some(resources::handle_list(&state.tracks, req)),
        "tracks.search" => Some(resources::handle_search(&mut state.tracks, req)),
        "tracks.setPage" => Some(resources::handle_set_page(&mut state.tracks, req)),
        "tracks.create" => Some(handle_create(state, req)),
        "tracks.update" => Some(handle_update(state, req)),
        "tracks.delete" => Some(resources::handle_delete(
            &mut state.tracks,
            &state.gateway,
            req,
        )),
        _ => None,
    }
}
