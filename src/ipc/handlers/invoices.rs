use super::resources;
use crate::forms::{InvoiceCreateForm, InvoiceUpdateForm};
use crate::ipc::error::api_err;
use crate::ipc::types::{AppState, Request};

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let body = match InvoiceCreateForm::from_params(&req.params).validate() {
        Ok(body) => body,
        Err(e) => return api_err(&req.id, &e),
    };
    resources::handle_create(&mut state.invoices, &state.gateway, req, body)
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match resources::entity_id(req) {
        Ok(id) => id.to_string(),
        Err(resp) => return resp,
    };
    let body = match InvoiceUpdateForm::from_params(&req.params).validate() {
        Ok(body) => body,
        Err(e) => return api_err(&req.id, &e),
    };
    resources::handle_update(&mut state.invoices, &state.gateway, req, &id, body)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "invoices.load" => Some(resources::handle_load(
            &mut state.invoices,
            &state.gateway,
            req,
        )),
        "invoices.list" => Some(resources::handle_list(&state.invoices, req)),
        "invoices.search" => Some(resources::handle_search(&mut state.invoices, req)),
        "invoices.setPage" => Some(resources::handle_set_page(&mut state.invoices, req)),
        "invoices.create" => Some(handle_create(state, req)),
        "invoices.update" => Some(handle_update(state, req)),
        "invoices.delete" => Some(resources::handle_delete(
            &mut state.invoices,
            &state.gateway,
            req,
        )),
        _ => None,
    }
}
