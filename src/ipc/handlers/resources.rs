//! Shared handler plumbing for the four entity dashboards. Every method
//! that changes the collection answers with the refreshed derived view so
//! the UI can re-render from one response.

use serde_json::json;

use crate::controller::{ListController, Resource};
use crate::gateway::{ApiBody, Backend};
use crate::ipc::error::{api_err, err, ok};
use crate::ipc::types::Request;

pub fn view<R: Resource>(ctl: &ListController<R>) -> serde_json::Value {
    let items: Vec<serde_json::Value> = ctl
        .visible()
        .iter()
        .map(|row| json!({ "key": row.key, "item": row.item }))
        .collect();
    json!({
        "items": items,
        "total": ctl.len(),
        "filtered": ctl.filtered().len(),
        "page": ctl.page(),
        "totalPages": ctl.total_pages(),
        "state": ctl.phase().as_str(),
        "searchTerm": ctl.search_term(),
    })
}

pub fn handle_load<R: Resource>(
    ctl: &mut ListController<R>,
    backend: &dyn Backend,
    req: &Request,
) -> serde_json::Value {
    match ctl.load(backend) {
        Ok(count) => ok(&req.id, json!({ "count": count, "view": view(ctl) })),
        Err(e) => api_err(&req.id, &e),
    }
}

pub fn handle_list<R: Resource>(ctl: &ListController<R>, req: &Request) -> serde_json::Value {
    ok(&req.id, view(ctl))
}

pub fn handle_search<R: Resource>(
    ctl: &mut ListController<R>,
    req: &Request,
) -> serde_json::Value {
    let Some(term) = req.params.get("term").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing term", None);
    };
    ctl.set_search_term(term);
    ok(&req.id, view(ctl))
}

pub fn handle_set_page<R: Resource>(
    ctl: &mut ListController<R>,
    req: &Request,
) -> serde_json::Value {
    let Some(page) = req.params.get("page").and_then(|v| v.as_i64()) else {
        return err(&req.id, "bad_params", "missing page", None);
    };
    ctl.set_page(page);
    ok(&req.id, view(ctl))
}

pub fn handle_create<R: Resource>(
    ctl: &mut ListController<R>,
    backend: &dyn Backend,
    req: &Request,
    body: ApiBody,
) -> serde_json::Value {
    match ctl.create(backend, body) {
        Ok(item) => ok(
            &req.id,
            json!({ "item": serde_json::to_value(&item).unwrap_or_default(), "view": view(ctl) }),
        ),
        Err(e) => api_err(&req.id, &e),
    }
}

pub fn handle_update<R: Resource>(
    ctl: &mut ListController<R>,
    backend: &dyn Backend,
    req: &Request,
    id: &str,
    body: ApiBody,
) -> serde_json::Value {
    match ctl.update(backend, id, body) {
        Ok(item) => ok(
            &req.id,
            json!({ "item": serde_json::to_value(&item).unwrap_or_default(), "view": view(ctl) }),
        ),
        Err(e) => api_err(&req.id, &e),
    }
}

pub fn handle_delete<R: Resource>(
    ctl: &mut ListController<R>,
    backend: &dyn Backend,
    req: &Request,
) -> serde_json::Value {
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing id", None);
    };
    match ctl.delete(backend, id) {
        Ok(()) => ok(&req.id, json!({ "deleted": id, "view": view(ctl) })),
        Err(e) => api_err(&req.id, &e),
    }
}

/// Pull the target id for an update out of the params.
pub fn entity_id(req: &Request) -> Result<&str, serde_json::Value> {
    req.params
        .get("id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", "missing id", None))
}
