//! One `ListController` instance owns the canonical in-memory collection for
//! a single entity kind for the lifetime of a page view. Filtering and
//! pagination are derived views recomputed on demand from that collection.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::config::PAGE_SIZE;
use crate::error::ApiError;
use crate::gateway::{ApiBody, Backend, Method};
use crate::normalize;

/// What the controller needs to know about an entity kind: its REST path,
/// the envelope keys its collections and single items hide behind, how to
/// normalize a raw payload, and which fields search matches against.
pub trait Resource: Clone + Serialize {
    const PATH: &'static str;
    const COLLECTION_KEYS: &'static [&'static str];
    const ITEM_KEY: &'static str;

    fn normalize(raw: &Value) -> Self;
    fn id(&self) -> Option<&str>;
    fn search_text(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Mutating,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Loaded => "loaded",
            Phase::Mutating => "mutating",
            Phase::Failed => "failed",
        }
    }
}

/// A collection element with a stable list key: the entity id when
/// persisted, else a local uuid (an absent id must never key a list row).
#[derive(Debug, Clone)]
pub struct Row<R> {
    pub key: String,
    pub item: R,
}

pub struct ListController<R: Resource> {
    rows: Vec<Row<R>>,
    phase: Phase,
    search: String,
    page: usize,
    loaded_once: bool,
    load_in_flight: bool,
}

impl<R: Resource> Default for ListController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ListController<R> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            phase: Phase::Idle,
            search: String::new(),
            page: 1,
            loaded_once: false,
            load_in_flight: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row<R>] {
        &self.rows
    }

    fn key_for(item: &R) -> String {
        match item.id() {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        }
    }

    /// Fetch the whole collection and replace the in-memory one. A failure
    /// on first load leaves an empty, failed view; a later failure keeps
    /// the previous collection intact. Overlapping calls are ignored while
    /// one is in flight.
    pub fn load(&mut self, backend: &dyn Backend) -> Result<usize, ApiError> {
        if self.load_in_flight {
            return Ok(self.rows.len());
        }
        self.load_in_flight = true;
        self.phase = Phase::Loading;

        let result = backend.send(Method::Get, R::PATH, ApiBody::Empty);
        self.load_in_flight = false;

        match result {
            Ok(payload) => {
                self.rows = normalize::collection(&payload, R::COLLECTION_KEYS, R::ITEM_KEY)
                    .iter()
                    .map(|raw| {
                        let item = R::normalize(raw);
                        Row {
                            key: Self::key_for(&item),
                            item,
                        }
                    })
                    .collect();
                self.loaded_once = true;
                self.page = 1;
                self.phase = Phase::Loaded;
                Ok(self.rows.len())
            }
            Err(e) => {
                self.phase = if self.loaded_once {
                    Phase::Loaded
                } else {
                    Phase::Failed
                };
                Err(e)
            }
        }
    }

    /// Submit a create and prepend the normalized result. The collection is
    /// untouched on failure.
    pub fn create(&mut self, backend: &dyn Backend, body: ApiBody) -> Result<R, ApiError> {
        let before = self.phase;
        self.phase = Phase::Mutating;
        match backend.send(Method::Post, R::PATH, body) {
            Ok(payload) => {
                let item = R::normalize(&payload);
                self.rows.insert(
                    0,
                    Row {
                        key: Self::key_for(&item),
                        item: item.clone(),
                    },
                );
                self.phase = Phase::Loaded;
                Ok(item)
            }
            Err(e) => {
                self.phase = before;
                Err(e)
            }
        }
    }

    /// Submit an update and replace the matching element in place,
    /// preserving its position. An id no longer present locally is a
    /// silent view no-op (already-removed case).
    pub fn update(&mut self, backend: &dyn Backend, id: &str, body: ApiBody) -> Result<R, ApiError> {
        let before = self.phase;
        self.phase = Phase::Mutating;
        match backend.send(Method::Put, &format!("{}/{}", R::PATH, id), body) {
            Ok(payload) => {
                let item = R::normalize(&payload);
                if let Some(row) = self.rows.iter_mut().find(|r| r.item.id() == Some(id)) {
                    row.item = item.clone();
                }
                self.phase = Phase::Loaded;
                Ok(item)
            }
            Err(e) => {
                self.phase = before;
                Err(e)
            }
        }
    }

    /// Submit a delete and drop the matching element. Repeated deletes of
    /// the same id surface the server's not-found error; the collection is
    /// unchanged on failure.
    pub fn delete(&mut self, backend: &dyn Backend, id: &str) -> Result<(), ApiError> {
        let before = self.phase;
        self.phase = Phase::Mutating;
        match backend.send(Method::Delete, &format!("{}/{}", R::PATH, id), ApiBody::Empty) {
            Ok(_) => {
                self.rows.retain(|r| r.item.id() != Some(id));
                self.phase = Phase::Loaded;
                Ok(())
            }
            Err(e) => {
                self.phase = before;
                Err(e)
            }
        }
    }

    /// Filtering changes the derived collection's identity, so the page
    /// resets to 1.
    pub fn set_search_term(&mut self, term: &str) {
        self.search = term.to_string();
        self.page = 1;
    }

    pub fn set_page(&mut self, n: i64) {
        let total = self.total_pages() as i64;
        self.page = n.clamp(1, total) as usize;
    }

    pub fn page(&self) -> usize {
        self.page.min(self.total_pages())
    }

    /// Case-insensitive substring match over the kind's searchable fields.
    pub fn filtered(&self) -> Vec<&Row<R>> {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|r| {
                r.item
                    .search_text()
                    .iter()
                    .any(|f| f.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        let filtered = self.filtered().len();
        std::cmp::max(1, filtered.div_ceil(PAGE_SIZE))
    }

    /// The slice of the filtered view for the current page. An empty
    /// result is a defined "no results" state, not an error.
    pub fn visible(&self) -> Vec<&Row<R>> {
        let filtered = self.filtered();
        let page = self.page.min(std::cmp::max(1, filtered.len().div_ceil(PAGE_SIZE)));
        let start = (page - 1) * PAGE_SIZE;
        filtered.into_iter().skip(start).take(PAGE_SIZE).collect()
    }
}
