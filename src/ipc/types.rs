use std::path::PathBuf;
use std::rc::Rc;

use rusqlite::Connection;
use serde::Deserialize;

use crate::config::Config;
use crate::controller::ListController;
use crate::gateway::HttpGateway;
use crate::model::{Course, Invoice, Learner, Track};
use crate::session::SessionContext;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub session: Rc<SessionContext>,
    pub gateway: HttpGateway,
    pub courses: ListController<Course>,
    pub tracks: ListController<Track>,
    pub learners: ListController<Learner>,
    pub invoices: ListController<Invoice>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let session = Rc::new(SessionContext::default());
        let gateway = HttpGateway::new(config, Rc::clone(&session))?;
        Ok(Self {
            workspace: None,
            db: None,
            session,
            gateway,
            courses: ListController::new(),
            tracks: ListController::new(),
            learners: ListController::new(),
            invoices: ListController::new(),
        })
    }
}
