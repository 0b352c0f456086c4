use std::cell::RefCell;

use serde::{Deserialize, Serialize};

/// The authenticated user as the backend reports it at login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

/// Explicit session holder shared between the app state and the gateway.
/// Login begins a session, logout ends it; nothing else touches the token.
#[derive(Debug, Default)]
pub struct SessionContext {
    inner: RefCell<Option<Session>>,
}

impl SessionContext {
    pub fn begin(&self, session: Session) {
        *self.inner.borrow_mut() = Some(session);
    }

    pub fn end(&self) {
        *self.inner.borrow_mut() = None;
    }

    pub fn token(&self) -> Option<String> {
        self.inner.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().is_some()
    }
}
