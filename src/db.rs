use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::session::{AuthUser, Session};

/// The workspace database replaces the browser's local storage: it keeps the
/// auth session (token + serialized user) across daemon restarts.
pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("console.sqlite3");
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS session(
            id INTEGER PRIMARY KEY CHECK(id = 1),
            token TEXT NOT NULL,
            user_json TEXT NOT NULL,
            saved_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(conn)
}

pub fn save_session(conn: &Connection, session: &Session) -> anyhow::Result<()> {
    let user_json = serde_json::to_string(&session.user)?;
    conn.execute(
        "INSERT INTO session(id, token, user_json, saved_at) VALUES(1, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET token = excluded.token,
                                       user_json = excluded.user_json,
                                       saved_at = excluded.saved_at",
        (&session.token, &user_json, Utc::now().to_rfc3339()),
    )?;
    Ok(())
}

pub fn load_session(conn: &Connection) -> anyhow::Result<Option<Session>> {
    let row: Option<(String, String)> = conn
        .query_row("SELECT token, user_json FROM session WHERE id = 1", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .optional()?;

    let Some((token, user_json)) = row else {
        return Ok(None);
    };

    // A hand-edited or stale user blob should not brick the workspace.
    let user: AuthUser = serde_json::from_str(&user_json).unwrap_or_default();

    Ok(Some(Session { token, user }))
}

pub fn clear_session(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("DELETE FROM session WHERE id = 1", [])?;
    Ok(())
}
