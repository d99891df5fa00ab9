use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{SubmoduleSpec, Turn};

use super::state::DialogueState;

/// A live conversation. Flushed to a chat log file on reaching `End`; the
/// serialized form is exactly the record the offline analyzer reads back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub state: DialogueState,
    #[serde(default)]
    pub main_module_name: String,
    #[serde(default)]
    pub submodules: Vec<SubmoduleSpec>,
    #[serde(default)]
    pub submodule_index: usize,
    #[serde(default)]
    pub turns: Vec<Turn>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            ended_at: None,
            state: DialogueState::Start,
            main_module_name: String::new(),
            submodules: Vec::new(),
            submodule_index: 0,
            turns: Vec::new(),
        }
    }

    /// Write this session as `chatlog-<id>.json` under `dir`.
    pub fn write_log(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("chatlog-{}.json", self.session_id));
        let json = serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write chat log: {:?}", path))?;
        Ok(path)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown session id: {0}")]
    Unknown(String),
}

/// Keyed store for live sessions.
///
/// Dialogue logic only sees this interface, so the in-memory map can be
/// swapped for a persistent backend without touching the script. Sessions
/// are snapshots: callers `get` a copy, mutate it, and `update` it back.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: Session);
    fn get(&self, id: &str) -> Option<Session>;
    fn update(&self, session: Session) -> Result<(), SessionError>;
    fn remove(&self, id: &str) -> Option<Session>;
}

/// Process-local session store backing the single-node service.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().expect("session store mutex poisoned")
    }
}

impl SessionStore for MemorySessionStore {
    fn insert(&self, session: Session) {
        self.lock().insert(session.session_id.clone(), session);
    }

    fn get(&self, id: &str) -> Option<Session> {
        self.lock().get(id).cloned()
    }

    fn update(&self, session: Session) -> Result<(), SessionError> {
        let mut sessions = self.lock();
        if !sessions.contains_key(&session.session_id) {
            return Err(SessionError::Unknown(session.session_id));
        }
        sessions.insert(session.session_id.clone(), session);
        Ok(())
    }

    fn remove(&self, id: &str) -> Option<Session> {
        self.lock().remove(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::io::parse_chatlog_file;

    use super::*;

    #[test]
    fn test_store_lifecycle() {
        let store = MemorySessionStore::new();
        let session = Session::new();
        let id = session.session_id.clone();

        store.insert(session);
        assert!(store.get(&id).is_some());

        let mut snapshot = store.get(&id).unwrap();
        snapshot.turns.push(Turn::robot("สวัสดีครับ"));
        store.update(snapshot).unwrap();
        assert_eq!(store.get(&id).unwrap().turns.len(), 1);

        assert!(store.remove(&id).is_some());
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_update_unknown_session() {
        let store = MemorySessionStore::new();
        let err = store.update(Session::new()).unwrap_err();
        assert!(matches!(err, SessionError::Unknown(_)));
    }

    #[test]
    fn test_write_log_roundtrips_into_analyzer_input() {
        let dir = tempfile::tempdir().unwrap();

        let mut session = Session::new();
        session.main_module_name = "ความโปร่งใส".to_string();
        session.submodules = vec![SubmoduleSpec {
            name: "การเปิดเผยข้อมูล".to_string(),
            questions: vec!["คุณรู้สึกว่าโรงพยาบาลทำงานโปร่งใสพอหรือไม่".to_string()],
        }];
        session.turns.push(Turn::robot("คุณรู้สึกว่าโรงพยาบาลทำงานโปร่งใสพอหรือไม่"));
        session.turns.push(Turn::patient("ใสแจ๋ว"));
        session.state = DialogueState::End;
        session.ended_at = Some(Utc::now());

        let path = session.write_log(dir.path()).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("chatlog-"));

        let log = parse_chatlog_file(&path).unwrap();
        assert_eq!(log.main_module_name, "ความโปร่งใส");
        assert_eq!(log.turns.len(), 2);
        assert_eq!(log.turns[1].text_raw.as_deref(), Some("ใสแจ๋ว"));
    }
}
