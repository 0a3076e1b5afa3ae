//! Shared application state and the per-browser session registry.

use chrono::{Local, NaiveDate};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    models::credential::CredentialStore,
    services::{
        record_store::{MemoryStore, RecordStore, SqliteStore},
        session_service::SessionState,
    },
};

/// Storage backend chosen at startup.
#[derive(Debug, Clone)]
pub enum Storage {
    /// Each session gets its own empty in-memory store
    Ephemeral,
    /// All sessions share the SQLite store
    Durable(SqliteStore),
}

/// One session: its UI state plus the record store it talks to.
#[derive(Debug)]
pub struct Session {
    pub state: SessionState,
    pub store: RecordStore,
}

/// Handle to a session. The mutex makes one request per session run at a time.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Sessions keyed by the id stored in the `sid` cookie.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    pub fn insert(&self, id: Uuid, handle: SessionHandle) {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, handle);
    }

    pub fn remove(&self, id: &Uuid) {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(id);
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub storage: Storage,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(credentials: CredentialStore, storage: Storage) -> Self {
        Self {
            credentials: Arc::new(credentials),
            storage,
            sessions: SessionRegistry::default(),
        }
    }

    /// Fresh, unauthenticated session bound to the configured storage.
    ///
    /// The session is not registered; the caller decides whether to keep it.
    pub fn new_session(&self) -> SessionHandle {
        let store = match &self.storage {
            Storage::Ephemeral => RecordStore::Ephemeral(MemoryStore::default()),
            Storage::Durable(store) => RecordStore::Durable(store.clone()),
        };

        Arc::new(Mutex::new(Session {
            state: SessionState::new(today()),
            store,
        }))
    }
}

/// Current local date, used as the form's default date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
