//! Persistence store for users, schedules, and the session pointer.
//!
//! The store is the sole authority over the serialized record
//! collections. It owns an injected [`StorageBackend`] for the
//! collections, the [`SessionStore`] for the cookie-held session
//! pointer, and the [`EventBus`] it broadcasts changes on. Construct it
//! once and pass it by reference to whatever layer needs it.

mod events;
mod schedules;
mod users;

pub use events::{EventBus, StoreEvent, SubscriptionId};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Role, Schedule, User};
use crate::session::SessionStore;
use crate::storage::{StorageBackend, StorageError};

pub(crate) const USERS_KEY: &str = "medsched.users";
pub(crate) const SCHEDULES_KEY: &str = "medsched.schedules";

/// Store errors.
///
/// Lookups that miss are not errors; they return `Ok(None)` or
/// `Ok(false)` and the caller branches on the sentinel.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schedule end must be after its start")]
    EndNotAfterStart,

    #[error("doctor already has a schedule from {start} to {end}")]
    OverlappingSchedule {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The mock persistence store.
pub struct Store {
    backend: Box<dyn StorageBackend>,
    sessions: SessionStore,
    events: EventBus,
}

impl Store {
    /// Create a store over the given collection backend and session resolver.
    pub fn new(backend: Box<dyn StorageBackend>, sessions: SessionStore) -> Self {
        Self {
            backend,
            sessions,
            events: EventBus::new(),
        }
    }

    /// Seed baseline records if the store is empty.
    ///
    /// The first call against a fresh backend writes a default
    /// administrator account and empty collections; every later call is
    /// a no-op.
    pub fn initialize(&mut self) -> StoreResult<()> {
        if self.backend.get(USERS_KEY)?.is_some() {
            return Ok(());
        }

        debug!("seeding default records into empty store");
        let admin = User::new("Administrator", "admin@medsched.dev", "admin", Role::Administrator);
        self.save_users(&[admin])?;
        if self.backend.get(SCHEDULES_KEY)?.is_none() {
            self.save_schedules(&[])?;
        }
        Ok(())
    }

    // =========================================================================
    // Session pointer
    // =========================================================================

    /// The currently authenticated user, if any.
    pub fn current_session(&self) -> Option<User> {
        self.sessions.current()
    }

    /// Point the session at the given user.
    pub fn set_current_session(&mut self, user: &User) {
        self.sessions.set(user);
    }

    /// Clear the session pointer.
    pub fn clear_current_session(&mut self) {
        self.sessions.clear();
    }

    // =========================================================================
    // Change notifications
    // =========================================================================

    /// Register a listener for store events.
    pub fn subscribe(&mut self, callback: Box<dyn Fn(&StoreEvent)>) -> SubscriptionId {
        self.events.subscribe(callback)
    }

    /// Remove a previously registered listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // =========================================================================
    // Collection blobs
    // =========================================================================

    pub(crate) fn load_users(&self) -> StoreResult<Vec<User>> {
        self.load_collection(USERS_KEY)
    }

    pub(crate) fn save_users(&mut self, users: &[User]) -> StoreResult<()> {
        self.save_collection(USERS_KEY, users)
    }

    pub(crate) fn load_schedules(&self) -> StoreResult<Vec<Schedule>> {
        self.load_collection(SCHEDULES_KEY)
    }

    pub(crate) fn save_schedules(&mut self, schedules: &[Schedule]) -> StoreResult<()> {
        self.save_collection(SCHEDULES_KEY, schedules)
    }

    /// Read a whole collection. An unparsable blob downgrades to an
    /// empty collection, same policy as a corrupt session cookie.
    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(key, %err, "discarding unparsable collection blob");
                Ok(Vec::new())
            }
        }
    }

    fn save_collection<T: Serialize>(&mut self, key: &str, records: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(records)?;
        self.backend.set(key, &raw)?;
        Ok(())
    }
}
