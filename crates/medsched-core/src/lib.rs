//! Medsched Core Library
//!
//! Core of a role-based medical-appointment scheduling application:
//! patients book doctors, doctors confirm or complete, administrators
//! manage accounts. Persistence is a mock store over serialized record
//! collections, the session is a JSON cookie, and every navigation runs
//! through a single access-control decision.
//!
//! # Architecture
//!
//! ```text
//! UI actions (login, register, book, cancel)
//!                     │
//!          ┌──────────▼──────────┐
//!          │     auth flows      │  validate → duplicate check → create
//!          └──────────┬──────────┘
//!                     │
//!          ┌──────────▼──────────┐
//!          │        Store        │  users / schedules CRUD
//!          └─┬────────┬────────┬─┘
//!            │        │        │
//!            ▼        ▼        ▼
//!      StorageBackend SessionStore EventBus
//!      (JSON blobs)   (cookie)     (schedule-created,
//!                                   schedule-updated,
//!                                   session-user-updated)
//!
//! every navigation ──► gate::authorize(session, path)
//!                       → Allow | RedirectLogin | RedirectRoleHome
//! ```
//!
//! # Core Principle
//!
//! **Failures the caller expects are sentinels, not errors.** Lookups
//! that miss return `Ok(None)` / `Ok(false)`, and corrupt serialized
//! state (cookie or collection blob) downgrades to absence instead of
//! propagating.
//!
//! # Modules
//!
//! - [`models`]: Domain types (User, Role, Schedule, ComplementInfo)
//! - [`storage`]: Injected blob storage backends (memory, SQLite)
//! - [`store`]: Persistence store with CRUD, session pointer, events
//! - [`session`]: Session cookie resolver, the one cookie codec
//! - [`gate`]: Route authorization decision
//! - [`auth`]: Registration, login, and logout flows

pub mod auth;
pub mod gate;
pub mod models;
pub mod session;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use gate::{authorize, RouteDecision};
pub use models::{
    ComplementInfo, ComplementPatch, NewSchedule, NewUser, Role, Schedule, ScheduleStatus, User,
};
pub use session::{CookieJar, MemoryJar, SessionConfig, SessionStore};
pub use storage::{MemoryBackend, SqliteBackend, StorageBackend};
pub use store::{Store, StoreError, StoreEvent, StoreResult, SubscriptionId};
