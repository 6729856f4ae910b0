//! Session pointer, serialized into a cookie.
//!
//! The session is a single JSON-encoded [`User`] held in a cookie so it
//! is visible before any view mounts. This module is the only place that
//! encodes or decodes that cookie; the store and the access gate's
//! callers both resolve sessions through it.

use std::collections::HashMap;

use chrono::Duration;
use tracing::warn;

use crate::models::User;

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cookie name holding the serialized session user.
    pub cookie_name: String,
    /// Cookie lifetime attached at write time. Never re-validated on
    /// read; an expired cookie simply stops being presented by the jar.
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "medsched.session".to_string(),
            ttl: Duration::days(7),
        }
    }
}

/// Cookie storage as seen by the session resolver.
///
/// Implementations map onto whatever cookie mechanism the host has; the
/// resolver only needs named string values with a lifetime hint.
pub trait CookieJar {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str, ttl: Duration);
    fn remove(&mut self, name: &str);
}

/// In-memory jar for tests and the demo shell.
#[derive(Debug, Default)]
pub struct MemoryJar {
    cookies: HashMap<String, String>,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieJar for MemoryJar {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str, _ttl: Duration) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    fn remove(&mut self, name: &str) {
        self.cookies.remove(name);
    }
}

/// Resolver for the current session pointer.
pub struct SessionStore {
    jar: Box<dyn CookieJar>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(jar: Box<dyn CookieJar>, config: SessionConfig) -> Self {
        Self { jar, config }
    }

    /// Read the current session user.
    ///
    /// A missing cookie or one whose payload does not decode to a full
    /// user record (bad JSON, missing role) resolves to `None`. Never
    /// errors; corruption downgrades to "not logged in".
    pub fn current(&self) -> Option<User> {
        let raw = self.jar.get(&self.config.cookie_name)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(cookie = %self.config.cookie_name, %err, "discarding unparsable session cookie");
                None
            }
        }
    }

    /// Point the session at the given user.
    pub fn set(&mut self, user: &User) {
        // User serialization cannot fail: no maps with non-string keys,
        // no non-finite floats.
        let payload = serde_json::to_string(user).expect("session user serializes");
        self.jar.set(&self.config.cookie_name, &payload, self.config.ttl);
    }

    /// Clear the session pointer.
    pub fn clear(&mut self) {
        self.jar.remove(&self.config.cookie_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn session_store() -> SessionStore {
        SessionStore::new(Box::new(MemoryJar::new()), SessionConfig::default())
    }

    #[test]
    fn test_set_then_current() {
        let mut sessions = session_store();
        assert!(sessions.current().is_none());

        let user = User::new("Ana", "ana@example.com", "secret", Role::Doctor);
        sessions.set(&user);

        let resolved = sessions.current().unwrap();
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.role, Role::Doctor);
    }

    #[test]
    fn test_clear_removes_session() {
        let mut sessions = session_store();
        let user = User::new("Ana", "ana@example.com", "secret", Role::Doctor);
        sessions.set(&user);
        sessions.clear();
        assert!(sessions.current().is_none());
    }

    #[test]
    fn test_corrupt_cookie_is_no_session() {
        let mut jar = MemoryJar::new();
        let config = SessionConfig::default();
        jar.set(&config.cookie_name, "{not json", config.ttl);

        let sessions = SessionStore::new(Box::new(jar), config);
        assert!(sessions.current().is_none());
    }

    #[test]
    fn test_roleless_cookie_is_no_session() {
        let mut jar = MemoryJar::new();
        let config = SessionConfig::default();
        // Valid JSON, but not a full user record
        jar.set(
            &config.cookie_name,
            r#"{"id":"u1","email":"a@b.com","name":"A"}"#,
            config.ttl,
        );

        let sessions = SessionStore::new(Box::new(jar), config);
        assert!(sessions.current().is_none());
    }
}
