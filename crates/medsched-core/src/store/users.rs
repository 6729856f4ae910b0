//! User operations on the store.

use super::{Store, StoreEvent, StoreResult};
use crate::models::{ComplementPatch, NewUser, Role, User};

impl Store {
    /// List all users (snapshot copy).
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        self.load_users()
    }

    /// Find a user by email, case-insensitively.
    pub fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let needle = email.trim().to_lowercase();
        let users = self.load_users()?;
        Ok(users.into_iter().find(|u| u.email == needle))
    }

    /// Find a user by ID.
    pub fn get_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let users = self.load_users()?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    /// Find a user by exact display name, ignoring surrounding whitespace.
    pub fn get_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        let needle = name.trim();
        let users = self.load_users()?;
        Ok(users.into_iter().find(|u| u.name == needle))
    }

    /// Create a user and persist it.
    ///
    /// Does not check for a duplicate email; the registration flow in
    /// [`crate::auth`] performs the case-insensitive existence check
    /// before calling this.
    pub fn create_user(&mut self, fields: NewUser) -> StoreResult<User> {
        let mut user = User::new(&fields.name, &fields.email, &fields.password, fields.role);
        user.complement = fields.complement;

        let mut users = self.load_users()?;
        users.push(user.clone());
        self.save_users(&users)?;
        Ok(user)
    }

    /// Overwrite a user's name, email, and role.
    ///
    /// Returns false if no user has the given ID.
    pub fn update_user(&mut self, id: &str, name: &str, email: &str, role: Role) -> StoreResult<bool> {
        let mut users = self.load_users()?;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };

        user.name = name.trim().to_string();
        user.email = email.trim().to_lowercase();
        user.role = role;
        user.touch();

        self.save_users(&users)?;
        Ok(true)
    }

    /// Replace the password of the user with the given email.
    pub fn update_user_password(&mut self, email: &str, new_password: &str) -> StoreResult<bool> {
        let needle = email.trim().to_lowercase();
        let mut users = self.load_users()?;
        let Some(user) = users.iter_mut().find(|u| u.email == needle) else {
            return Ok(false);
        };

        user.password = new_password.to_string();
        user.touch();

        self.save_users(&users)?;
        Ok(true)
    }

    /// Shallow-merge a complement-info patch into a user's profile.
    ///
    /// If the updated user is the current session user, the session
    /// pointer is refreshed and a [`StoreEvent::SessionUserUpdated`] is
    /// emitted so open views re-render with fresh data.
    pub fn update_user_complement_info(
        &mut self,
        id: &str,
        patch: ComplementPatch,
    ) -> StoreResult<bool> {
        let mut users = self.load_users()?;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };

        let mut info = user.complement.take().unwrap_or_default();
        info.apply(patch);
        user.complement = Some(info);
        user.touch();
        let updated = user.clone();

        self.save_users(&users)?;

        if self.current_session().is_some_and(|s| s.id == updated.id) {
            self.set_current_session(&updated);
            self.events.emit(&StoreEvent::SessionUserUpdated(updated));
        }
        Ok(true)
    }

    /// Remove a user. Deletion is immediate and permanent.
    pub fn delete_user(&mut self, id: &str) -> StoreResult<bool> {
        let mut users = self.load_users()?;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Ok(false);
        }
        self.save_users(&users)?;
        Ok(true)
    }
}
