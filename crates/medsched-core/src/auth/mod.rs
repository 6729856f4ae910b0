//! Registration and login flows.
//!
//! The caller-side layer the store contracts point at: it performs the
//! case-insensitive duplicate-email check before `create_user`, since
//! the store itself only exposes existence-check and create as two
//! separate calls. Under a single synchronous caller that is sound; any
//! future concurrent writer would reintroduce the check-then-insert
//! race.

use std::fmt;

use thiserror::Error;

use crate::models::{ComplementInfo, NewUser, Role, User};
use crate::store::{Store, StoreError};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Per-field validation failures, surfaced as inline form errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|e| e.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Authentication flow errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(ValidationError),

    #[error("email is already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input to [`register`].
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub complement: Option<ComplementInfo>,
}

/// Input to [`login`].
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Register a new account and log it in.
pub fn register(store: &mut Store, input: RegistrationInput) -> Result<User, AuthError> {
    validate_registration(&input)?;

    if store.get_user_by_email(&input.email)?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let user = store.create_user(NewUser {
        name: input.name,
        email: input.email,
        password: input.password,
        role: input.role,
        complement: input.complement,
    })?;
    store.set_current_session(&user);
    Ok(user)
}

/// Log an existing account in.
///
/// The error does not reveal whether the email or the password was
/// wrong.
pub fn login(store: &mut Store, credentials: &Credentials) -> Result<User, AuthError> {
    validate_credentials(credentials)?;

    let Some(user) = store.get_user_by_email(&credentials.email)? else {
        return Err(AuthError::InvalidCredentials);
    };
    if user.password != credentials.password {
        return Err(AuthError::InvalidCredentials);
    }

    store.set_current_session(&user);
    Ok(user)
}

/// Log the current session out.
pub fn logout(store: &mut Store) {
    store.clear_current_session();
}

fn validate_registration(input: &RegistrationInput) -> Result<(), AuthError> {
    let mut errors = ValidationError::default();

    if input.name.trim().is_empty() {
        errors.push("name", "name is required");
    }
    if let Some(message) = email_error(&input.email) {
        errors.push("email", message);
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<(), AuthError> {
    let mut errors = ValidationError::default();

    if credentials.email.trim().is_empty() {
        errors.push("email", "email is required");
    }
    if credentials.password.is_empty() {
        errors.push("password", "password is required");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

fn email_error(email: &str) -> Option<&'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Some("email is required");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Some("email must contain @");
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Some("email address is malformed");
    }
    None
}
