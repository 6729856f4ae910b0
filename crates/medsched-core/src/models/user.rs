//! User models and roles.

use serde::{Deserialize, Serialize};

/// Role of a user account.
///
/// Every authenticated area of the application is scoped to exactly one
/// of these roles; [`Role::home_path`] is the landing page a session of
/// that role is sent to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Administrator,
    Doctor,
    Patient,
}

impl Role {
    /// The role-scoped landing path for this role.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Administrator => "/admin",
            Role::Doctor => "/doctor",
            Role::Patient => "/patient",
        }
    }

    /// The first path segment of this role's area.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Role::Administrator => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }

    /// Parse a path segment into a role, if it names one.
    pub fn from_segment(segment: &str) -> Option<Role> {
        match segment {
            "admin" => Some(Role::Administrator),
            "doctor" => Some(Role::Doctor),
            "patient" => Some(Role::Patient),
            _ => None,
        }
    }
}

/// Free-form profile sub-record attached to a user.
///
/// Which fields are meaningful depends on the role (a specialty only
/// makes sense for a doctor); the store treats the whole record as
/// opaque optional data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComplementInfo {
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for [`ComplementInfo`].
///
/// `Some` fields overwrite, `None` fields preserve the existing value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComplementPatch {
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub notes: Option<String>,
}

impl ComplementInfo {
    /// Shallow-merge a patch into this record.
    pub fn apply(&mut self, patch: ComplementPatch) {
        if let Some(tax_id) = patch.tax_id {
            self.tax_id = Some(tax_id);
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(specialty) = patch.specialty {
            self.specialty = Some(specialty);
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
    }
}

/// Fields required to create a new user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub complement: Option<ComplementInfo>,
}

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique user ID
    pub id: String,
    /// Email, stored lowercase; uniqueness is checked by callers before insert
    pub email: String,
    /// Plaintext password (mock store, no hashing)
    pub password: String,
    /// Display name, stored trimmed
    pub name: String,
    /// Account role
    pub role: Role,
    /// Optional role-dependent profile data
    pub complement: Option<ComplementInfo>,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last update timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Create a new user, normalizing email to lowercase and trimming the name.
    pub fn new(name: &str, email: &str, password: &str, role: Role) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.trim().to_lowercase(),
            password: password.to_string(),
            name: name.trim().to_string(),
            role,
            complement: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}
