//! Session data model shared by the storage, sync, and gate layers.

use serde::{Deserialize, Deserializer, Serialize};

/// Capability set of an authenticated principal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Job seeker.
    #[default]
    User,
    /// Employer managing listings and reviewing applications.
    Employer,
}

impl Role {
    /// Parse a role string coming from external data.
    ///
    /// The backend only issues the two known roles; anything else is
    /// logged and treated as a plain job seeker, the same fallback the
    /// web client applies.
    pub fn parse_lossy(raw: &str) -> Self {
        match raw {
            "user" => Role::User,
            "employer" => Role::Employer,
            other => {
                tracing::warn!(role = %other, "unrecognized role, defaulting to user");
                Role::User
            }
        }
    }

    /// Wire form of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Employer => "employer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Role::parse_lossy).unwrap_or_default())
    }
}

/// Denormalized snapshot of the authenticated principal.
///
/// Only `id` and `role` participate in authorization decisions. The
/// remaining profile fields (name, contact, resume text, employer name)
/// are carried opaquely so edits made through the backend survive a
/// round-trip through the store unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Backend identifier; required for any authenticated action.
    #[serde(default)]
    pub id: Option<i64>,
    /// Capability discriminator; missing or unknown values read as `User`.
    #[serde(default)]
    pub role: Role,
    /// Everything else the backend sent, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Profile {
    /// Build a minimal profile.
    pub fn new(id: i64, role: Role) -> Self {
        Self {
            id: Some(id),
            role,
            ..Default::default()
        }
    }

    /// Get an opaque string field, if present and non-null.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(|v| v.as_str())
    }

    /// Set an opaque string field.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.extra
            .insert(name.to_string(), serde_json::Value::String(value.into()));
    }

    /// Best-effort human name for greetings and prompts.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.field("employer_name") {
            return name.to_string();
        }
        match (self.field("first_name"), self.field("last_name")) {
            (Some(first), Some(last)) => return format!("{} {}", first, last),
            (Some(first), None) => return first.to_string(),
            _ => {}
        }
        self.field("username").unwrap_or("user").to_string()
    }
}

/// The process-wide authentication fact.
///
/// `user` is present iff `token` is present; the constructors are the
/// only way to build one, so a half-populated session cannot exist in
/// memory. Storage-level violations are repaired on read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<Profile>,
}

impl Session {
    /// The logged-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in session.
    pub fn authenticated(token: impl Into<String>, user: Profile) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Bearer token, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Profile snapshot, if logged in.
    pub fn user(&self) -> Option<&Profile> {
        self.user.as_ref()
    }

    /// Whether a credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Role used for authorization decisions; `None` when logged out.
    pub fn effective_role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Backend id of the principal, if logged in with a well-formed profile.
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().and_then(|u| u.id)
    }
}
