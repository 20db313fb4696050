use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role assigned when a registration does not name one.
pub const DEFAULT_ROLE: &str = "usuario";

/// Stored user record. Field names on disk follow the `users.json` layout.
///
/// Keys this type does not model are kept in `extra` so that rewriting the
/// file never drops them. `nombre`, `rol` and `fecha_creacion` may be absent
/// or `null` in older files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "contraseña")]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "nombre", default)]
    pub display_name: Option<String>,
    #[serde(rename = "rol", default)]
    pub role: Option<String>,
    #[serde(rename = "fecha_creacion", default)]
    pub created_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user record without its password; the only shape handed to clients.
/// Unmodelled keys are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: u64,
    #[serde(rename = "usuario")]
    pub username: String,
    pub email: String,
    #[serde(rename = "nombre")]
    pub display_name: Option<String>,
    #[serde(rename = "rol")]
    pub role: Option<String>,
    #[serde(rename = "fecha_creacion")]
    pub created_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&UserRecord> for PublicUser {
    fn from(u: &UserRecord) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            display_name: u.display_name.clone(),
            role: u.role.clone(),
            created_date: u.created_date.clone(),
            extra: u.extra.clone(),
        }
    }
}

/// The whole persisted document: `{"users": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCollection {
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl UserCollection {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Id for the next appended record: current length + 1.
    pub fn next_id(&self) -> u64 {
        self.users.len() as u64 + 1
    }

    /// First record whose username matches case-insensitively and whose
    /// password matches exactly.
    pub fn find_by_credentials(&self, username: &str, password: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|u| same_username(&u.username, username) && u.password == password)
    }

    pub fn exists(&self, username: &str) -> bool {
        self.users.iter().any(|u| same_username(&u.username, username))
    }

    pub fn email_exists(&self, email: &str) -> bool {
        let email = email.trim();
        self.users.iter().any(|u| u.email.trim() == email)
    }

    pub fn push(&mut self, user: UserRecord) {
        self.users.push(user);
    }

    pub fn public_users(&self) -> Vec<PublicUser> {
        self.users.iter().map(PublicUser::from).collect()
    }
}

fn same_username(stored: &str, candidate: &str) -> bool {
    stored.trim().to_lowercase() == candidate.trim().to_lowercase()
}

/// Login request body. Fields stay optional so that absence is reported as
/// a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(rename = "usuario", alias = "username", default)]
    pub username: Option<String>,
    #[serde(rename = "contraseña", alias = "password", default)]
    pub password: Option<String>,
}

/// Registration request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(rename = "usuario", alias = "username", default)]
    pub username: Option<String>,
    #[serde(rename = "contraseña", alias = "password", default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "nombre", alias = "display_name", default)]
    pub display_name: Option<String>,
    #[serde(rename = "rol", alias = "role", default)]
    pub role: Option<String>,
}
