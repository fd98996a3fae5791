use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row, including the password hash. Never serialized to the
/// HTTP surface; handlers convert to [`UserSummary`] first.
#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password_hash: String,
    /// Elevated in-game privilege. Distinct from admin access, which is
    /// identity-less and carried by a separate token.
    pub authorized: bool,
    /// Unix seconds.
    pub created_at: i64,
    pub introduction: Option<String>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            phone: self.phone.clone(),
            username: self.username.clone(),
            authorized: self.authorized,
            created_at: self.created_at,
            introduction: self.introduction.clone(),
        }
    }
}

/// Public identity fields, as returned by login, the user home, and the
/// admin directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub authorized: bool,
    pub created_at: i64,
    pub introduction: Option<String>,
}

/// Registration input. The password arrives in plaintext over the wire
/// and is hashed before it ever reaches storage.
#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub introduction: Option<String>,
}
