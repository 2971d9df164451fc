use serde::Serialize;
use sqlx::FromRow;

/// Account row as stored. Holds the password hash, so it is deliberately not
/// `Serialize`; anything leaving the process goes through [`UserProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Option<String>,
}

/// Client-facing view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

/// Envelope used by the account endpoints.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
    pub user: UserProfile,
}

impl UserResponse {
    pub fn new(status_code: u16, message: impl Into<String>, user: impl Into<UserProfile>) -> Self {
        Self {
            status_code,
            message: message.into(),
            user: user.into(),
        }
    }
}
