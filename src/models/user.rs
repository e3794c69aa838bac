// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,

    /// Unique among live rows; a soft-deleted account frees its address.
    pub email: String,

    /// Argon2 password hash. Never leaves the service; see `UserProfile`.
    pub hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Set on soft delete. Repositories only ever return rows where this is `None`.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Public representation of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A user row ready to be inserted: names normalized, password already hashed.
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(email(message = "Validation isEmail on email failed"))]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub hash: String,
}

/// Column overwrites for an existing user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Validate)]
pub struct UserChanges {
    #[validate(email(message = "Validation isEmail on email failed"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub hash: Option<String>,
}

/// Body of `POST /users`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Body of `POST /users/login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `PUT /users`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_never_serializes_the_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            hash: "$argon2id$secret".into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_value(UserProfile::from(user)).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("hash"));
        assert_eq!(object["firstName"], "Jane");
        assert!(!json.to_string().contains("$argon2id$secret"));
    }

    #[test]
    fn new_user_rejects_malformed_email() {
        let user = NewUser {
            email: "not-an-email".into(),
            first_name: String::new(),
            last_name: String::new(),
            hash: "h".into(),
        };
        assert!(user.validate().is_err());
    }
}
