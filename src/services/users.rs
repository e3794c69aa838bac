// src/services/users.rs

//! Account operations. Write-time transforms run here, in this order:
//! name normalization, email validation, password hashing.

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{NewUser, UpdateUserRequest, UserChanges, UserProfile},
    repository::UserRepository,
    utils::{
        hash::{hash_password, verify_password},
        text::normalize_name,
    },
};

pub const UNKNOWN_USER: &str = "UNKNOWN OR DELETED USER";
pub const INVALID_CREDENTIALS: &str = "INVALID CREDENTIALS";

fn validation_error(errors: validator::ValidationErrors) -> AppError {
    AppError::Validation(errors.to_string())
}

/// Creates an account. Names default to empty; the password is stored hashed.
pub async fn create_user(
    repo: &(impl UserRepository + ?Sized),
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<UserProfile, AppError> {
    let mut user = NewUser {
        email: email.to_string(),
        first_name: normalize_name(first_name.unwrap_or_default()),
        last_name: normalize_name(last_name.unwrap_or_default()),
        hash: String::new(),
    };
    user.validate().map_err(validation_error)?;
    user.hash = hash_password(password)?;

    let user = repo.insert_user(user).await?;
    tracing::info!(user_id = %user.id, "User created");

    Ok(user.into())
}

/// Checks credentials against a live account.
pub async fn login_user(
    repo: &(impl UserRepository + ?Sized),
    email: &str,
    password: &str,
) -> Result<UserProfile, AppError> {
    let user = repo
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::AuthError(UNKNOWN_USER.to_string()))?;

    if !verify_password(password, &user.hash)? {
        tracing::warn!(user_id = %user.id, "Rejected login with invalid credentials");
        return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
    }

    Ok(user.into())
}

pub async fn get_user(
    repo: &(impl UserRepository + ?Sized),
    id: Uuid,
) -> Result<UserProfile, AppError> {
    repo.find_user(id)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| AppError::AuthError(UNKNOWN_USER.to_string()))
}

/// Overwrites the supplied fields of the account `id`.
///
/// No identity check happens here: the route layer only ever passes the caller's own id.
pub async fn update_user(
    repo: &(impl UserRepository + ?Sized),
    fields: UpdateUserRequest,
    id: Uuid,
) -> Result<UserProfile, AppError> {
    let mut changes = UserChanges {
        email: fields.email,
        first_name: fields.first_name.as_deref().map(normalize_name),
        last_name: fields.last_name.as_deref().map(normalize_name),
        hash: None,
    };
    changes.validate().map_err(validation_error)?;
    if let Some(password) = fields.password.as_deref().filter(|p| !p.is_empty()) {
        changes.hash = Some(hash_password(password)?);
    }

    let user = repo
        .update_user(id, changes)
        .await?
        .ok_or_else(|| AppError::AuthError(UNKNOWN_USER.to_string()))?;
    tracing::info!(user_id = %user.id, "User updated");

    Ok(user.into())
}

/// Soft delete. Returns the number of affected rows.
pub async fn delete_user(
    repo: &(impl UserRepository + ?Sized),
    id: Uuid,
) -> Result<u64, AppError> {
    let affected = repo.soft_delete_user(id).await?;
    tracing::info!(user_id = %id, affected, "User deleted");
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    #[tokio::test]
    async fn signup_then_login_returns_same_user() {
        let store = MemoryStore::new();
        let created = create_user(&store, "a@b.com", "pw", Some("jane"), None)
            .await
            .unwrap();
        assert_eq!(created.first_name, "Jane");
        assert_eq!(created.last_name, "");

        let logged_in = login_user(&store, "a@b.com", "pw").await.unwrap();
        assert_eq!(logged_in.id, created.id);
    }

    #[tokio::test]
    async fn wrong_password_never_locks_out() {
        let store = MemoryStore::new();
        create_user(&store, "a@b.com", "pw", None, None).await.unwrap();

        for _ in 0..3 {
            let err = login_user(&store, "a@b.com", "nope").await.unwrap_err();
            assert_eq!(err, AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }
        assert!(login_user(&store, "a@b.com", "pw").await.is_ok());
    }

    #[tokio::test]
    async fn deleted_user_cannot_log_in() {
        let store = MemoryStore::new();
        let user = create_user(&store, "a@b.com", "pw", None, None).await.unwrap();
        assert_eq!(delete_user(&store, user.id).await.unwrap(), 1);

        let err = login_user(&store, "a@b.com", "pw").await.unwrap_err();
        assert_eq!(err, AppError::AuthError(UNKNOWN_USER.to_string()));
        assert!(get_user(&store, user.id).await.is_err());
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_before_storage() {
        let store = MemoryStore::new();
        let err = create_user(&store, "nope", "pw", None, None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_rehashes_and_normalizes() {
        let store = MemoryStore::new();
        let user = create_user(&store, "a@b.com", "pw", None, None).await.unwrap();

        let fields = UpdateUserRequest {
            password: Some("new-pw".into()),
            last_name: Some("SMITH".into()),
            ..Default::default()
        };
        let updated = update_user(&store, fields, user.id).await.unwrap();
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.email, "a@b.com");

        assert!(login_user(&store, "a@b.com", "pw").await.is_err());
        assert!(login_user(&store, "a@b.com", "new-pw").await.is_ok());
    }
}
