// src/handlers/users.rs

use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::Config,
    error::AppError,
    models::{
        present,
        user::{CreateUserRequest, LoginRequest, UpdateUserRequest},
    },
    repository::SharedStore,
    services::users,
    utils::{
        json::Json,
        jwt::{Claims, sign_jwt},
    },
};

const CREDENTIALS_REQUIRED: &str = "email and password are required";

/// The authenticated caller's id, or a 400 with `message` if the token carried none.
fn caller_id(claims: &Claims, message: &str) -> Result<Uuid, AppError> {
    if claims.id.is_nil() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(claims.id)
}

/// `POST /users`: creates an account and returns a token for it.
pub async fn create_user(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password)) = (present(&payload.email), present(&payload.password))
    else {
        return Err(AppError::BadRequest(CREDENTIALS_REQUIRED.to_string()));
    };

    let profile = users::create_user(
        &*store,
        email,
        password,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?;
    let token = sign_jwt(profile.id, &config.jwt_secret)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": token,
            "profile": profile,
            "message": "user created",
        })),
    ))
}

/// `POST /users/login`
pub async fn login_user(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password)) = (present(&payload.email), present(&payload.password))
    else {
        return Err(AppError::BadRequest(CREDENTIALS_REQUIRED.to_string()));
    };

    let profile = users::login_user(&*store, email, password).await?;
    let token = sign_jwt(profile.id, &config.jwt_secret)?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "profile": profile,
        "message": "user logged in",
    })))
}

/// `GET /users`: profile of the token's owner.
pub async fn get_user(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let profile = users::get_user(&*store, claims.id).await?;

    Ok(Json(json!({
        "success": true,
        "profile": profile,
        "message": "user logged in",
    })))
}

/// `PUT /users`: always targets the caller's own account.
pub async fn update_user(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = caller_id(&claims, "ID is mandatory for updating a user account")?;

    let profile = users::update_user(&*store, payload, id).await?;
    let token = sign_jwt(profile.id, &config.jwt_secret)?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "profile": profile,
        "message": "user successfully updated",
    })))
}

/// `DELETE /users`: soft-deletes the caller's own account.
pub async fn delete_user(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let id = caller_id(&claims, "ID is mandatory for deleting a user")?;

    users::delete_user(&*store, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "user successfully removed",
    })))
}
