// src/handlers/posts.rs

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::Config,
    error::AppError,
    models::{
        post::{CreatePostRequest, DeletePostRequest, UpdatePostRequest},
        present,
    },
    repository::SharedStore,
    services::posts::{self, POST_NOT_FOUND},
    utils::{json::Json, jwt::Claims},
};

const POST_ID_REQUIRED: &str = "The ID of the post is required";

/// Path ids that are not UUIDs can never match a post.
fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(POST_NOT_FOUND.to_string()))
}

/// `GET /posts/published`
pub async fn list_published_posts(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let posts = posts::get_published_posts(&*store).await?;

    Ok(Json(json!({
        "success": true,
        "posts": posts,
        "message": "All the published posts are successfully retrieved",
    })))
}

/// `GET /posts/published/{id}`
pub async fn get_published_post(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post = posts::get_published_post_by_id(&*store, parse_post_id(&id)?).await?;

    Ok(Json(json!({
        "success": true,
        "post": post,
        "message": "Details of the published post are successfully retrieved",
    })))
}

/// `POST /posts`: the caller becomes the owner.
pub async fn create_post(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(title), Some(full_text)) = (present(&payload.title), present(&payload.full_text))
    else {
        return Err(AppError::BadRequest(
            "The title and the fullText are required".to_string(),
        ));
    };

    let post = posts::create_post(
        &*store,
        title,
        full_text,
        payload.short_text.as_deref(),
        claims.id,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "post": post,
        "message": "The post is successfully created",
    })))
}

/// `PUT /posts`
pub async fn update_post(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest(POST_ID_REQUIRED.to_string()))?;

    posts::update_post(
        &*store,
        config.post_authorization,
        claims.id,
        id,
        payload,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "The post is successfully updated",
    })))
}

/// `DELETE /posts`
pub async fn delete_post(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<DeletePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest(POST_ID_REQUIRED.to_string()))?;

    posts::delete_post(&*store, config.post_authorization, claims.id, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "The post is successfully deleted",
    })))
}

/// `PUT /posts/{id}/publish`
pub async fn publish_post(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post = posts::publish_post(
        &*store,
        config.post_authorization,
        claims.id,
        parse_post_id(&id)?,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "post": post,
        "message": "The post is successfully published",
    })))
}
