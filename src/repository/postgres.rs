// src/repository/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use super::{PostRepository, UserRepository};
use crate::{
    error::AppError,
    models::{
        post::{NewPost, Post, PostChanges},
        user::{NewUser, User, UserChanges},
    },
};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, hash, created_at, updated_at, deleted_at";

const POST_COLUMNS: &str =
    "id, title, short_text, full_text, metadata, owner_id, created_at, updated_at, deleted_at";

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `SELECT` over live users only.
fn active_users(filter: &str) -> String {
    format!(
        "SELECT {} FROM users WHERE deleted_at IS NULL AND {}",
        USER_COLUMNS, filter
    )
}

/// `SELECT` over live posts only.
fn active_posts(filter: &str) -> String {
    format!(
        "SELECT {} FROM posts WHERE deleted_at IS NULL AND {}",
        POST_COLUMNS, filter
    )
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, first_name, last_name, email, hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.hash)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&active_users("id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&active_users("email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                hash = COALESCE($5, hash),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.email)
            .bind(changes.first_name)
            .bind(changes.last_name)
            .bind(changes.hash)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn soft_delete_user(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl PostRepository for PgStore {
    async fn insert_post(&self, post: NewPost) -> Result<Post, AppError> {
        let sql = format!(
            "INSERT INTO posts (id, title, short_text, full_text, metadata, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            POST_COLUMNS
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::new_v4())
            .bind(&post.title)
            .bind(&post.short_text)
            .bind(&post.full_text)
            .bind(Json(&post.metadata))
            .bind(post.owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(post)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(&active_posts("id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn list_published_posts(&self) -> Result<Vec<Post>, AppError> {
        let sql = format!(
            "{} ORDER BY updated_at DESC",
            active_posts(r#"metadata @> '{"published": true}'"#)
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn find_published_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(&active_posts(
            r#"id = $1 AND metadata @> '{"published": true}'"#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, AppError> {
        let sql = format!(
            r#"
            UPDATE posts SET
                title = COALESCE($2, title),
                short_text = COALESCE($3, short_text),
                full_text = COALESCE($4, full_text),
                metadata = COALESCE($5, metadata),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.short_text)
            .bind(changes.full_text)
            .bind(changes.metadata.map(Json))
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn publish_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let sql = format!(
            r#"
            UPDATE posts SET
                metadata = jsonb_set(metadata, '{{published}}', 'true'::jsonb, true),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn delete_post(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
