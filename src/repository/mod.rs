// src/repository/mod.rs

//! Persistence for users and posts.
//!
//! Both implementations apply the soft-delete filter themselves: every read and
//! write below only ever sees rows whose `deleted_at` is unset. Callers never
//! filter on it.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        post::{NewPost, Post, PostChanges},
        user::{NewUser, User, UserChanges},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Constraint` when the email is already taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Returns `None` when no active row matches `id`.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError>;

    /// Sets `deleted_at`; returns the number of rows affected.
    async fn soft_delete_user(&self, id: Uuid) -> Result<u64, AppError>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert_post(&self, post: NewPost) -> Result<Post, AppError>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, AppError>;

    /// Published posts, most recently updated first.
    async fn list_published_posts(&self) -> Result<Vec<Post>, AppError>;

    async fn find_published_post(&self, id: Uuid) -> Result<Option<Post>, AppError>;

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, AppError>;

    /// Flips `metadata.published` to true, keeping the other metadata keys.
    async fn publish_post(&self, id: Uuid) -> Result<Option<Post>, AppError>;

    /// Physical removal; returns the number of rows affected.
    async fn delete_post(&self, id: Uuid) -> Result<u64, AppError>;
}

/// Everything the service needs from storage.
pub trait Store: UserRepository + PostRepository {}

impl<T: UserRepository + PostRepository> Store for T {}

pub type SharedStore = Arc<dyn Store>;
