// src/repository/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{PostRepository, UserRepository};
use crate::{
    error::AppError,
    models::{
        post::{NewPost, Post, PostChanges},
        user::{NewUser, User, UserChanges},
    },
};

/// In-process store with the same semantics as `PgStore`.
/// Used when no `DATABASE_URL` is configured, and by the test suite.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    posts: RwLock<HashMap<Uuid, Post>>,
    clock: std::sync::Mutex<Option<DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps `deleted_at` on a post row directly; no service operation does this.
    #[cfg(test)]
    async fn mark_post_deleted(&self, id: Uuid) {
        let now = self.now();
        if let Some(post) = self.posts.write().await.get_mut(&id) {
            post.deleted_at = Some(now);
        }
    }

    /// Wall-clock time, nudged forward so consecutive writes never share a timestamp.
    fn now(&self) -> DateTime<Utc> {
        let mut last = self.clock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut now = Utc::now();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + TimeDelta::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| u.deleted_at.is_none() && u.email == email && Some(u.id) != except)
}

fn duplicate_email() -> AppError {
    AppError::Constraint("duplicate key value violates unique constraint \"users_email_key\"".to_string())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(duplicate_email());
        }

        let now = self.now();
        let row = User {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            hash: user.hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(&id).filter(|u| u.deleted_at.is_none()).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.deleted_at.is_none() && u.email == email)
            .cloned())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        if let Some(email) = &changes.email {
            if email_taken(&users, email, Some(id)) {
                return Err(duplicate_email());
            }
        }

        let now = self.now();
        let Some(user) = users.get_mut(&id).filter(|u| u.deleted_at.is_none()) else {
            return Ok(None);
        };

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(hash) = changes.hash {
            user.hash = hash;
        }
        user.updated_at = now;

        Ok(Some(user.clone()))
    }

    async fn soft_delete_user(&self, id: Uuid) -> Result<u64, AppError> {
        let mut users = self.users.write().await;
        let now = self.now();
        match users.get_mut(&id).filter(|u| u.deleted_at.is_none()) {
            Some(user) => {
                user.deleted_at = Some(now);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn insert_post(&self, post: NewPost) -> Result<Post, AppError> {
        let now = self.now();
        let row = Post {
            id: Uuid::new_v4(),
            title: post.title,
            short_text: post.short_text,
            full_text: post.full_text,
            metadata: Json(post.metadata),
            owner_id: post.owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.posts.write().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).filter(|p| p.deleted_at.is_none()).cloned())
    }

    async fn list_published_posts(&self) -> Result<Vec<Post>, AppError> {
        let posts = self.posts.read().await;
        let mut published: Vec<Post> = posts
            .values()
            .filter(|p| p.deleted_at.is_none() && p.is_published())
            .cloned()
            .collect();
        published.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(published)
    }

    async fn find_published_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let posts = self.posts.read().await;
        Ok(posts
            .get(&id)
            .filter(|p| p.deleted_at.is_none() && p.is_published())
            .cloned())
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, AppError> {
        let mut posts = self.posts.write().await;
        let now = self.now();
        let Some(post) = posts.get_mut(&id).filter(|p| p.deleted_at.is_none()) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(short_text) = changes.short_text {
            post.short_text = short_text;
        }
        if let Some(full_text) = changes.full_text {
            post.full_text = full_text;
        }
        if let Some(metadata) = changes.metadata {
            post.metadata = Json(metadata);
        }
        post.updated_at = now;

        Ok(Some(post.clone()))
    }

    async fn publish_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let mut posts = self.posts.write().await;
        let now = self.now();
        let Some(post) = posts.get_mut(&id).filter(|p| p.deleted_at.is_none()) else {
            return Ok(None);
        };

        post.metadata.published = true;
        post.updated_at = now;

        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> Result<u64, AppError> {
        Ok(self.posts.write().await.remove(&id).map_or(0, |_| 1))
    }
}
