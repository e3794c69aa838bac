use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;
use validator::Validate;

/// Structured metadata blob stored alongside each post.
/// `published` is the only key the service interprets; anything else is kept as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    #[serde(default)]
    pub published: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostMetadata {
    pub fn unpublished() -> Self {
        Self::default()
    }
}

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub short_text: String,
    pub full_text: String,
    pub metadata: Json<PostMetadata>,
    pub owner_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.metadata.published
    }
}

/// Public representation of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub short_text: String,
    pub full_text: String,
    pub metadata: PostMetadata,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            short_text: post.short_text,
            full_text: post.full_text,
            metadata: post.metadata.0,
            owner_id: post.owner_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// A post row ready to be inserted.
#[derive(Debug, Clone, Validate)]
pub struct NewPost {
    pub title: String,
    pub short_text: String,
    #[validate(length(min = 1, message = "fullText cannot be empty"))]
    pub full_text: String,
    pub metadata: PostMetadata,
    pub owner_id: Uuid,
}

/// Column overwrites for an existing post. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Validate)]
pub struct PostChanges {
    pub title: Option<String>,
    pub short_text: Option<String>,
    #[validate(length(min = 1, message = "fullText cannot be empty"))]
    pub full_text: Option<String>,
    pub metadata: Option<PostMetadata>,
}

/// Body of `POST /posts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub short_text: Option<String>,
    pub full_text: Option<String>,
}

/// Body of `PUT /posts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub short_text: Option<String>,
    pub full_text: Option<String>,
    pub metadata: Option<PostMetadata>,
}

/// Body of `DELETE /posts`.
#[derive(Debug, Default, Deserialize)]
pub struct DeletePostRequest {
    pub id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_keeps_unknown_keys() {
        let meta: PostMetadata =
            serde_json::from_value(json!({ "published": true, "tags": ["rust"] })).unwrap();
        assert!(meta.published);
        assert_eq!(meta.extra["tags"], json!(["rust"]));

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back, json!({ "published": true, "tags": ["rust"] }));
    }

    #[test]
    fn metadata_without_flag_is_unpublished() {
        let meta: PostMetadata = serde_json::from_value(json!({ "featured": 1 })).unwrap();
        assert!(!meta.published);
    }
}
