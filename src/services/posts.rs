// src/services/posts.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    config::PostAuthorization,
    error::AppError,
    models::post::{NewPost, PostChanges, PostMetadata, PostView, UpdatePostRequest},
    repository::PostRepository,
    utils::text::normalize_name,
};

pub const POST_NOT_FOUND: &str = "Impossible to find the post";

fn not_found() -> AppError {
    AppError::NotFound(POST_NOT_FOUND.to_string())
}

/// Enforces the configured post authorization policy for `actor` on `post_id`.
async fn authorize(
    repo: &(impl PostRepository + ?Sized),
    policy: PostAuthorization,
    actor: Uuid,
    post_id: Uuid,
) -> Result<(), AppError> {
    if policy == PostAuthorization::AnyAuthenticated {
        return Ok(());
    }

    let post = repo.find_post(post_id).await?.ok_or_else(not_found)?;
    if post.owner_id != actor {
        tracing::warn!(user_id = %actor, post_id = %post_id, "Refused change to another user's post");
        return Err(AppError::Forbidden(
            "Only the owner of the post may change it".to_string(),
        ));
    }
    Ok(())
}

pub async fn get_published_posts(
    repo: &(impl PostRepository + ?Sized),
) -> Result<Vec<PostView>, AppError> {
    let posts = repo.list_published_posts().await?;
    Ok(posts.into_iter().map(PostView::from).collect())
}

pub async fn get_published_post_by_id(
    repo: &(impl PostRepository + ?Sized),
    id: Uuid,
) -> Result<PostView, AppError> {
    repo.find_published_post(id)
        .await?
        .map(PostView::from)
        .ok_or_else(not_found)
}

/// New posts always start unpublished and belong to `owner_id`.
pub async fn create_post(
    repo: &(impl PostRepository + ?Sized),
    title: &str,
    full_text: &str,
    short_text: Option<&str>,
    owner_id: Uuid,
) -> Result<PostView, AppError> {
    let post = NewPost {
        title: normalize_name(title),
        short_text: short_text.unwrap_or_default().to_string(),
        full_text: full_text.to_string(),
        metadata: PostMetadata::unpublished(),
        owner_id,
    };
    post.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let post = repo.insert_post(post).await?;
    tracing::info!(post_id = %post.id, owner_id = %owner_id, "Post created");

    Ok(post.into())
}

/// Overwrites the supplied fields of post `id`. `metadata`, when given, replaces the whole blob.
pub async fn update_post(
    repo: &(impl PostRepository + ?Sized),
    policy: PostAuthorization,
    actor: Uuid,
    id: Uuid,
    fields: UpdatePostRequest,
) -> Result<PostView, AppError> {
    let changes = PostChanges {
        title: fields.title.as_deref().map(normalize_name),
        short_text: fields.short_text,
        full_text: fields.full_text,
        metadata: fields.metadata,
    };
    changes
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    authorize(repo, policy, actor, id).await?;

    let post = repo.update_post(id, changes).await?.ok_or_else(not_found)?;
    tracing::info!(post_id = %post.id, user_id = %actor, "Post updated");

    Ok(post.into())
}

pub async fn publish_post(
    repo: &(impl PostRepository + ?Sized),
    policy: PostAuthorization,
    actor: Uuid,
    post_id: Uuid,
) -> Result<PostView, AppError> {
    authorize(repo, policy, actor, post_id).await?;

    let post = repo.publish_post(post_id).await?.ok_or_else(not_found)?;
    tracing::info!(post_id = %post.id, user_id = %actor, "Post published");

    Ok(post.into())
}

/// Physical removal. Returns the number of affected rows.
pub async fn delete_post(
    repo: &(impl PostRepository + ?Sized),
    policy: PostAuthorization,
    actor: Uuid,
    id: Uuid,
) -> Result<u64, AppError> {
    authorize(repo, policy, actor, id).await?;

    let affected = repo.delete_post(id).await?;
    tracing::info!(post_id = %id, user_id = %actor, affected, "Post deleted");

    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    const ANY: PostAuthorization = PostAuthorization::AnyAuthenticated;

    #[tokio::test]
    async fn created_posts_start_unpublished() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let post = create_post(&store, "hello", "world", None, owner).await.unwrap();

        assert!(!post.metadata.published);
        assert_eq!(post.owner_id, owner);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.short_text, "");
        assert!(get_published_posts(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn publish_makes_post_visible() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let post = create_post(&store, "hello", "world", None, owner).await.unwrap();

        let published = publish_post(&store, ANY, owner, post.id).await.unwrap();
        assert!(published.metadata.published);

        let listed = get_published_posts(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, post.id);
        assert_eq!(get_published_post_by_id(&store, post.id).await.unwrap().id, post.id);
    }

    #[tokio::test]
    async fn deleted_post_is_not_found() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let post = create_post(&store, "hello", "world", None, owner).await.unwrap();
        publish_post(&store, ANY, owner, post.id).await.unwrap();

        assert_eq!(delete_post(&store, ANY, owner, post.id).await.unwrap(), 1);
        assert_eq!(
            get_published_post_by_id(&store, post.id).await.unwrap_err(),
            AppError::NotFound(POST_NOT_FOUND.to_string())
        );
    }

    #[tokio::test]
    async fn unpublishing_through_update_hides_the_post() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let post = create_post(&store, "hello", "world", None, owner).await.unwrap();
        publish_post(&store, ANY, owner, post.id).await.unwrap();

        let fields = UpdatePostRequest {
            metadata: Some(PostMetadata::unpublished()),
            short_text: Some("summary".into()),
            ..Default::default()
        };
        let updated = update_post(&store, ANY, owner, post.id, fields).await.unwrap();
        assert_eq!(updated.short_text, "summary");
        assert_eq!(updated.full_text, "world");
        assert!(get_published_posts(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn owner_only_policy_rejects_strangers() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let owner_only = PostAuthorization::OwnerOnly;
        let post = create_post(&store, "hello", "world", None, owner).await.unwrap();

        let err = publish_post(&store, owner_only, stranger, post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(delete_post(&store, owner_only, stranger, post.id).await.is_err());

        assert!(publish_post(&store, owner_only, owner, post.id).await.is_ok());
        // The default policy lets anyone with a token moderate.
        assert_eq!(delete_post(&store, ANY, stranger, post.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_post_updates_fail() {
        let store = MemoryStore::new();
        let actor = Uuid::new_v4();
        let missing = Uuid::new_v4();

        assert!(matches!(
            publish_post(&store, ANY, actor, missing).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            update_post(&store, ANY, actor, missing, UpdatePostRequest::default()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
