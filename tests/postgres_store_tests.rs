// tests/postgres_store_tests.rs
//
// Runs against a real Postgres when DATABASE_URL is set; otherwise each test returns early.

use blog_backend::{
    config::PostAuthorization,
    error::AppError,
    repository::PgStore,
    services::{posts, users},
};
use sqlx::postgres::PgPoolOptions;

async fn store() -> Option<PgStore> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    Some(PgStore::new(pool))
}

fn unique_email() -> String {
    format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8])
}

#[tokio::test]
async fn user_lifecycle_on_postgres() {
    let Some(store) = store().await else {
        return;
    };
    let email = unique_email();

    let user = users::create_user(&store, &email, "pw", Some("jane"), None)
        .await
        .unwrap();
    assert_eq!(user.first_name, "Jane");

    let duplicate = users::create_user(&store, &email, "pw", None, None).await;
    assert!(matches!(duplicate, Err(AppError::Constraint(_))));

    assert_eq!(users::login_user(&store, &email, "pw").await.unwrap().id, user.id);
    assert_eq!(users::delete_user(&store, user.id).await.unwrap(), 1);
    assert_eq!(
        users::login_user(&store, &email, "pw").await.unwrap_err(),
        AppError::AuthError(users::UNKNOWN_USER.to_string())
    );
}

#[tokio::test]
async fn post_lifecycle_on_postgres() {
    let Some(store) = store().await else {
        return;
    };
    let any = PostAuthorization::AnyAuthenticated;
    let owner = users::create_user(&store, &unique_email(), "pw", None, None)
        .await
        .unwrap();

    let post = posts::create_post(&store, "hello", "world", None, owner.id)
        .await
        .unwrap();
    assert!(!post.metadata.published);
    assert_eq!(post.owner_id, owner.id);

    posts::publish_post(&store, any, owner.id, post.id).await.unwrap();
    let listed = posts::get_published_posts(&store).await.unwrap();
    assert_eq!(listed[0].id, post.id);

    assert_eq!(posts::delete_post(&store, any, owner.id, post.id).await.unwrap(), 1);
    assert!(matches!(
        posts::get_published_post_by_id(&store, post.id).await,
        Err(AppError::NotFound(_))
    ));
}
