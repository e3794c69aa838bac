// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Who may update, publish or delete a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostAuthorization {
    /// Any caller holding a valid token (moderation model).
    #[default]
    AnyAuthenticated,
    /// Only the user recorded as the post's owner.
    OwnerOnly,
}

impl PostAuthorization {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "any" => Some(Self::AnyAuthenticated),
            "owner" => Some(Self::OwnerOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub rust_log: String,
    pub port: u16,
    pub post_authorization: PostAuthorization,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let post_authorization = env::var("POST_AUTHORIZATION")
            .ok()
            .map(|v| {
                PostAuthorization::parse(&v)
                    .expect("POST_AUTHORIZATION must be either 'any' or 'owner'")
            })
            .unwrap_or_default();

        Self {
            database_url,
            jwt_secret,
            rust_log,
            port,
            post_authorization,
        }
    }

    /// Configuration for tests and embedding: in-memory store, given secret.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            jwt_secret: jwt_secret.into(),
            rust_log: "error".to_string(),
            port: 0,
            post_authorization: PostAuthorization::default(),
        }
    }
}
