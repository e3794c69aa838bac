// src/models/mod.rs

pub mod post;
pub mod user;

/// Treats absent and empty strings alike, the way the API's presence checks do.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
