// src/services/mod.rs

pub mod posts;
pub mod users;
