//! HTTP 处理器

pub mod auth;
pub mod health;
pub mod role;
pub mod user;
