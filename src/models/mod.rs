//! 领域模型

pub mod auth;
pub mod role;
pub mod user;
