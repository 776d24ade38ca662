//! Role domain models

use serde::{Deserialize, Serialize};

/// 管理员角色 ID（种子数据约定）
pub const ADMIN_ROLE_ID: i64 = 1;

/// Role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}
