//! 用户管理的 HTTP 处理器（仅管理员）

use crate::{
    error::AppError,
    middleware::AppState,
    models::{auth::AssignRoleRequest, user::*},
    repository::{RoleRepository, UserRepository},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 列出用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let repo = UserRepository::new(state.db.clone());
    let users = repo.list(query.limit, query.offset).await?;

    let user_responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(json!({
        "users": user_responses,
        "count": user_responses.len()
    })))
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    Ok(Json(UserResponse::from(user)))
}

/// 分配或移除用户角色
pub async fn assign_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(role_id) = req.role_id {
        RoleRepository::new(state.db.clone())
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("role {} does not exist", role_id)))?;
    }

    let user = UserRepository::new(state.db.clone())
        .update_role(id, req.role_id)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    tracing::info!(user_id = user.id, role_id = ?user.role_id, "User role updated");

    Ok(Json(UserResponse::from(user)))
}
