//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{
    auth::{jwt_auth_middleware, role_gate_middleware, RoleGate},
    handlers,
    middleware::{request_tracking_middleware, AppState},
    models::role::ADMIN_ROLE_ID,
};

/// 请求体大小上限（1 MiB）
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login));

    // 需要认证的端点
    let authenticated_routes = Router::new()
        .route("/api/v1/auth/me", get(handlers::auth::get_current_user))
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            jwt_auth_middleware,
        ));

    // 仅管理员可访问的端点
    let admin_gate = RoleGate::new(state.jwt_service.clone(), &[ADMIN_ROLE_ID])
        .deny_with_forbidden(state.config.security.role_denied_forbidden);

    let admin_routes = Router::new()
        .route("/api/v1/users", get(handlers::user::list_users))
        .route("/api/v1/users/{id}", get(handlers::user::get_user))
        .route("/api/v1/users/{id}/role", put(handlers::user::assign_role))
        .route("/api/v1/roles", get(handlers::role::list_roles))
        .layer(axum::middleware::from_fn_with_state(admin_gate, role_gate_middleware));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_tracking_middleware))
        .with_state(state)
}
