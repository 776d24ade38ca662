//! JWT 认证中间件与角色中间件

use crate::{
    auth::{context::AuthContext, jwt::JwtService},
    error::AppError,
};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

pub const MSG_MISSING_HEADER: &str = "missing authorization header";
pub const MSG_INVALID_HEADER: &str = "invalid authorization header format";
pub const MSG_ROLE_NOT_FOUND: &str = "user role not found";
pub const MSG_INSUFFICIENT_PERMISSIONS: &str = "insufficient permissions";

const BEARER_SCHEME: &str = "Bearer";

/// 从 Authorization 头提取令牌
///
/// 头部必须恰好是 `Bearer <token>` 两段，以单个空格分隔。
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized(MSG_MISSING_HEADER))?;

    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized(MSG_INVALID_HEADER))?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if *scheme == BEARER_SCHEME => Ok(*token),
        _ => Err(AppError::unauthorized(MSG_INVALID_HEADER)),
    }
}

/// 校验请求头中的令牌并生成身份上下文
pub fn authenticate(jwt_service: &JwtService, headers: &HeaderMap) -> Result<AuthContext, AppError> {
    let token = extract_token(headers).map_err(|e| {
        tracing::warn!(reason = %e, "Rejected authorization header");
        e
    })?;

    let claims = jwt_service.validate(token).map_err(|kind| {
        tracing::debug!(kind = %kind, "Rejected bearer token");
        AppError::InvalidToken(kind)
    })?;

    Ok(AuthContext::from_claims(&claims))
}

/// JWT 认证中间件 - 必须认证
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = authenticate(&jwt_service, req.headers())?;

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// 角色中间件状态：允许访问的角色 ID 列表
#[derive(Clone)]
pub struct RoleGate {
    jwt_service: Arc<JwtService>,
    allowed_roles: Arc<[i64]>,
    deny_with_forbidden: bool,
}

impl RoleGate {
    pub fn new(jwt_service: Arc<JwtService>, allowed_roles: &[i64]) -> Self {
        Self {
            jwt_service,
            allowed_roles: Arc::from(allowed_roles),
            deny_with_forbidden: false,
        }
    }

    /// 角色不在白名单时返回 403（默认 401）
    pub fn deny_with_forbidden(mut self, enabled: bool) -> Self {
        self.deny_with_forbidden = enabled;
        self
    }

    /// 检查上下文中的角色是否被允许
    pub fn check(&self, auth_context: &AuthContext) -> Result<(), AppError> {
        let role_id = auth_context
            .role_id()
            .ok_or_else(|| AppError::unauthorized(MSG_ROLE_NOT_FOUND))?;

        if self.allowed_roles.iter().any(|allowed| *allowed == role_id) {
            return Ok(());
        }

        tracing::warn!(
            user_id = ?auth_context.user_id(),
            role_id,
            "Role not permitted for route"
        );

        if self.deny_with_forbidden {
            Err(AppError::forbidden(MSG_INSUFFICIENT_PERMISSIONS))
        } else {
            Err(AppError::unauthorized(MSG_INSUFFICIENT_PERMISSIONS))
        }
    }
}

/// 角色中间件：先认证，再检查角色白名单
pub async fn role_gate_middleware(
    State(gate): State<RoleGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = authenticate(&gate.jwt_service, req.headers())?;

    gate.check(&auth_context)?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
