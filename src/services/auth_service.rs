//! 认证服务：注册、登录、当前用户

use crate::{
    auth::{context::AuthContext, jwt::JwtService, jwt::TOKEN_TTL_SECS, password::PasswordHasher},
    config::AppConfig,
    error::AppError,
    models::{auth::*, user::*},
    repository::{RoleRepository, UserRepository},
};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::OnceCell;
use validator::Validate;

const MSG_BAD_CREDENTIALS: &str = "invalid email or password";
const MSG_EMAIL_TAKEN: &str = "email already registered";

/// 未知邮箱登录时参与校验的占位密码
const DUMMY_PASSWORD: &str = "wms-dummy-password";

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    config: Arc<AppConfig>,
    /// 与真实哈希使用相同参数的占位哈希，首次需要时生成
    dummy_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: Arc<JwtService>, config: Arc<AppConfig>) -> Self {
        Self {
            db,
            jwt_service,
            config,
            dummy_hash: OnceCell::new(),
        }
    }

    /// 注册新用户
    ///
    /// 角色不由调用方决定，新用户使用 `security.default_role_id`（默认无角色）。
    pub async fn register(&self, req: RegisterRequest) -> Result<UserResponse, AppError> {
        req.validate()?;
        check_password_length(&req.password, self.config.security.password_min_length)?;

        let user_repo = UserRepository::new(self.db.clone());

        if user_repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict(MSG_EMAIL_TAKEN.to_string()));
        }

        let role_id = self.config.security.default_role_id;
        if let Some(role_id) = role_id {
            let role_repo = RoleRepository::new(self.db.clone());
            if role_repo.find_by_id(role_id).await?.is_none() {
                return Err(AppError::Config(format!(
                    "default role {} does not exist",
                    role_id
                )));
            }
        }

        let password_hash = hash_password(req.password).await?;

        // 并发注册可能同时通过上面的检查，由唯一约束兜底
        let user = user_repo
            .create(&req.name, &req.email, &password_hash, role_id)
            .await
            .map_err(map_duplicate_email)?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(UserResponse::from(user))
    }

    /// 用户登录
    ///
    /// 未知邮箱同样执行一次密码校验，响应时间不暴露邮箱是否存在。
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        req.validate()?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo.find_by_email(&req.email).await?;

        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash().await?,
        };
        let verified = verify_password(req.password, stored_hash).await?;

        let user: User = match user {
            Some(user) if verified => user,
            Some(user) => {
                tracing::debug!(user_id = user.id, "Login with wrong password");
                return Err(AppError::unauthorized(MSG_BAD_CREDENTIALS));
            }
            None => {
                tracing::debug!("Login for unknown email");
                return Err(AppError::unauthorized(MSG_BAD_CREDENTIALS));
            }
        };

        let token = self.jwt_service.issue(user.id, &user.email, user.role_id)?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: TOKEN_TTL_SECS,
            user: UserResponse::from(user),
        })
    }

    /// 获取当前登录用户
    pub async fn current_user(&self, auth_context: &AuthContext) -> Result<UserResponse, AppError> {
        let user_id = auth_context.require_user_id()?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;

        Ok(UserResponse::from(user))
    }

    async fn dummy_hash(&self) -> Result<String, AppError> {
        self.dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD.to_string()))
            .await
            .cloned()
    }
}

/// 哈希是 CPU 密集型操作，放到阻塞线程池执行
async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || PasswordHasher::new().hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || PasswordHasher::new().verify(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verify task failed: {}", e)))
}

fn map_duplicate_email(err: AppError) -> AppError {
    if err.is_unique_violation() {
        AppError::Conflict(MSG_EMAIL_TAKEN.to_string())
    } else {
        err
    }
}

/// 密码长度检查（哈希层本身不做策略校验）
pub fn check_password_length(password: &str, min_length: usize) -> Result<(), AppError> {
    if password.chars().count() < min_length {
        return Err(AppError::Validation(format!(
            "password must be at least {} characters",
            min_length
        )));
    }

    Ok(())
}
