//! Authentication and authorization module

pub mod context;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use context::AuthContext;
pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{
    authenticate, extract_token, jwt_auth_middleware, role_gate_middleware, RoleGate,
};
pub use password::PasswordHasher;
