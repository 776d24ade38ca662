//! 数据访问层

pub mod role_repo;
pub mod user_repo;

pub use role_repo::RoleRepository;
pub use user_repo::UserRepository;
