//! 认证模块
//!
//! JWT 令牌、认证中间件、角色授权

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use permissions::{Role, require_role, role_allowed};
