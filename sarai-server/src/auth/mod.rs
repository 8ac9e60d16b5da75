//! 认证授权模块
//!
//! 提供 JWT 验证、角色检查和中间件：
//! - [`JwtService`] - JWT 令牌验证服务 (令牌由外部身份服务签发)
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_staff`] / [`require_super_admin`] - 角色检查中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_staff, require_super_admin};
