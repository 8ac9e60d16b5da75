//! Sarai Server - 客房住宿后端服务
//!
//! # 架构概述
//!
//! 提供以下核心功能：
//!
//! - **认证** (`auth`): 验证外部身份服务签发的 JWT
//! - **数据库** (`db`): SQLite (WAL) + function-based repositories
//! - **业务编排** (`services`): 房间分配生命周期、餐券批量签发
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! sarai-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 验证、角色中间件
//! ├── db/            # 连接池、迁移、repositories
//! ├── services/      # 跨资源编排
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、时间、响应辅助
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境：dotenv、工作目录、日志
pub fn setup_environment() -> Result<Config, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    if config.is_production() {
        let log_dir = config.log_dir();
        init_logger_with_file(Some("info"), log_dir.to_str());
    } else {
        init_logger();
    }

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   _____                  _
  / ___/____ __________ _(_)
  \__ \/ __ `/ ___/ __ `/ /
 ___/ / /_/ / /  / /_/ / /
/____/\__,_/_/   \__,_/_/
    "#
    );
}
