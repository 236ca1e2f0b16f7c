//! Storefront Server - 电商后端服务
//!
//! # 架构概述
//!
//! 本模块是 Storefront Server 的主入口，提供以下核心功能：
//!
//! - **认证** (`auth`): JWT + Argon2 认证体系，角色授权
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **订单** (`orders`): 订单定价和状态流转
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色权限
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单定价、状态机
//! ├── db/            # 数据库层 (models + repositories)
//! └── utils/         # 错误、日志、校验工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

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

pub fn print_banner() {
    println!(
        r#"
   _____ __                 ____                 __
  / ___// /_____  ________ / __/________  ____  / /_
  \__ \/ __/ __ \/ ___/ _ \ /_/ ___/ __ \/ __ \/ __/
 ___/ / /_/ /_/ / /  /  __/ __/ /  / /_/ / / / / /_
/____/\__/\____/_/   \___/_/ /_/   \____/_/ /_/\__/
    "#
    );
}
