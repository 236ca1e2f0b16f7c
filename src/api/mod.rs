//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口 (注册/登录/密码流程)
//! - [`users`] - 用户管理接口
//! - [`categories`] - 分类管理接口
//! - [`products`] - 商品管理接口
//! - [`orders`] - 订单接口
//! - [`dashboard`] - 管理端汇总接口

pub mod auth;
pub mod health;

// Data models API
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
