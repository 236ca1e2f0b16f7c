//! 角色授权
//!
//! 账户角色是一个小枚举，授权检查是一个纯函数：
//! `role_allowed(role, allowed)` 判断角色是否在许可集合内。
//! 授权逻辑保持在处理器边界，不进入订单核心逻辑。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::auth::CurrentUser;
use crate::utils::AppError;

/// 账户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// 角色许可检查
///
/// 管理员隐含拥有所有许可。
pub fn role_allowed(role: Role, allowed: &[Role]) -> bool {
    role.is_admin() || allowed.contains(&role)
}

/// 处理器边界的许可断言
///
/// # 错误
///
/// 角色不在许可集合内返回 403 Forbidden
pub fn require_role(user: &CurrentUser, allowed: &[Role]) -> Result<(), AppError> {
    if role_allowed(user.role, allowed) {
        return Ok(());
    }
    Err(AppError::forbidden(format!(
        "Requires role: {}",
        allowed
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" or ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_always_allowed() {
        assert!(role_allowed(Role::Admin, &[Role::User]));
        assert!(role_allowed(Role::Admin, &[]));
    }

    #[test]
    fn test_user_allowed_only_when_listed() {
        assert!(role_allowed(Role::User, &[Role::User]));
        assert!(!role_allowed(Role::User, &[Role::Admin]));
        assert!(!role_allowed(Role::User, &[]));
    }

    #[test]
    fn test_require_role_maps_to_forbidden() {
        let admin = CurrentUser {
            id: "user:1".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        };
        let user = CurrentUser {
            id: "user:2".to_string(),
            email: "user@example.com".to_string(),
            role: Role::User,
        };

        assert!(require_role(&admin, &[Role::Admin]).is_ok());
        assert!(require_role(&user, &[Role::User]).is_ok());
        assert!(matches!(
            require_role(&user, &[Role::Admin]),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("superuser".parse::<Role>().is_err());
    }
}
