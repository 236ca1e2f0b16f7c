//! Time helpers

use chrono::Utc;

/// Current Unix timestamp in milliseconds
///
/// 全部时间戳字段统一使用毫秒精度的 Unix 时间
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
