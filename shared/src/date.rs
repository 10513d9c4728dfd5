//! 时间类型模块
//!
//! 后端（FastAPI + Mongo）以无时区的 ISO 8601 字符串下发 `created_at`，
//! 例如 `2026-08-30T09:15:00.123000`。`CreatedAt` 透明封装该值，
//! 提供排序与展示所需的最小接口。

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 记录创建时间
///
/// 序列化为 ISO 8601 字符串（与后端一致），可直接比较排序。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CreatedAt(NaiveDateTime);

impl CreatedAt {
    #[inline]
    pub const fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// 面向界面的短标签，例如 `2026-08-30 09:15`
    pub fn label(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M").to_string()
    }

    /// 仅日期部分，例如 `2026-08-30`
    pub fn date_label(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl From<NaiveDateTime> for CreatedAt {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_timestamp_with_microseconds() {
        let ts: CreatedAt = serde_json::from_str(r#""2026-08-30T09:15:00.123000""#).unwrap();
        assert_eq!(ts.label(), "2026-08-30 09:15");
        assert_eq!(ts.date_label(), "2026-08-30");
    }

    #[test]
    fn ordering_follows_the_timeline() {
        let older: CreatedAt = serde_json::from_str(r#""2026-08-29T08:00:00""#).unwrap();
        let newer: CreatedAt = serde_json::from_str(r#""2026-08-30T08:00:00""#).unwrap();
        assert!(older < newer);
    }
}
