// ==========================================
// 仓库管理系统 - 系统消息领域模型
// ==========================================
// 对齐: repository/schema.rs - MESSAGE 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 系统消息
///
/// 带编号的文本消息,创建时间在构造时写入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Option<i64>,
    pub message_no: i32,      // 消息编号
    pub message_text: String, // 消息文本
    pub created: DateTime<Utc>,
}

impl Message {
    pub fn new(message_no: i32, message_text: impl Into<String>) -> Self {
        Self {
            id: None,
            message_no,
            message_text: message_text.into(),
            created: Utc::now(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
