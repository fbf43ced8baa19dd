// ==========================================
// 仓库管理系统 - 库位领域模型
// ==========================================
// 职责: 库位、库区、库位类型实体
// 对齐: repository/schema.rs - LOCATION / LOCATION_GROUP / LOCATION_TYPE 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Location - 库位
// ==========================================
// 仓库中的单个存储位置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    // ===== 主键 =====
    pub id: Option<i64>, // 持久化前为 None

    // ===== 基础信息 =====
    pub name: String, // 库位坐标名(唯一,如 "AREA/AISL/X/Y/Z")
    pub description: Option<String>,

    // ===== 关联引用 =====
    pub location_group_id: Option<i64>, // 所属库区
    pub location_type_id: Option<i64>,  // 库位类型

    // ===== 可用性 =====
    pub incoming_active: bool, // 允许入库
    pub outgoing_active: bool, // 允许出库

    // ===== 审计字段 =====
    pub last_access: Option<DateTime<Utc>>, // 最后一次存取时间
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            location_group_id: None,
            location_type_id: None,
            incoming_active: true,
            outgoing_active: true,
            last_access: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

// ==========================================
// LocationGroup - 库区
// ==========================================
// 命名的库位集合,可通过 parent_id 组成层级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationGroup {
    pub id: Option<i64>,
    pub name: String, // 库区名(唯一)
    pub description: Option<String>,
    pub parent_id: Option<i64>, // 上级库区,根库区为 None
}

impl LocationGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            parent_id: None,
        }
    }
}

// ==========================================
// LocationType - 库位类型
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationType {
    pub id: Option<i64>,
    pub type_code: String, // 类型代码(唯一,如 "PALLET_SLOT")
    pub description: Option<String>,
}

impl LocationType {
    pub fn new(type_code: impl Into<String>) -> Self {
        Self {
            id: None,
            type_code: type_code.into(),
            description: None,
        }
    }
}
