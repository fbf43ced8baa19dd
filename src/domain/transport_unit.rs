// ==========================================
// 仓库管理系统 - 运输单元领域模型
// ==========================================
// 职责: 运输单元、运输单元类型、放置规则实体
// 对齐: repository/schema.rs - TRANSPORT_UNIT /
//       TRANSPORT_UNIT_TYPE / TYPE_PLACING_RULE 表
// ==========================================

use crate::domain::values::Weight;
use serde::{Deserialize, Serialize};

// ==========================================
// TransportUnit - 运输单元
// ==========================================
// 被系统跟踪的实物载具(托盘、料箱等)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportUnit {
    // ===== 主键 =====
    pub id: Option<i64>,

    // ===== 基础信息 =====
    pub unit_id: String, // 业务编号(条码,唯一)

    // ===== 关联引用 =====
    pub transport_unit_type_id: Option<i64>, // 运输单元类型
    pub actual_location_id: Option<i64>,     // 当前所在库位

    // ===== 载重 =====
    pub weight: Option<Weight>, // 实测重量
}

impl TransportUnit {
    pub fn new(unit_id: impl Into<String>) -> Self {
        Self {
            id: None,
            unit_id: unit_id.into(),
            transport_unit_type_id: None,
            actual_location_id: None,
            weight: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

// ==========================================
// TransportUnitType - 运输单元类型
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportUnitType {
    pub id: Option<i64>,
    pub type_code: String, // 类型代码(唯一,如 "EURO_PALLET")
    pub description: Option<String>,
}

impl TransportUnitType {
    pub fn new(type_code: impl Into<String>) -> Self {
        Self {
            id: None,
            type_code: type_code.into(),
            description: None,
        }
    }
}

// ==========================================
// TypePlacingRule - 放置规则
// ==========================================
// 规定某运输单元类型允许放置在哪类库位
// 约束: (运输单元类型, 特权级, 允许库位类型) 组合唯一,由数据库约束保证
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypePlacingRule {
    pub id: Option<i64>,
    pub transport_unit_type_id: i64,  // 规则所属运输单元类型
    pub privilege_level: i32,         // 特权级,默认 0
    pub allowed_location_type_id: i64, // 允许的库位类型
}

impl TypePlacingRule {
    pub fn new(transport_unit_type_id: i64, allowed_location_type_id: i64) -> Self {
        Self {
            id: None,
            transport_unit_type_id,
            privilege_level: 0,
            allowed_location_type_id,
        }
    }

    pub fn with_privilege_level(
        transport_unit_type_id: i64,
        privilege_level: i32,
        allowed_location_type_id: i64,
    ) -> Self {
        Self {
            id: None,
            transport_unit_type_id,
            privilege_level,
            allowed_location_type_id,
        }
    }
}
