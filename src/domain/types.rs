// ==========================================
// 仓库管理系统 - 领域类型定义
// ==========================================
// 职责: 定义运输订单状态、重量单位等枚举类型
// 对齐: repository/schema.rs - TRANSPORT_ORDER.STATE 列
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 运输订单状态 (Transport Order State)
// ==========================================
// 状态只允许沿声明顺序前进,禁止回退
// 红线: 转换合法性由显式转换表决定,不依赖枚举序数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportOrderState {
    Created,     // 已创建(内存中初始状态)
    Initialized, // 已初始化(运输单元与目标已绑定)
    Started,     // 已启动(唯一可执行状态)
    Interrupted, // 已中断
    #[serde(rename = "ONFAILURE")]
    OnFailure, // 故障
    Finished,    // 已完成
}

impl TransportOrderState {
    /// 显式转换表: 当前状态 → 允许的目标状态集合
    ///
    /// # 规则
    /// - CREATED 之后只允许进入 INITIALIZED
    /// - 其余状态允许保持原状态(无操作)或向后续状态前进
    /// - 不存在任何回退路径
    pub fn allowed_targets(self) -> &'static [TransportOrderState] {
        use TransportOrderState::*;
        match self {
            Created => &[Initialized],
            Initialized => &[Initialized, Started, Interrupted, OnFailure, Finished],
            Started => &[Started, Interrupted, OnFailure, Finished],
            Interrupted => &[Interrupted, OnFailure, Finished],
            OnFailure => &[OnFailure, Finished],
            Finished => &[Finished],
        }
    }

    /// 判断是否允许转换到目标状态
    pub fn can_transition_to(self, target: TransportOrderState) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// 从字符串解析状态(未知输入返回 None,由调用方决定如何上报)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CREATED" => Some(TransportOrderState::Created),
            "INITIALIZED" => Some(TransportOrderState::Initialized),
            "STARTED" => Some(TransportOrderState::Started),
            "INTERRUPTED" => Some(TransportOrderState::Interrupted),
            "ONFAILURE" => Some(TransportOrderState::OnFailure),
            "FINISHED" => Some(TransportOrderState::Finished),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TransportOrderState::Created => "CREATED",
            TransportOrderState::Initialized => "INITIALIZED",
            TransportOrderState::Started => "STARTED",
            TransportOrderState::Interrupted => "INTERRUPTED",
            TransportOrderState::OnFailure => "ONFAILURE",
            TransportOrderState::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for TransportOrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 重量单位 (Weight Unit)
// ==========================================
// 相邻单位相差 1000 倍,换算以 10 的幂次缩放
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightUnit {
    Mg, // 毫克
    G,  // 克
    Kg, // 千克
    T,  // 吨
}

impl WeightUnit {
    /// 单位在换算链上的位置(Mg=0, G=1, Kg=2, T=3)
    pub fn magnitude(self) -> i32 {
        match self {
            WeightUnit::Mg => 0,
            WeightUnit::G => 1,
            WeightUnit::Kg => 2,
            WeightUnit::T => 3,
        }
    }

    /// 从字符串解析重量单位
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "MG" => Some(WeightUnit::Mg),
            "G" => Some(WeightUnit::G),
            "KG" => Some(WeightUnit::Kg),
            "T" => Some(WeightUnit::T),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            WeightUnit::Mg => "MG",
            WeightUnit::G => "G",
            WeightUnit::Kg => "KG",
            WeightUnit::T => "T",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_only_initializes() {
        let created = TransportOrderState::Created;
        assert!(created.can_transition_to(TransportOrderState::Initialized));
        assert!(!created.can_transition_to(TransportOrderState::Created));
        assert!(!created.can_transition_to(TransportOrderState::Started));
        assert!(!created.can_transition_to(TransportOrderState::Finished));
    }

    #[test]
    fn test_no_backward_transition() {
        use TransportOrderState::*;
        let order = [Created, Initialized, Started, Interrupted, OnFailure, Finished];
        for (i, from) in order.iter().enumerate() {
            for to in order.iter().take(i) {
                assert!(!from.can_transition_to(*to), "{} -> {} 不应合法", from, to);
            }
        }
    }

    #[test]
    fn test_same_state_allowed_except_created() {
        use TransportOrderState::*;
        for s in [Initialized, Started, Interrupted, OnFailure, Finished] {
            assert!(s.can_transition_to(s), "{} 自转换应合法", s);
        }
        assert!(!Created.can_transition_to(Created));
    }

    #[test]
    fn test_state_parse_roundtrip() {
        use TransportOrderState::*;
        for s in [Created, Initialized, Started, Interrupted, OnFailure, Finished] {
            assert_eq!(TransportOrderState::parse(s.to_db_str()), Some(s));
        }
        assert_eq!(TransportOrderState::parse("CANCELLED"), None);
        assert_eq!(TransportOrderState::parse(""), None);
    }

    #[test]
    fn test_state_json_matches_db_string() {
        use TransportOrderState::*;
        // JSON 表示与数据库存储字符串一致(含 ONFAILURE 的特殊拼写)
        for s in [Created, Initialized, Started, Interrupted, OnFailure, Finished] {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.to_db_str()));

            let parsed: TransportOrderState = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, s);
        }
    }

    #[test]
    fn test_weight_unit_magnitude_order() {
        assert!(WeightUnit::Mg.magnitude() < WeightUnit::G.magnitude());
        assert!(WeightUnit::Kg.magnitude() < WeightUnit::T.magnitude());
        assert_eq!(WeightUnit::parse("kg"), Some(WeightUnit::Kg));
    }
}
