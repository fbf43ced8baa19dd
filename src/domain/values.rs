// ==========================================
// 仓库管理系统 - 值对象
// ==========================================
// 职责: 重量 (Weight) 与问题记录 (Problem) 值对象
// 红线: 值对象无标识,按值比较
// ==========================================

use crate::domain::types::WeightUnit;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ==========================================
// Weight - 重量
// ==========================================
// 十进制数值 + 单位,换算按 10 的幂次精确缩放
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weight {
    value: Decimal,
    unit: WeightUnit,
}

impl Weight {
    pub fn new(value: Decimal, unit: WeightUnit) -> Self {
        Self { value, unit }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn unit(&self) -> WeightUnit {
        self.unit
    }

    /// 换算到目标单位(精确,无舍入)
    ///
    /// 相邻单位相差 1000 倍,即 10 的 3 次幂
    pub fn convert_to(&self, unit: WeightUnit) -> Weight {
        let exp = (self.unit.magnitude() - unit.magnitude()) * 3;
        Weight {
            value: shift_pow10(self.value, exp),
            unit,
        }
    }
}

/// 将十进制数按 10^exp 缩放
fn shift_pow10(value: Decimal, exp: i32) -> Decimal {
    if exp >= 0 {
        value * Decimal::from(10u64.pow(exp as u32))
    } else {
        value / Decimal::from(10u64.pow(exp.unsigned_abs()))
    }
}

// 跨单位按量值比较: 统一换算到较细单位后比较数值
impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        let common = self.unit.min(other.unit);
        self.convert_to(common)
            .value
            .cmp(&other.convert_to(common).value)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

// ==========================================
// Problem - 问题记录
// ==========================================
// 嵌入在 TRANSPORT_ORDER 表的 OCCURRED/MESSAGE_NO/MESSAGE 列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub occurred: DateTime<Utc>, // 发生时间(构造时写入)
    pub message_no: i32,         // 消息编号
    pub message: String,         // 问题描述
}

impl Problem {
    /// 记录一个此刻发生的问题
    pub fn new(message_no: i32, message: impl Into<String>) -> Self {
        Self {
            occurred: Utc::now(),
            message_no,
            message: message.into(),
        }
    }
}
