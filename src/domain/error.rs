// ==========================================
// 仓库管理系统 - 领域层错误类型
// ==========================================
// 职责: 运输订单状态机的转换失败原因
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::TransportOrderState;
use thiserror::Error;

/// 运输订单领域错误
///
/// 所有失败同步返回,不做重试,状态不发生部分变更
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportOrderError {
    /// 非法状态转换(回退或 CREATED 之后的非法首步)
    #[error("非法状态转换: from={from} to={to}")]
    IllegalTransition {
        from: TransportOrderState,
        to: TransportOrderState,
    },

    /// 离开 CREATED 的前置条件不满足
    /// 要求: 已绑定运输单元,且目标库位与目标库区至少设置其一
    #[error("初始化前置条件不满足: {reason}")]
    MissingPrecondition { reason: String },
}

/// Result 类型别名
pub type TransportOrderResult<T> = Result<T, TransportOrderError>;
