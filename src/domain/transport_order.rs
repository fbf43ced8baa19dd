// ==========================================
// 仓库管理系统 - 运输订单领域模型
// ==========================================
// 职责: 运输订单实体与其生命周期状态机
// 红线: state/start_date 只能通过 set_state 变更,
//       其余字段为普通数据字段
// 对齐: repository/schema.rs - TRANSPORT_ORDER 表
// ==========================================

use crate::domain::error::{TransportOrderError, TransportOrderResult};
use crate::domain::types::TransportOrderState;
use crate::domain::values::Problem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TransportOrder - 运输订单
// ==========================================
// 用途: 指示将一个运输单元从源库位搬运到目标库位(或目标库区)
// 生命周期: CREATED → INITIALIZED → STARTED → INTERRUPTED/ONFAILURE → FINISHED
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportOrder {
    // ===== 主键 =====
    pub id: Option<i64>, // 持久化前为 None

    // ===== 关联引用(外键) =====
    pub transport_unit_id: Option<i64>,        // 被搬运的运输单元
    pub source_location_id: Option<i64>,       // 源库位
    pub target_location_id: Option<i64>,       // 目标库位
    pub target_location_group_id: Option<i64>, // 目标库区(与目标库位二选一即可)

    // ===== 业务属性 =====
    pub priority: i16,            // 优先级,数值越大越紧急
    pub problem: Option<Problem>, // 最近一次记录的问题

    // ===== 时间信息 =====
    pub creation_date: DateTime<Utc>,         // 创建时间(构造时写入)
    start_date: Option<DateTime<Utc>>,        // 启动时间(进入 STARTED 时写入一次)
    pub end_date: Option<DateTime<Utc>>,      // 结束时间(由外部运行时写入)
    pub date_updated: Option<DateTime<Utc>>,  // 最后更新时间

    // ===== 状态 =====
    state: TransportOrderState, // 当前状态,仅 set_state 可变更

    // ===== 并发控制 =====
    pub version: i64, // 乐观锁版本计数,由仓储层在提交时比较
}

impl TransportOrder {
    /// 创建新的运输订单
    ///
    /// 初始状态为 CREATED,创建时间取当前时刻
    pub fn new() -> Self {
        Self {
            id: None,
            transport_unit_id: None,
            source_location_id: None,
            target_location_id: None,
            target_location_group_id: None,
            priority: 0,
            problem: None,
            creation_date: Utc::now(),
            start_date: None,
            end_date: None,
            date_updated: None,
            state: TransportOrderState::Created,
            version: 0,
        }
    }

    /// 判断实体是否尚未持久化
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// 当前状态
    pub fn state(&self) -> TransportOrderState {
        self.state
    }

    /// 启动时间(未进入过 STARTED 时为 None)
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// 受保护的状态转换
    ///
    /// # 规则
    /// - 目标状态必须在当前状态的显式转换表内,否则返回 IllegalTransition
    /// - 离开 CREATED 额外要求: 已绑定运输单元,且目标库位/目标库区至少其一
    /// - 首次进入 STARTED 时写入 start_date,这是状态变更唯一的字段副作用
    ///
    /// # 返回
    /// - Ok(()): 状态已提交为 new_state
    /// - Err: 状态保持不变,无任何副作用
    pub fn set_state(&mut self, new_state: TransportOrderState) -> TransportOrderResult<()> {
        self.validate_state_change(new_state)?;
        if new_state == TransportOrderState::Started && self.start_date.is_none() {
            self.start_date = Some(Utc::now());
        }
        self.state = new_state;
        Ok(())
    }

    /// 校验状态转换合法性(不产生副作用)
    fn validate_state_change(&self, new_state: TransportOrderState) -> TransportOrderResult<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(TransportOrderError::IllegalTransition {
                from: self.state,
                to: new_state,
            });
        }
        if self.state == TransportOrderState::Created {
            self.validate_initialization_condition()?;
        }
        Ok(())
    }

    /// 离开 CREATED 的前置条件
    fn validate_initialization_condition(&self) -> TransportOrderResult<()> {
        if self.transport_unit_id.is_none() {
            return Err(TransportOrderError::MissingPrecondition {
                reason: "未绑定运输单元".to_string(),
            });
        }
        if self.target_location_id.is_none() && self.target_location_group_id.is_none() {
            return Err(TransportOrderError::MissingPrecondition {
                reason: "目标库位与目标库区均未设置".to_string(),
            });
        }
        Ok(())
    }

    /// 从持久化字段重建实体(仅供仓储层行映射使用)
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn hydrate(
        id: i64,
        transport_unit_id: Option<i64>,
        source_location_id: Option<i64>,
        target_location_id: Option<i64>,
        target_location_group_id: Option<i64>,
        priority: i16,
        problem: Option<Problem>,
        creation_date: DateTime<Utc>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        date_updated: Option<DateTime<Utc>>,
        state: TransportOrderState,
        version: i64,
    ) -> Self {
        Self {
            id: Some(id),
            transport_unit_id,
            source_location_id,
            target_location_id,
            target_location_group_id,
            priority,
            problem,
            creation_date,
            start_date,
            end_date,
            date_updated,
            state,
            version,
        }
    }
}

impl Default for TransportOrder {
    fn default() -> Self {
        Self::new()
    }
}
