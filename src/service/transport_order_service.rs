// ==========================================
// 仓库管理系统 - 运输订单服务
// ==========================================
// 职责: 运输订单的创建、绑定、状态变更与问题上报
// 约束: 状态合法性由领域层保证,此层负责输入解析、
//       持久化与错误翻译
// ==========================================

use crate::domain::transport_order::TransportOrder;
use crate::domain::types::TransportOrderState;
use crate::domain::values::Problem;
use crate::repository::TransportOrderRepository;
use crate::service::error::{ServiceError, ServiceResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// 运输订单服务
pub struct TransportOrderService {
    order_repo: TransportOrderRepository,
}

impl TransportOrderService {
    pub fn new(db_path: &str) -> ServiceResult<Self> {
        Ok(Self {
            order_repo: TransportOrderRepository::new(db_path)?,
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            order_repo: TransportOrderRepository::from_connection(conn),
        }
    }

    /// 创建运输订单(状态 CREATED)并持久化
    ///
    /// # 参数
    /// - transport_unit_id: 被搬运的运输单元(可稍后绑定)
    /// - priority: 优先级,数值越大越紧急
    pub fn create_order(
        &self,
        transport_unit_id: Option<i64>,
        priority: i16,
    ) -> ServiceResult<TransportOrder> {
        let mut order = TransportOrder::new();
        order.transport_unit_id = transport_unit_id;
        order.priority = priority;

        let id = self.order_repo.insert(&order)?;
        info!(order_id = id, priority = i64::from(priority), "运输订单已创建");

        self.load_order(id)
    }

    /// 按主键读取订单,不存在返回 NotFound
    pub fn load_order(&self, order_id: i64) -> ServiceResult<TransportOrder> {
        self.order_repo
            .find_by_id(order_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("TransportOrder(id={order_id})不存在")))
    }

    /// 绑定运输单元与搬运目标
    ///
    /// 目标库位与目标库区至少其一;全部为 None 视为无效输入
    pub fn bind_targets(
        &self,
        order_id: i64,
        transport_unit_id: Option<i64>,
        source_location_id: Option<i64>,
        target_location_id: Option<i64>,
        target_location_group_id: Option<i64>,
    ) -> ServiceResult<TransportOrder> {
        if transport_unit_id.is_none()
            && target_location_id.is_none()
            && target_location_group_id.is_none()
        {
            return Err(ServiceError::InvalidInput(
                "未提供任何可绑定的引用".to_string(),
            ));
        }

        let mut order = self.load_order(order_id)?;
        if transport_unit_id.is_some() {
            order.transport_unit_id = transport_unit_id;
        }
        if source_location_id.is_some() {
            order.source_location_id = source_location_id;
        }
        if target_location_id.is_some() {
            order.target_location_id = target_location_id;
        }
        if target_location_group_id.is_some() {
            order.target_location_group_id = target_location_group_id;
        }

        self.order_repo.update(&order)?;
        debug!(order_id, "订单引用已绑定");
        self.load_order(order_id)
    }

    /// 状态变更
    ///
    /// # 流程
    /// 1. 解析目标状态字符串(空/未知 → InvalidInput)
    /// 2. 读取订单,经领域状态机校验并提交
    /// 3. 乐观锁更新持久化
    ///
    /// # 返回
    /// - Ok(TransportOrder): 变更后的订单(版本已递增)
    pub fn change_state(&self, order_id: i64, new_state: &str) -> ServiceResult<TransportOrder> {
        let target = TransportOrderState::parse(new_state).ok_or_else(|| {
            ServiceError::InvalidInput(format!("无法识别的订单状态: {new_state:?}"))
        })?;
        self.transition(order_id, target)
    }

    /// 状态变更(已解析的目标状态)
    pub fn transition(
        &self,
        order_id: i64,
        target: TransportOrderState,
    ) -> ServiceResult<TransportOrder> {
        let mut order = self.load_order(order_id)?;
        let from = order.state();

        if let Err(e) = order.set_state(target) {
            warn!(order_id, %from, to = %target, error = %e, "状态转换被拒绝");
            return Err(e.into());
        }

        self.order_repo.update(&order)?;
        info!(order_id, %from, to = %target, "订单状态已变更");
        self.load_order(order_id)
    }

    /// 上报订单问题
    ///
    /// 覆盖上一次问题记录,发生时间取当前时刻
    pub fn report_problem(
        &self,
        order_id: i64,
        message_no: i32,
        message: &str,
    ) -> ServiceResult<TransportOrder> {
        let mut order = self.load_order(order_id)?;
        order.problem = Some(Problem::new(message_no, message));
        self.order_repo.update(&order)?;
        warn!(order_id, message_no, message, "订单问题已上报");
        self.load_order(order_id)
    }
}
