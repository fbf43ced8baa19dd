// ==========================================
// 仓库管理系统 - 服务层
// ==========================================
// 职责: 提供业务服务接口,供外部事务运行时调用
// 约束: 同步接口;事务划分与提交由外部运行时负责
// ==========================================

pub mod error;
pub mod location_service;
pub mod transport_order_service;

// 重导出核心类型
pub use error::{ServiceError, ServiceResult};
pub use location_service::{LocationGroupTree, LocationService};
pub use transport_order_service::TransportOrderService;
