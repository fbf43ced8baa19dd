// ==========================================
// 仓库管理系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod location_repo;
pub mod message_repo;
pub mod schema;
pub mod transport_order_repo;
pub mod transport_unit_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use location_repo::{LocationGroupRepository, LocationRepository, LocationTypeRepository};
pub use message_repo::MessageRepository;
pub use transport_order_repo::TransportOrderRepository;
pub use transport_unit_repo::{
    TransportUnitRepository, TransportUnitTypeRepository, TypePlacingRuleRepository,
};
