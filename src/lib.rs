// ==========================================
// 仓库管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 领域模型与薄服务层,事务运行时在外部
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与值对象
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 服务层 - 业务接口
pub mod service;

// 数据库基础设施(连接初始化/PRAGMA 统一)
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{TransportOrderState, WeightUnit};

// 领域实体与值对象
pub use domain::{
    Location, LocationGroup, LocationType, Message, Problem, TransportOrder, TransportUnit,
    TransportUnitType, TreeNode, TypePlacingRule, Weight,
};

// 领域错误
pub use domain::error::TransportOrderError;

// 仓储
pub use repository::{
    LocationGroupRepository, LocationRepository, LocationTypeRepository, MessageRepository,
    RepositoryError, TransportOrderRepository, TransportUnitRepository,
    TransportUnitTypeRepository, TypePlacingRuleRepository,
};

// 服务
pub use service::{LocationService, ServiceError, TransportOrderService};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓库管理系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
