// ==========================================
// 仓库管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值对象与业务规则
// 红线: 不含数据访问逻辑,不依赖仓储层
// ==========================================

pub mod error;
pub mod location;
pub mod message;
pub mod transport_order;
pub mod transport_unit;
pub mod tree;
pub mod types;
pub mod values;

// 重导出核心类型
pub use error::{TransportOrderError, TransportOrderResult};
pub use location::{Location, LocationGroup, LocationType};
pub use message::Message;
pub use transport_order::TransportOrder;
pub use transport_unit::{TransportUnit, TransportUnitType, TypePlacingRule};
pub use tree::TreeNode;
pub use types::{TransportOrderState, WeightUnit};
pub use values::{Problem, Weight};
