// ==========================================
// 仓库管理系统 - 库位服务
// ==========================================
// 职责: 库位/库区的只读业务接口
// 约束: 事务边界由外部运行时提供,此层只做读与组装
// ==========================================

use crate::domain::location::{Location, LocationGroup};
use crate::domain::tree::TreeNode;
use crate::repository::{LocationGroupRepository, LocationRepository};
use crate::service::error::{ServiceError, ServiceResult};
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 库区层级树,根为虚拟节点(data=None)
pub type LocationGroupTree = TreeNode<i64, Option<LocationGroup>>;

/// 库位服务
pub struct LocationService {
    location_repo: LocationRepository,
    group_repo: LocationGroupRepository,
}

impl LocationService {
    pub fn new(db_path: &str) -> ServiceResult<Self> {
        Ok(Self {
            location_repo: LocationRepository::new(db_path)?,
            group_repo: LocationGroupRepository::new(db_path)?,
        })
    }

    /// 共享同一个连接(服务内各仓储共用事务语境)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            location_repo: LocationRepository::from_connection(conn.clone()),
            group_repo: LocationGroupRepository::from_connection(conn),
        }
    }

    /// 查询全部库位
    ///
    /// 只读;返回按坐标名排序的完整集合
    pub fn get_all_locations(&self) -> ServiceResult<Vec<Location>> {
        debug!("查询全部库位");
        Ok(self.location_repo.find_all()?)
    }

    /// 组装库区层级树
    ///
    /// 每个库区按 parent 关系挂接,兄弟顺序与主键顺序一致;
    /// parent 悬空的库区挂在根下
    pub fn location_group_tree(&self) -> ServiceResult<LocationGroupTree> {
        let groups = self.group_repo.find_all()?;
        debug!(count = groups.len(), "组装库区层级树");

        let known_ids: HashSet<i64> = groups.iter().filter_map(|g| g.id).collect();
        let mut by_parent: HashMap<Option<i64>, Vec<(i64, LocationGroup)>> = HashMap::new();
        for group in groups {
            let id = group.id.ok_or_else(|| {
                ServiceError::InternalError(format!("库区{}缺少主键", group.name))
            })?;
            let parent_key = group.parent_id.filter(|pid| known_ids.contains(pid));
            by_parent.entry(parent_key).or_default().push((id, group));
        }

        let mut root: LocationGroupTree = TreeNode::new(None);
        attach_children(&mut root, None, &mut by_parent);
        Ok(root)
    }
}

/// 递归挂接 parent_id 的所有直接子库区
fn attach_children(
    parent: &mut LocationGroupTree,
    parent_id: Option<i64>,
    by_parent: &mut HashMap<Option<i64>, Vec<(i64, LocationGroup)>>,
) {
    if let Some(children) = by_parent.remove(&parent_id) {
        for (id, group) in children {
            let mut node = TreeNode::new(Some(group));
            attach_children(&mut node, Some(id), by_parent);
            parent.add_child(id, node);
        }
    }
}
