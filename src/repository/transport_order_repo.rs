// ==========================================
// 仓库管理系统 - 运输订单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑,状态合法性由领域层保证
// 并发: TRANSPORT_ORDER.VERSION 为乐观锁计数,
//       提交时比较,冲突返回 OptimisticLockFailure
// ==========================================

use crate::domain::transport_order::TransportOrder;
use crate::domain::types::TransportOrderState;
use crate::domain::values::Problem;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// 运输订单仓储
/// 职责: 管理 TRANSPORT_ORDER 表的 CRUD 操作与乐观锁更新
pub struct TransportOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

const ORDER_COLUMNS: &str = "ID, TRANSPORT_UNIT, SOURCE_LOCATION, TARGET_LOCATION, \
     TARGET_LOCATION_GROUP, PRIORITY, OCCURRED, MESSAGE_NO, MESSAGE, \
     CREATION_DATE, START_DATE, END_DATE, DATE_UPDATED, STATE, VERSION";

fn map_transport_order(row: &Row<'_>) -> SqliteResult<TransportOrder> {
    // OCCURRED/MESSAGE_NO/MESSAGE 三列共同嵌入一个 Problem
    let message_no: Option<i32> = row.get(7)?;
    let problem = match message_no {
        Some(message_no) => Some(Problem {
            occurred: row.get(6)?,
            message_no,
            message: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        }),
        None => None,
    };

    let state_text: String = row.get(13)?;
    let state = TransportOrderState::parse(&state_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            13,
            Type::Text,
            format!("未知订单状态: {state_text}").into(),
        )
    })?;

    Ok(TransportOrder::hydrate(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        problem,
        row.get::<_, DateTime<Utc>>(9)?,
        row.get::<_, Option<DateTime<Utc>>>(10)?,
        row.get::<_, Option<DateTime<Utc>>>(11)?,
        row.get::<_, Option<DateTime<Utc>>>(12)?,
        state,
        row.get(14)?,
    ))
}

impl TransportOrderRepository {
    /// 创建新的运输订单仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入运输订单,返回生成的主键
    ///
    /// VERSION 从 0 起步
    pub fn insert(&self, order: &TransportOrder) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let (occurred, message_no, message) = problem_columns(&order.problem);
        conn.execute(
            r#"
            INSERT INTO TRANSPORT_ORDER (
                TRANSPORT_UNIT, SOURCE_LOCATION, TARGET_LOCATION, TARGET_LOCATION_GROUP,
                PRIORITY, OCCURRED, MESSAGE_NO, MESSAGE,
                CREATION_DATE, START_DATE, END_DATE, DATE_UPDATED, STATE, VERSION
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 0)
            "#,
            params![
                order.transport_unit_id,
                order.source_location_id,
                order.target_location_id,
                order.target_location_group_id,
                order.priority,
                occurred,
                message_no,
                message,
                order.creation_date,
                order.start_date(),
                order.end_date,
                Utc::now(),
                order.state().to_db_str(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(order_id = id, state = %order.state(), "运输订单已插入");
        Ok(id)
    }

    /// 按主键查询运输订单
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<TransportOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ORDER_COLUMNS} FROM TRANSPORT_ORDER WHERE ID = ?1"
        ))?;
        let order = stmt
            .query_row(params![id], map_transport_order)
            .optional()?;
        Ok(order)
    }

    /// 按状态查询运输订单,优先级降序
    pub fn find_by_state(
        &self,
        state: TransportOrderState,
    ) -> RepositoryResult<Vec<TransportOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ORDER_COLUMNS} FROM TRANSPORT_ORDER \
             WHERE STATE = ?1 ORDER BY PRIORITY DESC, ID"
        ))?;
        let orders = stmt
            .query_map(params![state.to_db_str()], map_transport_order)?
            .collect::<SqliteResult<Vec<TransportOrder>>>()?;
        Ok(orders)
    }

    /// 乐观锁更新
    ///
    /// 以 order.version 为期望版本提交;命中则 VERSION + 1,
    /// 未命中则区分记录不存在 (NotFound) 与版本过期 (OptimisticLockFailure)
    ///
    /// # 返回
    /// - Ok(i64): 提交后的新版本号
    pub fn update(&self, order: &TransportOrder) -> RepositoryResult<i64> {
        let id = order.id.ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "id".to_string(),
                message: "未持久化的订单不能更新".to_string(),
            }
        })?;

        let conn = self.get_conn()?;
        let (occurred, message_no, message) = problem_columns(&order.problem);
        let affected = conn.execute(
            r#"
            UPDATE TRANSPORT_ORDER SET
                TRANSPORT_UNIT = ?1, SOURCE_LOCATION = ?2, TARGET_LOCATION = ?3,
                TARGET_LOCATION_GROUP = ?4, PRIORITY = ?5,
                OCCURRED = ?6, MESSAGE_NO = ?7, MESSAGE = ?8,
                START_DATE = ?9, END_DATE = ?10, DATE_UPDATED = ?11,
                STATE = ?12, VERSION = VERSION + 1
            WHERE ID = ?13 AND VERSION = ?14
            "#,
            params![
                order.transport_unit_id,
                order.source_location_id,
                order.target_location_id,
                order.target_location_group_id,
                order.priority,
                occurred,
                message_no,
                message,
                order.start_date(),
                order.end_date,
                Utc::now(),
                order.state().to_db_str(),
                id,
                order.version,
            ],
        )?;

        if affected == 0 {
            // 区分"记录不存在"与"版本过期"
            let actual: Option<i64> = conn
                .query_row(
                    "SELECT VERSION FROM TRANSPORT_ORDER WHERE ID = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;
            return match actual {
                Some(actual) => Err(RepositoryError::OptimisticLockFailure {
                    entity: "TransportOrder".to_string(),
                    id,
                    expected: order.version,
                    actual,
                }),
                None => Err(RepositoryError::NotFound {
                    entity: "TransportOrder".to_string(),
                    id: id.to_string(),
                }),
            };
        }

        let new_version = order.version + 1;
        debug!(
            order_id = id,
            state = %order.state(),
            version = new_version,
            "运输订单已更新"
        );
        Ok(new_version)
    }
}

/// Problem 的嵌入列展开
fn problem_columns(
    problem: &Option<Problem>,
) -> (Option<DateTime<Utc>>, Option<i32>, Option<&str>) {
    match problem {
        Some(p) => (Some(p.occurred), Some(p.message_no), Some(p.message.as_str())),
        None => (None, None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::repository::schema::init_schema(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn insert_unit_and_location(conn: &Arc<Mutex<Connection>>) -> (i64, i64) {
        let guard = conn.lock().unwrap();
        guard
            .execute("INSERT INTO TRANSPORT_UNIT (UNIT_ID) VALUES ('TU-1')", [])
            .unwrap();
        let unit_id = guard.last_insert_rowid();
        guard
            .execute("INSERT INTO LOCATION (NAME) VALUES ('A/01/01/01')", [])
            .unwrap();
        let location_id = guard.last_insert_rowid();
        (unit_id, location_id)
    }

    #[test]
    fn test_insert_and_find_roundtrip() {
        let conn = setup_test_db();
        let (unit_id, location_id) = insert_unit_and_location(&conn);
        let repo = TransportOrderRepository::from_connection(conn);

        let mut order = TransportOrder::new();
        order.transport_unit_id = Some(unit_id);
        order.target_location_id = Some(location_id);
        order.priority = 5;
        let id = repo.insert(&order).unwrap();

        let found = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.state(), TransportOrderState::Created);
        assert_eq!(found.priority, 5);
        assert_eq!(found.transport_unit_id, Some(unit_id));
        assert_eq!(found.version, 0);
        assert!(found.problem.is_none());
        assert!(!found.is_new());
    }

    #[test]
    fn test_update_bumps_version() {
        let conn = setup_test_db();
        let (unit_id, location_id) = insert_unit_and_location(&conn);
        let repo = TransportOrderRepository::from_connection(conn);

        let mut order = TransportOrder::new();
        order.transport_unit_id = Some(unit_id);
        order.target_location_id = Some(location_id);
        let id = repo.insert(&order).unwrap();

        let mut loaded = repo.find_by_id(id).unwrap().unwrap();
        loaded.set_state(TransportOrderState::Initialized).unwrap();
        let new_version = repo.update(&loaded).unwrap();
        assert_eq!(new_version, 1);

        let reread = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(reread.state(), TransportOrderState::Initialized);
        assert_eq!(reread.version, 1);
        assert!(reread.date_updated.is_some());
    }

    #[test]
    fn test_stale_version_update_rejected() {
        let conn = setup_test_db();
        let (unit_id, location_id) = insert_unit_and_location(&conn);
        let repo = TransportOrderRepository::from_connection(conn);

        let mut order = TransportOrder::new();
        order.transport_unit_id = Some(unit_id);
        order.target_location_id = Some(location_id);
        let id = repo.insert(&order).unwrap();

        // 两个并发副本
        let mut first = repo.find_by_id(id).unwrap().unwrap();
        let mut second = repo.find_by_id(id).unwrap().unwrap();

        first.set_state(TransportOrderState::Initialized).unwrap();
        repo.update(&first).unwrap();

        second.priority = 9;
        let result = repo.update(&second);
        match result {
            Err(RepositoryError::OptimisticLockFailure {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 0);
                assert_eq!(actual, 1);
            }
            other => panic!("应返回乐观锁冲突, 实际: {other:?}"),
        }

        // 失败的提交不得改变行内容
        let reread = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(reread.priority, 0);
        assert_eq!(reread.state(), TransportOrderState::Initialized);
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let conn = setup_test_db();
        let repo = TransportOrderRepository::from_connection(conn);

        let mut order = TransportOrder::new();
        order.id = Some(4242);
        assert!(matches!(
            repo.update(&order),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_problem_embedding_roundtrip() {
        let conn = setup_test_db();
        let repo = TransportOrderRepository::from_connection(conn);

        let mut order = TransportOrder::new();
        order.problem = Some(Problem::new(1042, "目标库位被占用"));
        let id = repo.insert(&order).unwrap();

        let found = repo.find_by_id(id).unwrap().unwrap();
        let problem = found.problem.expect("问题记录应被嵌入存取");
        assert_eq!(problem.message_no, 1042);
        assert_eq!(problem.message, "目标库位被占用");
    }

    #[test]
    fn test_find_by_state_ordered_by_priority() {
        let conn = setup_test_db();
        let repo = TransportOrderRepository::from_connection(conn);

        for priority in [1i16, 9, 5] {
            let mut order = TransportOrder::new();
            order.priority = priority;
            repo.insert(&order).unwrap();
        }

        let created = repo.find_by_state(TransportOrderState::Created).unwrap();
        let priorities: Vec<i16> = created.iter().map(|o| o.priority).collect();
        assert_eq!(priorities, vec![9, 5, 1]);
        assert!(repo
            .find_by_state(TransportOrderState::Started)
            .unwrap()
            .is_empty());
    }
}
