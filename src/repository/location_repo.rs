// ==========================================
// 仓库管理系统 - 库位数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::domain::location::{Location, LocationGroup, LocationType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// LocationRepository - 库位仓储
// ==========================================

/// 库位仓储
/// 职责: 管理 LOCATION 表的 CRUD 操作
pub struct LocationRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_location(row: &Row<'_>) -> SqliteResult<Location> {
    Ok(Location {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        location_group_id: row.get(3)?,
        location_type_id: row.get(4)?,
        incoming_active: row.get(5)?,
        outgoing_active: row.get(6)?,
        last_access: row.get::<_, Option<DateTime<Utc>>>(7)?,
    })
}

const LOCATION_COLUMNS: &str = "ID, NAME, DESCRIPTION, LOCATION_GROUP, LOCATION_TYPE, \
     INCOMING_ACTIVE, OUTGOING_ACTIVE, LAST_ACCESS";

impl LocationRepository {
    /// 创建新的库位仓储实例
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入库位,返回生成的主键
    pub fn insert(&self, location: &Location) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO LOCATION (
                NAME, DESCRIPTION, LOCATION_GROUP, LOCATION_TYPE,
                INCOMING_ACTIVE, OUTGOING_ACTIVE, LAST_ACCESS
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                location.name,
                location.description,
                location.location_group_id,
                location.location_type_id,
                location.incoming_active,
                location.outgoing_active,
                location.last_access,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询库位
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Location>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {LOCATION_COLUMNS} FROM LOCATION WHERE ID = ?1"
        ))?;
        let location = stmt.query_row(params![id], map_location).optional()?;
        Ok(location)
    }

    /// 按库位坐标名查询
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Location>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {LOCATION_COLUMNS} FROM LOCATION WHERE NAME = ?1"
        ))?;
        let location = stmt.query_row(params![name], map_location).optional()?;
        Ok(location)
    }

    /// 查询全部库位,按坐标名排序
    pub fn find_all(&self) -> RepositoryResult<Vec<Location>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {LOCATION_COLUMNS} FROM LOCATION ORDER BY NAME"
        ))?;
        let locations = stmt
            .query_map([], map_location)?
            .collect::<SqliteResult<Vec<Location>>>()?;
        Ok(locations)
    }

    /// 更新库位最后存取时间
    pub fn touch_last_access(&self, id: i64, at: DateTime<Utc>) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE LOCATION SET LAST_ACCESS = ?1 WHERE ID = ?2",
            params![at, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Location".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除库位
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM LOCATION WHERE ID = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Location".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// LocationGroupRepository - 库区仓储
// ==========================================

/// 库区仓储
/// 职责: 管理 LOCATION_GROUP 表的 CRUD 操作
pub struct LocationGroupRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_location_group(row: &Row<'_>) -> SqliteResult<LocationGroup> {
    Ok(LocationGroup {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        parent_id: row.get(3)?,
    })
}

impl LocationGroupRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入库区,返回生成的主键
    pub fn insert(&self, group: &LocationGroup) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO LOCATION_GROUP (NAME, DESCRIPTION, PARENT) VALUES (?1, ?2, ?3)",
            params![group.name, group.description, group.parent_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询库区
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<LocationGroup>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT ID, NAME, DESCRIPTION, PARENT FROM LOCATION_GROUP WHERE ID = ?1")?;
        let group = stmt
            .query_row(params![id], map_location_group)
            .optional()?;
        Ok(group)
    }

    /// 查询全部库区,按主键排序(父库区先于子库区插入,便于建树)
    pub fn find_all(&self) -> RepositoryResult<Vec<LocationGroup>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT ID, NAME, DESCRIPTION, PARENT FROM LOCATION_GROUP ORDER BY ID")?;
        let groups = stmt
            .query_map([], map_location_group)?
            .collect::<SqliteResult<Vec<LocationGroup>>>()?;
        Ok(groups)
    }
}

// ==========================================
// LocationTypeRepository - 库位类型仓储
// ==========================================

/// 库位类型仓储
/// 职责: 管理 LOCATION_TYPE 表的 CRUD 操作
pub struct LocationTypeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LocationTypeRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入库位类型,返回生成的主键
    pub fn insert(&self, location_type: &LocationType) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO LOCATION_TYPE (TYPE, DESCRIPTION) VALUES (?1, ?2)",
            params![location_type.type_code, location_type.description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询全部库位类型,按类型代码排序
    pub fn find_all(&self) -> RepositoryResult<Vec<LocationType>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT ID, TYPE, DESCRIPTION FROM LOCATION_TYPE ORDER BY TYPE")?;
        let types = stmt
            .query_map([], |row| {
                Ok(LocationType {
                    id: Some(row.get(0)?),
                    type_code: row.get(1)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<LocationType>>>()?;
        Ok(types)
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

    #[test]
    fn test_insert_and_find_all_ordered_by_name() {
        let conn = setup_test_db();
        let repo = LocationRepository::from_connection(conn);

        for name in ["B/01/02/03", "A/01/01/01", "C/02/01/01"] {
            repo.insert(&Location::new(name)).unwrap();
        }

        let all = repo.find_all().unwrap();
        let names: Vec<&str> = all.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A/01/01/01", "B/01/02/03", "C/02/01/01"]);
    }

    #[test]
    fn test_duplicate_location_name_rejected() {
        let conn = setup_test_db();
        let repo = LocationRepository::from_connection(conn);

        repo.insert(&Location::new("A/01/01/01")).unwrap();
        let result = repo.insert(&Location::new("A/01/01/01"));
        assert!(matches!(
            result,
            Err(RepositoryError::UniqueConstraintViolation(_))
        ));
    }

    #[test]
    fn test_find_by_name_and_touch_last_access() {
        let conn = setup_test_db();
        let repo = LocationRepository::from_connection(conn);

        let id = repo.insert(&Location::new("A/01/01/01")).unwrap();
        let found = repo.find_by_name("A/01/01/01").unwrap().unwrap();
        assert_eq!(found.id, Some(id));
        assert!(found.last_access.is_none());

        let now = Utc::now();
        repo.touch_last_access(id, now).unwrap();
        let found = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.last_access, Some(now));

        // 不存在的库位
        assert!(matches!(
            repo.touch_last_access(999, now),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_group_hierarchy_roundtrip() {
        let conn = setup_test_db();
        let repo = LocationGroupRepository::from_connection(conn);

        let root_id = repo.insert(&LocationGroup::new("WAREHOUSE")).unwrap();
        let mut aisle = LocationGroup::new("AISLE_A");
        aisle.parent_id = Some(root_id);
        let aisle_id = repo.insert(&aisle).unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        let found = repo.find_by_id(aisle_id).unwrap().unwrap();
        assert_eq!(found.parent_id, Some(root_id));
    }
}
