// ==========================================
// 仓库管理系统 - 运输单元数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: TYPE_PLACING_RULE 的组合唯一性由数据库约束保证
// ==========================================

use crate::domain::transport_unit::{TransportUnit, TransportUnitType, TypePlacingRule};
use crate::domain::types::WeightUnit;
use crate::domain::values::Weight;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// TransportUnitRepository - 运输单元仓储
// ==========================================

/// 运输单元仓储
/// 职责: 管理 TRANSPORT_UNIT 表的 CRUD 操作
pub struct TransportUnitRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_transport_unit(row: &Row<'_>) -> SqliteResult<TransportUnit> {
    // WEIGHT/WEIGHT_UNIT 两列同时有值才构成重量
    let weight_text: Option<String> = row.get(4)?;
    let unit_text: Option<String> = row.get(5)?;
    let weight = match (weight_text, unit_text) {
        (Some(v), Some(u)) => {
            let value = Decimal::from_str(&v).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
            })?;
            let unit = WeightUnit::parse(&u).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    5,
                    Type::Text,
                    format!("未知重量单位: {u}").into(),
                )
            })?;
            Some(Weight::new(value, unit))
        }
        _ => None,
    };

    Ok(TransportUnit {
        id: Some(row.get(0)?),
        unit_id: row.get(1)?,
        transport_unit_type_id: row.get(2)?,
        actual_location_id: row.get(3)?,
        weight,
    })
}

impl TransportUnitRepository {
    /// 创建新的运输单元仓储实例
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

    /// 插入运输单元,返回生成的主键
    pub fn insert(&self, unit: &TransportUnit) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let (weight_text, unit_text) = match &unit.weight {
            Some(w) => (Some(w.value().to_string()), Some(w.unit().to_db_str())),
            None => (None, None),
        };
        conn.execute(
            r#"
            INSERT INTO TRANSPORT_UNIT (
                UNIT_ID, TRANSPORT_UNIT_TYPE, ACTUAL_LOCATION, WEIGHT, WEIGHT_UNIT
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                unit.unit_id,
                unit.transport_unit_type_id,
                unit.actual_location_id,
                weight_text,
                unit_text,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询运输单元
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<TransportUnit>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT ID, UNIT_ID, TRANSPORT_UNIT_TYPE, ACTUAL_LOCATION, WEIGHT, WEIGHT_UNIT
            FROM TRANSPORT_UNIT WHERE ID = ?1
            "#,
        )?;
        let unit = stmt.query_row(params![id], map_transport_unit).optional()?;
        Ok(unit)
    }

    /// 按业务编号(条码)查询运输单元
    pub fn find_by_unit_id(&self, unit_id: &str) -> RepositoryResult<Option<TransportUnit>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT ID, UNIT_ID, TRANSPORT_UNIT_TYPE, ACTUAL_LOCATION, WEIGHT, WEIGHT_UNIT
            FROM TRANSPORT_UNIT WHERE UNIT_ID = ?1
            "#,
        )?;
        let unit = stmt
            .query_row(params![unit_id], map_transport_unit)
            .optional()?;
        Ok(unit)
    }

    /// 更新运输单元当前库位
    pub fn update_actual_location(&self, id: i64, location_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE TRANSPORT_UNIT SET ACTUAL_LOCATION = ?1 WHERE ID = ?2",
            params![location_id, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "TransportUnit".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// TransportUnitTypeRepository - 运输单元类型仓储
// ==========================================

/// 运输单元类型仓储
/// 职责: 管理 TRANSPORT_UNIT_TYPE 表的 CRUD 操作
pub struct TransportUnitTypeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TransportUnitTypeRepository {
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

    /// 插入运输单元类型,返回生成的主键
    pub fn insert(&self, unit_type: &TransportUnitType) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO TRANSPORT_UNIT_TYPE (TYPE, DESCRIPTION) VALUES (?1, ?2)",
            params![unit_type.type_code, unit_type.description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询全部运输单元类型,按类型代码排序
    pub fn find_all(&self) -> RepositoryResult<Vec<TransportUnitType>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT ID, TYPE, DESCRIPTION FROM TRANSPORT_UNIT_TYPE ORDER BY TYPE")?;
        let types = stmt
            .query_map([], |row| {
                Ok(TransportUnitType {
                    id: Some(row.get(0)?),
                    type_code: row.get(1)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<TransportUnitType>>>()?;
        Ok(types)
    }
}

// ==========================================
// TypePlacingRuleRepository - 放置规则仓储
// ==========================================

/// 放置规则仓储
/// 职责: 管理 TYPE_PLACING_RULE 表的 CRUD 操作
pub struct TypePlacingRuleRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_placing_rule(row: &Row<'_>) -> SqliteResult<TypePlacingRule> {
    Ok(TypePlacingRule {
        id: Some(row.get(0)?),
        transport_unit_type_id: row.get(1)?,
        privilege_level: row.get(2)?,
        allowed_location_type_id: row.get(3)?,
    })
}

impl TypePlacingRuleRepository {
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

    /// 插入放置规则,返回生成的主键
    ///
    /// (运输单元类型, 特权级, 允许库位类型) 重复时
    /// 返回 UniqueConstraintViolation
    pub fn insert(&self, rule: &TypePlacingRule) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO TYPE_PLACING_RULE (
                TRANSPORT_UNIT_TYPE, PRIVILEGE_LEVEL, ALLOWED_LOCATION_TYPE
            ) VALUES (?1, ?2, ?3)
            "#,
            params![
                rule.transport_unit_type_id,
                rule.privilege_level,
                rule.allowed_location_type_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询某运输单元类型的全部放置规则,按特权级排序
    pub fn find_by_transport_unit_type(
        &self,
        transport_unit_type_id: i64,
    ) -> RepositoryResult<Vec<TypePlacingRule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT ID, TRANSPORT_UNIT_TYPE, PRIVILEGE_LEVEL, ALLOWED_LOCATION_TYPE
            FROM TYPE_PLACING_RULE
            WHERE TRANSPORT_UNIT_TYPE = ?1
            ORDER BY PRIVILEGE_LEVEL
            "#,
        )?;
        let rules = stmt
            .query_map(params![transport_unit_type_id], map_placing_rule)?
            .collect::<SqliteResult<Vec<TypePlacingRule>>>()?;
        Ok(rules)
    }
}
