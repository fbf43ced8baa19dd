// ==========================================
// 仓库管理系统 - 系统消息数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::message::Message;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 系统消息仓储
/// 职责: 管理 MESSAGE 表的 CRUD 操作
pub struct MessageRepository {
    conn: Arc<Mutex<Connection>>,
}

fn map_message(row: &Row<'_>) -> SqliteResult<Message> {
    Ok(Message {
        id: Some(row.get(0)?),
        message_no: row.get(1)?,
        message_text: row.get(2)?,
        created: row.get::<_, DateTime<Utc>>(3)?,
    })
}

impl MessageRepository {
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

    /// 插入消息,返回生成的主键
    pub fn insert(&self, message: &Message) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO MESSAGE (MESSAGE_NO, MESSAGE_TEXT, CREATED) VALUES (?1, ?2, ?3)",
            params![message.message_no, message.message_text, message.created],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询消息
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Message>> {
        let conn = self.get_conn()?;
        let mut stmt = conn
            .prepare("SELECT ID, MESSAGE_NO, MESSAGE_TEXT, CREATED FROM MESSAGE WHERE ID = ?1")?;
        let message = stmt.query_row(params![id], map_message).optional()?;
        Ok(message)
    }

    /// 查询全部消息,按创建时间排序
    pub fn find_all(&self) -> RepositoryResult<Vec<Message>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT ID, MESSAGE_NO, MESSAGE_TEXT, CREATED FROM MESSAGE ORDER BY CREATED, ID",
        )?;
        let messages = stmt
            .query_map([], map_message)?
            .collect::<SqliteResult<Vec<Message>>>()?;
        Ok(messages)
    }
}
