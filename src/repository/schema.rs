// ==========================================
// 仓库管理系统 - 数据库 Schema
// ==========================================
// 职责: 建表 DDL,服务初始化与测试共用
// 红线: 表名/列名为既有数据库兼容契约,不得改动
// ==========================================

use rusqlite::Connection;

/// 初始化全部 WMS 表(幂等)
///
/// 外键引用要求连接已开启 PRAGMA foreign_keys (见 db.rs)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS LOCATION_TYPE (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            TYPE TEXT NOT NULL UNIQUE,
            DESCRIPTION TEXT
        );

        CREATE TABLE IF NOT EXISTS LOCATION_GROUP (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            NAME TEXT NOT NULL UNIQUE,
            DESCRIPTION TEXT,
            PARENT INTEGER REFERENCES LOCATION_GROUP(ID)
        );

        CREATE TABLE IF NOT EXISTS LOCATION (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            NAME TEXT NOT NULL UNIQUE,
            DESCRIPTION TEXT,
            LOCATION_GROUP INTEGER REFERENCES LOCATION_GROUP(ID),
            LOCATION_TYPE INTEGER REFERENCES LOCATION_TYPE(ID),
            INCOMING_ACTIVE INTEGER NOT NULL DEFAULT 1,
            OUTGOING_ACTIVE INTEGER NOT NULL DEFAULT 1,
            LAST_ACCESS TEXT
        );

        CREATE TABLE IF NOT EXISTS TRANSPORT_UNIT_TYPE (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            TYPE TEXT NOT NULL UNIQUE,
            DESCRIPTION TEXT
        );

        CREATE TABLE IF NOT EXISTS TRANSPORT_UNIT (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            UNIT_ID TEXT NOT NULL UNIQUE,
            TRANSPORT_UNIT_TYPE INTEGER REFERENCES TRANSPORT_UNIT_TYPE(ID),
            ACTUAL_LOCATION INTEGER REFERENCES LOCATION(ID),
            WEIGHT TEXT,
            WEIGHT_UNIT TEXT
        );

        CREATE TABLE IF NOT EXISTS TYPE_PLACING_RULE (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            TRANSPORT_UNIT_TYPE INTEGER NOT NULL REFERENCES TRANSPORT_UNIT_TYPE(ID),
            PRIVILEGE_LEVEL INTEGER NOT NULL DEFAULT 0,
            ALLOWED_LOCATION_TYPE INTEGER NOT NULL REFERENCES LOCATION_TYPE(ID),
            UNIQUE(TRANSPORT_UNIT_TYPE, PRIVILEGE_LEVEL, ALLOWED_LOCATION_TYPE)
        );

        CREATE TABLE IF NOT EXISTS TRANSPORT_ORDER (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            TRANSPORT_UNIT INTEGER REFERENCES TRANSPORT_UNIT(ID),
            DATE_UPDATED TEXT,
            PRIORITY INTEGER NOT NULL DEFAULT 0,
            START_DATE TEXT,
            OCCURRED TEXT,
            MESSAGE_NO INTEGER,
            MESSAGE TEXT,
            CREATION_DATE TEXT NOT NULL,
            END_DATE TEXT,
            STATE TEXT NOT NULL,
            SOURCE_LOCATION INTEGER REFERENCES LOCATION(ID),
            TARGET_LOCATION INTEGER REFERENCES LOCATION(ID),
            TARGET_LOCATION_GROUP INTEGER REFERENCES LOCATION_GROUP(ID),
            VERSION INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS MESSAGE (
            ID INTEGER PRIMARY KEY AUTOINCREMENT,
            MESSAGE_NO INTEGER NOT NULL,
            MESSAGE_TEXT TEXT NOT NULL,
            CREATED TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [crate::db::CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}
