// ==========================================
// 气候投资优化系统 - SQLite 连接初始化与建表
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键 + busy_timeout）
// - 提供幂等建表（CREATE TABLE IF NOT EXISTS），新库/旧库均可直接打开
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS cluster (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS risk (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cluster_risk (
    cluster_id  INTEGER NOT NULL REFERENCES cluster(id) ON DELETE CASCADE,
    risk_id     INTEGER NOT NULL REFERENCES risk(id) ON DELETE CASCADE,
    exposure    TEXT NOT NULL DEFAULT 'medium',
    sensitivity TEXT NOT NULL DEFAULT 'medium',
    consequence TEXT NOT NULL DEFAULT 'medium',
    probability TEXT NOT NULL DEFAULT 'medium',
    PRIMARY KEY (cluster_id, risk_id)
);

CREATE TABLE IF NOT EXISTS property (
    id         INTEGER PRIMARY KEY,
    location   TEXT NOT NULL,
    cluster_id INTEGER NOT NULL REFERENCES cluster(id),
    total_risk REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS measure (
    name           TEXT PRIMARY KEY,
    estimated_cost REAL NOT NULL,
    measure_type   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS property_measure (
    property_id  INTEGER NOT NULL REFERENCES property(id) ON DELETE CASCADE,
    measure_name TEXT NOT NULL REFERENCES measure(name) ON DELETE CASCADE,
    applied_at   TEXT,
    PRIMARY KEY (property_id, measure_name)
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id   TEXT NOT NULL,
    key        TEXT NOT NULL,
    value      TEXT NOT NULL,
    updated_at TEXT,
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS schema_version (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_property_cluster ON property(cluster_id);
"#;

/// 幂等建表并登记 schema_version
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
