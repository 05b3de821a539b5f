// ==========================================
// 气候投资优化系统 - 资产数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::property::Property;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::PropertyRepository;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// SqlitePropertyRepository - 资产仓储
// ==========================================
/// 职责: property / property_measure 表的读取
pub struct SqlitePropertyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePropertyRepository {
    /// 创建新的实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::connection(db_path, e))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 列出全部资产（按ID升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Property>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, location, cluster_id, total_risk FROM property ORDER BY id",
        )?;
        let rows = stmt.query_map([], map_property)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// 按集群查询资产
    pub fn find_by_cluster(&self, cluster_id: i64) -> RepositoryResult<Vec<Property>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, location, cluster_id, total_risk FROM property WHERE cluster_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![cluster_id], map_property)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn map_property(row: &rusqlite::Row<'_>) -> rusqlite::Result<Property> {
    Ok(Property {
        id: row.get(0)?,
        location: row.get(1)?,
        cluster_id: row.get(2)?,
        total_risk: row.get(3)?,
    })
}

impl PropertyRepository for SqlitePropertyRepository {
    fn find_by_id(&self, property_id: i64) -> RepositoryResult<Option<Property>> {
        let conn = self.get_conn()?;
        let property = conn
            .query_row(
                "SELECT id, location, cluster_id, total_risk FROM property WHERE id = ?1",
                params![property_id],
                map_property,
            )
            .optional()?;
        Ok(property)
    }

    fn applied_measure_names(&self, property_id: i64) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT measure_name FROM property_measure WHERE property_id = ?1 ORDER BY measure_name",
        )?;
        let rows = stmt.query_map(params![property_id], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
