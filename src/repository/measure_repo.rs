// ==========================================
// 气候投资优化系统 - 措施目录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::measure::Measure;
use crate::domain::types::MeasureType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::MeasureRepository;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteMeasureRepository - 措施目录仓储
// ==========================================
pub struct SqliteMeasureRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMeasureRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::connection(db_path, e))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按名称查询措施
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Measure>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                "SELECT name, estimated_cost, measure_type FROM measure WHERE name = ?1",
                params![name],
                map_raw,
            )
            .optional()?;
        raw.map(into_measure).transpose()
    }
}

type RawMeasure = (String, f64, String);

fn map_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMeasure> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

/// 措施类型文本 → MeasureType（无法识别时报字段错误，不做猜测）
fn into_measure((name, estimated_cost, measure_type): RawMeasure) -> RepositoryResult<Measure> {
    let measure_type = MeasureType::parse(&measure_type).ok_or_else(|| {
        RepositoryError::FieldValueError {
            field: "measure_type".to_string(),
            message: format!("措施 {} 的类型无法识别: {}", name, measure_type),
        }
    })?;
    Ok(Measure::new(name, estimated_cost, measure_type))
}

impl MeasureRepository for SqliteMeasureRepository {
    fn list_all(&self) -> RepositoryResult<Vec<Measure>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT name, estimated_cost, measure_type FROM measure ORDER BY rowid")?;
        let rows = stmt.query_map([], map_raw)?;

        let mut measures = Vec::new();
        for raw in rows {
            measures.push(into_measure(raw?)?);
        }
        Ok(measures)
    }
}
