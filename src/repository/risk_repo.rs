// ==========================================
// 气候投资优化系统 - 集群风险画像仓储
// ==========================================
// 红线: Repository 不含业务逻辑（风险分由 RiskScorer 推导）
// 说明: 等级文本无法识别时按 medium 读取，不报错
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::risk::{RiskDetail, RiskLevels};
use crate::domain::types::Level;
use crate::engine::risk_scorer::RiskScorer;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::ClusterRiskRepository;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteClusterRiskRepository - 集群风险仓储
// ==========================================
pub struct SqliteClusterRiskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteClusterRiskRepository {
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
}

impl ClusterRiskRepository for SqliteClusterRiskRepository {
    fn find_by_cluster(&self, cluster_id: i64) -> RepositoryResult<Vec<RiskDetail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.id, r.name, cr.exposure, cr.sensitivity, cr.consequence, cr.probability
            FROM cluster_risk cr
            JOIN risk r ON r.id = cr.risk_id
            WHERE cr.cluster_id = ?1
            ORDER BY r.id
            "#,
        )?;

        let rows = stmt.query_map(params![cluster_id], |row| {
            let levels = RiskLevels::new(
                Level::from_str(&row.get::<_, String>(2)?),
                Level::from_str(&row.get::<_, String>(3)?),
                Level::from_str(&row.get::<_, String>(4)?),
                Level::from_str(&row.get::<_, String>(5)?),
            );
            Ok(RiskScorer::detail(row.get(0)?, row.get::<_, String>(1)?, levels))
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
