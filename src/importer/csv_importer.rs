// ==========================================
// 气候投资优化系统 - CSV 目录导入器
// ==========================================
// 流程: 解析文件 → 全量校验 → 单事务写入
// 红线: 任一行校验失败则整个文件不写入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::{Level, MeasureType};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvParser, RawRecord};
use rusqlite::{params, Connection};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

// ==========================================
// ImportKind - 导入类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Measures,
    Properties,
    ClusterRisks,
    AppliedMeasures,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Measures => "measures",
            ImportKind::Properties => "properties",
            ImportKind::ClusterRisks => "cluster_risks",
            ImportKind::AppliedMeasures => "applied_measures",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "measures" => Ok(ImportKind::Measures),
            "properties" => Ok(ImportKind::Properties),
            "cluster_risks" | "risks" => Ok(ImportKind::ClusterRisks),
            "applied_measures" | "applied" => Ok(ImportKind::AppliedMeasures),
            other => Err(ImportError::UnknownKind(other.to_string())),
        }
    }
}

// ==========================================
// 校验后的行
// ==========================================
struct MeasureRow {
    row: usize,
    name: String,
    estimated_cost: f64,
    measure_type: MeasureType,
}

struct PropertyRow {
    row: usize,
    id: i64,
    location: String,
    cluster_id: i64,
    total_risk: f64,
}

struct ClusterRiskRow {
    row: usize,
    cluster_id: i64,
    risk_id: i64,
    risk_name: String,
    levels: [Level; 4],
}

struct AppliedMeasureRow {
    row: usize,
    property_id: i64,
    measure_name: String,
}

// ==========================================
// CsvCatalogImporter - CSV 目录导入器
// ==========================================
pub struct CsvCatalogImporter {
    conn: Arc<Mutex<Connection>>,
    parser: CsvParser,
}

impl CsvCatalogImporter {
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            parser: CsvParser,
        }
    }

    fn get_conn(&self) -> ImportResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| ImportError::LockError(e.to_string()))
    }

    /// 按类型导入
    pub fn import(&self, kind: ImportKind, path: &Path) -> ImportResult<usize> {
        match kind {
            ImportKind::Measures => self.import_measures(path),
            ImportKind::Properties => self.import_properties(path),
            ImportKind::ClusterRisks => self.import_cluster_risks(path),
            ImportKind::AppliedMeasures => self.import_applied_measures(path),
        }
    }

    // ==========================================
    // 措施目录
    // ==========================================

    /// 导入措施目录（表头: name,estimated_cost,type）
    ///
    /// 同名措施覆盖更新
    #[instrument(skip(self))]
    pub fn import_measures(&self, path: &Path) -> ImportResult<usize> {
        let records = self.parser.parse(path, &["name", "estimated_cost", "type"])?;
        let rows = records
            .iter()
            .map(validate_measure)
            .collect::<ImportResult<Vec<_>>>()?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        for r in &rows {
            tx.execute(
                "INSERT INTO measure (name, estimated_cost, measure_type) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET estimated_cost = ?2, measure_type = ?3",
                params![r.name, r.estimated_cost, r.measure_type.to_db_str()],
            )
            .map_err(|e| ImportError::from(e).at_row(r.row))?;
        }
        tx.commit()?;

        info!(count = rows.len(), kind = %ImportKind::Measures, "导入完成");
        Ok(rows.len())
    }

    // ==========================================
    // 资产
    // ==========================================

    /// 导入资产（表头: id,location,cluster_id,total_risk）
    ///
    /// 引用的集群不存在时自动登记
    #[instrument(skip(self))]
    pub fn import_properties(&self, path: &Path) -> ImportResult<usize> {
        let records = self
            .parser
            .parse(path, &["id", "location", "cluster_id", "total_risk"])?;
        let rows = records
            .iter()
            .map(validate_property)
            .collect::<ImportResult<Vec<_>>>()?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        for r in &rows {
            ensure_cluster(&tx, r.cluster_id).map_err(|e| e.at_row(r.row))?;
            tx.execute(
                "INSERT INTO property (id, location, cluster_id, total_risk) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET location = ?2, cluster_id = ?3, total_risk = ?4",
                params![r.id, r.location, r.cluster_id, r.total_risk],
            )
            .map_err(|e| ImportError::from(e).at_row(r.row))?;
        }
        tx.commit()?;

        info!(count = rows.len(), kind = %ImportKind::Properties, "导入完成");
        Ok(rows.len())
    }

    // ==========================================
    // 集群风险画像
    // ==========================================

    /// 导入集群风险画像
    /// （表头: cluster_id,risk_id,risk_name,exposure,sensitivity,consequence,probability）
    ///
    /// 等级文本无法识别时按 medium 写入
    #[instrument(skip(self))]
    pub fn import_cluster_risks(&self, path: &Path) -> ImportResult<usize> {
        let records = self.parser.parse(
            path,
            &[
                "cluster_id",
                "risk_id",
                "risk_name",
                "exposure",
                "sensitivity",
                "consequence",
                "probability",
            ],
        )?;
        let rows = records
            .iter()
            .map(validate_cluster_risk)
            .collect::<ImportResult<Vec<_>>>()?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        for r in &rows {
            ensure_cluster(&tx, r.cluster_id).map_err(|e| e.at_row(r.row))?;
            tx.execute(
                "INSERT INTO risk (id, name) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET name = ?2",
                params![r.risk_id, r.risk_name],
            )
            .map_err(|e| ImportError::from(e).at_row(r.row))?;

            let [exposure, sensitivity, consequence, probability] = r.levels;
            tx.execute(
                r#"
                INSERT INTO cluster_risk (cluster_id, risk_id, exposure, sensitivity, consequence, probability)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(cluster_id, risk_id) DO UPDATE SET
                    exposure = ?3, sensitivity = ?4, consequence = ?5, probability = ?6
                "#,
                params![
                    r.cluster_id,
                    r.risk_id,
                    exposure.to_db_str(),
                    sensitivity.to_db_str(),
                    consequence.to_db_str(),
                    probability.to_db_str(),
                ],
            )
            .map_err(|e| ImportError::from(e).at_row(r.row))?;
        }
        tx.commit()?;

        info!(count = rows.len(), kind = %ImportKind::ClusterRisks, "导入完成");
        Ok(rows.len())
    }

    // ==========================================
    // 已实施措施
    // ==========================================

    /// 导入已实施措施（表头: property_id,measure_name）
    ///
    /// 资产或措施不存在 → ForeignKeyViolation（带行号）；重复记录忽略
    #[instrument(skip(self))]
    pub fn import_applied_measures(&self, path: &Path) -> ImportResult<usize> {
        let records = self.parser.parse(path, &["property_id", "measure_name"])?;
        let rows = records
            .iter()
            .map(validate_applied_measure)
            .collect::<ImportResult<Vec<_>>>()?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut written = 0;
        for r in &rows {
            written += tx
                .execute(
                    "INSERT OR IGNORE INTO property_measure (property_id, measure_name, applied_at)
                     VALUES (?1, ?2, datetime('now'))",
                    params![r.property_id, r.measure_name],
                )
                .map_err(|e| ImportError::from(e).at_row(r.row))?;
        }
        tx.commit()?;

        info!(count = written, kind = %ImportKind::AppliedMeasures, "导入完成");
        Ok(written)
    }
}

fn ensure_cluster(conn: &Connection, cluster_id: i64) -> ImportResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO cluster (id, name) VALUES (?1, ?2)",
        params![cluster_id, format!("Cluster {}", cluster_id)],
    )?;
    Ok(())
}

// ==========================================
// 行校验
// ==========================================

fn validate_measure(record: &RawRecord) -> ImportResult<MeasureRow> {
    let name = record.required("name")?.to_string();

    let estimated_cost = record.parse_f64("estimated_cost")?;
    if estimated_cost <= 0.0 {
        return Err(record.conversion_error("estimated_cost", format!("成本必须大于 0 ({})", estimated_cost)));
    }

    let raw_type = record.required("type")?;
    let measure_type = MeasureType::parse(raw_type)
        .ok_or_else(|| record.conversion_error("type", format!("未知措施类型 ({})", raw_type)))?;

    Ok(MeasureRow {
        row: record.row,
        name,
        estimated_cost,
        measure_type,
    })
}

fn validate_property(record: &RawRecord) -> ImportResult<PropertyRow> {
    let total_risk = record.parse_f64("total_risk")?;
    if total_risk < 0.0 {
        return Err(record.conversion_error("total_risk", format!("风险值不能为负 ({})", total_risk)));
    }

    Ok(PropertyRow {
        row: record.row,
        id: record.parse_i64("id")?,
        location: record.required("location")?.to_string(),
        cluster_id: record.parse_i64("cluster_id")?,
        total_risk,
    })
}

fn validate_cluster_risk(record: &RawRecord) -> ImportResult<ClusterRiskRow> {
    let level = |field: &str| {
        Level::from_str(record.fields.get(field).map(|v| v.as_str()).unwrap_or(""))
    };

    Ok(ClusterRiskRow {
        row: record.row,
        cluster_id: record.parse_i64("cluster_id")?,
        risk_id: record.parse_i64("risk_id")?,
        risk_name: record.required("risk_name")?.to_string(),
        levels: [
            level("exposure"),
            level("sensitivity"),
            level("consequence"),
            level("probability"),
        ],
    })
}

fn validate_applied_measure(record: &RawRecord) -> ImportResult<AppliedMeasureRow> {
    Ok(AppliedMeasureRow {
        row: record.row,
        property_id: record.parse_i64("property_id")?,
        measure_name: record.required("measure_name")?.to_string(),
    })
}
