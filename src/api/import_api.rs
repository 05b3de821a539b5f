// ==========================================
// 气候投资优化系统 - 目录导入 API
// ==========================================
// 职责: 封装 CSV 目录导入
// ==========================================

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::api::error::ApiResult;
use crate::importer::{CsvCatalogImporter, ImportKind};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入类型
    pub kind: String,
    /// 写入的记录数
    pub imported: usize,
    /// 源文件
    pub source_file: String,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

// ==========================================
// ImportApi - 目录导入 API
// ==========================================
pub struct ImportApi {
    importer: Arc<CsvCatalogImporter>,
}

impl ImportApi {
    pub fn new(importer: Arc<CsvCatalogImporter>) -> Self {
        Self { importer }
    }

    /// 导入 CSV 文件
    ///
    /// # 参数
    /// - kind: 导入类型（measures / properties / cluster_risks / applied_measures）
    /// - file_path: CSV 文件路径
    pub fn import_csv(&self, kind: &str, file_path: &str) -> ApiResult<ImportApiResponse> {
        let kind: ImportKind = kind.parse()?;
        let started = Utc::now();

        let imported = self.importer.import(kind, Path::new(file_path))?;

        let elapsed_ms = (Utc::now() - started).num_milliseconds();
        info!(kind = %kind, imported, elapsed_ms, file = file_path, "CSV 导入完成");

        Ok(ImportApiResponse {
            kind: kind.to_string(),
            imported,
            source_file: file_path.to_string(),
            elapsed_ms,
        })
    }
}
