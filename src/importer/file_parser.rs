// ==========================================
// 气候投资优化系统 - CSV 文件解析器
// ==========================================
// 输出: (行号, 列名 → 原始值) 记录，值已 trim
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始记录
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub row: usize,
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    /// 读取必填字段（空值视为缺失）
    pub fn required(&self, field: &str) -> ImportResult<&str> {
        match self.fields.get(field).map(|v| v.as_str()) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ImportError::TypeConversionError {
                row: self.row,
                field: field.to_string(),
                message: "值为空".to_string(),
            }),
        }
    }

    pub fn parse_i64(&self, field: &str) -> ImportResult<i64> {
        let raw = self.required(field)?;
        raw.parse::<i64>().map_err(|e| ImportError::TypeConversionError {
            row: self.row,
            field: field.to_string(),
            message: format!("{} ({})", e, raw),
        })
    }

    pub fn parse_f64(&self, field: &str) -> ImportResult<f64> {
        let raw = self.required(field)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(self.conversion_error(field, format!("非有限数值 ({})", raw))),
            Err(e) => Err(self.conversion_error(field, format!("{} ({})", e, raw))),
        }
    }

    pub fn conversion_error(&self, field: &str, message: impl Into<String>) -> ImportError {
        ImportError::TypeConversionError {
            row: self.row,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// CsvParser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析 CSV 文件
    ///
    /// # 参数
    /// - `required_columns`: 表头必须包含的列
    pub fn parse(&self, path: &Path, required_columns: &[&str]) -> ImportResult<Vec<RawRecord>> {
        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 表头（小写、去 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        for column in required_columns {
            if !headers.iter().any(|h| h == column) {
                return Err(ImportError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut fields = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord {
                row: row_idx + 1,
                fields,
            });
        }

        Ok(records)
    }
}
