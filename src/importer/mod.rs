// ==========================================
// 气候投资优化系统 - 导入层
// ==========================================
// 职责: 从 CSV 导出文件装载措施目录、资产、集群风险画像、已实施措施
// 支持: CSV (.csv)
// ==========================================

pub mod csv_importer;
pub mod error;
pub mod file_parser;

pub use csv_importer::{CsvCatalogImporter, ImportKind};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, RawRecord};
