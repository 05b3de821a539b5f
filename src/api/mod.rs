// ==========================================
// 气候投资优化系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行/上层应用调用
// ==========================================

pub mod error;
pub mod import_api;
pub mod optimization_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use import_api::{ImportApi, ImportApiResponse};
pub use optimization_api::OptimizationApi;
