// ==========================================
// 气候投资优化系统 - 优化引擎错误类型
// ==========================================
// 传播策略: 候选生成阶段快速失败；策略与汇总阶段为纯计算，不产生错误
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 优化引擎错误类型（均为本次调用致命错误，引擎内不重试）
#[derive(Error, Debug)]
pub enum OptimizationError {
    #[error("预算必须大于 0: max_budget={0}")]
    InvalidBudget(f64),

    #[error("必须至少选择一个资产")]
    NoPropertiesSelected,

    #[error("没有可用的措施（目录为空或无可行候选）")]
    NoMeasuresAvailable,

    #[error("资产不存在: property_id={property_id}")]
    PropertyNotFound { property_id: i64 },

    #[error("数据源访问失败: {source}")]
    DataSourceFailure {
        #[source]
        source: RepositoryError,
    },
}

impl OptimizationError {
    /// 稳定错误码（供 API 层/调用方使用）
    pub fn code(&self) -> &'static str {
        match self {
            OptimizationError::InvalidBudget(_) => "INVALID_BUDGET",
            OptimizationError::NoPropertiesSelected => "NO_PROPERTIES_SELECTED",
            OptimizationError::NoMeasuresAvailable => "NO_MEASURES_AVAILABLE",
            OptimizationError::PropertyNotFound { .. } => "PROPERTY_NOT_FOUND",
            OptimizationError::DataSourceFailure { .. } => "DATABASE_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
// 资产实体的 NotFound → PropertyNotFound；其余一律包装为 DataSourceFailure
impl From<RepositoryError> for OptimizationError {
    fn from(err: RepositoryError) -> Self {
        if let RepositoryError::NotFound { entity, id } = &err {
            if entity == "property" {
                if let Ok(property_id) = id.parse::<i64>() {
                    return OptimizationError::PropertyNotFound { property_id };
                }
            }
        }
        OptimizationError::DataSourceFailure { source: err }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, OptimizationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_property_not_found_conversion() {
        let err: OptimizationError = RepositoryError::NotFound {
            entity: "property".to_string(),
            id: "42".to_string(),
        }
        .into();
        assert!(matches!(err, OptimizationError::PropertyNotFound { property_id: 42 }));
        assert_eq!(err.code(), "PROPERTY_NOT_FOUND");
    }

    #[test]
    fn test_data_source_failure_keeps_cause() {
        let err: OptimizationError =
            RepositoryError::DatabaseQueryError("disk I/O error".to_string()).into();
        assert_eq!(err.code(), "DATABASE_ERROR");
        let cause = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(cause.contains("disk I/O error"));
    }
}
