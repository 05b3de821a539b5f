// ==========================================
// 气候投资优化系统 - API层错误类型
// ==========================================
// 职责: 将引擎/仓储/导入错误转换为调用方可识别的错误
// 约束: 每个错误对应稳定错误码（code()）
// ==========================================

use crate::engine::error::OptimizationError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde::Serialize;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求校验错误
    // ==========================================
    #[error("预算无效: {0}")]
    InvalidBudget(String),

    #[error("必须至少选择一个资产")]
    NoPropertiesSelected,

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("没有可用的措施")]
    NoMeasuresAvailable,

    #[error("资产不存在: property_id={0}")]
    PropertyNotFound(i64),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定错误码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidBudget(_) => "INVALID_BUDGET",
            ApiError::NoPropertiesSelected => "NO_PROPERTIES_SELECTED",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NoMeasuresAvailable => "NO_MEASURES_AVAILABLE",
            ApiError::PropertyNotFound(_) => "PROPERTY_NOT_FOUND",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::DatabaseError(_) | ApiError::DatabaseConnectionError(_) => "DATABASE_ERROR",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// 序列化用的错误体
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// 错误响应体
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

// ==========================================
// 从 OptimizationError 转换
// ==========================================
impl From<OptimizationError> for ApiError {
    fn from(err: OptimizationError) -> Self {
        match err {
            OptimizationError::InvalidBudget(budget) => {
                ApiError::InvalidBudget(format!("max_budget={} 必须大于 0", budget))
            }
            OptimizationError::NoPropertiesSelected => ApiError::NoPropertiesSelected,
            OptimizationError::NoMeasuresAvailable => ApiError::NoMeasuresAvailable,
            OptimizationError::PropertyNotFound { property_id } => {
                ApiError::PropertyNotFound(property_id)
            }
            OptimizationError::DataSourceFailure { source } => source.into(),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnknownKind(kind) => ApiError::InvalidInput(format!("未知的导入类型: {}", kind)),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimization_error_codes_preserved() {
        let cases: Vec<(OptimizationError, &str)> = vec![
            (OptimizationError::InvalidBudget(0.0), "INVALID_BUDGET"),
            (OptimizationError::NoPropertiesSelected, "NO_PROPERTIES_SELECTED"),
            (OptimizationError::NoMeasuresAvailable, "NO_MEASURES_AVAILABLE"),
            (OptimizationError::PropertyNotFound { property_id: 9 }, "PROPERTY_NOT_FOUND"),
            (
                OptimizationError::DataSourceFailure {
                    source: RepositoryError::DatabaseQueryError("boom".to_string()),
                },
                "DATABASE_ERROR",
            ),
        ];

        for (err, code) in cases {
            let expected = err.code();
            let api_err: ApiError = err.into();
            assert_eq!(api_err.code(), code);
            assert_eq!(api_err.code(), expected);
        }
    }

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "measure".to_string(),
            id: "Toldos".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("measure"));
                assert!(msg.contains("Toldos"));
            }
            _ => panic!("Expected NotFound"),
        }

        let api_err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert_eq!(api_err.code(), "DATABASE_ERROR");

        let api_err: ApiError =
            RepositoryError::DatabaseConnectionError("unable to open".to_string()).into();
        assert!(matches!(api_err, ApiError::DatabaseConnectionError(_)));
        assert_eq!(api_err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_error_response_shape() {
        let resp = ApiError::PropertyNotFound(12).to_response();
        assert_eq!(resp.code, "PROPERTY_NOT_FOUND");
        assert!(resp.message.contains("12"));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], "PROPERTY_NOT_FOUND");
    }
}
