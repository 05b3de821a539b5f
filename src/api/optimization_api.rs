// ==========================================
// 气候投资优化系统 - 预算优化 API
// ==========================================
// 职责: 预算优化、资产风险评估的调用入口
// 约束: 引擎错误统一转换为 ApiError（带稳定错误码）
// ==========================================

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::domain::optimization::{OptimizationRequest, OptimizationResult};
use crate::domain::risk::RiskAssessment;
use crate::engine::optimizer::BudgetOptimizer;
use crate::engine::risk_assessment::RiskAssessmentEngine;

/// JSON 接口的错误包装
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorResponse,
}

// ==========================================
// OptimizationApi - 预算优化 API
// ==========================================
pub struct OptimizationApi {
    optimizer: Arc<BudgetOptimizer>,
    assessor: Arc<RiskAssessmentEngine>,
}

impl OptimizationApi {
    /// 创建新的 OptimizationApi 实例
    pub fn new(optimizer: Arc<BudgetOptimizer>, assessor: Arc<RiskAssessmentEngine>) -> Self {
        Self {
            optimizer,
            assessor,
        }
    }

    /// 执行预算优化
    pub fn optimize_budget(&self, request: &OptimizationRequest) -> ApiResult<OptimizationResult> {
        debug!(
            properties = ?request.property_ids,
            max_budget = request.max_budget,
            strategy = %request.strategy,
            "收到预算优化请求"
        );

        self.optimizer.optimize(request).map_err(|e| {
            warn!(code = e.code(), error = %e, "预算优化失败");
            ApiError::from(e)
        })
    }

    /// 执行预算优化（JSON 入/JSON 出）
    ///
    /// 失败时返回 `{"error": {"code": ..., "message": ...}}`
    pub fn optimize_budget_json(&self, request_json: &str) -> String {
        let outcome = serde_json::from_str::<OptimizationRequest>(request_json)
            .map_err(|e| ApiError::InvalidInput(format!("请求 JSON 解析失败: {}", e)))
            .and_then(|request| self.optimize_budget(&request));

        match outcome {
            Ok(result) => to_json(&result),
            Err(err) => to_json(&ErrorEnvelope {
                error: err.to_response(),
            }),
        }
    }

    /// 资产风险评估
    pub fn risk_assessment(&self, property_id: i64) -> ApiResult<RiskAssessment> {
        Ok(self.assessor.assess(property_id)?)
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        format!(
            r#"{{"error":{{"code":"INTERNAL_ERROR","message":"结果序列化失败: {}"}}}}"#,
            e
        )
    })
}
