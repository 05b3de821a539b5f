// ==========================================
// 气候投资优化系统 - 资产风险评估
// ==========================================
// 职责: 单资产风险画像（集群风险明细 + 综合风险分 + 定性等级）
// 红线: 只读；资产不存在 → PropertyNotFound
// ==========================================

use crate::domain::risk::RiskAssessment;
use crate::engine::error::{EngineResult, OptimizationError};
use crate::engine::repositories::OptimizationRepositories;
use crate::engine::risk_scorer::RiskScorer;
use tracing::{debug, instrument};

pub struct RiskAssessmentEngine {
    repos: OptimizationRepositories,
}

impl RiskAssessmentEngine {
    pub fn new(repos: OptimizationRepositories) -> Self {
        Self { repos }
    }

    /// 评估资产风险
    ///
    /// 明细按风险分降序（稳定排序，平手保持仓储顺序）
    #[instrument(skip(self))]
    pub fn assess(&self, property_id: i64) -> EngineResult<RiskAssessment> {
        let property = self
            .repos
            .property_repo
            .find_by_id(property_id)?
            .ok_or(OptimizationError::PropertyNotFound { property_id })?;

        let mut risks = self
            .repos
            .cluster_risk_repo
            .find_by_cluster(property.cluster_id)?;
        risks.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));

        let overall_risk_score = RiskScorer::aggregate(&risks);
        debug!(property_id, risk_count = risks.len(), overall_risk_score, "风险评估完成");

        Ok(RiskAssessment {
            property_id,
            property_label: property.location,
            overall_risk_score,
            risk_level: RiskScorer::level_for_score(overall_risk_score),
            risks,
        })
    }
}
