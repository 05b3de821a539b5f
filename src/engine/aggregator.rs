// ==========================================
// 气候投资优化系统 - 结果汇总器
// ==========================================
// 职责: 选中候选 → OptimizationResult
// 输出: 全局排名列表 + 按资产分组列表 + 指标
// 红线: remaining_budget = budget - total_cost（不做额外舍入）
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::optimization::{
    EfficiencyTier, OptimizationMetrics, OptimizationResult, PropertyRecommendation,
    RecommendedMeasure,
};
use crate::engine::candidate::MeasureCandidate;
use crate::engine::strategy::OptimizationStrategy;
use crate::i18n;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

// ==========================================
// ResultAggregator - 结果汇总器
// ==========================================
pub struct ResultAggregator {
    roi_multiplier: f64,
    locale: String,
}

impl ResultAggregator {
    pub fn new(roi_multiplier: f64, locale: impl Into<String>) -> Self {
        Self {
            roi_multiplier,
            locale: locale.into(),
        }
    }

    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self::new(config.roi_multiplier, config.locale.clone())
    }

    /// 构建优化结果
    ///
    /// # 参数
    /// - `selected`: 选中候选（选中顺序即排名顺序）
    /// - `budget`: 请求预算
    /// - `strategy`: 实际执行的策略
    /// - `started_at`: 调用开始时刻（用于处理耗时）
    pub fn build(
        &self,
        selected: &[MeasureCandidate],
        budget: f64,
        strategy: OptimizationStrategy,
        started_at: Instant,
    ) -> OptimizationResult {
        let total_cost: f64 = selected.iter().map(|c| c.cost()).sum();
        let total_reduction: f64 = selected.iter().map(|c| c.risk_reduction).sum();

        let recommended_measures: Vec<RecommendedMeasure> = selected
            .iter()
            .enumerate()
            .map(|(i, c)| self.recommend(c, i + 1))
            .collect();

        let property_recommendations = self.group_by_property(selected);

        // ===== 指标 =====
        let budget_utilization_percentage = if budget > 0.0 {
            total_cost / budget * 100.0
        } else {
            0.0
        };
        let average_risk_reduction = if selected.is_empty() {
            0.0
        } else {
            total_reduction / selected.len() as f64 * 100.0
        };

        OptimizationResult {
            run_id: Uuid::new_v4().to_string(),
            total_cost,
            remaining_budget: budget - total_cost,
            total_risk_reduction: total_reduction * 100.0,
            recommended_measures,
            property_recommendations,
            strategy_used: strategy,
            metrics: OptimizationMetrics {
                budget_utilization_percentage,
                average_risk_reduction,
                estimated_roi: total_reduction * self.roi_multiplier,
                processing_time_ms: started_at.elapsed().as_millis() as u64,
            },
            generated_at: Utc::now(),
        }
    }

    fn recommend(&self, candidate: &MeasureCandidate, rank: usize) -> RecommendedMeasure {
        let tier = EfficiencyTier::from_efficiency(candidate.efficiency);
        RecommendedMeasure {
            rank,
            measure: candidate.measure.clone(),
            property_id: candidate.property_id,
            property_label: candidate.property_label.clone(),
            risk_reduction_percentage: candidate.risk_reduction * 100.0,
            cost_efficiency: candidate.efficiency,
            efficiency_tier: tier,
            priority_score: candidate.priority,
            affected_risks: candidate.affected_risks.clone(),
            justification: self.justification(tier, &candidate.affected_risks),
        }
    }

    /// 推荐理由文案（效率档位 + 受影响风险）
    pub fn justification(&self, tier: EfficiencyTier, affected_risks: &[String]) -> String {
        let tier_text = i18n::t_in(&self.locale, tier.i18n_key(), &[]);
        let risks_text = if affected_risks.is_empty() {
            i18n::t_in(&self.locale, "justification.no_risks", &[])
        } else {
            affected_risks.join(", ")
        };
        i18n::t_in(
            &self.locale,
            "justification.text",
            &[("tier", &tier_text), ("risks", &risks_text)],
        )
    }

    /// 按资产分组（资产首次出现顺序），组内 rank 重新编号
    fn group_by_property(&self, selected: &[MeasureCandidate]) -> Vec<PropertyRecommendation> {
        let mut index: HashMap<i64, usize> = HashMap::new();
        let mut groups: Vec<PropertyRecommendation> = Vec::new();

        for candidate in selected {
            let slot = *index.entry(candidate.property_id).or_insert_with(|| {
                groups.push(PropertyRecommendation {
                    property_id: candidate.property_id,
                    property_label: candidate.property_label.clone(),
                    current_risk: candidate.property_risk,
                    projected_risk: candidate.property_risk,
                    measures: Vec::new(),
                    estimated_investment: 0.0,
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            let rank = group.measures.len() + 1;
            group.measures.push(self.recommend(candidate, rank));
            group.estimated_investment += candidate.cost();
            group.projected_risk = (group.projected_risk - candidate.risk_reduction).max(0.0);
        }

        groups
    }
}
