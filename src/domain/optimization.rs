// ==========================================
// 气候投资优化系统 - 预算优化请求/结果模型
// ==========================================
// 生命周期: 每次优化调用新建，构造后不再修改
// 不变式: total_cost <= max_budget
//         total_cost + remaining_budget == max_budget
// ==========================================

use crate::domain::measure::Measure;
use crate::engine::strategy::OptimizationStrategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// OptimizationRequest - 优化请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRequest {
    /// 参与优化的资产ID（非空）
    pub property_ids: Vec<i64>,

    /// 预算上限（> 0）
    pub max_budget: f64,

    /// 分配策略（缺省/未知值一律回退 greedy）
    #[serde(default)]
    pub strategy: OptimizationStrategy,

    /// 优先关注的风险ID（可为空）
    #[serde(default)]
    pub risk_priorities: Vec<i64>,
}

impl OptimizationRequest {
    pub fn new(property_ids: Vec<i64>, max_budget: f64, strategy: OptimizationStrategy) -> Self {
        Self {
            property_ids,
            max_budget,
            strategy,
            risk_priorities: Vec::new(),
        }
    }

    pub fn with_priorities(mut self, risk_priorities: Vec<i64>) -> Self {
        self.risk_priorities = risk_priorities;
        self
    }
}

// ==========================================
// EfficiencyTier - 成本效率档位
// ==========================================
// efficiency > 0.001  → High
// efficiency < 0.0001 → Low
// 其他               → Moderate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyTier {
    High,
    Moderate,
    Low,
}

impl EfficiencyTier {
    pub fn from_efficiency(efficiency: f64) -> Self {
        if efficiency > 0.001 {
            EfficiencyTier::High
        } else if efficiency < 0.0001 {
            EfficiencyTier::Low
        } else {
            EfficiencyTier::Moderate
        }
    }

    /// i18n 键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            EfficiencyTier::High => "justification.tier.high",
            EfficiencyTier::Moderate => "justification.tier.moderate",
            EfficiencyTier::Low => "justification.tier.low",
        }
    }
}

impl fmt::Display for EfficiencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EfficiencyTier::High => write!(f, "high"),
            EfficiencyTier::Moderate => write!(f, "moderate"),
            EfficiencyTier::Low => write!(f, "low"),
        }
    }
}

// ==========================================
// RecommendedMeasure - 推荐措施
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedMeasure {
    pub rank: usize,                    // 排名（1 起，按选中顺序）
    pub measure: Measure,
    pub property_id: i64,
    pub property_label: String,
    pub risk_reduction_percentage: f64, // 风险降低（百分比）
    pub cost_efficiency: f64,           // 风险降低 / 成本
    pub efficiency_tier: EfficiencyTier,
    pub priority_score: i32,            // 候选优先级分
    pub affected_risks: Vec<String>,
    pub justification: String,
}

// ==========================================
// PropertyRecommendation - 单资产推荐汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecommendation {
    pub property_id: i64,
    pub property_label: String,
    pub current_risk: f64,
    pub projected_risk: f64,
    pub measures: Vec<RecommendedMeasure>, // rank 在资产内重新编号
    pub estimated_investment: f64,
}

// ==========================================
// OptimizationMetrics - 优化指标
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    pub budget_utilization_percentage: f64,
    pub average_risk_reduction: f64,
    /// 占位指标: total_risk_reduction × 固定倍数，并非财务 ROI 模型
    pub estimated_roi: f64,
    pub processing_time_ms: u64,
}

// ==========================================
// OptimizationResult - 优化结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub run_id: String,
    pub total_cost: f64,
    pub remaining_budget: f64,
    pub total_risk_reduction: f64, // 百分比
    pub recommended_measures: Vec<RecommendedMeasure>,
    pub property_recommendations: Vec<PropertyRecommendation>,
    pub strategy_used: OptimizationStrategy,
    pub metrics: OptimizationMetrics,
    pub generated_at: DateTime<Utc>,
}

impl OptimizationResult {
    /// 推荐措施数量
    pub fn measure_count(&self) -> usize {
        self.recommended_measures.len()
    }
}
