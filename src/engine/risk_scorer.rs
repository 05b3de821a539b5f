// ==========================================
// 气候投资优化系统 - 风险评分器
// ==========================================
// 职责: 四要素等级 → 数值风险分
// 公式: score = (exposure·sensitivity) × (consequence·probability)
// 红线: 纯函数，未知等级按 medium(0.5) 处理，不报错
// ==========================================

use crate::domain::risk::{RiskDetail, RiskLevels};
use crate::domain::types::Level;

// ==========================================
// RiskScorer - 风险评分器
// ==========================================
pub struct RiskScorer;

impl RiskScorer {
    /// 计算风险分
    ///
    /// 脆弱性 = 暴露度 × 敏感度；影响 = 后果 × 概率
    pub fn score(levels: &RiskLevels) -> f64 {
        let vulnerability = levels.exposure.weight() * levels.sensitivity.weight();
        let impact = levels.consequence.weight() * levels.probability.weight();
        vulnerability * impact
    }

    /// 从原始文本等级计算风险分（未知文本按 medium）
    pub fn score_raw(exposure: &str, sensitivity: &str, consequence: &str, probability: &str) -> f64 {
        Self::score(&RiskLevels::new(
            Level::from_str(exposure),
            Level::from_str(sensitivity),
            Level::from_str(consequence),
            Level::from_str(probability),
        ))
    }

    /// 构造带推导风险分的 RiskDetail
    pub fn detail(id: i64, name: impl Into<String>, levels: RiskLevels) -> RiskDetail {
        RiskDetail {
            id,
            name: name.into(),
            risk_score: Self::score(&levels),
            levels,
        }
    }

    /// 风险分 → 定性等级
    ///
    /// < 0.2 very_low, < 0.4 low, < 0.6 medium, < 0.8 high, 其余 very_high
    pub fn level_for_score(score: f64) -> Level {
        if score < 0.2 {
            Level::VeryLow
        } else if score < 0.4 {
            Level::Low
        } else if score < 0.6 {
            Level::Medium
        } else if score < 0.8 {
            Level::High
        } else {
            Level::VeryHigh
        }
    }

    /// 集群综合风险分（风险分均值，空集合为 0）
    pub fn aggregate(risks: &[RiskDetail]) -> f64 {
        if risks.is_empty() {
            return 0.0;
        }
        risks.iter().map(|r| r.risk_score).sum::<f64>() / risks.len() as f64
    }
}
