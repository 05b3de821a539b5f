// ==========================================
// 气候投资优化系统 - 气候风险领域模型
// ==========================================
// 风险分 = (暴露度·敏感度) × (后果·概率)
// 取值范围: [0.0081, 0.81]
// ==========================================

use crate::domain::types::Level;
use serde::{Deserialize, Serialize};

// ==========================================
// RiskLevels - 风险四要素等级
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskLevels {
    pub exposure: Level,    // 暴露度
    pub sensitivity: Level, // 敏感度
    pub consequence: Level, // 后果
    pub probability: Level, // 概率
}

impl RiskLevels {
    pub fn new(exposure: Level, sensitivity: Level, consequence: Level, probability: Level) -> Self {
        Self {
            exposure,
            sensitivity,
            consequence,
            probability,
        }
    }

    /// 四要素统一等级
    pub fn uniform(level: Level) -> Self {
        Self::new(level, level, level, level)
    }
}

// ==========================================
// RiskDetail - 集群风险明细
// ==========================================
// 红线: risk_score 必须由 RiskScorer 根据 levels 推导，禁止手填
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDetail {
    pub id: i64,          // 风险ID
    pub name: String,     // 风险名称
    #[serde(flatten)]
    pub levels: RiskLevels,
    pub risk_score: f64,  // 推导风险分
}

// ==========================================
// RiskAssessment - 资产风险评估视图
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub property_id: i64,
    pub property_label: String,
    pub overall_risk_score: f64,
    pub risk_level: Level,
    pub risks: Vec<RiskDetail>, // 按风险分降序
}
