// ==========================================
// 气候投资优化系统 - 措施目录领域模型
// ==========================================

use crate::domain::types::MeasureType;
use serde::{Deserialize, Serialize};

// ==========================================
// Measure - 措施目录条目
// ==========================================
// 标识: name 唯一
// 约束: estimated_cost > 0（由目录维护方保证）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub name: String,              // 措施名称（唯一键）
    pub estimated_cost: f64,       // 预估成本
    #[serde(rename = "type")]
    pub measure_type: MeasureType, // 措施类型
}

impl Measure {
    pub fn new(name: impl Into<String>, estimated_cost: f64, measure_type: MeasureType) -> Self {
        Self {
            name: name.into(),
            estimated_cost,
            measure_type,
        }
    }

    /// 成本是否可用于效率计算（有限且为正）
    pub fn has_valid_cost(&self) -> bool {
        self.estimated_cost.is_finite() && self.estimated_cost > 0.0
    }
}
