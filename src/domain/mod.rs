// ==========================================
// 气候投资优化系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod measure;
pub mod optimization;
pub mod property;
pub mod risk;
pub mod types;

// 重导出核心类型
pub use measure::Measure;
pub use optimization::{
    EfficiencyTier, OptimizationMetrics, OptimizationRequest, OptimizationResult,
    PropertyRecommendation, RecommendedMeasure,
};
pub use property::Property;
pub use risk::{RiskAssessment, RiskDetail, RiskLevels};
pub use types::{Level, MeasureType};
