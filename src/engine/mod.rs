// ==========================================
// 气候投资优化系统 - 引擎层
// ==========================================
// 职责: 风险评分、候选生成、预算分配、结果汇总
// 红线: 引擎不拼 SQL，数据只经由仓储 trait 读取
// ==========================================

pub mod aggregator;
pub mod allocation;
pub mod candidate;
pub mod error;
pub mod optimizer;
pub mod repositories;
pub mod risk_assessment;
pub mod risk_scorer;
pub mod strategy;

// 重导出核心引擎
pub use aggregator::ResultAggregator;
pub use allocation::{GreedyAllocator, KnapsackAllocator, WeightedAllocator};
pub use candidate::{affected_risks, CandidateGenerator, MeasureCandidate};
pub use error::{EngineResult, OptimizationError};
pub use optimizer::BudgetOptimizer;
pub use repositories::OptimizationRepositories;
pub use risk_assessment::RiskAssessmentEngine;
pub use risk_scorer::RiskScorer;
pub use strategy::OptimizationStrategy;
