// ==========================================
// 气候投资优化系统 - 预算优化编排器
// ==========================================
// 流程: 校验请求 → 加载目录 → 生成候选 → 策略分配 → 汇总结果
// 红线: 单次调用无跨调用状态；任何数据源失败整体失败，不返回部分结果
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::optimization::{OptimizationRequest, OptimizationResult};
use crate::engine::aggregator::ResultAggregator;
use crate::engine::allocation::{GreedyAllocator, KnapsackAllocator, WeightedAllocator};
use crate::engine::candidate::{CandidateGenerator, MeasureCandidate};
use crate::engine::error::{EngineResult, OptimizationError};
use crate::engine::repositories::OptimizationRepositories;
use crate::engine::strategy::OptimizationStrategy;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{info, instrument, warn};

// ==========================================
// BudgetOptimizer - 预算优化器
// ==========================================
pub struct BudgetOptimizer {
    repos: OptimizationRepositories,
    config: OptimizerConfig,
}

impl BudgetOptimizer {
    /// 构造函数
    pub fn new(repos: OptimizationRepositories, config: OptimizerConfig) -> Self {
        Self { repos, config }
    }

    /// 当前参数
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    // ==========================================
    // 主入口
    // ==========================================

    /// 执行预算优化
    ///
    /// # 错误
    /// - InvalidBudget: max_budget <= 0 或非有限数
    /// - NoPropertiesSelected: property_ids 为空
    /// - PropertyNotFound: 任一资产不存在
    /// - NoMeasuresAvailable: 目录为空或无候选
    /// - DataSourceFailure: 仓储访问失败
    #[instrument(
        skip(self, request),
        fields(
            properties = request.property_ids.len(),
            budget = request.max_budget,
            strategy = %request.strategy
        )
    )]
    pub fn optimize(&self, request: &OptimizationRequest) -> EngineResult<OptimizationResult> {
        let started_at = Instant::now();

        // ===== 1. 校验 =====
        let budget = request.max_budget;
        if !budget.is_finite() || budget <= 0.0 {
            return Err(OptimizationError::InvalidBudget(budget));
        }
        if request.property_ids.is_empty() {
            return Err(OptimizationError::NoPropertiesSelected);
        }

        // 重复资产ID只保留首次出现
        let mut seen = HashSet::new();
        let property_ids: Vec<i64> = request
            .property_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        // ===== 2. 候选生成 =====
        let catalog = self.repos.measure_repo.list_all()?;
        let priority_risk_ids: HashSet<i64> = request.risk_priorities.iter().copied().collect();

        let generator = CandidateGenerator::new(self.repos.clone(), self.config.clone());
        let candidates = generator.generate(&property_ids, &catalog, &priority_risk_ids)?;

        // ===== 3. 分配 =====
        let (strategy_used, selected) =
            self.allocate(request.strategy, &candidates, budget, !priority_risk_ids.is_empty());

        // ===== 4. 汇总 =====
        let result = ResultAggregator::from_config(&self.config).build(
            &selected,
            budget,
            strategy_used,
            started_at,
        );

        info!(
            run_id = %result.run_id,
            candidates = candidates.len(),
            selected = result.measure_count(),
            total_cost = result.total_cost,
            strategy_used = %strategy_used,
            elapsed_ms = result.metrics.processing_time_ms,
            "预算优化完成"
        );

        Ok(result)
    }

    /// 策略分派
    ///
    /// 背包容量超过上限时回退 Greedy，返回值中的策略为实际执行的策略
    fn allocate(
        &self,
        requested: OptimizationStrategy,
        candidates: &[MeasureCandidate],
        budget: f64,
        has_priorities: bool,
    ) -> (OptimizationStrategy, Vec<MeasureCandidate>) {
        match requested {
            OptimizationStrategy::Greedy => (
                OptimizationStrategy::Greedy,
                GreedyAllocator::new().allocate(candidates, budget),
            ),
            OptimizationStrategy::Knapsack => {
                if !self.config.knapsack_allowed(budget) {
                    warn!(
                        capacity = self.config.knapsack_capacity(budget),
                        max_units = self.config.knapsack_max_units,
                        "背包容量超过上限，回退效率贪心"
                    );
                    return (
                        OptimizationStrategy::Greedy,
                        GreedyAllocator::new().allocate(candidates, budget),
                    );
                }
                (
                    OptimizationStrategy::Knapsack,
                    KnapsackAllocator::new(self.config.knapsack_unit).allocate(candidates, budget),
                )
            }
            OptimizationStrategy::Weighted => (
                OptimizationStrategy::Weighted,
                WeightedAllocator::new().allocate(candidates, budget, has_priorities),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::measure::Measure;
    use crate::domain::property::Property;
    use crate::domain::risk::{RiskDetail, RiskLevels};
    use crate::domain::types::{Level, MeasureType};
    use crate::engine::risk_scorer::RiskScorer;
    use crate::repository::error::RepositoryResult;
    use crate::repository::{ClusterRiskRepository, MeasureRepository, PropertyRepository};
    use std::sync::Arc;

    struct SingleProperty {
        catalog: Vec<Measure>,
    }

    impl PropertyRepository for SingleProperty {
        fn find_by_id(&self, property_id: i64) -> RepositoryResult<Option<Property>> {
            Ok((property_id == 1).then(|| Property::new(1, "Sevilla Norte", 7, 0.4)))
        }

        fn applied_measure_names(&self, _property_id: i64) -> RepositoryResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    impl ClusterRiskRepository for SingleProperty {
        fn find_by_cluster(&self, _cluster_id: i64) -> RepositoryResult<Vec<RiskDetail>> {
            Ok(vec![RiskScorer::detail(3, "Ola de calor", RiskLevels::uniform(Level::High))])
        }
    }

    impl MeasureRepository for SingleProperty {
        fn list_all(&self) -> RepositoryResult<Vec<Measure>> {
            Ok(self.catalog.clone())
        }
    }

    fn optimizer(config: OptimizerConfig) -> BudgetOptimizer {
        let store = Arc::new(SingleProperty {
            catalog: vec![
                Measure::new("Toldos anti-calor", 300.0, MeasureType::Natural),
                Measure::new("Climatización eficiente", 2000.0, MeasureType::Material),
            ],
        });
        let repos = OptimizationRepositories::new(store.clone(), store.clone(), store);
        BudgetOptimizer::new(repos, config)
    }

    #[test]
    fn test_rejects_invalid_budget() {
        let opt = optimizer(OptimizerConfig::default());
        for budget in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let req = OptimizationRequest::new(vec![1], budget, OptimizationStrategy::Greedy);
            let err = opt.optimize(&req).unwrap_err();
            assert_eq!(err.code(), "INVALID_BUDGET");
        }
    }

    #[test]
    fn test_rejects_empty_selection() {
        let opt = optimizer(OptimizerConfig::default());
        let req = OptimizationRequest::new(vec![], 1000.0, OptimizationStrategy::Greedy);
        assert!(matches!(
            opt.optimize(&req).unwrap_err(),
            OptimizationError::NoPropertiesSelected
        ));
    }

    #[test]
    fn test_duplicate_property_ids_collapse() {
        let opt = optimizer(OptimizerConfig::default());
        let req = OptimizationRequest::new(vec![1, 1, 1], 10_000.0, OptimizationStrategy::Greedy);
        let result = opt.optimize(&req).unwrap();
        assert_eq!(result.measure_count(), 2);
        assert_eq!(result.property_recommendations.len(), 1);
    }

    #[test]
    fn test_knapsack_capacity_guard_falls_back_to_greedy() {
        let config = OptimizerConfig {
            knapsack_max_units: 10,
            ..OptimizerConfig::default()
        };
        let opt = optimizer(config);

        let req = OptimizationRequest::new(vec![1], 5000.0, OptimizationStrategy::Knapsack);
        let result = opt.optimize(&req).unwrap();
        assert_eq!(result.strategy_used, OptimizationStrategy::Greedy);

        let req = OptimizationRequest::new(vec![1], 1000.0, OptimizationStrategy::Knapsack);
        let result = opt.optimize(&req).unwrap();
        assert_eq!(result.strategy_used, OptimizationStrategy::Knapsack);
    }

    #[test]
    fn test_budget_invariant() {
        let opt = optimizer(OptimizerConfig::default());
        for strategy in [
            OptimizationStrategy::Greedy,
            OptimizationStrategy::Knapsack,
            OptimizationStrategy::Weighted,
        ] {
            let req = OptimizationRequest::new(vec![1], 1500.0, strategy).with_priorities(vec![3]);
            let result = opt.optimize(&req).unwrap();
            assert!(result.total_cost <= 1500.0);
            assert_eq!(result.total_cost + result.remaining_budget, 1500.0);
        }
    }
}
