// ==========================================
// 气候投资优化系统 - 优先级加权分配
// ==========================================
// 无优先风险: 委托效率贪心（结果与 greedy 完全一致）
// 有优先风险: priority 降序，平手按 efficiency 降序（稳定排序）
// 扫描: 全表扫描，不因剩余预算归零提前终止
// ==========================================

use super::{scan_within_budget, GreedyAllocator};
use crate::engine::candidate::MeasureCandidate;
use std::cmp::Ordering;
use tracing::{debug, instrument};

// ==========================================
// WeightedAllocator - 优先级加权分配器
// ==========================================
pub struct WeightedAllocator {
    fallback: GreedyAllocator,
}

impl WeightedAllocator {
    pub fn new() -> Self {
        Self {
            fallback: GreedyAllocator::new(),
        }
    }

    /// 执行分配
    ///
    /// # 参数
    /// - `has_priorities`: 请求是否携带了优先风险
    #[instrument(skip(self, candidates), fields(candidates_count = candidates.len()))]
    pub fn allocate(
        &self,
        candidates: &[MeasureCandidate],
        budget: f64,
        has_priorities: bool,
    ) -> Vec<MeasureCandidate> {
        if !has_priorities {
            debug!("无优先风险，委托效率贪心");
            return self.fallback.allocate(candidates, budget);
        }

        let mut ordered: Vec<&MeasureCandidate> = candidates.iter().collect();
        ordered.sort_by(|a, b| match b.priority.cmp(&a.priority) {
            Ordering::Equal => b.efficiency.total_cmp(&a.efficiency),
            other => other,
        });

        scan_within_budget(ordered, budget, false)
    }
}

impl Default for WeightedAllocator {
    fn default() -> Self {
        Self::new()
    }
}
