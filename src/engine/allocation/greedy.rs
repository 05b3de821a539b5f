// ==========================================
// 气候投资优化系统 - 效率贪心分配
// ==========================================
// 排序: efficiency 降序（稳定排序，平手保持生成顺序）
// 扫描: 全表扫描，单项超预算只跳过不终止；剩余预算归零时停止
// 复杂度: O(n log n)
// ==========================================

use super::scan_within_budget;
use crate::engine::candidate::MeasureCandidate;
use tracing::instrument;

// ==========================================
// GreedyAllocator - 效率贪心分配器
// ==========================================
pub struct GreedyAllocator {
    // 无状态分配器
}

impl GreedyAllocator {
    pub fn new() -> Self {
        Self {}
    }

    /// 执行分配
    ///
    /// # 参数
    /// - `candidates`: 候选集（生成顺序）
    /// - `budget`: 预算
    ///
    /// # 返回
    /// 选中候选（选中顺序）
    #[instrument(skip(self, candidates), fields(candidates_count = candidates.len()))]
    pub fn allocate(&self, candidates: &[MeasureCandidate], budget: f64) -> Vec<MeasureCandidate> {
        let mut ordered: Vec<&MeasureCandidate> = candidates.iter().collect();
        ordered.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));

        scan_within_budget(ordered, budget, true)
    }
}

impl Default for GreedyAllocator {
    fn default() -> Self {
        Self::new()
    }
}
