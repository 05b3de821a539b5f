// ==========================================
// 气候投资优化系统 - 0/1 背包分配
// ==========================================
// 离散化: W = floor(budget / unit)，单项成本 = floor(cost / unit)
// 递推: 权重维从 W 逆序迭代到单项成本（保证每项至多选一次）
// 回溯: keep[i][w] 表精确回溯，不依赖浮点相等比较
// 复杂度: O(n·W) 时间与空间，表随调用分配、调用结束释放
// ==========================================
// 已知近似: 向下取整可能导致预算少用（每项最多 unit-1），
// 离散总成本与连续总成本存在微小差异。回溯时额外做连续预算检查，
// 保证实际总成本不超过预算；检查一旦剔除过 DP 选中的项，
// 离散最优解已不可行，此时与效率贪心比较，取风险降低较大者。
// 检查未触发时，贪心解的离散成本之和不超过 W，DP 解必然不劣于贪心。
// ==========================================

use super::{GreedyAllocator, SelectionLedger};
use crate::engine::candidate::MeasureCandidate;
use tracing::{debug, instrument};

// ==========================================
// KnapsackAllocator - 背包分配器
// ==========================================
pub struct KnapsackAllocator {
    unit: f64, // 离散化单位
}

impl KnapsackAllocator {
    /// 构造函数
    ///
    /// # 参数
    /// - `unit`: 离散化单位（非正值按 100 处理）
    pub fn new(unit: f64) -> Self {
        let unit = if unit.is_finite() && unit > 0.0 { unit } else { 100.0 };
        Self { unit }
    }

    fn discretize(&self, amount: f64) -> usize {
        if !(amount > 0.0) {
            return 0;
        }
        (amount / self.unit).floor() as usize
    }

    /// 执行分配
    ///
    /// # 返回
    /// 选中候选（回溯顺序：从后往前；离散解不可行时可能为贪心顺序）
    #[instrument(skip(self, candidates), fields(candidates_count = candidates.len(), unit = self.unit))]
    pub fn allocate(&self, candidates: &[MeasureCandidate], budget: f64) -> Vec<MeasureCandidate> {
        let n = candidates.len();
        if n == 0 {
            return Vec::new();
        }

        let capacity = self.discretize(budget);
        let weights: Vec<usize> = candidates.iter().map(|c| self.discretize(c.cost())).collect();

        // dp[w] = 容量 w 下的最大风险降低
        let mut dp = vec![0.0_f64; capacity + 1];
        let mut keep = vec![vec![false; capacity + 1]; n];

        for (i, candidate) in candidates.iter().enumerate() {
            let cost = weights[i];
            if cost > capacity {
                continue;
            }
            let value = candidate.risk_reduction;

            for w in (cost..=capacity).rev() {
                let with_item = dp[w - cost] + value;
                if with_item > dp[w] {
                    dp[w] = with_item;
                    keep[i][w] = true;
                }
            }
        }

        debug!(capacity, best_value = dp[capacity], "背包递推完成");

        // 回溯
        let mut selected = Vec::new();
        let mut ledger = SelectionLedger::new();
        let mut w = capacity;
        let mut remaining = budget;
        let mut dropped = 0usize;

        for i in (0..n).rev() {
            if w == 0 {
                break;
            }
            if !keep[i][w] {
                continue;
            }

            let candidate = &candidates[i];
            // 连续预算检查：离散化低估成本时，走"不选该项"分支
            if candidate.cost() > remaining {
                dropped += 1;
                continue;
            }

            if ledger.record(candidate) {
                remaining -= candidate.cost();
                selected.push(candidate.clone());
            }
            w -= weights[i];
        }

        if dropped == 0 {
            return selected;
        }

        let greedy = GreedyAllocator::new().allocate(candidates, budget);
        let knapsack_value = total_reduction(&selected);
        let greedy_value = total_reduction(&greedy);
        debug!(dropped, knapsack_value, greedy_value, "离散解超出连续预算，与贪心解比较");

        if greedy_value > knapsack_value {
            greedy
        } else {
            selected
        }
    }
}

fn total_reduction(selected: &[MeasureCandidate]) -> f64 {
    selected.iter().map(|c| c.risk_reduction).sum()
}

impl Default for KnapsackAllocator {
    fn default() -> Self {
        Self::new(100.0)
    }
}
