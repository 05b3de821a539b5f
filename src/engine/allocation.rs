// ==========================================
// 气候投资优化系统 - 预算分配策略
// ==========================================
// 职责: 在预算约束下从候选集中选出子集
// 红线: 选中成本之和 <= 预算；同一 (资产, 措施) 不得重复选中
// ==========================================
// 三种策略互相独立，均为纯计算，不产生错误：
// - greedy:   效率降序贪心
// - knapsack: 0/1 背包动态规划（预算离散化）
// - weighted: 优先级降序贪心（无优先风险时委托 greedy）
// ==========================================

mod greedy;
mod knapsack;
mod weighted;

pub use greedy::GreedyAllocator;
pub use knapsack::KnapsackAllocator;
pub use weighted::WeightedAllocator;

use crate::engine::candidate::MeasureCandidate;
use std::collections::{HashMap, HashSet};

// ==========================================
// SelectionLedger - 选中记录（单次调用内有效）
// ==========================================
// 按资产记录已选中的措施名称，防御重复候选
#[derive(Debug, Default)]
pub(crate) struct SelectionLedger {
    selected: HashMap<i64, HashSet<String>>,
}

impl SelectionLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 该 (资产, 措施) 是否已选中
    pub(crate) fn contains(&self, candidate: &MeasureCandidate) -> bool {
        self.selected
            .get(&candidate.property_id)
            .map(|names| names.contains(&candidate.measure.name))
            .unwrap_or(false)
    }

    /// 记录选中；已存在时返回 false
    pub(crate) fn record(&mut self, candidate: &MeasureCandidate) -> bool {
        self.selected
            .entry(candidate.property_id)
            .or_default()
            .insert(candidate.measure.name.clone())
    }
}

/// 按给定顺序扫描候选，做预算与去重检查
///
/// `stop_when_exhausted` 为 true 时，剩余预算恰为 0 即停止扫描
pub(crate) fn scan_within_budget<'a, I>(
    ordered: I,
    budget: f64,
    stop_when_exhausted: bool,
) -> Vec<MeasureCandidate>
where
    I: IntoIterator<Item = &'a MeasureCandidate>,
{
    let mut selected = Vec::new();
    let mut remaining = budget;
    let mut ledger = SelectionLedger::new();

    for candidate in ordered {
        if candidate.cost() > remaining {
            continue;
        }
        if ledger.contains(candidate) {
            continue;
        }

        ledger.record(candidate);
        remaining -= candidate.cost();
        selected.push(candidate.clone());

        if stop_when_exhausted && remaining <= 0.0 {
            break;
        }
    }

    selected
}
