use serde::{Deserialize, Serialize};

/// 优化引擎参数
///
/// 存储位置：config_kv（scope_id='global'，key='optimizer/{字段名}'）
/// 默认值即标准启发式参数，不做任何覆写时结果与标准算法一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// 背包离散化单位（预算与成本均按此单位向下取整）
    #[serde(default = "default_knapsack_unit")]
    pub knapsack_unit: f64,

    /// 背包容量上限（离散单位数）；超过时不运行 DP，回退 Greedy
    #[serde(default = "default_knapsack_max_units")]
    pub knapsack_max_units: usize,

    /// ROI 占位倍数
    #[serde(default = "default_roi_multiplier")]
    pub roi_multiplier: f64,

    /// 成本因子参考值：cost_factor = 1 / (1 + cost / cost_reference)
    #[serde(default = "default_cost_reference")]
    pub cost_reference: f64,

    /// 高风险阈值（risk_score 大于该值的风险额外 +5 优先级）
    #[serde(default = "default_high_risk_threshold")]
    pub high_risk_threshold: f64,

    /// 推荐理由文案语言
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_knapsack_unit() -> f64 {
    100.0
}

fn default_knapsack_max_units() -> usize {
    100_000
}

fn default_roi_multiplier() -> f64 {
    5.0
}

fn default_cost_reference() -> f64 {
    10_000.0
}

fn default_high_risk_threshold() -> f64 {
    0.7
}

fn default_locale() -> String {
    "zh-CN".to_string()
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            knapsack_unit: default_knapsack_unit(),
            knapsack_max_units: default_knapsack_max_units(),
            roi_multiplier: default_roi_multiplier(),
            cost_reference: default_cost_reference(),
            high_risk_threshold: default_high_risk_threshold(),
            locale: default_locale(),
        }
    }
}

impl OptimizerConfig {
    /// 预算离散化后的背包容量
    pub fn knapsack_capacity(&self, budget: f64) -> usize {
        if !(budget > 0.0) || !(self.knapsack_unit > 0.0) {
            return 0;
        }
        (budget / self.knapsack_unit).floor() as usize
    }

    /// 该预算是否允许运行背包 DP（O(n·W) 上限保护）
    pub fn knapsack_allowed(&self, budget: f64) -> bool {
        self.knapsack_capacity(budget) <= self.knapsack_max_units
    }
}
