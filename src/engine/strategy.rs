// ==========================================
// 气候投资优化系统 - 分配策略定义
// ==========================================
// 用途：
// - 三种可互换的预算分配策略（封闭枚举，不做字符串分派）；
// - 未知/缺省策略名一律回退 Greedy（有意的宽松处理，不报错）。

use serde::{Deserialize, Deserializer, Serialize};

/// 预算分配策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStrategy {
    /// 按效率（风险降低/成本）降序贪心
    Greedy,
    /// 0/1 背包动态规划（预算离散化）
    Knapsack,
    /// 按优先级降序、效率次之的贪心（无优先风险时等同 Greedy）
    Weighted,
}

impl OptimizationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationStrategy::Greedy => "greedy",
            OptimizationStrategy::Knapsack => "knapsack",
            OptimizationStrategy::Weighted => "weighted",
        }
    }

    /// 宽松解析：空值或未知值回退 Greedy
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl Default for OptimizationStrategy {
    fn default() -> Self {
        OptimizationStrategy::Greedy
    }
}

impl std::fmt::Display for OptimizationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OptimizationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(OptimizationStrategy::Greedy),
            "knapsack" => Ok(OptimizationStrategy::Knapsack),
            "weighted" => Ok(OptimizationStrategy::Weighted),
            other => Err(format!("未知策略类型: {}", other)),
        }
    }
}

// 反序列化走宽松解析（null / "" / 未知值 → Greedy）
impl<'de> Deserialize<'de> for OptimizationStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(OptimizationStrategy::parse_or_default)
            .unwrap_or_default())
    }
}
