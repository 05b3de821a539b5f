// ==========================================
// 气候投资优化系统 - 领域类型定义
// ==========================================
// 依据: 数据模型 - Level / MeasureType
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 定性等级 (Level)
// ==========================================
// 顺序: VeryLow < Low < Medium < High < VeryHigh
// 权重: {0.1, 0.3, 0.5, 0.7, 0.9}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    VeryLow,  // 极低
    Low,      // 低
    Medium,   // 中
    High,     // 高
    VeryHigh, // 极高
}

impl Level {
    /// 所有等级（按严重度升序）
    pub const ALL: [Level; 5] = [
        Level::VeryLow,
        Level::Low,
        Level::Medium,
        Level::High,
        Level::VeryHigh,
    ];

    /// 等级对应的数值权重
    pub fn weight(&self) -> f64 {
        match self {
            Level::VeryLow => 0.1,
            Level::Low => 0.3,
            Level::Medium => 0.5,
            Level::High => 0.7,
            Level::VeryHigh => 0.9,
        }
    }

    /// 从字符串解析等级
    ///
    /// 未知/空值一律按 Medium 处理（不报错）
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or(Level::Medium)
    }

    /// 严格解析（未知值返回 None）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "very_low" => Some(Level::VeryLow),
            "low" => Some(Level::Low),
            "medium" => Some(Level::Medium),
            "high" => Some(Level::High),
            "very_high" => Some(Level::VeryHigh),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Level::VeryLow => "very_low",
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
            Level::VeryHigh => "very_high",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Medium
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 措施类型 (Measure Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureType {
    Natural,    // 自然型（基于自然的解决方案）
    Material,   // 工程型（实体改造）
    Immaterial, // 非实体型（管理/流程）
}

impl MeasureType {
    /// 从字符串解析措施类型
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "natural" => Some(MeasureType::Natural),
            "material" => Some(MeasureType::Material),
            // 原始数据中存在 "inmaterial" 拼写
            "immaterial" | "inmaterial" => Some(MeasureType::Immaterial),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MeasureType::Natural => "natural",
            MeasureType::Material => "material",
            MeasureType::Immaterial => "immaterial",
        }
    }
}

impl fmt::Display for MeasureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
