// ==========================================
// 气候投资优化系统 - 候选措施生成器
// ==========================================
// 职责: 为每个 (资产, 未实施措施) 组合生成候选
// 输入: 资产ID列表 + 措施目录 + 优先风险ID集合
// 输出: MeasureCandidate 列表（资产优先、目录顺序次之）
// 红线: 已实施措施不得生成候选；任一资产不存在则整体失败
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::measure::Measure;
use crate::domain::risk::RiskDetail;
use crate::domain::types::MeasureType;
use crate::engine::error::{EngineResult, OptimizationError};
use crate::engine::repositories::OptimizationRepositories;
use std::collections::HashSet;
use tracing::{debug, warn};

// ==========================================
// 关键词 → 受影响风险 对照表
// ==========================================
// 按措施名称做大小写不敏感的子串匹配；顺序固定，输出按首次出现去重
const RISK_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "inundación",
        &["Inundación costera/fluvial/pluvial", "Precipitaciones intensas/extremas"],
    ),
    (
        "pluvial",
        &[
            "Variabilidad hidrológica o de las precipitaciones",
            "Cambios en los patrones y tipos de precipitaciones",
        ],
    ),
    (
        "drenaje",
        &["Inundación costera/fluvial/pluvial", "Precipitaciones intensas/extremas"],
    ),
    (
        "agua",
        &[
            "Inundación costera/fluvial/pluvial",
            "Variabilidad hidrológica o de las precipitaciones",
        ],
    ),
    ("calor", &["Ola de calor", "Estrés térmico"]),
    (
        "térmico",
        &["Ola de calor", "Estrés térmico", "Variabilidad de la temperatura"],
    ),
    ("climatización", &["Ola de calor", "Cambios de temperatura"]),
    ("viento", &["Tormenta", "Ciclón/Huracán/Tifón"]),
    ("incendio", &["Incendio forestal"]),
    (
        "estructural",
        &["Tormenta", "Hundimiento", "Desprendimento de tierras"],
    ),
];

// ==========================================
// MeasureCandidate - 候选措施
// ==========================================
// 构造后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureCandidate {
    pub measure: Measure,
    pub property_id: i64,
    pub property_label: String,
    pub property_risk: f64,         // 资产当前综合风险分
    pub risk_reduction: f64,        // 估算风险降低（比例）
    pub efficiency: f64,            // risk_reduction / cost
    pub affected_risks: Vec<String>,
    pub priority: i32,
}

impl MeasureCandidate {
    /// 成本
    pub fn cost(&self) -> f64 {
        self.measure.estimated_cost
    }
}

// ==========================================
// CandidateGenerator - 候选措施生成器
// ==========================================
pub struct CandidateGenerator {
    repos: OptimizationRepositories,
    config: OptimizerConfig,
}

impl CandidateGenerator {
    /// 构造函数
    pub fn new(repos: OptimizationRepositories, config: OptimizerConfig) -> Self {
        Self { repos, config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成候选集
    ///
    /// 流程（逐资产）：
    /// 1) 查询资产；不存在 → PropertyNotFound（不返回部分结果）
    /// 2) 查询已实施措施，排除之
    /// 3) 查询集群风险画像
    /// 4) 对每个目录措施估算风险降低、受影响风险、优先级
    ///
    /// # 返回
    /// - Ok(Vec<MeasureCandidate>): 非空候选集
    /// - Err(NoMeasuresAvailable): 目录为空或无候选
    pub fn generate(
        &self,
        property_ids: &[i64],
        catalog: &[Measure],
        priority_risk_ids: &HashSet<i64>,
    ) -> EngineResult<Vec<MeasureCandidate>> {
        if catalog.is_empty() {
            return Err(OptimizationError::NoMeasuresAvailable);
        }

        let mut candidates = Vec::new();

        for &property_id in property_ids {
            let property = self
                .repos
                .property_repo
                .find_by_id(property_id)?
                .ok_or(OptimizationError::PropertyNotFound { property_id })?;

            let applied: HashSet<String> = self
                .repos
                .property_repo
                .applied_measure_names(property_id)?
                .into_iter()
                .collect();

            let risks = self
                .repos
                .cluster_risk_repo
                .find_by_cluster(property.cluster_id)?;

            debug!(
                property_id,
                cluster_id = property.cluster_id,
                applied_count = applied.len(),
                risk_count = risks.len(),
                "生成资产候选"
            );

            for measure in catalog {
                if applied.contains(&measure.name) {
                    continue;
                }
                if !measure.has_valid_cost() {
                    warn!(
                        measure = %measure.name,
                        cost = measure.estimated_cost,
                        "措施成本非法，跳过"
                    );
                    continue;
                }

                let risk_reduction = self.estimate_risk_reduction(measure, property.total_risk);
                if risk_reduction <= 0.0 {
                    continue;
                }

                candidates.push(MeasureCandidate {
                    measure: measure.clone(),
                    property_id,
                    property_label: property.location.clone(),
                    property_risk: property.total_risk,
                    risk_reduction,
                    efficiency: risk_reduction / measure.estimated_cost,
                    affected_risks: affected_risks(&measure.name, &risks),
                    priority: self.calculate_priority(measure, &risks, priority_risk_ids),
                });
            }
        }

        if candidates.is_empty() {
            return Err(OptimizationError::NoMeasuresAvailable);
        }

        Ok(candidates)
    }

    // ==========================================
    // 启发式
    // ==========================================

    /// 估算风险降低
    ///
    /// base: natural 0.05 / material 0.10 / immaterial 0.03
    /// adjusted = base × (1 + current_risk)
    /// cost_factor = 1 / (1 + cost / cost_reference)
    /// reduction = adjusted × (1 + cost_factor)
    pub fn estimate_risk_reduction(&self, measure: &Measure, current_risk: f64) -> f64 {
        let base = match measure.measure_type {
            MeasureType::Natural => 0.05,
            MeasureType::Material => 0.10,
            MeasureType::Immaterial => 0.03,
        };
        let adjusted = base * (1.0 + current_risk);
        let cost_factor = 1.0 / (1.0 + measure.estimated_cost / self.config.cost_reference);
        adjusted * (1.0 + cost_factor)
    }

    /// 计算候选优先级
    ///
    /// 每个优先风险 +10；每个高风险（score > 阈值）+5；
    /// 措施类型 material +3，natural +2
    pub fn calculate_priority(
        &self,
        measure: &Measure,
        risks: &[RiskDetail],
        priority_risk_ids: &HashSet<i64>,
    ) -> i32 {
        let mut priority = 0;

        for risk in risks {
            if priority_risk_ids.contains(&risk.id) {
                priority += 10;
            }
            if risk.risk_score > self.config.high_risk_threshold {
                priority += 5;
            }
        }

        priority += match measure.measure_type {
            MeasureType::Material => 3,
            MeasureType::Natural => 2,
            MeasureType::Immaterial => 0,
        };

        priority
    }
}

/// 推断措施影响的风险名称
///
/// 关键词均未命中时，保守地视为影响集群内全部风险
pub fn affected_risks(measure_name: &str, risks: &[RiskDetail]) -> Vec<String> {
    let name = measure_name.to_lowercase();
    let mut seen = HashSet::new();
    let mut affected = Vec::new();

    for (keyword, risk_names) in RISK_KEYWORDS {
        if !name.contains(&keyword.to_lowercase()) {
            continue;
        }
        for risk_name in risk_names.iter() {
            if seen.insert(*risk_name) {
                affected.push(risk_name.to_string());
            }
        }
    }

    if affected.is_empty() {
        return risks.iter().map(|r| r.name.clone()).collect();
    }

    affected
}
