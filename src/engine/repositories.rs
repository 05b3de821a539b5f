// ==========================================
// 气候投资优化系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合优化引擎所需的外部协作者（只读）
// ==========================================

use std::sync::Arc;

use crate::repository::{ClusterRiskRepository, MeasureRepository, PropertyRepository};

/// 优化引擎仓储集合
///
/// 三个只读协作者合并为一个参数，便于单元测试时整体替换为测试替身。
/// 多个优化调用可以并发共享同一个集合（各实现均为 Send + Sync）。
#[derive(Clone)]
pub struct OptimizationRepositories {
    /// 资产仓储（资产查询 + 已实施措施）
    pub property_repo: Arc<dyn PropertyRepository>,
    /// 集群风险仓储
    pub cluster_risk_repo: Arc<dyn ClusterRiskRepository>,
    /// 措施目录仓储
    pub measure_repo: Arc<dyn MeasureRepository>,
}

impl OptimizationRepositories {
    /// 创建新的仓储集合
    pub fn new(
        property_repo: Arc<dyn PropertyRepository>,
        cluster_risk_repo: Arc<dyn ClusterRiskRepository>,
        measure_repo: Arc<dyn MeasureRepository>,
    ) -> Self {
        Self {
            property_repo,
            cluster_risk_repo,
            measure_repo,
        }
    }
}
