// ==========================================
// 气候投资优化系统 - 资产（门店/物业）领域模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Property - 资产
// ==========================================
// 用途: 候选生成只需要 cluster_id + total_risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,            // 资产ID
    pub location: String,   // 位置/名称（展示用）
    pub cluster_id: i64,    // 所属气候集群
    pub total_risk: f64,    // 已存储的综合风险分（集群风险均值）
}

impl Property {
    pub fn new(id: i64, location: impl Into<String>, cluster_id: i64, total_risk: f64) -> Self {
        Self {
            id,
            location: location.into(),
            cluster_id,
            total_risk,
        }
    }
}
