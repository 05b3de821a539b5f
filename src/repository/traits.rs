// ==========================================
// 气候投资优化系统 - 优化引擎外部协作者接口
// ==========================================
// 职责: 定义引擎所需的只读数据访问接口（不包含业务逻辑）
// 约束: 同步调用；失败立即返回，由引擎包装为 DataSourceFailure
// 实现者: Sqlite*Repository（rusqlite）/ 测试替身
// ==========================================

use crate::domain::measure::Measure;
use crate::domain::property::Property;
use crate::domain::risk::RiskDetail;
use crate::repository::error::RepositoryResult;

// ==========================================
// PropertyRepository Trait
// ==========================================
pub trait PropertyRepository: Send + Sync {
    /// 按ID查询资产
    ///
    /// # 返回
    /// - Ok(Some(Property)): 找到
    /// - Ok(None): 不存在
    /// - Err: 数据访问失败
    fn find_by_id(&self, property_id: i64) -> RepositoryResult<Option<Property>>;

    /// 查询资产已实施的措施名称
    fn applied_measure_names(&self, property_id: i64) -> RepositoryResult<Vec<String>>;
}

// ==========================================
// ClusterRiskRepository Trait
// ==========================================
pub trait ClusterRiskRepository: Send + Sync {
    /// 查询集群风险画像（risk_score 已推导）
    fn find_by_cluster(&self, cluster_id: i64) -> RepositoryResult<Vec<RiskDetail>>;
}

// ==========================================
// MeasureRepository Trait
// ==========================================
pub trait MeasureRepository: Send + Sync {
    /// 列出完整措施目录（按录入顺序，保证候选生成顺序稳定）
    fn list_all(&self) -> RepositoryResult<Vec<Measure>>;
}
