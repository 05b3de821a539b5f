// ==========================================
// 气候投资优化系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod measure_repo;
pub mod property_repo;
pub mod risk_repo;
pub mod traits;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use measure_repo::SqliteMeasureRepository;
pub use property_repo::SqlitePropertyRepository;
pub use risk_repo::SqliteClusterRiskRepository;
pub use traits::{ClusterRiskRepository, MeasureRepository, PropertyRepository};
