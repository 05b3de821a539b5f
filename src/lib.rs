// ==========================================
// 气候投资优化系统 - 核心库
// ==========================================
// 职责: 在预算约束下为资产组合推荐气候风险缓解措施
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统（推荐结果由人工最终确认）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 评分与预算分配
pub mod engine;

// 导入层 - CSV 目录
pub mod importer;

// 配置层 - 引擎参数
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 实例组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Level, MeasureType};

// 领域实体
pub use domain::{
    EfficiencyTier, Measure, OptimizationMetrics, OptimizationRequest, OptimizationResult,
    Property, PropertyRecommendation, RecommendedMeasure, RiskAssessment, RiskDetail, RiskLevels,
};

// 引擎
pub use engine::{
    BudgetOptimizer, OptimizationError, OptimizationRepositories, OptimizationStrategy,
    RiskAssessmentEngine, RiskScorer,
};

// API
pub use api::{ApiError, ImportApi, OptimizationApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "气候风险投资优化系统";
