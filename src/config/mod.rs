// ==========================================
// 气候投资优化系统 - 配置层
// ==========================================
// 职责: 优化引擎参数的加载与覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod optimizer_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use optimizer_config::OptimizerConfig;
