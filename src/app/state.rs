// ==========================================
// 气候投资优化系统 - 应用状态
// ==========================================
// 职责: 组装仓储、引擎、API 实例（共享同一 SQLite 连接）
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{ImportApi, OptimizationApi};
use crate::config::{ConfigManager, OptimizerConfig};
use crate::db::{configure_sqlite_connection, init_schema};
use crate::engine::{BudgetOptimizer, OptimizationRepositories, RiskAssessmentEngine};
use crate::importer::CsvCatalogImporter;
use crate::repository::{
    SqliteClusterRiskRepository, SqliteMeasureRepository, SqlitePropertyRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时加载的引擎参数
    pub optimizer_config: OptimizerConfig,

    /// 预算优化API
    pub optimization_api: Arc<OptimizationApi>,

    /// 目录导入API
    pub import_api: Arc<ImportApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并幂等建表
    /// 2. 从 config_kv 加载引擎参数
    /// 3. 初始化仓储、引擎与API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = Connection::open(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        configure_sqlite_connection(&conn).map_err(|e| format!("数据库连接配置失败: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let optimizer_config = config_manager
            .load_optimizer_config()
            .map_err(|e| format!("加载优化参数失败: {}", e))?;

        // ==========================================
        // 仓储与引擎
        // ==========================================
        let repos = OptimizationRepositories::new(
            Arc::new(SqlitePropertyRepository::from_connection(conn.clone())),
            Arc::new(SqliteClusterRiskRepository::from_connection(conn.clone())),
            Arc::new(SqliteMeasureRepository::from_connection(conn.clone())),
        );

        let optimizer = Arc::new(BudgetOptimizer::new(repos.clone(), optimizer_config.clone()));
        let assessor = Arc::new(RiskAssessmentEngine::new(repos));

        // ==========================================
        // API
        // ==========================================
        let optimization_api = Arc::new(OptimizationApi::new(optimizer, assessor));
        let import_api = Arc::new(ImportApi::new(Arc::new(CsvCatalogImporter::from_connection(
            conn,
        ))));

        tracing::info!(
            knapsack_unit = optimizer_config.knapsack_unit,
            locale = %optimizer_config.locale,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            optimizer_config,
            optimization_api,
            import_api,
            config_manager,
        })
    }
}

/// 默认数据库路径
///
/// 优先级：环境变量 CLIMATE_INVEST_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("CLIMATE_INVEST_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./climate_invest.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("climate-invest-optimizer");
        // 目录创建失败时回退当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("climate_invest.db");
        }
    }

    path.to_string_lossy().to_string()
}
