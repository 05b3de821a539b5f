// ==========================================
// 气候投资优化系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::optimizer_config::OptimizerConfig;
use crate::db::open_sqlite_connection;
use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const KNAPSACK_UNIT: &str = "optimizer/knapsack_unit";
    pub const KNAPSACK_MAX_UNITS: &str = "optimizer/knapsack_max_units";
    pub const ROI_MULTIPLIER: &str = "optimizer/roi_multiplier";
    pub const COST_REFERENCE: &str = "optimizer/cost_reference";
    pub const HIGH_RISK_THRESHOLD: &str = "optimizer/high_risk_threshold";
    pub const LOCALE: &str = "optimizer/locale";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式，键有序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 优化引擎参数 =====

    /// 加载优化引擎参数
    ///
    /// 缺失的键取默认值；格式错误或取值非法的键记 warn 后取默认值
    pub fn load_optimizer_config(&self) -> Result<OptimizerConfig, Box<dyn Error>> {
        let defaults = OptimizerConfig::default();

        let locale = match self.get_global_config_value(config_keys::LOCALE)? {
            Some(v) if crate::i18n::is_supported(v.trim()) => v.trim().to_string(),
            Some(v) => {
                warn!(config_key = config_keys::LOCALE, raw_value = %v, "不支持的语言，使用默认值");
                defaults.locale.clone()
            }
            None => defaults.locale.clone(),
        };

        Ok(OptimizerConfig {
            knapsack_unit: self.read_positive(config_keys::KNAPSACK_UNIT, defaults.knapsack_unit)?,
            knapsack_max_units: self.read_parsed(
                config_keys::KNAPSACK_MAX_UNITS,
                defaults.knapsack_max_units,
                |v: &usize| *v > 0,
            )?,
            roi_multiplier: self.read_parsed(
                config_keys::ROI_MULTIPLIER,
                defaults.roi_multiplier,
                |v: &f64| v.is_finite() && *v >= 0.0,
            )?,
            cost_reference: self.read_positive(config_keys::COST_REFERENCE, defaults.cost_reference)?,
            high_risk_threshold: self.read_parsed(
                config_keys::HIGH_RISK_THRESHOLD,
                defaults.high_risk_threshold,
                |v: &f64| v.is_finite(),
            )?,
            locale,
        })
    }

    fn read_positive(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        self.read_parsed(key, default, |v: &f64| v.is_finite() && *v > 0.0)
    }

    fn read_parsed<T, F>(&self, key: &str, default: T, valid: F) -> Result<T, Box<dyn Error>>
    where
        T: FromStr,
        F: Fn(&T) -> bool,
    {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(value) if valid(&value) => Ok(value),
            _ => {
                warn!(config_key = key, raw_value = %raw, "配置值非法，使用默认值");
                Ok(default)
            }
        }
    }
}
