// ==========================================
// 码板装车分配引擎 - 配置管理器
// ==========================================
// 职责: 引擎策略配置的加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config::{EngineConfig, PreviewMode};
use crate::db::open_sqlite_connection;
use crate::engine::lifecycle::TransitionPolicy;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

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
    /// 说明：会对传入连接再次应用统一 PRAGMA 并补齐配置表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            crate::db::ensure_config_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
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

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 引擎策略配置 =====

    /// 读取引擎策略；缺失或非法值回落默认
    pub fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        let defaults = EngineConfig::default();

        let preview_mode = match self.get_global_config_value(config_keys::PREVIEW_MODE)? {
            Some(raw) => PreviewMode::from_str(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    config_key = config_keys::PREVIEW_MODE,
                    raw_value = %raw,
                    "预览策略配置非法，使用默认值"
                );
                defaults.preview_mode
            }),
            None => defaults.preview_mode,
        };

        let transition_policy =
            match self.get_global_config_value(config_keys::TRANSITION_POLICY)? {
                Some(raw) => TransitionPolicy::from_str(&raw).unwrap_or_else(|| {
                    tracing::warn!(
                        config_key = config_keys::TRANSITION_POLICY,
                        raw_value = %raw,
                        "状态转换策略配置非法，使用默认值"
                    );
                    defaults.transition_policy
                }),
                None => defaults.transition_policy,
            };

        let auto_select_first_pallet = self
            .get_global_config_value(config_keys::AUTO_SELECT_FIRST_PALLET)?
            .and_then(|raw| parse_bool(&raw))
            .unwrap_or(defaults.auto_select_first_pallet);

        Ok(EngineConfig {
            preview_mode,
            transition_policy,
            auto_select_first_pallet,
        })
    }

    /// 持久化引擎策略（三个键一并写入）
    pub fn save_engine_config(&self, config: &EngineConfig) -> Result<(), Box<dyn Error>> {
        self.set_global_config_value(config_keys::PREVIEW_MODE, config.preview_mode.as_str())?;
        self.set_global_config_value(
            config_keys::TRANSITION_POLICY,
            config.transition_policy.as_str(),
        )?;
        self.set_global_config_value(
            config_keys::AUTO_SELECT_FIRST_PALLET,
            if config.auto_select_first_pallet { "true" } else { "false" },
        )?;
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 货板预览策略: STAGE | READ_ONLY
    pub const PREVIEW_MODE: &str = "pallet_loading.preview_mode";

    // 状态转换策略: PERMISSIVE | STRICT
    pub const TRANSITION_POLICY: &str = "pallet_loading.transition_policy";

    // 首次加载自动勾选首个货板: true | false
    pub const AUTO_SELECT_FIRST_PALLET: &str = "pallet_loading.auto_select_first_pallet";

    // 三栏面板宽度 (JSON 数组)
    pub const PANEL_LAYOUT: &str = "pallet_loading.panel_layout";
}
