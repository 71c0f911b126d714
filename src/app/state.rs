// ==========================================
// 码板装车分配引擎 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::LoadingApi;
use crate::config::config_manager::ConfigManager;
use crate::db::{open_sqlite_connection, read_schema_version};
use crate::repository::layout_repo::LayoutRepository;

/// 应用状态
///
/// 在Tauri应用中作为全局状态管理；控制台入口同样使用
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置库 schema 版本（启动时读取）
    pub schema_version: Option<i64>,

    /// 码板装车API
    pub loading_api: Arc<LoadingApi>,

    /// 配置管理器（引擎策略）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 布局仓储与配置管理器共享同一个连接；
    /// 货品池只存在于进程内存中，每次启动为空
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let schema_version = {
            let conn_guard = conn.lock().map_err(|e| format!("数据库锁获取失败: {}", e))?;
            read_schema_version(&conn_guard).map_err(|e| format!("无法读取schema版本: {}", e))?
        };
        tracing::info!(schema_version = ?schema_version, "配置库schema版本");
        let layout_repo = Arc::new(
            LayoutRepository::from_connection(conn)
                .map_err(|e| format!("无法创建LayoutRepository: {}", e))?,
        );

        let loading_api = Arc::new(
            LoadingApi::from_config_manager(config_manager.clone(), layout_repo)
                .map_err(|e| format!("无法创建LoadingApi: {}", e))?,
        );

        tracing::info!("AppState初始化完成");
        Ok(Self {
            db_path,
            schema_version,
            loading_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 `PALLET_LOADING_DB_PATH` > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("PALLET_LOADING_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./pallet_loading.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("pallet-loading-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("pallet-loading");
        }

        // best-effort: 目录创建失败时 Connection::open 会报出具体错误
        std::fs::create_dir_all(&path).ok();
        path = path.join("pallet_loading.db");
    }

    path.to_string_lossy().to_string()
}
