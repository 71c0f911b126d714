// ==========================================
// 码板装车分配引擎 - 配置层
// ==========================================
// 职责: 引擎策略配置（预览策略 / 状态转换策略 / 默认勾选）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config::{EngineConfig, PreviewMode};
