// ==========================================
// 码板装车分配引擎 - 核心库
// ==========================================
// 技术栈: Tauri + Rust + SQLite
// 三池调拨: 待码货品 / 装板准备区 / 货板
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 布局偏好
pub mod repository;

// 引擎层 - 池调拨与货板状态机
pub mod engine;

// 接入层 - 外部货品
pub mod importer;

// 配置层 - 引擎策略
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - Tauri 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ItemLocation, ItemView, Pallet, PalletStatus, PalletView, PanelLayout, PoolKind, PoolSummary,
    ShipmentItem,
};

// 引擎
pub use engine::{
    EngineError, LoadingWorkbench, NoOpReason, PalletLifecycle, PoolStore, Scope,
    SelectionTracker, TransferOutcome, TransitionPolicy,
};

// 配置
pub use config::{EngineConfig, PreviewMode};

// API
pub use api::{ApiError, LoadingApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "码板装车分配引擎";
