// ==========================================
// 码板装车分配引擎 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 Tauri 命令与控制台入口调用
// ==========================================

pub mod error;
pub mod loading_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use loading_api::{
    CreatePalletResponse, IntakeResponse, LoadingApi, SelectionSnapshot, TransferResponse,
};
