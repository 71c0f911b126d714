// ==========================================
// 码板装车分配引擎 - 应用层
// ==========================================
// 职责: 共享状态装配；Tauri 集成（tauri-app 特性）
// ==========================================

pub mod state;
pub mod tauri_commands;

// 重导出
pub use state::{get_default_db_path, AppState};

#[cfg(feature = "tauri-app")]
pub use tauri_commands::*;
