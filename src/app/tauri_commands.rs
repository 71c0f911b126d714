// ==========================================
// 码板装车分配引擎 - Tauri 命令（按域拆分）
// ==========================================
// 职责: Tauri 命令定义,连接前端与后端 API
// 返回: 成功为 JSON 字符串；失败为 {code, message, details} JSON 字符串
// ==========================================

#![cfg(feature = "tauri-app")]

mod common;
mod layout;
mod loading;

pub use layout::*;
pub use loading::*;
