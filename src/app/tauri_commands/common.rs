use crate::api::error::ApiError;
use crate::domain::types::{PalletStatus, PoolKind};
use serde::{Deserialize, Serialize};
use tauri::Manager;

// ==========================================
// 公共工具：错误映射、参数解析、事件发送
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 将ApiError转换为JSON字符串（Tauri要求）
pub(super) fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: err.code().to_string(),
        message: err.localized_message(),
        details: match &err {
            ApiError::InvalidStateTransition { from, to } => {
                Some(serde_json::json!({ "from": from, "to": to }))
            }
            _ => None,
        },
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| error_response.message.clone())
}

/// 序列化成功结果
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("序列化失败: {}", e))
}

/// 解析池名称（WAITING / PREPARING / PALLETS）
pub(super) fn parse_pool(pool: &str) -> Result<PoolKind, String> {
    PoolKind::from_str(pool).ok_or_else(|| {
        map_api_error(ApiError::InvalidInput(format!("未知的池: {}", pool)))
    })
}

/// 解析货板状态（available / loading / loaded / shipping / unloading）
pub(super) fn parse_status(status: &str) -> Result<PalletStatus, String> {
    PalletStatus::from_str(status).ok_or_else(|| {
        map_api_error(ApiError::InvalidInput(format!("未知的货板状态: {}", status)))
    })
}

/// best-effort: emit a frontend event; do not fail the command if emitting fails.
pub(super) fn emit_frontend_event(app: &tauri::AppHandle, event: &str, payload: serde_json::Value) {
    if let Err(e) = app.emit_all(event, payload) {
        tracing::warn!("emit_all failed: event={}, error={}", event, e);
    }
}
