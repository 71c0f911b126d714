use crate::api::error::ApiError;
use crate::app::state::AppState;
use crate::config::engine_config::{EngineConfig, PreviewMode};
use crate::domain::layout::PanelLayout;
use crate::engine::lifecycle::TransitionPolicy;

use super::common::{map_api_error, to_json};

// ==========================================
// 面板布局 / 引擎策略命令
// ==========================================

#[tauri::command(rename_all = "snake_case")]
pub async fn get_panel_layout(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.loading_api.layout().map_err(map_api_error)?;
    to_json(&result)
}

/// 拖拽结束时保存三栏宽度
#[tauri::command(rename_all = "snake_case")]
pub async fn save_panel_layout(
    state: tauri::State<'_, AppState>,
    widths: Vec<f64>,
) -> Result<String, String> {
    let widths: [f64; 3] = widths.as_slice().try_into().map_err(|_| {
        map_api_error(ApiError::InvalidInput(format!(
            "面板宽度必须为3个数值，实际{}个",
            widths.len()
        )))
    })?;
    let layout = PanelLayout(widths);
    state
        .loading_api
        .save_layout(layout)
        .map_err(map_api_error)?;
    to_json(&layout)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn get_engine_config(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.loading_api.engine_config().map_err(map_api_error)?;
    to_json(&result)
}

/// 更新引擎策略（未传的字段保持不变）
#[tauri::command(rename_all = "snake_case")]
pub async fn update_engine_config(
    state: tauri::State<'_, AppState>,
    preview_mode: Option<String>,
    transition_policy: Option<String>,
    auto_select_first_pallet: Option<bool>,
) -> Result<String, String> {
    let current = state.loading_api.engine_config().map_err(map_api_error)?;

    let preview_mode = match preview_mode {
        Some(raw) => PreviewMode::from_str(&raw).ok_or_else(|| {
            map_api_error(ApiError::InvalidInput(format!("未知的预览策略: {}", raw)))
        })?,
        None => current.preview_mode,
    };
    let transition_policy = match transition_policy {
        Some(raw) => TransitionPolicy::from_str(&raw).ok_or_else(|| {
            map_api_error(ApiError::InvalidInput(format!("未知的状态转换策略: {}", raw)))
        })?,
        None => current.transition_policy,
    };

    let config = EngineConfig {
        preview_mode,
        transition_policy,
        auto_select_first_pallet: auto_select_first_pallet
            .unwrap_or(current.auto_select_first_pallet),
    };
    state
        .loading_api
        .update_engine_config(config)
        .map_err(map_api_error)?;
    to_json(&config)
}
