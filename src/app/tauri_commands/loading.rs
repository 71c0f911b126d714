use crate::app::state::AppState;
use crate::importer::intake::FileIntakeSource;

use super::common::{emit_frontend_event, map_api_error, parse_pool, parse_status, to_json};

/// 池内容变化事件（前端据此刷新三张表格）
const POOLS_CHANGED_EVENT: &str = "pallet_loading:pools_changed";

// ==========================================
// 货品接入
// ==========================================

/// 从 CSV / Excel 文件接入货品
#[tauri::command(rename_all = "snake_case")]
pub async fn seed_items_from_file(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    file_path: String,
) -> Result<String, String> {
    tracing::info!(file_path = %file_path, "[seed_items_from_file] 收到请求");

    let source = FileIntakeSource::new(&file_path);
    let result = state
        .loading_api
        .seed_from_source(&source)
        .await
        .map_err(|e| {
            tracing::error!("[seed_items_from_file] 接入失败: {:?}", e);
            map_api_error(e)
        })?;

    emit_frontend_event(
        &app,
        POOLS_CHANGED_EVENT,
        serde_json::json!({ "trigger": "seed_items_from_file", "accepted": result.accepted }),
    );
    to_json(&result)
}

// ==========================================
// 查询
// ==========================================

#[tauri::command(rename_all = "snake_case")]
pub async fn list_waiting_items(
    state: tauri::State<'_, AppState>,
    keyword: Option<String>,
) -> Result<String, String> {
    let result = state
        .loading_api
        .list_waiting(keyword.as_deref())
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn list_preparing_items(
    state: tauri::State<'_, AppState>,
    keyword: Option<String>,
) -> Result<String, String> {
    let result = state
        .loading_api
        .list_preparing(keyword.as_deref())
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn list_pallets(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.loading_api.list_pallets().map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn get_pallet(
    state: tauri::State<'_, AppState>,
    pallet_id: String,
) -> Result<String, String> {
    let result = state
        .loading_api
        .get_pallet(&pallet_id)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 已装车货板（发运方轮询）
#[tauri::command(rename_all = "snake_case")]
pub async fn list_loaded_pallets(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .loading_api
        .list_loaded_pallets()
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn get_pool_summary(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.loading_api.summary().map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn get_selection(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.loading_api.selection().map_err(map_api_error)?;
    to_json(&result)
}

// ==========================================
// 勾选
// ==========================================

#[tauri::command(rename_all = "snake_case")]
pub async fn set_selection(
    state: tauri::State<'_, AppState>,
    pool: String,
    ids: Vec<String>,
) -> Result<String, String> {
    let pool = parse_pool(&pool)?;
    state
        .loading_api
        .set_selection(pool, &ids)
        .map_err(map_api_error)?;
    let result = state.loading_api.selection().map_err(map_api_error)?;
    to_json(&result)
}

/// 表格回调的可见行号（过滤/排序后）
#[tauri::command(rename_all = "snake_case")]
pub async fn set_selection_by_rows(
    state: tauri::State<'_, AppState>,
    pool: String,
    rows: Vec<usize>,
    visible_ids: Vec<String>,
) -> Result<String, String> {
    let pool = parse_pool(&pool)?;
    state
        .loading_api
        .set_selection_by_rows(pool, &rows, &visible_ids)
        .map_err(map_api_error)?;
    let result = state.loading_api.selection().map_err(map_api_error)?;
    to_json(&result)
}

// ==========================================
// 按钮操作
// ==========================================

#[tauri::command(rename_all = "snake_case")]
pub async fn add_to_preparing(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.loading_api.add_to_preparing().map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn remove_from_preparing(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .loading_api
        .remove_from_preparing()
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn load_to_pallet(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state.loading_api.load_to_pallet().map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn delete_selected_pallets(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .loading_api
        .delete_selected_pallets()
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn start_selected_loading(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .loading_api
        .start_selected_loading()
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn load_selected_to_vehicle(
    state: tauri::State<'_, AppState>,
) -> Result<String, String> {
    let result = state
        .loading_api
        .load_selected_to_vehicle()
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn unload_selected_pallets(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let result = state
        .loading_api
        .unload_selected_pallets()
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn set_selected_status(
    state: tauri::State<'_, AppState>,
    status: String,
) -> Result<String, String> {
    let status = parse_status(&status)?;
    let result = state
        .loading_api
        .set_selected_status(status)
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn create_pallet(
    state: tauri::State<'_, AppState>,
    name: String,
    alias: Option<String>,
) -> Result<String, String> {
    let result = state
        .loading_api
        .create_pallet(&name, alias.as_deref())
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 点击货板行
#[tauri::command(rename_all = "snake_case")]
pub async fn preview_pallet(
    state: tauri::State<'_, AppState>,
    pallet_id: String,
) -> Result<String, String> {
    let result = state
        .loading_api
        .preview_pallet(&pallet_id)
        .map_err(map_api_error)?;
    to_json(&result)
}

#[tauri::command(rename_all = "snake_case")]
pub async fn set_pallet_status(
    state: tauri::State<'_, AppState>,
    pallet_id: String,
    status: String,
) -> Result<String, String> {
    let status = parse_status(&status)?;
    let previous = state
        .loading_api
        .set_pallet_status(&pallet_id, status)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "pallet_id": pallet_id, "previous": previous, "current": status }))
}
