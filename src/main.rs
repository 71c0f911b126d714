// ==========================================
// 码板装车分配引擎 - 主入口
// ==========================================
// tauri-app 特性: 桌面应用
// 默认: 控制台模式（可选从文件接入货品，输出池汇总 JSON）
// ==========================================

// 禁止控制台窗口 (Windows)
#![cfg_attr(
    all(feature = "tauri-app", not(debug_assertions)),
    windows_subsystem = "windows"
)]

use pallet_loading::app::{get_default_db_path, AppState};

#[cfg(feature = "tauri-app")]
fn main() {
    use pallet_loading::app::tauri_commands::*;

    pallet_loading::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", pallet_loading::APP_NAME);
    tracing::info!("系统版本: {}", pallet_loading::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("启动Tauri应用...");

    let result = tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // ==========================================
            // 货品接入 / 查询
            // ==========================================
            seed_items_from_file,
            list_waiting_items,
            list_preparing_items,
            list_pallets,
            get_pallet,
            list_loaded_pallets,
            get_pool_summary,
            get_selection,

            // ==========================================
            // 勾选与按钮操作
            // ==========================================
            set_selection,
            set_selection_by_rows,
            add_to_preparing,
            remove_from_preparing,
            load_to_pallet,
            delete_selected_pallets,
            start_selected_loading,
            load_selected_to_vehicle,
            unload_selected_pallets,
            set_selected_status,
            create_pallet,
            preview_pallet,
            set_pallet_status,

            // ==========================================
            // 布局偏好 / 引擎策略
            // ==========================================
            get_panel_layout,
            save_panel_layout,
            get_engine_config,
            update_engine_config,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        tracing::error!("Tauri应用运行失败: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Tauri应用已退出");
}

#[cfg(not(feature = "tauri-app"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use pallet_loading::importer::FileIntakeSource;

    // 日志采集场景输出 JSON
    if std::env::var_os("PALLET_LOADING_LOG_JSON").is_some() {
        pallet_loading::logging::init_json();
    } else {
        pallet_loading::logging::init();
    }

    tracing::info!("{} v{}（控制台模式）", pallet_loading::APP_NAME, pallet_loading::VERSION);

    let db_path = get_default_db_path();
    let app_state = AppState::new(db_path).map_err(anyhow::Error::msg)?;
    match app_state.config_manager.get_config_snapshot() {
        Ok(snapshot) => tracing::debug!(config = %snapshot, "当前配置快照"),
        Err(e) => tracing::warn!("读取配置快照失败: {}", e),
    }

    if let Some(file_path) = std::env::args().nth(1) {
        let source = FileIntakeSource::new(&file_path);
        let response = app_state.loading_api.seed_from_source(&source).await?;
        tracing::info!(
            file = %file_path,
            accepted = response.accepted,
            skipped = response.skipped,
            "货品接入完成"
        );
    }

    let summary = app_state.loading_api.summary()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
