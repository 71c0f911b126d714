// ==========================================
// 码板装车分配引擎 - 码板装车 API
// ==========================================
// 职责: 工作台的线程安全门面（Mutex 串行化），布局偏好读写，货品接入
// 红线: 所有池修改经由 LoadingWorkbench，API 层不直接操作 PoolStore
// ==========================================

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::config::engine_config::EngineConfig;
use crate::domain::item::{ItemView, ShipmentItem};
use crate::domain::layout::PanelLayout;
use crate::domain::pallet::PalletView;
use crate::domain::summary::PoolSummary;
use crate::domain::types::{PalletStatus, PoolKind};
use crate::engine::error::EngineError;
use crate::engine::pool_store::{PoolStore, Scope};
use crate::engine::transfer::{LoadingWorkbench, PalletPreview, TransferOutcome};
use crate::importer::intake::{fetch_one, gather, IntakeFailure, IntakeSource};
use crate::perf::PerfGuard;
use crate::repository::layout_repo::LayoutRepository;

// ==========================================
// 响应 DTO
// ==========================================

/// 调拨操作响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub outcome: TransferOutcome,
    pub message: String,      // 按当前语言的提示文案
    pub summary: PoolSummary, // 操作后的池汇总
}

/// 新建货板响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePalletResponse {
    pub pallet_id: String,
    pub pallet: PalletView,
}

/// 货品接入响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub accepted: usize,              // 实际进入待码货品的数量
    pub skipped: usize,               // 已登记或批内重复而跳过的数量
    pub failures: Vec<IntakeFailure>, // 读取失败的来源
    pub summary: PoolSummary,
}

/// 三张表格的勾选快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub waiting: Vec<String>,
    pub preparing: Vec<String>,
    pub pallets: Vec<String>,
}

// ==========================================
// LoadingApi - 码板装车 API
// ==========================================
pub struct LoadingApi {
    workbench: Mutex<LoadingWorkbench>,
    layout: Mutex<PanelLayout>,
    layout_repo: Arc<LayoutRepository>,
    config_manager: Option<Arc<ConfigManager>>,
}

impl LoadingApi {
    /// 创建 API 实例；布局偏好在此读取一次
    ///
    /// # 参数
    /// - config: 引擎策略
    /// - layout_repo: 布局仓储
    pub fn new(config: EngineConfig, layout_repo: Arc<LayoutRepository>) -> Self {
        Self::with_store(PoolStore::new(), config, layout_repo)
    }

    /// 以已有存储创建（测试与预置场景）
    pub fn with_store(
        store: PoolStore,
        config: EngineConfig,
        layout_repo: Arc<LayoutRepository>,
    ) -> Self {
        let layout = layout_repo.load_or_default();
        Self {
            workbench: Mutex::new(LoadingWorkbench::with_store(store, config)),
            layout: Mutex::new(layout),
            layout_repo,
            config_manager: None,
        }
    }

    /// 从配置管理器读取引擎策略并创建
    pub fn from_config_manager(
        config_manager: Arc<ConfigManager>,
        layout_repo: Arc<LayoutRepository>,
    ) -> ApiResult<Self> {
        let config = config_manager
            .load_engine_config()
            .map_err(|e| ApiError::DatabaseError(format!("读取引擎配置失败: {}", e)))?;
        let mut api = Self::new(config, layout_repo);
        api.config_manager = Some(config_manager);
        Ok(api)
    }

    fn workbench(&self) -> ApiResult<MutexGuard<'_, LoadingWorkbench>> {
        self.workbench
            .lock()
            .map_err(|e| ApiError::InternalError(format!("工作台锁获取失败: {}", e)))
    }

    fn respond(workbench: &LoadingWorkbench, outcome: TransferOutcome) -> TransferResponse {
        TransferResponse {
            message: outcome.message(),
            summary: workbench.store().summary(),
            outcome,
        }
    }

    // ==========================================
    // 货品接入
    // ==========================================

    /// 直接接入货品到待码货品
    pub fn seed_items(&self, items: Vec<ShipmentItem>) -> ApiResult<IntakeResponse> {
        let total = items.len();
        let mut workbench = self.workbench()?;
        let accepted = workbench.seed_waiting(items);
        info!(total, accepted, "货品接入");
        Ok(IntakeResponse {
            accepted,
            skipped: total - accepted,
            failures: Vec::new(),
            summary: workbench.store().summary(),
        })
    }

    /// 从单个来源接入，来源读取失败即返回错误
    pub async fn seed_from_source(&self, source: &dyn IntakeSource) -> ApiResult<IntakeResponse> {
        let items = fetch_one(source).await?;
        self.seed_items(items)
    }

    /// 从多个来源并发接入，失败的来源记录在响应中
    pub async fn seed_from_sources(
        &self,
        sources: &[Box<dyn IntakeSource>],
    ) -> ApiResult<IntakeResponse> {
        let batch = gather(sources).await;
        if !batch.is_clean() {
            warn!(
                duplicates = batch.duplicates.len(),
                failed = batch.failures.len(),
                "接入批次存在重复货品或失败来源"
            );
        }
        let duplicates = batch.duplicates.len();
        let failures = batch.failures;

        let mut response = self.seed_items(batch.items)?;
        response.skipped += duplicates;
        response.failures = failures;
        Ok(response)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 待码货品（完整记录），可按关键字过滤
    pub fn list_waiting(&self, keyword: Option<&str>) -> ApiResult<Vec<ShipmentItem>> {
        let workbench = self.workbench()?;
        let keyword = keyword.unwrap_or("");
        Ok(workbench
            .store()
            .waiting_items()
            .into_iter()
            .filter(|item| item.matches_keyword(keyword))
            .cloned()
            .collect())
    }

    /// 装板准备区（精简视图），可按关键字过滤
    pub fn list_preparing(&self, keyword: Option<&str>) -> ApiResult<Vec<ItemView>> {
        let workbench = self.workbench()?;
        let keyword = keyword.unwrap_or("");
        Ok(workbench
            .store()
            .preparing_items()
            .into_iter()
            .filter(|item| item.matches_keyword(keyword))
            .collect())
    }

    pub fn list_pallets(&self) -> ApiResult<Vec<PalletView>> {
        Ok(self.workbench()?.store().pallet_views())
    }

    pub fn get_pallet(&self, pallet_id: &str) -> ApiResult<PalletView> {
        self.workbench()?
            .store()
            .pallet_view(pallet_id)
            .ok_or_else(|| ApiError::from(EngineError::pallet_not_found(pallet_id)))
    }

    /// 已装车货板（供发运方轮询）
    pub fn list_loaded_pallets(&self) -> ApiResult<Vec<PalletView>> {
        let workbench = self.workbench()?;
        let store = workbench.store();
        Ok(store
            .pallets_with_status(PalletStatus::Loaded)
            .into_iter()
            .filter_map(|pallet| store.pallet_view(&pallet.id))
            .collect())
    }

    pub fn summary(&self) -> ApiResult<PoolSummary> {
        Ok(self.workbench()?.store().summary())
    }

    pub fn selection(&self) -> ApiResult<SelectionSnapshot> {
        let workbench = self.workbench()?;
        let selection = workbench.selection();
        Ok(SelectionSnapshot {
            waiting: selection.selected_ids(PoolKind::Waiting),
            preparing: selection.selected_ids(PoolKind::Preparing),
            pallets: selection.selected_ids(PoolKind::Pallets),
        })
    }

    // ==========================================
    // 勾选
    // ==========================================

    pub fn set_selection(&self, pool: PoolKind, ids: &[String]) -> ApiResult<()> {
        self.workbench()?.set_selection(pool, ids);
        Ok(())
    }

    /// 按可见行号设置勾选
    pub fn set_selection_by_rows(
        &self,
        pool: PoolKind,
        rows: &[usize],
        visible_ids: &[String],
    ) -> ApiResult<()> {
        self.workbench()?
            .set_selection_by_rows(pool, rows, visible_ids);
        Ok(())
    }

    // ==========================================
    // 按钮操作
    // ==========================================

    /// 装入
    pub fn add_to_preparing(&self) -> ApiResult<TransferResponse> {
        let _perf = PerfGuard::new("add_to_preparing");
        let mut workbench = self.workbench()?;
        let outcome = workbench.add_to_preparing();
        Ok(Self::respond(&workbench, outcome))
    }

    /// 移出
    pub fn remove_from_preparing(&self) -> ApiResult<TransferResponse> {
        let _perf = PerfGuard::new("remove_from_preparing");
        let mut workbench = self.workbench()?;
        let outcome = workbench.remove_from_preparing();
        Ok(Self::respond(&workbench, outcome))
    }

    /// 装板
    pub fn load_to_pallet(&self) -> ApiResult<TransferResponse> {
        let _perf = PerfGuard::new("load_to_pallet");
        let mut workbench = self.workbench()?;
        let outcome = workbench.load_to_pallet()?;
        Ok(Self::respond(&workbench, outcome))
    }

    /// 删除勾选货板
    pub fn delete_selected_pallets(&self) -> ApiResult<TransferResponse> {
        let _perf = PerfGuard::new("delete_selected_pallets");
        let mut workbench = self.workbench()?;
        let outcome = workbench.delete_selected_pallets()?;
        Ok(Self::respond(&workbench, outcome))
    }

    /// 装车
    pub fn start_selected_loading(&self) -> ApiResult<TransferResponse> {
        let mut workbench = self.workbench()?;
        let outcome = workbench.start_selected_loading()?;
        Ok(Self::respond(&workbench, outcome))
    }

    /// 确认装车
    pub fn load_selected_to_vehicle(&self) -> ApiResult<TransferResponse> {
        let mut workbench = self.workbench()?;
        let outcome = workbench.load_selected_to_vehicle()?;
        Ok(Self::respond(&workbench, outcome))
    }

    /// 确认卸车
    pub fn unload_selected_pallets(&self) -> ApiResult<TransferResponse> {
        let _perf = PerfGuard::new("unload_selected_pallets");
        let mut workbench = self.workbench()?;
        let outcome = workbench.unload_selected_pallets()?;
        Ok(Self::respond(&workbench, outcome))
    }

    /// 批量设置勾选货板状态
    pub fn set_selected_status(&self, status: PalletStatus) -> ApiResult<TransferResponse> {
        let mut workbench = self.workbench()?;
        let outcome = workbench.set_selected_status(status)?;
        Ok(Self::respond(&workbench, outcome))
    }

    /// 新建货板
    pub fn create_pallet(&self, name: &str, alias: Option<&str>) -> ApiResult<CreatePalletResponse> {
        let mut workbench = self.workbench()?;
        let pallet_id = workbench.create_pallet(name, alias)?;
        let pallet = workbench
            .store()
            .pallet_view(&pallet_id)
            .ok_or_else(|| ApiError::InternalError(format!("新建货板丢失: {}", pallet_id)))?;
        info!(pallet_id = %pallet_id, name = %pallet.name, "新建货板");
        Ok(CreatePalletResponse { pallet_id, pallet })
    }

    /// 点击货板行
    pub fn preview_pallet(&self, pallet_id: &str) -> ApiResult<PalletPreview> {
        let _perf = PerfGuard::new("preview_pallet");
        Ok(self.workbench()?.select_and_preview_pallet(pallet_id)?)
    }

    // ==========================================
    // 直接调拨（不依赖勾选）
    // ==========================================

    pub fn move_to_preparing(&self, ids: &[String]) -> ApiResult<TransferResponse> {
        let mut workbench = self.workbench()?;
        let outcome = workbench.move_to_preparing(ids);
        Ok(Self::respond(&workbench, outcome))
    }

    pub fn move_to_waiting(&self, ids: &[String]) -> ApiResult<TransferResponse> {
        let mut workbench = self.workbench()?;
        let outcome = workbench.move_to_waiting(ids);
        Ok(Self::respond(&workbench, outcome))
    }

    /// 指定货板装板
    ///
    /// # 参数
    /// - ids: None 表示装板准备区全部货品
    pub fn load_into(&self, pallet_id: &str, ids: Option<Vec<String>>) -> ApiResult<TransferResponse> {
        let scope = match ids {
            Some(ids) => Scope::Selected(ids),
            None => Scope::All,
        };
        let mut workbench = self.workbench()?;
        let outcome = workbench.load_to_pallet_scoped(pallet_id, scope)?;
        Ok(Self::respond(&workbench, outcome))
    }

    pub fn unload_pallet(&self, pallet_id: &str) -> ApiResult<TransferResponse> {
        let mut workbench = self.workbench()?;
        let outcome = workbench.unload_pallet(pallet_id)?;
        Ok(Self::respond(&workbench, outcome))
    }

    pub fn delete_pallet(&self, pallet_id: &str) -> ApiResult<TransferResponse> {
        let mut workbench = self.workbench()?;
        let outcome = workbench.delete_pallet(pallet_id)?;
        Ok(Self::respond(&workbench, outcome))
    }

    /// 直接设置货板状态，返回原状态
    pub fn set_pallet_status(&self, pallet_id: &str, status: PalletStatus) -> ApiResult<PalletStatus> {
        let previous = self.workbench()?.set_pallet_status(pallet_id, status)?;
        info!(pallet_id, from = %previous, to = %status, "货板状态已设置");
        Ok(previous)
    }

    // ==========================================
    // 布局偏好
    // ==========================================

    /// 构造时读取的布局（之后随保存更新）
    pub fn layout(&self) -> ApiResult<PanelLayout> {
        let layout = self
            .layout
            .lock()
            .map_err(|e| ApiError::InternalError(format!("布局锁获取失败: {}", e)))?;
        Ok(*layout)
    }

    /// 拖拽结束时保存
    pub fn save_layout(&self, layout: PanelLayout) -> ApiResult<()> {
        self.layout_repo.save(&layout)?;
        let mut cached = self
            .layout
            .lock()
            .map_err(|e| ApiError::InternalError(format!("布局锁获取失败: {}", e)))?;
        *cached = layout;
        Ok(())
    }

    // ==========================================
    // 引擎策略
    // ==========================================

    pub fn engine_config(&self) -> ApiResult<EngineConfig> {
        Ok(*self.workbench()?.config())
    }

    /// 更新引擎策略；有配置管理器时同时持久化
    pub fn update_engine_config(&self, config: EngineConfig) -> ApiResult<()> {
        if let Some(manager) = &self.config_manager {
            manager
                .save_engine_config(&config)
                .map_err(|e| ApiError::DatabaseError(format!("保存引擎配置失败: {}", e)))?;
        }
        self.workbench()?.set_config(config);
        info!(
            preview_mode = config.preview_mode.as_str(),
            transition_policy = config.transition_policy.as_str(),
            auto_select_first_pallet = config.auto_select_first_pallet,
            "引擎策略已更新"
        );
        Ok(())
    }
}
